//! Culture configuration: the regexes, lookup tables and behavioral hooks
//! every extractor and parser is parameterized over.
//!
//! A culture is built once (all patterns compiled up front) and then shared
//! read-only behind an `Arc`. Only English (`en-us`) ships today.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Weekday;
use regex::{Regex, RegexBuilder};

use crate::error::{RecognizerError, Result};
use crate::number::{NumberExtractor, NumberParser};

mod english;

pub use english::English;

/// Name of the default culture and the fallback target.
pub const DEFAULT_CULTURE: &str = "en-us";

/// Compile a culture pattern. All culture patterns match case-insensitively.
pub(crate) fn compile(name: &'static str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| RecognizerError::InvalidPattern { name, source })
}

/// Canonical lookup key: lowercase, hyphens as spaces, single spaces, no
/// trailing period.
pub fn normalize_key(text: &str) -> String {
    text.to_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches('.')
        .to_string()
}

/// Look up a culture by name (case-insensitive).
pub fn for_name(name: &str) -> Result<Arc<dyn Culture>> {
    match name.to_lowercase().as_str() {
        "en-us" | "en" | "english" => Ok(Arc::new(English::new()?)),
        _ => Err(RecognizerError::UnsupportedCulture(name.to_string())),
    }
}

// ── Behavioral hooks ────────────────────────────────────────────────────────

/// How relative words shift a date.
pub trait RelativeWords {
    /// Day offset of a special day word: "today" 0, "tomorrow" 1, ...
    fn swift_day(&self, text: &str) -> Option<i32>;

    /// Offset carried by the first relative word in `text`: "next" 1,
    /// "last" -1, "this" 0.
    fn swift_relative(&self, text: &str) -> Option<i32>;

    /// Whether a cardinal word means "the last one".
    fn is_cardinal_last(&self, text: &str) -> bool;
}

/// A clock reading being assembled by the time parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeAdjustment {
    pub hour: i32,
    pub minute: i32,
    pub has_minute: bool,
    pub has_am: bool,
    pub has_pm: bool,
}

/// Culture-specific corrections from words around the clock reading.
pub trait TimeAdjuster {
    /// "half past", "quarter to", "ten minutes past", ...
    fn adjust_by_prefix(&self, prefix: &str, adjust: &mut TimeAdjustment);

    /// "in the morning", "at night", "at lunchtime", ...
    fn adjust_by_suffix(&self, suffix: &str, adjust: &mut TimeAdjustment);
}

pub trait Culture: RelativeWords + TimeAdjuster + Send + Sync {
    fn name(&self) -> &str;
    fn config(&self) -> &CultureConfig;
}

// ── Lookup tables ───────────────────────────────────────────────────────────

/// Token-to-value dictionaries. Keys are stored normalized (see
/// [`normalize_key`]) and every lookup normalizes its input the same way.
#[derive(Debug, Default)]
pub struct Tables {
    pub month_of_year: HashMap<String, u32>,
    pub day_of_week: HashMap<String, Weekday>,
    pub day_of_month: HashMap<String, u32>,
    pub cardinal: HashMap<String, u32>,
    pub numbers: HashMap<String, u32>,
    /// Surface unit to canonical code (`Y`, `MON`, `W`, `D`, `H`, `M`, `S`).
    pub unit: HashMap<String, &'static str>,
    /// Canonical unit code to seconds.
    pub unit_seconds: HashMap<&'static str, f64>,
    pub double_numbers: HashMap<String, f64>,
    /// Season word to timex code (`SP`, `SU`, `FA`, `WI`).
    pub season: HashMap<String, &'static str>,
}

impl Tables {
    pub fn month(&self, text: &str) -> Option<u32> {
        self.month_of_year.get(&normalize_key(text)).copied()
    }

    pub fn weekday(&self, text: &str) -> Option<Weekday> {
        self.day_of_week.get(&normalize_key(text)).copied()
    }

    pub fn day(&self, text: &str) -> Option<u32> {
        self.day_of_month.get(&normalize_key(text)).copied()
    }

    pub fn cardinal(&self, text: &str) -> Option<u32> {
        self.cardinal.get(&normalize_key(text)).copied()
    }

    /// A spelled or digit number from the small-number table.
    pub fn number(&self, text: &str) -> Option<u32> {
        let key = normalize_key(text);
        self.numbers.get(&key).copied().or_else(|| key.parse().ok())
    }

    pub fn unit(&self, text: &str) -> Option<&'static str> {
        self.unit.get(&normalize_key(text)).copied()
    }

    pub fn seconds_per(&self, code: &str) -> Option<f64> {
        self.unit_seconds.get(code).copied()
    }

    pub fn double_number(&self, text: &str) -> Option<f64> {
        self.double_numbers.get(&normalize_key(text)).copied()
    }

    pub fn season(&self, text: &str) -> Option<&'static str> {
        self.season.get(&normalize_key(text)).copied()
    }
}

/// The number capability the date-time pipeline consumes.
pub struct NumberCapability {
    pub cardinal: Box<dyn NumberExtractor>,
    pub integer: Box<dyn NumberExtractor>,
    pub ordinal: Box<dyn NumberExtractor>,
    pub parser: Box<dyn NumberParser>,
}

// ── Regex bundles ───────────────────────────────────────────────────────────

/// Connectors and relative markers shared across entity kinds.
#[derive(Debug)]
pub struct UtilityRegexes {
    /// "ago" after a duration, anchored at the start of the following text.
    pub ago: Regex,
    /// "later", "from now" after a duration.
    pub later: Regex,
    /// "in" right before a duration.
    pub in_connector: Regex,
    /// A strict relative word ("next", "last", "this") adjoining a date.
    pub strict_relative: Regex,
    /// A relative word anywhere in the text.
    pub relative_word: Regex,
    /// Range connector symbols at the start of a text.
    pub range_connector_symbol: Regex,
    /// Exact match of the text between two range points ("to", "till", "-").
    pub till: Regex,
    /// Exact match of "and" between two range points.
    pub range_and: Regex,
    /// "from" right before a range.
    pub from_prefix: Regex,
    /// "between" right before a range.
    pub between_prefix: Regex,
    /// "past", "last", "in the past" right before a duration.
    pub past_prefix: Regex,
    /// "next", "coming", "within the next" right before a duration.
    pub future_prefix: Regex,
}

#[derive(Debug)]
pub struct DurationRegexes {
    /// A unit (and optional "and a half") following a number.
    pub followed_unit: Regex,
    /// Number glued to its unit: "3h", "2days".
    pub number_combined_with_unit: Regex,
    /// "an hour", "half an hour", "another day".
    pub an_unit: Regex,
    /// "half day", "half a year".
    pub half_unit: Regex,
    /// "all day", "whole week".
    pub all_unit: Regex,
    /// "a few weeks", "a couple of days".
    pub inexact_number_unit: Regex,
    /// The unit after a relative word: "next year" yields "year".
    pub relative_unit: Regex,
    pub more_than: Regex,
    pub less_than: Regex,
}

#[derive(Debug)]
pub struct DateRegexes {
    /// Explicit dates, in parsing priority order.
    pub basic: Vec<Regex>,
    /// "11-7" at the start of a text; only used to validate trailing years.
    pub month_day_dash: Regex,
    /// Implicit dates; each exposes a `token` group when the span is narrower
    /// than the match.
    pub on: Regex,
    pub relaxed_on: Regex,
    pub the_nth: Regex,
    pub special_day: Regex,
    pub special_day_with_num: Regex,
    pub relative_week_day: Regex,
    pub next_weekday: Regex,
    pub this_weekday: Regex,
    pub last_weekday: Regex,
    pub bare_weekday: Regex,
    pub week_day_of_month: Regex,
    pub for_the: Regex,
    pub weekday_and_day_of_month: Regex,
    /// Month name ending the text before a number.
    pub month_end: Regex,
    /// "of May" starting the text after a number.
    pub of_month: Regex,
    /// "of next month" starting the text after a number.
    pub relative_month_suffix: Regex,
    /// Weekday starting the text after an ordinal.
    pub week_day_start: Regex,
    /// Exact match of a day number standing alone: "the 27th", "on the 3rd".
    pub single_number: Regex,
}

#[derive(Debug)]
pub struct TimeRegexes {
    /// Clock expressions, in parsing priority order.
    pub basic: Vec<Regex>,
    /// "at 5"; the `token` group is the span.
    pub at: Regex,
    pub ish: Regex,
}

#[derive(Debug)]
pub struct TimePeriodRegexes {
    /// "from 3 to 5pm", "3-5 pm".
    pub from_to: Regex,
    /// "between 3 and 5pm".
    pub between_and: Regex,
    /// "morning", "in the afternoon", "early evening".
    pub time_of_day: Regex,
}

#[derive(Debug)]
pub struct DatePeriodRegexes {
    /// Explicit day ranges within one month.
    pub simple: Vec<Regex>,
    pub month_with_year: Vec<Regex>,
    pub month_to_month: Vec<Regex>,
    pub year: Regex,
    pub one_word: Regex,
    pub to_date: Regex,
    pub week_of_month: Regex,
    pub week_of_year: Regex,
    pub half_year: Vec<Regex>,
    pub quarter: Vec<Regex>,
    pub relative_quarter: Regex,
    pub season: Regex,
    pub which_week: Regex,
    pub rest_of: Regex,
    /// "week of" ending the text before a date.
    pub week_of: Regex,
    /// "month of" ending the text before a date.
    pub month_of: Regex,
    pub now: Regex,
    /// Bare month words too ambiguous to stand alone in lowercase ("may").
    pub ambiguous_month: Regex,
}

#[derive(Debug)]
pub struct DateTimeRegexes {
    /// "now", "as soon as possible", "recently".
    pub now: Regex,
    /// Exact match of the text joining a date and a time.
    pub connector: Regex,
    /// "tonight" / "this morning" right before a time.
    pub time_of_today_before: Regex,
    /// "tonight" / "this morning" right after a time.
    pub time_of_today_after: Regex,
    /// A lone hour followed by "tonight" / "this morning": "7 this morning".
    pub hour_with_time_of_today: Regex,
}

#[derive(Debug)]
pub struct DateTimePeriodRegexes {
    /// "tonight", "this morning", "last night".
    pub specific_time_of_day: Regex,
    /// Exact match of the text joining a date and a time range.
    pub connector: Regex,
}

/// Everything one culture contributes, compiled and ready.
pub struct CultureConfig {
    pub tables: Tables,
    pub numbers: NumberCapability,
    pub utility: UtilityRegexes,
    pub duration: DurationRegexes,
    pub date: DateRegexes,
    pub time: TimeRegexes,
    pub time_period: TimePeriodRegexes,
    pub date_period: DatePeriodRegexes,
    pub date_time: DateTimeRegexes,
    pub date_time_period: DateTimePeriodRegexes,
    /// Two-digit years at or above this are 19xx.
    pub min_two_digit_year_past: i32,
    /// Two-digit years below this are 20xx.
    pub max_two_digit_year_future: i32,
    /// Prepended to a date fragment so prefix-anchored patterns can match it.
    pub date_token_prefix: &'static str,
    /// Prepended to a time fragment so prefix-anchored patterns can match it.
    pub time_token_prefix: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Twenty-First"), "twenty first");
        assert_eq!(normalize_key("  day  after tomorrow "), "day after tomorrow");
        assert_eq!(normalize_key("Sept."), "sept");
    }

    #[test]
    fn test_compile_is_case_insensitive() {
        let re = compile("test", "friday").unwrap();
        assert!(re.is_match("FRIDAY"));
    }

    #[test]
    fn test_compile_reports_pattern_name() {
        let err = compile("broken", "(unclosed").unwrap_err();
        assert!(matches!(err, RecognizerError::InvalidPattern { name: "broken", .. }));
    }

    #[test]
    fn test_for_name() {
        assert_eq!(for_name("EN-US").unwrap().name(), DEFAULT_CULTURE);
        assert!(matches!(
            for_name("xx-yy"),
            Err(RecognizerError::UnsupportedCulture(_))
        ));
    }
}
