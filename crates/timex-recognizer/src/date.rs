//! Dates: "July 4th, 2024", "next Friday", "the 27th", "3 days ago".
//!
//! Extraction unions four sources: explicit date patterns, implicit
//! relative forms, bare numbers with a month cue nearby, and day-granular
//! durations with "ago" / "later". Parsing tries the same families in a
//! fixed order and resolves both a future and a past candidate whenever the
//! year is left open.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use tracing::debug;

use crate::agolater::{duration_unit, extract_with_before_and_after, resolve_ago_later, AgoLaterMode};
use crate::culture::{Culture, CultureConfig};
use crate::date_util::{
    create_date, create_date_rolling_month, generate_dates, month_day_candidates,
    normalize_two_digit_year, nth_weekday_from_first, nth_weekday_of_month, previous_weekday,
    roll_month, this_week_day, upcoming_weekday,
};
use crate::duration::{DurationExtractor, DurationParser};
use crate::extract::{DateTimeExtractor, EntityKind, ExtractResult};
use crate::matching::{
    exact_match, first_match, is_exact_match, is_glued_to_number, is_invalid_day_number_prefix,
    match_begin, match_end, matches, with_token_match, RegexMatch,
};
use crate::resolution::{parse_with, DateTimeParseResult, DateTimeParser, DateTimeResolutionResult, Strategy};
use crate::timex::{luis_date, luis_date_from, weekday_timex, FUZZY_YEAR};
use crate::token::{merge_all_tokens, Token};

// ── Extractor ───────────────────────────────────────────────────────────────

pub struct DateExtractor {
    culture: Arc<dyn Culture>,
    durations: DurationExtractor,
    duration_parser: DurationParser,
}

impl DateExtractor {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self {
            durations: DurationExtractor::new(culture.clone()),
            duration_parser: DurationParser::new(culture.clone()),
            culture,
        }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    fn basic_regex_match(&self, text: &str) -> Vec<Token> {
        let config = self.config();
        let mut tokens = Vec::new();
        for re in &config.date.basic {
            for m in matches(re, text) {
                if !has_single_separator(&m)
                    || !self.trailing_year_is_own(text, &m)
                    || text[m.end()..].starts_with('%')
                {
                    debug!(text = m.as_str(), "basic date rejected");
                    continue;
                }
                let (start, end) = m.token_span();
                // "next May 5" carries its relative word along
                let start = match_end(&config.utility.strict_relative, &text[..start])
                    .map_or(start, |prefix| prefix.start());
                tokens.push(Token::new(start, end));
            }
        }
        tokens
    }

    /// A two-digit year ending the match may really be the month of a second
    /// date ("10-1-11" inside "10-1 - 11-7"). It belongs to this date unless
    /// the text from the year on reads as a date and what follows the year
    /// does not.
    fn trailing_year_is_own(&self, text: &str, m: &RegexMatch<'_>) -> bool {
        let Some(year) = m.group("year") else {
            return true;
        };
        if year.end != m.end() || !self.starts_with_basic_date(&text[year.start..]) {
            return true;
        }
        let rest = &text[year.end..];
        let rest = first_match(&self.config().utility.range_connector_symbol, rest)
            .map_or(rest, |sym| &rest[sym.end()..]);
        self.starts_with_basic_date(rest)
    }

    fn starts_with_basic_date(&self, text: &str) -> bool {
        let date = &self.config().date;
        date.basic
            .iter()
            .chain(std::iter::once(&date.month_day_dash))
            .any(|re| match_begin(re, text).is_some())
    }

    fn implicit_date(&self, text: &str) -> Vec<Token> {
        let d = &self.config().date;
        let mut tokens = Vec::new();
        for re in [&d.on, &d.relaxed_on, &d.the_nth, &d.for_the] {
            for m in matches(re, text) {
                let (start, end) = m.token_span();
                let after = &text[end..];
                if is_glued_to_number(after) || after.trim_start().to_lowercase().starts_with("centur") {
                    continue;
                }
                tokens.push(Token::new(start, end));
            }
        }
        for re in [
            &d.special_day,
            &d.special_day_with_num,
            &d.relative_week_day,
            &d.next_weekday,
            &d.this_weekday,
            &d.last_weekday,
            &d.bare_weekday,
            &d.week_day_of_month,
        ] {
            tokens.extend(matches(re, text).iter().map(|m| Token::new(m.start(), m.end())));
        }
        tokens
    }

    /// Day numbers made into dates by a cue around them: a month name, "of
    /// next month", a weekday that agrees, or a weekday after an ordinal.
    fn number_with_month(&self, text: &str, reference: NaiveDateTime) -> Vec<Token> {
        let config = self.config();
        let d = &config.date;
        let numbers = &config.numbers;
        let ordinals = numbers.ordinal.extract(text);
        let integers: Vec<ExtractResult> = numbers
            .integer
            .extract(text)
            .into_iter()
            .filter(|n| !ordinals.iter().any(|o| o.overlaps(n)))
            .collect();

        let mut tokens = Vec::new();
        let mut day_numbers = Vec::new();
        for num in ordinals.iter().chain(&integers) {
            let Some(day) = numbers.parser.parse(num).and_then(as_day) else {
                continue;
            };
            let before = &text[..num.start];
            let after = &text[num.end()..];
            if is_invalid_day_number_prefix(before) || is_glued_to_number(after) {
                continue;
            }
            day_numbers.push(num);

            if let Some(m) = match_end(&d.month_end, before) {
                tokens.push(Token::new(m.start(), num.end()));
            }
            for re in [&d.relative_month_suffix, &d.of_month] {
                if let Some(m) = first_match(re, after) {
                    tokens.push(Token::new(num.start, num.end() + m.end()));
                }
            }
            if num.kind == EntityKind::Ordinal && day <= 5 {
                if let Some(m) = first_match(&d.week_day_start, after) {
                    tokens.push(Token::new(num.start, num.end() + m.end()));
                }
            }
        }

        for m in matches(&d.weekday_and_day_of_month, text) {
            let Some(dom) = m.group("dom") else { continue };
            let is_number = day_numbers
                .iter()
                .any(|n| n.start == dom.start && n.end() == dom.end);
            if is_number && self.weekday_agrees(&m, reference.date()) {
                tokens.push(Token::new(m.start(), m.end()));
            }
        }
        tokens
    }

    /// "Friday the 14th" only counts when the 14th of this month is a Friday.
    fn weekday_agrees(&self, m: &RegexMatch<'_>, today: NaiveDate) -> bool {
        let tables = &self.config().tables;
        let (Some(weekday), Some(day)) = (tables.weekday(m.text("weekday")), tables.day(m.text("dom"))) else {
            return false;
        };
        create_date(today.year(), today.month(), day).is_some_and(|date| date.weekday() == weekday)
    }

    fn duration_with_ago_later(&self, text: &str, reference: NaiveDateTime) -> Vec<Token> {
        let durations: Vec<ExtractResult> = self
            .durations
            .extract(text, reference)
            .into_iter()
            .filter(|er| {
                duration_unit(&self.duration_parser.parse(er, reference))
                    .is_some_and(|unit| AgoLaterMode::Date.accepts(unit))
            })
            .collect();
        extract_with_before_and_after(text, &durations, &self.config().utility)
    }
}

impl DateTimeExtractor for DateExtractor {
    fn kind(&self) -> EntityKind {
        EntityKind::Date
    }

    fn extract(&self, text: &str, reference: NaiveDateTime) -> Vec<ExtractResult> {
        let mut tokens = self.basic_regex_match(text);
        tokens.extend(self.implicit_date(text));
        tokens.extend(self.number_with_month(text, reference));
        tokens.extend(self.duration_with_ago_later(text, reference));
        merge_all_tokens(tokens, text, EntityKind::Date)
    }
}

/// Mixed separators ("7/4-2024") mean the match straddles two expressions.
fn has_single_separator(m: &RegexMatch<'_>) -> bool {
    let parts: Vec<_> = ["day", "month", "year"]
        .iter()
        .filter_map(|name| m.group(name))
        .collect();
    let mut seen: Vec<char> = Vec::new();
    for (i, c) in m.as_str().char_indices() {
        let at = m.start() + i;
        if parts.iter().any(|g| g.start <= at && at < g.end) {
            continue;
        }
        if matches!(c, '/' | '\\' | '-' | '.') && !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen.len() <= 1
}

fn as_day(value: f64) -> Option<u32> {
    (value.fract() == 0.0 && (1.0..=31.0).contains(&value)).then_some(value as u32)
}

// ── Parser ──────────────────────────────────────────────────────────────────

pub struct DateParser {
    culture: Arc<dyn Culture>,
    durations: DurationExtractor,
    duration_parser: DurationParser,
}

const STRATEGIES: &[Strategy<DateParser>] = &[
    ("basic", DateParser::parse_basic),
    ("implicit", DateParser::parse_implicit),
    ("weekday_of_month", DateParser::parse_weekday_of_month),
    ("ago_later", DateParser::parse_ago_later),
    ("number_with_month", DateParser::parse_number_with_month),
    ("single_number", DateParser::parse_single_number),
];

impl DateParser {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self {
            durations: DurationExtractor::new(culture.clone()),
            duration_parser: DurationParser::new(culture.clone()),
            culture,
        }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    fn parse_basic(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let config = self.config();
        let text = er.text.trim();
        let (swift, rest) = match match_begin(&config.utility.strict_relative, text) {
            Some(m) => (self.culture.swift_relative(m.as_str()), &text[m.end()..]),
            None => (None, text),
        };
        config.date.basic.iter().find_map(|re| {
            with_token_match(re, rest, config.date_token_prefix, |m| {
                self.resolve_basic(m, swift, reference)
            })
        })
    }

    fn resolve_basic(
        &self,
        m: &RegexMatch<'_>,
        swift: Option<i32>,
        reference: NaiveDateTime,
    ) -> Option<DateTimeResolutionResult> {
        let config = self.config();
        let day = config.tables.day(m.text("day"))?;
        let month_text = m.text("month");
        let month = config
            .tables
            .month(month_text)
            .or_else(|| month_text.parse().ok())?;
        let explicit_year = match m.group("year") {
            Some(g) => Some(normalize_two_digit_year(
                g.text.parse().ok()?,
                config.min_two_digit_year_past,
                config.max_two_digit_year_future,
            )?),
            None => None,
        };
        // a weekday already pins the date, so "next" does not move the year
        let year = explicit_year.or_else(|| {
            swift.map(|s| reference.year() + if m.has("weekday") { 0 } else { s })
        });

        match year {
            Some(year) => {
                let date = create_date(year, month, day)?;
                Some(DateTimeResolutionResult::date(
                    luis_date(Some(year), Some(month), day),
                    date,
                    date,
                ))
            }
            None => {
                let today = reference.date();
                let (future, past) = generate_dates(true, today, today.year(), month, day)?;
                Some(DateTimeResolutionResult::date(
                    luis_date(None, Some(month), day),
                    future,
                    past,
                ))
            }
        }
    }

    fn parse_implicit(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let config = self.config();
        let d = &config.date;
        let prefix = config.date_token_prefix;
        let text = er.text.trim();
        let today = reference.date();

        [&d.on, &d.relaxed_on, &d.the_nth, &d.for_the]
            .into_iter()
            .find_map(|re| with_token_match(re, text, prefix, |m| self.day_of_month(m, today)))
            .or_else(|| {
                with_token_match(&d.special_day, text, prefix, |m| {
                    let swift = self.culture.swift_day(m.text("special"))?;
                    Some(full_date(today + Duration::days(swift as i64)))
                })
            })
            .or_else(|| {
                with_token_match(&d.special_day_with_num, text, prefix, |m| {
                    let swift = self.culture.swift_day(m.text("special"))?;
                    let count = config.tables.number(m.text("number"))?;
                    Some(full_date(today + Duration::days(swift as i64 + count as i64)))
                })
            })
            .or_else(|| {
                with_token_match(&d.relative_week_day, text, prefix, |m| {
                    let weekday = config.tables.weekday(m.text("weekday"))?;
                    let count = config.tables.number(m.text("number")).filter(|n| *n >= 1)?;
                    let first = upcoming_weekday(today, weekday);
                    Some(full_date(first + Duration::weeks(count as i64 - 1)))
                })
            })
            .or_else(|| {
                let relative: [(&regex::Regex, fn(NaiveDate, Weekday) -> NaiveDate); 3] = [
                    (&d.next_weekday, upcoming_weekday),
                    (&d.this_weekday, this_week_day),
                    (&d.last_weekday, previous_weekday),
                ];
                relative.into_iter().find_map(|(re, resolve)| {
                    with_token_match(re, text, prefix, |m| {
                        let weekday = config.tables.weekday(m.text("weekday"))?;
                        let date = resolve(today, weekday);
                        Some(DateTimeResolutionResult::date(weekday_timex(weekday), date, date))
                    })
                })
            })
            .or_else(|| {
                with_token_match(&d.weekday_and_day_of_month, text, prefix, |m| {
                    let day = config.tables.day(m.text("dom"))?;
                    Some(full_date(create_date(today.year(), today.month(), day)?))
                })
            })
            .or_else(|| {
                with_token_match(&d.bare_weekday, text, prefix, |m| {
                    let weekday = config.tables.weekday(m.text("weekday"))?;
                    let (future, past) = if today.weekday() == weekday {
                        (today, today)
                    } else {
                        (upcoming_weekday(today, weekday), previous_weekday(today, weekday))
                    };
                    Some(DateTimeResolutionResult::date(weekday_timex(weekday), future, past))
                })
            })
    }

    fn day_of_month(&self, m: &RegexMatch<'_>, today: NaiveDate) -> Option<DateTimeResolutionResult> {
        let group = m.first_of(&["day", "dom"])?;
        let day = self.config().tables.day(group.text)?;
        let (future, past) = month_day_candidates(today, day)?;
        Some(DateTimeResolutionResult::date(luis_date(None, None, day), future, past))
    }

    /// "the second Sunday of May", "last Friday of next month".
    fn parse_weekday_of_month(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let config = self.config();
        let m = exact_match(&config.date.week_day_of_month, &er.text)?;
        let cardinal_text = m.text("cardinal");
        let cardinal = if self.culture.is_cardinal_last(cardinal_text) {
            5
        } else {
            config.tables.cardinal(cardinal_text)?
        };
        let weekday = config.tables.weekday(m.text("weekday"))?;
        let today = reference.date();
        let week_timex = |year: &str, month: u32| {
            format!(
                "{year}-{month:02}-WXX-{}-#{cardinal}",
                weekday.number_from_monday()
            )
        };

        if let Some(relmonth) = m.group("relmonth") {
            let swift = self.culture.swift_relative(relmonth.text)?;
            let (year, month) = roll_month(today.year(), today.month() as i32 + swift);
            let date = weekday_in_month(year, month, weekday, cardinal)?;
            return Some(DateTimeResolutionResult::date(
                week_timex(&year.to_string(), month),
                date,
                date,
            ));
        }

        let month = config.tables.month(m.text("month"))?;
        if let Some(year) = m.group("year").and_then(|g| g.text.parse::<i32>().ok()) {
            let date = weekday_in_month(year, month, weekday, cardinal)?;
            return Some(DateTimeResolutionResult::date(
                week_timex(&year.to_string(), month),
                date,
                date,
            ));
        }

        let this_year = weekday_in_month(today.year(), month, weekday, cardinal)?;
        let future = if this_year < today {
            weekday_in_month(today.year() + 1, month, weekday, cardinal)?
        } else {
            this_year
        };
        let past = if this_year > today {
            weekday_in_month(today.year() - 1, month, weekday, cardinal)?
        } else {
            this_year
        };
        Some(DateTimeResolutionResult::date(week_timex(FUZZY_YEAR, month), future, past))
    }

    fn parse_ago_later(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let durations = self.durations.extract(&er.text, reference);
        let duration = durations.first()?;
        let pr = self.duration_parser.parse(duration, reference);
        resolve_ago_later(
            self.culture.as_ref(),
            &er.text,
            duration,
            &pr,
            reference,
            AgoLaterMode::Date,
        )
    }

    /// The day number of the text: an ordinal if there is one, else an integer.
    fn day_number(&self, text: &str) -> Option<(ExtractResult, u32)> {
        let numbers = &self.config().numbers;
        let num = numbers
            .ordinal
            .extract(text)
            .into_iter()
            .next()
            .or_else(|| numbers.integer.extract(text).into_iter().next())?;
        let day = numbers.parser.parse(&num).and_then(as_day)?;
        Some((num, day))
    }

    fn parse_number_with_month(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let config = self.config();
        let d = &config.date;
        let text = er.text.as_str();
        let (num, day) = self.day_number(text)?;
        let before = &text[..num.start];
        let after = &text[num.end()..];
        let today = reference.date();

        let month = match_end(&d.month_end, before)
            .or_else(|| first_match(&d.of_month, after))
            .and_then(|m| config.tables.month(m.text("month")));
        if let Some(month) = month {
            let (future, past) = generate_dates(true, today, today.year(), month, day)?;
            return Some(DateTimeResolutionResult::date(
                luis_date(None, Some(month), day),
                future,
                past,
            ));
        }

        if let Some(m) = first_match(&d.relative_month_suffix, after) {
            let swift = self.culture.swift_relative(m.text("relmonth"))?;
            let date = create_date_rolling_month(today.year(), today.month() as i32 + swift, day)?;
            return Some(full_date(date));
        }

        if num.kind == EntityKind::Ordinal && day <= 5 {
            let m = first_match(&d.week_day_start, after)?;
            let weekday = config.tables.weekday(m.text("weekday"))?;
            let date = nth_weekday_of_month(today.year(), today.month(), weekday, day)?;
            return Some(full_date(date));
        }
        None
    }

    /// A lone day number: "the 27th".
    fn parse_single_number(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        if !is_exact_match(&self.config().date.single_number, &er.text) {
            return None;
        }
        let (_, day) = self.day_number(&er.text)?;
        let (future, past) = month_day_candidates(reference.date(), day)?;
        Some(DateTimeResolutionResult::date(luis_date(None, None, day), future, past))
    }
}

impl DateTimeParser for DateParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Date
    }

    fn parse(&self, er: &ExtractResult, reference: NaiveDateTime) -> DateTimeParseResult {
        parse_with(self, EntityKind::Date, STRATEGIES, er, reference)
    }
}

fn full_date(date: NaiveDate) -> DateTimeResolutionResult {
    DateTimeResolutionResult::date(luis_date_from(date), date, date)
}

/// The `cardinal`th `weekday` of a month, stepping back a week when the
/// month has fewer (so 5 means "last").
fn weekday_in_month(year: i32, month: u32, weekday: Weekday, cardinal: u32) -> Option<NaiveDate> {
    let date = nth_weekday_from_first(year, month, weekday, cardinal)?;
    if date.month() == month {
        Some(date)
    } else {
        Some(date - Duration::weeks(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::English;
    use crate::date_util::at_midnight;
    use proptest::prelude::*;
    use std::sync::OnceLock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn culture() -> Arc<dyn Culture> {
        static CULTURE: OnceLock<Arc<dyn Culture>> = OnceLock::new();
        CULTURE
            .get_or_init(|| Arc::new(English::new().unwrap()))
            .clone()
    }

    fn extract_at(text: &str, reference: NaiveDate) -> Vec<ExtractResult> {
        DateExtractor::new(culture()).extract(text, at_midnight(reference))
    }

    /// Extract the first date and parse it: (timex, future, past).
    fn resolve_at(text: &str, reference: NaiveDate) -> (String, NaiveDate, NaiveDate) {
        let c = culture();
        let reference = at_midnight(reference);
        let er = DateExtractor::new(c.clone())
            .extract(text, reference)
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("no date in {text:?}"));
        let pr = DateParser::new(c).parse(&er, reference);
        let value = pr.value.unwrap_or_else(|| panic!("unresolved {:?}", er.text));
        (
            value.timex.clone(),
            value.future_point().unwrap().date(),
            value.past_point().unwrap().date(),
        )
    }

    fn resolve(text: &str) -> (String, NaiveDate, NaiveDate) {
        resolve_at(text, date(2024, 6, 15))
    }

    #[test]
    fn test_next_friday_from_wednesday() {
        let wednesday = date(2024, 6, 12);
        let ers = extract_at("next Friday", wednesday);
        assert_eq!(ers.len(), 1);
        assert_eq!(ers[0].text, "next Friday");
        assert_eq!(ers[0].kind, EntityKind::Date);
        let (timex, future, past) = resolve_at("next Friday", wednesday);
        assert_eq!(timex, "XXXX-WXX-5");
        assert_eq!(future, date(2024, 6, 14));
        assert_eq!(future, past);
    }

    #[test]
    fn test_this_and_last_weekday() {
        let wednesday = date(2024, 6, 12);
        assert_eq!(resolve_at("this Monday", wednesday).1, date(2024, 6, 10));
        assert_eq!(resolve_at("last Friday", wednesday).1, date(2024, 6, 7));
    }

    #[test]
    fn test_bare_weekday_on_that_day() {
        let (timex, future, past) = resolve_at("Saturday", date(2024, 6, 15));
        assert_eq!(timex, "XXXX-WXX-6");
        assert_eq!((future, past), (date(2024, 6, 15), date(2024, 6, 15)));
        let (_, future, past) = resolve_at("Monday", date(2024, 6, 15));
        assert_eq!((future, past), (date(2024, 6, 17), date(2024, 6, 10)));
    }

    #[test]
    fn test_the_27th_not_yet_passed() {
        let (timex, future, past) = resolve_at("the 27th", date(2024, 6, 10));
        assert_eq!(timex, "XXXX-XX-27");
        assert_eq!(future, date(2024, 6, 27));
        assert_eq!(past, date(2024, 6, 27));
    }

    #[test]
    fn test_the_27th_already_passed() {
        let (_, future, past) = resolve_at("on the 27th", date(2024, 6, 28));
        assert_eq!(future, date(2024, 7, 27));
        assert_eq!(past, date(2024, 6, 27));
    }

    #[test]
    fn test_impossible_month_day_stays_unresolved() {
        let parser = DateParser::new(culture());
        let reference = at_midnight(date(2024, 6, 15));
        for text in ["February 30", "Feb 30 2024", "April 31st"] {
            let er = ExtractResult::new(0, text, EntityKind::Date);
            assert!(parser.parse(&er, reference).value.is_none(), "{text}");
        }
    }

    #[test]
    fn test_days_ago() {
        let ers = extract_at("I saw it 3 days ago", date(2024, 6, 15));
        assert_eq!(ers[0].text, "3 days ago");
        let (timex, future, past) = resolve("3 days ago");
        assert_eq!(timex, "2024-06-12");
        assert_eq!((future, past), (date(2024, 6, 12), date(2024, 6, 12)));
    }

    #[test]
    fn test_explicit_dates() {
        assert_eq!(resolve("July 4th, 2024").0, "2024-07-04");
        assert_eq!(resolve("the 4th of July 2023").1, date(2023, 7, 4));
        assert_eq!(resolve("2024-07-04").1, date(2024, 7, 4));
        assert_eq!(resolve("7/4/24").1, date(2024, 7, 4));
        assert_eq!(resolve("7/4/85").1, date(1985, 7, 4));
    }

    #[test]
    fn test_month_day_without_year() {
        let (timex, future, past) = resolve("July 4");
        assert_eq!(timex, "XXXX-07-04");
        assert_eq!(future, date(2024, 7, 4));
        assert_eq!(past, date(2023, 7, 4));
    }

    #[test]
    fn test_reference_day_is_both_candidates() {
        let (_, future, past) = resolve("June 15");
        assert_eq!((future, past), (date(2024, 6, 15), date(2024, 6, 15)));
    }

    #[test]
    fn test_feb_29_looks_for_leap_years() {
        let (_, future, past) = resolve_at("Feb 29", date(2025, 6, 1));
        assert_eq!(future, date(2028, 2, 29));
        assert_eq!(past, date(2024, 2, 29));
    }

    #[test]
    fn test_relative_prefix_moves_year() {
        let ers = extract_at("see you next May 5", date(2024, 6, 15));
        assert_eq!(ers[0].text, "next May 5");
        assert_eq!(resolve("next May 5").0, "2025-05-05");
        assert_eq!(resolve("last May 5").0, "2023-05-05");
    }

    #[test]
    fn test_mixed_separators_rejected() {
        let ers = extract_at("7/4-2024", date(2024, 6, 15));
        assert_eq!(ers[0].text, "7/4");
    }

    #[test]
    fn test_trailing_year_of_a_range() {
        assert!(extract_at("10-1 - 11-7", date(2024, 6, 15)).is_empty());
        let ers = extract_at("10-1-11", date(2024, 6, 15));
        assert_eq!(ers.len(), 1);
        assert_eq!(resolve("10-1-11").1, date(2011, 10, 1));
    }

    #[test]
    fn test_special_days() {
        assert_eq!(resolve("tomorrow").1, date(2024, 6, 16));
        assert_eq!(resolve("the day after tomorrow").1, date(2024, 6, 17));
        assert_eq!(resolve("yesterday").0, "2024-06-14");
        assert_eq!(resolve("5 days from today").1, date(2024, 6, 20));
    }

    #[test]
    fn test_weekdays_from_now() {
        assert_eq!(
            resolve_at("two sundays from now", date(2024, 6, 12)).1,
            date(2024, 6, 23)
        );
    }

    #[test]
    fn test_weekday_of_month() {
        let (timex, future, past) = resolve("the second Sunday of May");
        assert_eq!(timex, "XXXX-05-WXX-7-#2");
        assert_eq!(future, date(2025, 5, 11));
        assert_eq!(past, date(2024, 5, 12));
        let (timex, future, _) = resolve("last Friday of next month");
        assert_eq!(timex, "2024-07-WXX-5-#5");
        assert_eq!(future, date(2024, 7, 26));
    }

    #[test]
    fn test_number_with_month_cues() {
        let ers = extract_at("how about Friday the 14th?", date(2024, 6, 10));
        assert_eq!(ers[0].text, "Friday the 14th");
        assert_eq!(resolve_at("Friday the 14th", date(2024, 6, 10)).1, date(2024, 6, 14));
        assert!(extract_at("Friday the 13th", date(2024, 6, 10))
            .iter()
            .all(|er| er.text != "Friday the 13th"));
        assert_eq!(resolve("the 5th of next month").0, "2024-07-05");
        assert_eq!(resolve("second Sunday").1, date(2024, 6, 9));
    }

    #[test]
    fn test_numbers_glued_to_other_things_ignored() {
        assert!(extract_at("it costs $25 at 10:30", date(2024, 6, 15)).is_empty());
        assert!(extract_at("on 5.5% of days", date(2024, 6, 15)).is_empty());
    }

    #[test]
    fn test_wrong_kind_is_unresolved() {
        let er = ExtractResult::new(0, "tomorrow", EntityKind::Time);
        let pr = DateParser::new(culture()).parse(&er, at_midnight(date(2024, 6, 15)));
        assert!(pr.value.is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_at("", date(2024, 6, 15)).is_empty());
    }

    #[test]
    fn test_reextracting_text_is_stable() {
        let reference = date(2024, 6, 10);
        for text in [
            "next Friday",
            "July 4th, 2024",
            "the 27th",
            "3 days ago",
            "the day after tomorrow",
            "the second Sunday of May",
            "Friday the 14th",
            "7/4/2024",
        ] {
            let first = extract_at(&format!("we said {text} then"), reference);
            assert_eq!(first.len(), 1, "{text}");
            let again = extract_at(&first[0].text, reference);
            assert_eq!(again.len(), 1, "{text}");
            assert_eq!(again[0].text, first[0].text);
            assert_eq!(again[0].kind, first[0].kind);
        }
    }

    proptest! {
        #[test]
        fn prop_next_weekday_is_one_to_seven_days_ahead(days in 0i64..3650, wd in 0usize..7) {
            let names = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
            let reference = date(2020, 1, 1) + Duration::days(days);
            let (_, future, past) = resolve_at(&format!("next {}", names[wd]), reference);
            let ahead = (future - reference).num_days();
            prop_assert!((1..=7).contains(&ahead));
            prop_assert_eq!(future, past);
        }
    }
}
