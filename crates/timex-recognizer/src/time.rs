//! Clock times: "5pm", "10:30", "half past five", "seven in the evening",
//! "noon", "at 5", "5ish".
//!
//! A time resolves to the reference day at that clock reading. Hours that
//! could be morning or afternoon keep the spoken hour and are flagged with
//! the `ampm` comment.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::culture::{normalize_key, Culture, CultureConfig, TimeAdjustment};
use crate::extract::{DateTimeExtractor, EntityKind, ExtractResult};
use crate::matching::{
    exact_match, is_glued_to_number, is_invalid_day_number_prefix, matches, with_token_match,
    RegexMatch,
};
use crate::resolution::{
    parse_with, DateTimeParseResult, DateTimeParser, DateTimeResolutionResult, Strategy,
    COMMENT_AMPM,
};
use crate::timex::time_timex;
use crate::token::{merge_all_tokens, Token};

// ── Clock readings ──────────────────────────────────────────────────────────

/// A clock reading at the precision it was spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Clock {
    pub hour: u32,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    /// No "am" / "pm" cue and the hour reads either way.
    pub ambiguous: bool,
}

impl Clock {
    pub fn hour(hour: u32) -> Self {
        Self {
            hour,
            minute: None,
            second: None,
            ambiguous: (1..=12).contains(&hour),
        }
    }

    pub fn timex(&self) -> String {
        time_timex(self.hour, self.minute, self.second)
    }

    pub fn on(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        date.and_hms_opt(self.hour, self.minute.unwrap_or(0), self.second.unwrap_or(0))
    }

    fn resolve(&self, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let at = self.on(reference.date())?;
        let resolved = DateTimeResolutionResult::point(self.timex(), at, at);
        Some(if self.ambiguous {
            resolved.with_comment(COMMENT_AMPM)
        } else {
            resolved
        })
    }
}

/// Apply an "am" / "pm" marker ("a", "p.m.", ...) to an hour.
pub(crate) fn apply_desc(hour: u32, desc: &str) -> u32 {
    if is_am(desc) {
        if hour >= 12 {
            hour - 12
        } else {
            hour
        }
    } else if hour < 12 {
        hour + 12
    } else {
        hour
    }
}

fn is_am(desc: &str) -> bool {
    desc.trim_start().to_lowercase().starts_with('a')
}

// ── Extractor ───────────────────────────────────────────────────────────────

pub struct TimeExtractor {
    culture: Arc<dyn Culture>,
}

impl TimeExtractor {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self { culture }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    fn basic_tokens(&self, text: &str) -> Vec<Token> {
        self.config()
            .time
            .basic
            .iter()
            .flat_map(|re| matches(re, text))
            .filter(|m| {
                !is_glued_to_number(&text[m.end()..])
                    && !is_invalid_day_number_prefix(&text[..m.start()])
                    && !is_one_with_day_part(m)
            })
            .map(|m| Token::new(m.start(), m.end()))
            .collect()
    }

    /// "at 5": only the number is the time.
    fn at_tokens(&self, text: &str) -> Vec<Token> {
        matches(&self.config().time.at, text)
            .iter()
            .map(|m| m.token_span())
            .filter(|&(_, end)| !is_glued_to_number(&text[end..]))
            .map(|(start, end)| Token::new(start, end))
            .collect()
    }

    fn ish_tokens(&self, text: &str) -> Vec<Token> {
        matches(&self.config().time.ish, text)
            .iter()
            .map(|m| Token::new(m.start(), m.end()))
            .collect()
    }
}

/// "one morning" is an occasion, not one o'clock.
fn is_one_with_day_part(m: &RegexMatch<'_>) -> bool {
    match (m.group("hournum"), m.group("suffix")) {
        (Some(hour), Some(suffix)) => {
            normalize_key(hour.text) == "one" && !suffix.text.trim().contains(char::is_whitespace)
        }
        _ => false,
    }
}

impl DateTimeExtractor for TimeExtractor {
    fn kind(&self) -> EntityKind {
        EntityKind::Time
    }

    fn extract(&self, text: &str, _reference: NaiveDateTime) -> Vec<ExtractResult> {
        let mut tokens = self.basic_tokens(text);
        tokens.extend(self.at_tokens(text));
        tokens.extend(self.ish_tokens(text));
        merge_all_tokens(tokens, text, EntityKind::Time)
    }
}

// ── Parser ──────────────────────────────────────────────────────────────────

pub struct TimeParser {
    culture: Arc<dyn Culture>,
}

const STRATEGIES: &[Strategy<TimeParser>] = &[
    ("basic", TimeParser::parse_basic),
    ("at", TimeParser::parse_at),
    ("ish", TimeParser::parse_ish),
    ("bare_hour", TimeParser::parse_bare_hour),
];

impl TimeParser {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self { culture }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    /// The clock reading of a span, if it is a time.
    pub(crate) fn clock(&self, text: &str) -> Option<Clock> {
        let time = &self.config().time;
        time.basic
            .iter()
            .find_map(|re| exact_match(re, text).and_then(|m| self.read_clock(&m)))
            .or_else(|| {
                with_token_match(&time.at, text, self.config().time_token_prefix, |m| {
                    self.read_clock(m)
                })
            })
            .or_else(|| self.ish_clock(text))
            .or_else(|| self.bare_hour(text))
    }

    fn read_clock(&self, m: &RegexMatch<'_>) -> Option<Clock> {
        let tables = &self.config().tables;
        if m.has("mid") {
            let hour = if m.has("midnight") {
                0
            } else if m.has("midmorning") {
                10
            } else if m.has("midafternoon") {
                14
            } else {
                12
            };
            return Some(Clock {
                ambiguous: false,
                ..Clock::hour(hour)
            });
        }

        let hour = match m.group("hour") {
            Some(g) => g.text.parse().ok()?,
            None => tables.number(m.group("hournum")?.text)?,
        };
        let mut adjust = TimeAdjustment {
            hour: hour as i32,
            ..Default::default()
        };
        if let Some(min) = m.group("min") {
            adjust.minute = min.text.parse().ok()?;
            adjust.has_minute = true;
        }
        if m.has("engtime") {
            let minute = match m.group("tens") {
                Some(tens) => {
                    tables.number(tens.text)?
                        + m.group("minnum")
                            .and_then(|g| tables.number(g.text))
                            .unwrap_or(0)
                }
                None => tables.number(m.first_of(&["teen", "ohmin"])?.text)?,
            };
            adjust.minute = minute as i32;
            adjust.has_minute = true;
        }
        let second = match m.group("sec") {
            Some(g) => Some(g.text.parse().ok()?),
            None => None,
        };

        if let Some(prefix) = m.group("prefix") {
            self.culture.adjust_by_prefix(prefix.text, &mut adjust);
        }
        if let Some(desc) = m.first_of(&["desc", "iam", "ipm"]) {
            adjust.hour = apply_desc(adjust.hour as u32, desc.text) as i32;
            if is_am(desc.text) {
                adjust.has_am = true;
            } else {
                adjust.has_pm = true;
            }
        }
        if let Some(suffix) = m.group("suffix") {
            self.culture.adjust_by_suffix(suffix.text, &mut adjust);
        }

        let hour = if adjust.hour == 24 { 0 } else { adjust.hour };
        if !(0..24).contains(&hour) || !(0..60).contains(&adjust.minute) {
            return None;
        }
        let hour = hour as u32;
        Some(Clock {
            hour,
            minute: adjust.has_minute.then_some(adjust.minute as u32),
            second,
            ambiguous: (1..=12).contains(&hour) && !adjust.has_am && !adjust.has_pm,
        })
    }

    fn ish_clock(&self, text: &str) -> Option<Clock> {
        let m = exact_match(&self.config().time.ish, text)?;
        if m.has("noon") {
            return Some(Clock {
                ambiguous: false,
                ..Clock::hour(12)
            });
        }
        let hour: u32 = m.text("hour").parse().ok()?;
        Some(Clock::hour(if hour == 24 { 0 } else { hour }))
    }

    /// A lone hour handed over by a larger expression: "5", "seventeen".
    fn bare_hour(&self, text: &str) -> Option<Clock> {
        let hour = self.config().tables.number(text)?;
        match hour {
            24 => Some(Clock::hour(0)),
            0..=23 => Some(Clock::hour(hour)),
            _ => None,
        }
    }

    fn parse_basic(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        self.config()
            .time
            .basic
            .iter()
            .find_map(|re| exact_match(re, &er.text).and_then(|m| self.read_clock(&m)))?
            .resolve(reference)
    }

    fn parse_at(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let config = self.config();
        with_token_match(&config.time.at, &er.text, config.time_token_prefix, |m| {
            self.read_clock(m)
        })?
        .resolve(reference)
    }

    fn parse_ish(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        self.ish_clock(&er.text)?.resolve(reference)
    }

    fn parse_bare_hour(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        self.bare_hour(&er.text)?.resolve(reference)
    }
}

impl DateTimeParser for TimeParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Time
    }

    fn parse(&self, er: &ExtractResult, reference: NaiveDateTime) -> DateTimeParseResult {
        parse_with(self, EntityKind::Time, STRATEGIES, er, reference)
    }
}
