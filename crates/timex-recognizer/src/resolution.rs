//! Resolution values: what a parser makes of an extracted span.
//!
//! A parser runs an ordered list of named strategies over the extracted text.
//! The first strategy that recognizes it returns a fresh
//! [`DateTimeResolutionResult`]; the parser then wraps it, together with the
//! original span, into a [`DateTimeParseResult`].

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::trace;

use crate::date_util::at_midnight;
use crate::extract::{EntityKind, ExtractResult, Modifier};
use crate::timex::{format_date, format_date_time, format_number, format_time};

// ── Comments ────────────────────────────────────────────────────────────────

/// An hour that could be either AM or PM.
pub const COMMENT_AMPM: &str = "ampm";
/// The timex holds two `|`-joined alternatives for future and past.
pub const COMMENT_DOUBLE_TIMEX: &str = "doubleTimex";
pub const COMMENT_WEEK_OF: &str = "WeekOf";
pub const COMMENT_MONTH_OF: &str = "MonthOf";

// ── Resolution keys ─────────────────────────────────────────────────────────

pub const DATE: &str = "date";
pub const TIME: &str = "time";
pub const DATE_TIME: &str = "dateTime";
pub const DURATION: &str = "duration";
pub const START_DATE: &str = "startDate";
pub const END_DATE: &str = "endDate";
pub const START_TIME: &str = "startTime";
pub const END_TIME: &str = "endTime";
pub const START_DATE_TIME: &str = "startDateTime";
pub const END_DATE_TIME: &str = "endDateTime";

/// A resolved value: a point in time, a half-open interval, or a length in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DateTimeValue {
    Point(NaiveDateTime),
    Range(NaiveDateTime, NaiveDateTime),
    Duration(f64),
}

impl DateTimeValue {
    pub fn point(&self) -> Option<NaiveDateTime> {
        match self {
            DateTimeValue::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match self {
            DateTimeValue::Range(b, e) => Some((*b, *e)),
            _ => None,
        }
    }

    pub fn seconds(&self) -> Option<f64> {
        match self {
            DateTimeValue::Duration(s) => Some(*s),
            _ => None,
        }
    }
}

/// The outcome of one successful parsing strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTimeResolutionResult {
    pub timex: String,
    pub success: bool,
    pub future_value: Option<DateTimeValue>,
    pub past_value: Option<DateTimeValue>,
    #[serde(rename = "mod", skip_serializing_if = "Option::is_none")]
    pub modifier: Option<Modifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_date_time_entities: Vec<DateTimeParseResult>,
    pub future_resolution: BTreeMap<String, String>,
    pub past_resolution: BTreeMap<String, String>,
}

impl DateTimeResolutionResult {
    /// A successful result with both values set.
    pub fn new(timex: impl Into<String>, future: DateTimeValue, past: DateTimeValue) -> Self {
        Self {
            timex: timex.into(),
            success: true,
            future_value: Some(future),
            past_value: Some(past),
            modifier: None,
            comment: None,
            sub_date_time_entities: Vec::new(),
            future_resolution: BTreeMap::new(),
            past_resolution: BTreeMap::new(),
        }
    }

    pub fn point(timex: impl Into<String>, future: NaiveDateTime, past: NaiveDateTime) -> Self {
        Self::new(timex, DateTimeValue::Point(future), DateTimeValue::Point(past))
    }

    /// Calendar dates resolve to midnight.
    pub fn date(timex: impl Into<String>, future: NaiveDate, past: NaiveDate) -> Self {
        Self::point(timex, at_midnight(future), at_midnight(past))
    }

    pub fn range(
        timex: impl Into<String>,
        future: (NaiveDateTime, NaiveDateTime),
        past: (NaiveDateTime, NaiveDateTime),
    ) -> Self {
        Self::new(
            timex,
            DateTimeValue::Range(future.0, future.1),
            DateTimeValue::Range(past.0, past.1),
        )
    }

    pub fn date_range(
        timex: impl Into<String>,
        future: (NaiveDate, NaiveDate),
        past: (NaiveDate, NaiveDate),
    ) -> Self {
        Self::range(
            timex,
            (at_midnight(future.0), at_midnight(future.1)),
            (at_midnight(past.0), at_midnight(past.1)),
        )
    }

    pub fn duration(timex: impl Into<String>, seconds: f64) -> Self {
        Self::new(
            timex,
            DateTimeValue::Duration(seconds),
            DateTimeValue::Duration(seconds),
        )
    }

    pub fn with_mod(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn with_sub_entities(mut self, subs: Vec<DateTimeParseResult>) -> Self {
        self.sub_date_time_entities = subs;
        self
    }

    pub fn future_point(&self) -> Option<NaiveDateTime> {
        self.future_value.and_then(|v| v.point())
    }

    pub fn past_point(&self) -> Option<NaiveDateTime> {
        self.past_value.and_then(|v| v.point())
    }

    pub fn future_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.future_value.and_then(|v| v.range())
    }

    pub fn past_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.past_value.and_then(|v| v.range())
    }

    pub fn seconds(&self) -> Option<f64> {
        self.future_value.and_then(|v| v.seconds())
    }

    /// Fill `future_resolution` / `past_resolution` with the keys for `kind`.
    fn fill_resolutions(&mut self, kind: EntityKind) {
        self.future_resolution = resolution_map(kind, self.future_value);
        self.past_resolution = resolution_map(kind, self.past_value);
    }
}

fn resolution_map(kind: EntityKind, value: Option<DateTimeValue>) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    let mut put = |key: &str, value: String| {
        map.insert(key.to_string(), value);
    };
    match (kind, value) {
        (EntityKind::Date, Some(DateTimeValue::Point(p))) => put(DATE, format_date(p.date())),
        (EntityKind::Time, Some(DateTimeValue::Point(p))) => put(TIME, format_time(p)),
        (EntityKind::DateTime, Some(DateTimeValue::Point(p))) => put(DATE_TIME, format_date_time(p)),
        (_, Some(DateTimeValue::Duration(s))) => put(DURATION, format_number(s)),
        (EntityKind::DatePeriod, Some(DateTimeValue::Range(b, e))) => {
            put(START_DATE, format_date(b.date()));
            put(END_DATE, format_date(e.date()));
        }
        (EntityKind::TimePeriod, Some(DateTimeValue::Range(b, e))) => {
            put(START_TIME, format_time(b));
            put(END_TIME, format_time(e));
        }
        (EntityKind::DateTimePeriod, Some(DateTimeValue::Range(b, e))) => {
            put(START_DATE_TIME, format_date_time(b));
            put(END_DATE_TIME, format_date_time(e));
        }
        _ => {}
    }
    map
}

/// A parsed span: the extraction it came from plus its resolution, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTimeParseResult {
    pub start: usize,
    pub length: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub value: Option<DateTimeResolutionResult>,
    pub timex_str: String,
    pub resolution_str: String,
}

impl DateTimeParseResult {
    /// A parse-miss: the span is kept, the value is empty.
    pub fn unresolved(er: &ExtractResult) -> Self {
        Self {
            start: er.start,
            length: er.length,
            text: er.text.clone(),
            kind: er.kind,
            value: None,
            timex_str: String::new(),
            resolution_str: String::new(),
        }
    }

    /// Wrap a successful resolution, filling in its resolution maps.
    pub fn resolved(er: &ExtractResult, mut value: DateTimeResolutionResult) -> Self {
        value.fill_resolutions(er.kind);
        let resolution_str = serde_json::to_string(&value.future_resolution).unwrap_or_default();
        Self {
            timex_str: value.timex.clone(),
            resolution_str,
            value: Some(value),
            ..Self::unresolved(er)
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn is_resolved(&self) -> bool {
        self.value.as_ref().is_some_and(|v| v.success)
    }
}

/// Turns an extracted span of one kind into a resolution.
pub trait DateTimeParser {
    fn kind(&self) -> EntityKind;

    /// Parse `er` relative to `reference`. Results of another kind, and text no
    /// strategy recognizes, come back with `value = None`.
    fn parse(&self, er: &ExtractResult, reference: NaiveDateTime) -> DateTimeParseResult;

    /// [`parse`](Self::parse) anchored at the local system clock.
    fn parse_now(&self, er: &ExtractResult) -> DateTimeParseResult {
        self.parse(er, Local::now().naive_local())
    }
}

/// A named parsing strategy over a parser's configuration.
pub(crate) type Strategy<P> = (
    &'static str,
    fn(&P, &ExtractResult, NaiveDateTime) -> Option<DateTimeResolutionResult>,
);

/// Run `strategies` in order and keep the first resolution.
pub(crate) fn run_strategies<P>(
    parser: &P,
    strategies: &[Strategy<P>],
    er: &ExtractResult,
    reference: NaiveDateTime,
) -> Option<DateTimeResolutionResult> {
    strategies.iter().find_map(|(name, strategy)| {
        let resolved = strategy(parser, er, reference)?;
        trace!(strategy = name, text = %er.text, timex = %resolved.timex, "strategy matched");
        Some(resolved)
    })
}

/// The standard parse wrapper: kind check, strategy chain, resolution maps.
pub(crate) fn parse_with<P>(
    parser: &P,
    kind: EntityKind,
    strategies: &[Strategy<P>],
    er: &ExtractResult,
    reference: NaiveDateTime,
) -> DateTimeParseResult {
    if er.kind != kind {
        return DateTimeParseResult::unresolved(er);
    }
    match run_strategies(parser, strategies, er, reference) {
        Some(value) => DateTimeParseResult::resolved(er, value),
        None => DateTimeParseResult::unresolved(er),
    }
}
