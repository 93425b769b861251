//! Ranges with dates and clock times: "tomorrow morning", "Friday from 3 to
//! 5pm", "tonight", "today at 5pm until tomorrow at 3am", "the next 3 hours".

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};

use crate::culture::{Culture, CultureConfig};
use crate::date::{DateExtractor, DateParser};
use crate::datetime::{DateTimePointExtractor, DateTimePointParser};
use crate::duration::{DurationExtractor, DurationParser};
use crate::extract::{DateTimeExtractor, DateTimeOptions, EntityKind, ExtractResult, Modifier};
use crate::matching::{exact_match, match_end, matches};
use crate::period::{merge_two_points, parse_two_points};
use crate::resolution::{parse_with, DateTimeParseResult, DateTimeParser, DateTimeResolutionResult, Strategy};
use crate::time_period::{DayPart, TimePeriodExtractor, TimePeriodParser};
use crate::timex::{luis_date_from, luis_date_time, parse_duration, range_timex, span_timex};
use crate::token::{merge_all_tokens, Token};

// ── Extractor ───────────────────────────────────────────────────────────────

pub struct DateTimePeriodExtractor {
    culture: Arc<dyn Culture>,
    options: DateTimeOptions,
    dates: DateExtractor,
    time_periods: TimePeriodExtractor,
    points: DateTimePointExtractor,
    durations: DurationExtractor,
    duration_parser: DurationParser,
}

impl DateTimePeriodExtractor {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self::with_options(culture, DateTimeOptions::NONE)
    }

    pub fn with_options(culture: Arc<dyn Culture>, options: DateTimeOptions) -> Self {
        Self {
            options,
            dates: DateExtractor::new(culture.clone()),
            time_periods: TimePeriodExtractor::new(culture.clone()),
            points: DateTimePointExtractor::new(culture.clone()),
            durations: DurationExtractor::new(culture.clone()),
            duration_parser: DurationParser::new(culture.clone()),
            culture,
        }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    /// A date and a time range next to each other, in either order.
    fn date_with_time_period(&self, text: &str, reference: NaiveDateTime) -> Vec<Token> {
        let connector = &self.config().date_time_period.connector;
        let dates = self.dates.extract(text, reference);
        let periods = self.time_periods.extract(text, reference);
        let joined = |first: &ExtractResult, second: &ExtractResult| {
            second.start >= first.end()
                && text
                    .get(first.end()..second.start)
                    .is_some_and(|middle| connector.is_match(middle))
        };
        let mut tokens = Vec::new();
        for date in &dates {
            for period in &periods {
                if joined(date, period) {
                    tokens.push(Token::new(date.start, period.end()));
                } else if joined(period, date) {
                    tokens.push(Token::new(period.start, date.end()));
                }
            }
        }
        tokens
    }

    fn specific_time_of_day(&self, text: &str) -> Vec<Token> {
        matches(&self.config().date_time_period.specific_time_of_day, text)
            .iter()
            .map(|m| Token::new(m.start(), m.end()))
            .collect()
    }

    /// "the next 3 hours", "in the past 30 minutes".
    fn duration_with_prefix(&self, text: &str, reference: NaiveDateTime) -> Vec<Token> {
        let utility = &self.config().utility;
        self.durations
            .extract(text, reference)
            .into_iter()
            .filter(|er| is_time_unit(&self.duration_parser.parse(er, reference)))
            .filter_map(|er| {
                let before = &text[..er.start];
                match_end(&utility.past_prefix, before)
                    .or_else(|| match_end(&utility.future_prefix, before))
                    .map(|m| Token::new(m.start(), er.end()))
            })
            .collect()
    }
}

fn is_time_unit(pr: &DateTimeParseResult) -> bool {
    pr.value
        .as_ref()
        .and_then(|v| parse_duration(&v.timex))
        .is_some_and(|(_, unit)| matches!(unit, "H" | "M" | "S"))
}

impl DateTimeExtractor for DateTimePeriodExtractor {
    fn kind(&self) -> EntityKind {
        EntityKind::DateTimePeriod
    }

    fn extract(&self, text: &str, reference: NaiveDateTime) -> Vec<ExtractResult> {
        let mut tokens = self.date_with_time_period(text, reference);
        tokens.extend(self.specific_time_of_day(text));
        if !self.options.contains(DateTimeOptions::SKIP_FROM_TO_MERGE) {
            let points = self.points.extract(text, reference);
            tokens.extend(merge_two_points(text, &points, &self.config().utility));
        }
        tokens.extend(self.duration_with_prefix(text, reference));
        merge_all_tokens(tokens, text, EntityKind::DateTimePeriod)
    }
}

// ── Parser ──────────────────────────────────────────────────────────────────

pub struct DateTimePeriodParser {
    culture: Arc<dyn Culture>,
    dates: DateExtractor,
    date_parser: DateParser,
    time_periods: TimePeriodExtractor,
    time_period_parser: TimePeriodParser,
    points: DateTimePointExtractor,
    point_parser: DateTimePointParser,
    durations: DurationExtractor,
    duration_parser: DurationParser,
}

const STRATEGIES: &[Strategy<DateTimePeriodParser>] = &[
    ("specific_time_of_day", DateTimePeriodParser::parse_specific_time_of_day),
    ("date_with_time_period", DateTimePeriodParser::parse_date_with_time_period),
    ("two_points", DateTimePeriodParser::parse_two_points),
    ("duration", DateTimePeriodParser::parse_prefixed_duration),
];

impl DateTimePeriodParser {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self {
            dates: DateExtractor::new(culture.clone()),
            date_parser: DateParser::new(culture.clone()),
            time_periods: TimePeriodExtractor::new(culture.clone()),
            time_period_parser: TimePeriodParser::new(culture.clone()),
            points: DateTimePointExtractor::new(culture.clone()),
            point_parser: DateTimePointParser::new(culture.clone()),
            durations: DurationExtractor::new(culture.clone()),
            duration_parser: DurationParser::new(culture.clone()),
            culture,
        }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    /// "tonight", "this morning", "last night".
    fn parse_specific_time_of_day(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = exact_match(&self.config().date_time_period.specific_time_of_day, &er.text)?;
        let (swift, part) = if m.has("tonight") {
            (0, DayPart::from_word("tonight")?)
        } else {
            (
                self.culture.swift_relative(m.text("order"))?,
                DayPart::from_word(m.text("tod"))?,
            )
        };
        let day = reference.date() + Duration::days(swift.into());
        let range = part.on(day);
        Some(DateTimeResolutionResult::range(
            format!("{}{}", luis_date_from(day), part.code),
            range,
            range,
        ))
    }

    /// Move a time range resolved on the reference day onto each date candidate.
    fn parse_date_with_time_period(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let date_er = self.dates.extract(&er.text, reference).into_iter().next()?;
        let period_er = self
            .time_periods
            .extract(&er.text, reference)
            .into_iter()
            .find(|p| !p.overlaps(&date_er))?;
        let date_pr = self.date_parser.parse(&date_er, reference);
        let period_pr = self.time_period_parser.parse(&period_er, reference);
        let date_value = date_pr.value.as_ref()?;
        let period_value = period_pr.value.as_ref()?;

        let (begin, end) = period_value.future_range()?;
        let day_span = end.date() - begin.date();
        let on = |date: NaiveDateTime| {
            let day = date.date();
            (day.and_time(begin.time()), (day + day_span).and_time(end.time()))
        };
        let future = on(date_value.future_point()?);
        let past = on(date_value.past_point()?);

        let date_timex = &date_value.timex;
        let timex = match period_value.timex.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            Some(inner) => {
                let mut parts = inner.splitn(3, ',');
                let (t1, t2, duration) = (parts.next()?, parts.next()?, parts.next()?);
                range_timex(&format!("{date_timex}{t1}"), &format!("{date_timex}{t2}"), duration)
            }
            None => format!("{date_timex}{}", period_value.timex),
        };

        let mut resolved = DateTimeResolutionResult::range(timex, future, past);
        resolved.modifier = period_value.modifier;
        resolved.comment = period_value.comment.clone();
        Some(resolved.with_sub_entities(vec![date_pr, period_pr]))
    }

    /// "today at 5pm until tomorrow at 3am".
    fn parse_two_points(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let (first, second) = parse_two_points(&self.points, &self.point_parser, &er.text, reference)?;
        let (begin, end) = (first.value.as_ref()?, second.value.as_ref()?);
        let future = (begin.future_point()?, end.future_point()?);
        let past = (begin.past_point()?, end.past_point()?);
        if future.1 < future.0 {
            return None;
        }
        let timex = range_timex(&begin.timex, &end.timex, &span_timex(future.0, future.1));
        let resolved = DateTimeResolutionResult::range(timex, future, past);
        Some(resolved.with_sub_entities(vec![first, second]))
    }

    /// "the next 3 hours": from the reference forward, or back for "past".
    fn parse_prefixed_duration(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let utility = &self.config().utility;
        let duration_er = self.durations.extract(&er.text, reference).into_iter().next()?;
        let duration_pr = self.duration_parser.parse(&duration_er, reference);
        if !is_time_unit(&duration_pr) {
            return None;
        }
        let value = duration_pr.value.as_ref()?;
        let length = Duration::try_milliseconds((value.seconds()? * 1000.0) as i64)?;
        let before = &er.text[..duration_er.start];
        let (range, modifier) = if match_end(&utility.past_prefix, before).is_some() {
            ((reference - length, reference), Modifier::Before)
        } else if match_end(&utility.future_prefix, before).is_some() {
            ((reference, reference + length), Modifier::After)
        } else {
            return None;
        };
        let timex = range_timex(&luis_date_time(range.0), &luis_date_time(range.1), &value.timex);
        Some(
            DateTimeResolutionResult::range(timex, range, range)
                .with_mod(modifier)
                .with_sub_entities(vec![duration_pr.clone()]),
        )
    }
}

impl DateTimeParser for DateTimePeriodParser {
    fn kind(&self) -> EntityKind {
        EntityKind::DateTimePeriod
    }

    fn parse(&self, er: &ExtractResult, reference: NaiveDateTime) -> DateTimeParseResult {
        parse_with(self, EntityKind::DateTimePeriod, STRATEGIES, er, reference)
    }
}
