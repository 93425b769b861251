//! Date ranges: "May 1-7", "from May to July 2024", "next week", "Q1 2023",
//! "the first week of July", "summer", "the past 3 weeks".
//!
//! Ranges are half-open: the end date is the first day after the range.
//! When no year is spoken the future candidate is the nearest occurrence that
//! has not ended yet and the past candidate the latest one that has begun.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use regex::Regex;
use tracing::debug;

use crate::culture::{normalize_key, Culture, CultureConfig, DatePeriodRegexes};
use crate::date::{DateExtractor, DateParser};
use crate::date_util::{
    add_months, at_midnight, create_date, first_monday_on_or_after, is_feb_29, iso_week,
    iso_week_monday, last_monday_of_month, swift, this_week_day, weeks_in_iso_year,
};
use crate::duration::{DurationExtractor, DurationParser};
use crate::extract::{with_sub_entities, DateTimeExtractor, DateTimeOptions, EntityKind, ExtractResult, Modifier};
use crate::matching::{
    exact_match, is_exact_match, is_glued_to_number, is_invalid_day_number_prefix, match_end, matches,
    RegexMatch,
};
use crate::period::merge_two_points;
use crate::resolution::{
    parse_with, DateTimeParseResult, DateTimeParser, DateTimeResolutionResult, Strategy,
    COMMENT_DOUBLE_TIMEX, COMMENT_MONTH_OF, COMMENT_WEEK_OF,
};
use crate::timex::{
    date_period_timex, duration_timex, luis_date, luis_date_from, merge_alternatives, month_timex,
    parse_duration, range_timex, week_timex, year_timex, ALTERNATIVE_DELIMITER, FUZZY_YEAR,
};
use crate::token::{merge_all_tokens, Token};

/// Bare years outside this window are read as plain numbers.
const MIN_YEAR: i32 = 1500;
const MAX_YEAR: i32 = 2100;

type DateRange = (NaiveDate, NaiveDate);

// ── Extractor ───────────────────────────────────────────────────────────────

pub struct DatePeriodExtractor {
    culture: Arc<dyn Culture>,
    options: DateTimeOptions,
    dates: DateExtractor,
    durations: DurationExtractor,
    duration_parser: DurationParser,
}

impl DatePeriodExtractor {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self::with_options(culture, DateTimeOptions::NONE)
    }

    pub fn with_options(culture: Arc<dyn Culture>, options: DateTimeOptions) -> Self {
        Self {
            options,
            dates: DateExtractor::new(culture.clone()),
            durations: DurationExtractor::new(culture.clone()),
            duration_parser: DurationParser::new(culture.clone()),
            culture,
        }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    fn regex_tokens(&self, text: &str) -> Vec<Token> {
        let dp = &self.config().date_period;
        dp.simple
            .iter()
            .chain(&dp.month_with_year)
            .chain(&dp.month_to_month)
            .chain(&dp.half_year)
            .chain(&dp.quarter)
            .chain([
                &dp.to_date,
                &dp.week_of_month,
                &dp.week_of_year,
                &dp.relative_quarter,
                &dp.season,
                &dp.which_week,
                &dp.rest_of,
            ])
            .flat_map(|re| matches(re, text))
            .map(|m| Token::new(m.start(), m.end()))
            .collect()
    }

    /// "next week", "early July", "this weekend".
    fn one_word(&self, text: &str) -> Vec<Token> {
        let dp = &self.config().date_period;
        matches(&dp.one_word, text)
            .iter()
            .filter(|m| !is_ambiguous_month(dp, m) && !is_bare_unit(m))
            .map(|m| {
                let lead = m.as_str().len() - m.as_str().trim_start().len();
                Token::new(m.start() + lead, m.end())
            })
            .collect()
    }

    fn years(&self, text: &str) -> Vec<Token> {
        matches(&self.config().date_period.year, text)
            .iter()
            .filter(|m| {
                let before = &text[..m.start()];
                let keep = m
                    .text("year")
                    .parse::<i32>()
                    .is_ok_and(|y| (MIN_YEAR..=MAX_YEAR).contains(&y))
                    && !is_glued_to_number(&text[m.end()..])
                    && !is_invalid_day_number_prefix(before)
                    && !before.ends_with(|c: char| c == '-' || c == '/');
                if !keep {
                    debug!(text = m.as_str(), "bare year rejected");
                }
                keep
            })
            .map(|m| Token::new(m.start(), m.end()))
            .collect()
    }

    /// "the week of July 4th", "the month of March 3rd".
    fn date_with_cue(&self, text: &str, dates: &[ExtractResult]) -> Vec<Token> {
        let dp = &self.config().date_period;
        dates
            .iter()
            .filter_map(|date| {
                let before = &text[..date.start];
                match_end(&dp.week_of, before)
                    .or_else(|| match_end(&dp.month_of, before))
                    .map(|m| Token::new(m.start(), date.end()))
            })
            .collect()
    }

    /// "the past 3 weeks", "in the next 2 months".
    fn duration_with_prefix(&self, text: &str, reference: NaiveDateTime) -> Vec<Token> {
        let config = self.config();
        let utility = &config.utility;
        self.durations
            .extract(text, reference)
            .into_iter()
            // a lone unit is "next week", not a duration
            .filter(|er| config.tables.unit(&er.text).is_none())
            .filter(|er| whole_date_units(&self.duration_parser.parse(er, reference)).is_some())
            .filter_map(|er| {
                let before = &text[..er.start];
                match_end(&utility.past_prefix, before)
                    .or_else(|| match_end(&utility.future_prefix, before))
                    .map(|m| Token::new(m.start(), er.end()))
            })
            .collect()
    }
}

/// A lone lowercase "may" or "jan" is an ordinary word.
fn is_ambiguous_month(dp: &DatePeriodRegexes, m: &RegexMatch<'_>) -> bool {
    let word = m.as_str().trim();
    m.text("month") == word
        && !word.chars().any(char::is_uppercase)
        && dp.ambiguous_month.is_match(word)
}

/// "year" or "month" on its own is a unit, not a period; "the month",
/// "end of month" and "weekend" are periods.
fn is_bare_unit(m: &RegexMatch<'_>) -> bool {
    m.group("unit").is_some_and(|unit| {
        !m.has("the")
            && !m.has("rel")
            && Part::of(m).is_none()
            && normalize_key(unit.text).replace(' ', "") != "weekend"
    })
}

/// Range endpoints: dates plus bare "now" mentions, in text order.
fn date_points(config: &CultureConfig, text: &str, dates: &[ExtractResult]) -> Vec<ExtractResult> {
    let mut points = dates.to_vec();
    points.extend(
        matches(&config.date_period.now, text)
            .iter()
            .filter_map(|m| ExtractResult::from_span(text, m.start(), m.end(), EntityKind::Date))
            .filter(|now| !dates.iter().any(|d| d.overlaps(now))),
    );
    points.sort_by_key(|p| p.start);
    points
}

/// Whole-number date units ("3 weeks", "2 months") as amount and unit code.
fn whole_date_units(pr: &DateTimeParseResult) -> Option<(i64, &'static str)> {
    let (amount, unit) = parse_duration(&pr.value.as_ref()?.timex)?;
    (amount.fract() == 0.0 && amount >= 1.0 && matches!(unit, "Y" | "MON" | "W" | "D"))
        .then_some((amount as i64, unit))
}

impl DateTimeExtractor for DatePeriodExtractor {
    fn kind(&self) -> EntityKind {
        EntityKind::DatePeriod
    }

    fn extract(&self, text: &str, reference: NaiveDateTime) -> Vec<ExtractResult> {
        let dates = self.dates.extract(text, reference);
        let mut tokens = self.regex_tokens(text);
        tokens.extend(self.one_word(text));
        tokens.extend(self.years(text));
        if !self.options.contains(DateTimeOptions::SKIP_FROM_TO_MERGE) {
            let points = date_points(self.config(), text, &dates);
            tokens.extend(merge_two_points(text, &points, &self.config().utility));
        }
        tokens.extend(self.date_with_cue(text, &dates));
        tokens.extend(self.duration_with_prefix(text, reference));
        merge_all_tokens(tokens, text, EntityKind::DatePeriod)
            .into_iter()
            .map(|er| {
                let covered: Vec<&ExtractResult> = dates.iter().filter(|d| er.covers(d)).collect();
                if covered.len() >= 2 {
                    with_sub_entities(er, &covered)
                } else {
                    er
                }
            })
            .collect()
    }
}

// ── Range arithmetic ────────────────────────────────────────────────────────

/// Future and past candidates for a range that recurs every year.
fn nearest_ranges(
    today: NaiveDate,
    in_year: impl Fn(i32) -> Option<DateRange>,
) -> Option<(DateRange, DateRange)> {
    let y = today.year();
    let years = [y - 1, y, y + 1];
    let future = years
        .iter()
        .filter_map(|&y| in_year(y))
        .find(|(_, end)| *end > today)?;
    let past = years
        .iter()
        .rev()
        .filter_map(|&y| in_year(y))
        .find(|(begin, _)| *begin <= today)?;
    Some((future, past))
}

fn month_range(year: i32, month: u32) -> Option<DateRange> {
    let begin = create_date(year, month, 1)?;
    Some((begin, add_months(begin, 1)?))
}

fn year_range(year: i32) -> Option<DateRange> {
    Some((create_date(year, 1, 1)?, create_date(year + 1, 1, 1)?))
}

fn week_range(monday: NaiveDate) -> DateRange {
    (monday, monday + Duration::weeks(1))
}

fn season_range(code: &str, year: i32) -> Option<DateRange> {
    let first_month = match code {
        "SP" => 3,
        "SU" => 6,
        "FA" => 9,
        "WI" => 12,
        _ => return None,
    };
    let begin = create_date(year, first_month, 1)?;
    Some((begin, add_months(begin, 3)?))
}

fn shift(date: NaiveDate, amount: i64, unit: &str) -> Option<NaiveDate> {
    swift(at_midnight(date), amount, unit).map(|d| d.date())
}

/// `(2024-05-01,2024-05-08,P7D)`.
fn explicit_timex((begin, end): DateRange) -> String {
    date_period_timex(begin, end, &luis_date_from(begin), &luis_date_from(end))
}

/// `(2023-01-01,2023-04-01,P3M)`.
fn months_timex((begin, end): DateRange, months: i32) -> String {
    range_timex(
        &luis_date_from(begin),
        &luis_date_from(end),
        &duration_timex(f64::from(months), "MON"),
    )
}

/// With no year spoken, an endpoint on Feb 29 moves both endpoints into its
/// leap years, so "Feb 28 to Feb 29" never spans four years.
fn sync_leap_day(begin: &mut Endpoint, end: &mut Endpoint) {
    let years = [&*begin, &*end]
        .into_iter()
        .find(|e| is_feb_29(e.future))
        .map(|e| (e.future.year(), e.past.year()));
    let Some((future_year, past_year)) = years else {
        return;
    };
    for e in [begin, end] {
        if let (Some(future), Some(past)) = (e.future.with_year(future_year), e.past.with_year(past_year)) {
            e.future = future;
            e.past = past;
        }
    }
}

/// A range from before Feb 29 to after it lasts a different number of days
/// in leap and common years.
fn crosses_leap_day((begin, end): DateRange) -> bool {
    let year = begin.year();
    match (create_date(year, 2, 28), create_date(year, 3, 1)) {
        (Some(feb_28), Some(mar_1)) => begin <= feb_28 && end >= mar_1,
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Granularity {
    Week,
    Weekend,
    Month,
    Year,
}

impl Granularity {
    /// Where "early" ends and "late" begins.
    fn split(self, begin: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Week => Some(begin + Duration::days(3)),
            Granularity::Weekend => Some(begin + Duration::days(1)),
            Granularity::Month => create_date(begin.year(), begin.month(), 16),
            Granularity::Year => create_date(begin.year(), 7, 1),
        }
    }

    fn middle(self, begin: NaiveDate) -> Option<DateRange> {
        match self {
            Granularity::Week => Some((begin + Duration::days(1), begin + Duration::days(5))),
            Granularity::Weekend => Some((begin, begin + Duration::days(2))),
            Granularity::Month => Some((
                create_date(begin.year(), begin.month(), 10)?,
                create_date(begin.year(), begin.month(), 21)?,
            )),
            Granularity::Year => Some((create_date(begin.year(), 4, 1)?, create_date(begin.year(), 10, 1)?)),
        }
    }
}

/// Which part of a period a prefix asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Early,
    Mid,
    Late,
    /// "earlier this week": up to today.
    Earlier,
    /// "later this month": after today.
    Later,
}

impl Part {
    fn of(m: &RegexMatch<'_>) -> Option<Self> {
        [
            ("relearly", Part::Earlier),
            ("rellate", Part::Later),
            ("early", Part::Early),
            ("mid", Part::Mid),
            ("late", Part::Late),
        ]
        .into_iter()
        .find_map(|(group, part)| m.has(group).then_some(part))
    }

    fn modifier(self) -> Modifier {
        match self {
            Part::Early | Part::Earlier => Modifier::Start,
            Part::Mid => Modifier::Mid,
            Part::Late | Part::Later => Modifier::End,
        }
    }

    /// "earlier" / "later" cut at today when today falls inside the range and
    /// otherwise act like "early" / "late".
    fn truncate(self, granularity: Granularity, (begin, end): DateRange, today: NaiveDate) -> Option<DateRange> {
        let tomorrow = today + Duration::days(1);
        match self {
            Part::Earlier if begin < today && today < end => Some((begin, today)),
            Part::Later if begin <= today && tomorrow < end => Some((tomorrow, end)),
            Part::Early | Part::Earlier => Some((begin, granularity.split(begin)?)),
            Part::Late | Part::Later => Some((granularity.split(begin)?, end)),
            Part::Mid => granularity.middle(begin),
        }
    }
}

// ── Parser ──────────────────────────────────────────────────────────────────

pub struct DatePeriodParser {
    culture: Arc<dyn Culture>,
    dates: DateExtractor,
    date_parser: DateParser,
    durations: DurationExtractor,
    duration_parser: DurationParser,
}

const STRATEGIES: &[Strategy<DatePeriodParser>] = &[
    ("month_with_year", DatePeriodParser::parse_month_with_year),
    ("simple", DatePeriodParser::parse_simple),
    ("month_to_month", DatePeriodParser::parse_month_to_month),
    ("one_word", DatePeriodParser::parse_one_word),
    ("to_date", DatePeriodParser::parse_to_date),
    ("two_points", DatePeriodParser::parse_two_points),
    ("year", DatePeriodParser::parse_year),
    ("week_of_month", DatePeriodParser::parse_week_of_month),
    ("week_of_year", DatePeriodParser::parse_week_of_year),
    ("half_year", DatePeriodParser::parse_half_year),
    ("quarter", DatePeriodParser::parse_quarter),
    ("relative_quarter", DatePeriodParser::parse_relative_quarter),
    ("season", DatePeriodParser::parse_season),
    ("which_week", DatePeriodParser::parse_which_week),
    ("week_of", DatePeriodParser::parse_week_of),
    ("month_of", DatePeriodParser::parse_month_of),
    ("duration", DatePeriodParser::parse_prefixed_duration),
    ("rest_of", DatePeriodParser::parse_rest_of),
];

/// One end of a two-point range.
struct Endpoint {
    future: NaiveDate,
    past: NaiveDate,
    timex: String,
    parsed: Option<DateTimeParseResult>,
}

impl DatePeriodParser {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self {
            dates: DateExtractor::new(culture.clone()),
            date_parser: DateParser::new(culture.clone()),
            durations: DurationExtractor::new(culture.clone()),
            duration_parser: DurationParser::new(culture.clone()),
            culture,
        }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    fn date_period(&self) -> &DatePeriodRegexes {
        &self.config().date_period
    }

    /// The explicit year, or the reference year moved by "next" / "last".
    /// `None` when neither was spoken.
    fn spoken_year(&self, m: &RegexMatch<'_>, reference: NaiveDateTime) -> Option<i32> {
        match m.group("year") {
            Some(g) => g.text.parse().ok(),
            None => Some(reference.year() + self.culture.swift_relative(m.text("order"))?),
        }
    }

    fn month(&self, text: &str) -> Option<u32> {
        self.config()
            .tables
            .month(text)
            .or_else(|| text.parse().ok())
            .filter(|m| (1..=12).contains(m))
    }

    /// "July 2024", "May of next year", "7/2024".
    fn parse_month_with_year(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = self
            .date_period()
            .month_with_year
            .iter()
            .find_map(|re| exact_match(re, &er.text))?;
        let month = self.month(m.text("month"))?;
        let year = self.spoken_year(&m, reference)?;
        let range = month_range(year, month)?;
        Some(DateTimeResolutionResult::date_range(month_timex(Some(year), month), range, range))
    }

    /// "May 1-7", "from the 3rd to the 10th of June 2024".
    fn parse_simple(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = self.date_period().simple.iter().find_map(|re| exact_match(re, &er.text))?;
        let tables = &self.config().tables;
        let month = tables.month(m.text("month"))?;
        let (first, last) = (tables.day(m.text("day1"))?, tables.day(m.text("day2"))?);
        if first > last {
            return None;
        }
        let in_year = |y| Some((create_date(y, month, first)?, create_date(y, month, last)?));
        match self.spoken_year(&m, reference) {
            Some(year) => {
                let range = in_year(year)?;
                Some(DateTimeResolutionResult::date_range(explicit_timex(range), range, range))
            }
            None => {
                let (future, past) = nearest_ranges(reference.date(), in_year)?;
                let timex = date_period_timex(
                    future.0,
                    future.1,
                    &luis_date(None, Some(month), first),
                    &luis_date(None, Some(month), last),
                );
                Some(DateTimeResolutionResult::date_range(timex, future, past))
            }
        }
    }

    /// "from May to July": first of the first month up to the first of the last.
    fn parse_month_to_month(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = self
            .date_period()
            .month_to_month
            .iter()
            .find_map(|re| exact_match(re, &er.text))?;
        let tables = &self.config().tables;
        let (from, to) = (tables.month(m.text("month1"))?, tables.month(m.text("month2"))?);
        if from == to {
            return None;
        }
        let span = (to as i32 - from as i32).rem_euclid(12);
        let in_year = |y| {
            let begin = create_date(y, from, 1)?;
            Some((begin, add_months(begin, span)?))
        };
        match self.spoken_year(&m, reference) {
            Some(year) => {
                let range = in_year(year)?;
                Some(DateTimeResolutionResult::date_range(months_timex(range, span), range, range))
            }
            None => {
                let (future, past) = nearest_ranges(reference.date(), in_year)?;
                let timex = range_timex(
                    &luis_date(None, Some(from), 1),
                    &luis_date(None, Some(to), 1),
                    &duration_timex(f64::from(span), "MON"),
                );
                Some(DateTimeResolutionResult::date_range(timex, future, past))
            }
        }
    }

    /// "next week", "this weekend", "last year", "early July", "mid next month",
    /// "the weekend", "the month of May".
    fn parse_one_word(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = exact_match(&self.date_period().one_word, &er.text)?;
        let today = reference.date();
        let (timex, granularity, future, past) = match m.group("unit") {
            Some(unit) => {
                let swift = match m.group("rel") {
                    Some(rel) => self.culture.swift_relative(rel.text)?,
                    None => 0,
                };
                let unit = normalize_key(unit.text).replace(' ', "");
                match unit.as_str() {
                    "week" | "weekend" => {
                        let monday = this_week_day(today, Weekday::Mon) + Duration::weeks(i64::from(swift));
                        let (year, week) = iso_week(monday);
                        if unit == "weekend" {
                            let range = (monday + Duration::days(5), monday + Duration::weeks(1));
                            (format!("{}-WE", week_timex(year, week)), Granularity::Weekend, range, range)
                        } else {
                            let range = week_range(monday);
                            (week_timex(year, week), Granularity::Week, range, range)
                        }
                    }
                    "month" => {
                        let first = add_months(create_date(today.year(), today.month(), 1)?, swift)?;
                        let range = month_range(first.year(), first.month())?;
                        (month_timex(Some(first.year()), first.month()), Granularity::Month, range, range)
                    }
                    "year" => {
                        let year = today.year() + swift;
                        let range = year_range(year)?;
                        (year_timex(year), Granularity::Year, range, range)
                    }
                    _ => return None,
                }
            }
            None => {
                let month = self.config().tables.month(m.text("month"))?;
                match m.group("mrel") {
                    Some(g) => {
                        let year = today.year() + self.culture.swift_relative(g.text)?;
                        let range = month_range(year, month)?;
                        (month_timex(Some(year), month), Granularity::Month, range, range)
                    }
                    None => {
                        let (future, past) = nearest_ranges(today, |y| month_range(y, month))?;
                        (month_timex(None, month), Granularity::Month, future, past)
                    }
                }
            }
        };

        let Some(part) = Part::of(&m) else {
            return Some(DateTimeResolutionResult::date_range(timex, future, past));
        };
        let future = part.truncate(granularity, future, today)?;
        let past = part.truncate(granularity, past, today)?;
        Some(DateTimeResolutionResult::date_range(timex, future, past).with_mod(part.modifier()))
    }

    /// "year to date", "MTD": from the start of the period up to today.
    fn parse_to_date(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = exact_match(&self.date_period().to_date, &er.text)?;
        let today = reference.date();
        let whole_year = m.has("ytd") || normalize_key(m.text("todate")) == "year";
        let begin = if whole_year {
            create_date(today.year(), 1, 1)?
        } else {
            create_date(today.year(), today.month(), 1)?
        };
        let range = (begin, today);
        Some(DateTimeResolutionResult::date_range(explicit_timex(range), range, range))
    }

    fn endpoint(&self, point: &ExtractResult, reference: NaiveDateTime) -> Option<Endpoint> {
        let today = reference.date();
        if is_exact_match(&self.date_period().now, &point.text) {
            return Some(Endpoint {
                future: today,
                past: today,
                timex: luis_date_from(today),
                parsed: None,
            });
        }
        let parsed = self.date_parser.parse(point, reference);
        let (future, past, timex) = {
            let value = parsed.value.as_ref()?;
            (value.future_point()?.date(), value.past_point()?.date(), value.timex.clone())
        };
        Some(Endpoint {
            future,
            past,
            timex,
            parsed: Some(parsed),
        })
    }

    /// "May 1 to May 7", "from today until Friday", "between now and July 4th".
    fn parse_two_points(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let dates = self.dates.extract(&er.text, reference);
        let points = date_points(self.config(), &er.text, &dates);
        let [first, second, ..] = points.as_slice() else {
            return None;
        };
        let mut begin = self.endpoint(first, reference)?;
        let mut end = self.endpoint(second, reference)?;
        let open_year = begin.timex.starts_with(FUZZY_YEAR) && end.timex.starts_with(FUZZY_YEAR);
        if open_year {
            sync_leap_day(&mut begin, &mut end);
        }

        let mut future = (begin.future, end.future);
        let mut past = (begin.past, end.past);
        if future.0 > future.1 {
            future.0 = past.0;
        }
        if past.0 > past.1 {
            past.1 = future.1;
        }
        if future.0 > future.1 || past.0 > past.1 {
            return None;
        }
        if open_year && (future.0.year() + 1 < future.1.year() || past.0.year() + 1 < past.1.year()) {
            debug!(text = %er.text, "range without a year spans years");
            return None;
        }

        let mut timex = date_period_timex(future.0, future.1, &begin.timex, &end.timex);
        if begin.timex.starts_with(FUZZY_YEAR) && crosses_leap_day(future) {
            let past_timex = date_period_timex(past.0, past.1, &begin.timex, &end.timex);
            timex = merge_alternatives(&timex, &past_timex);
        }
        let double = timex.contains(ALTERNATIVE_DELIMITER);
        let mut resolved = DateTimeResolutionResult::date_range(timex, future, past);
        if double {
            resolved = resolved.with_comment(COMMENT_DOUBLE_TIMEX);
        }
        let subs = [begin.parsed, end.parsed].into_iter().flatten().collect();
        Some(resolved.with_sub_entities(subs))
    }

    /// "2023", "the year 2023", "late 2023".
    fn parse_year(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = exact_match(&self.date_period().year, &er.text)?;
        let year = m
            .text("year")
            .parse::<i32>()
            .ok()
            .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))?;
        let range = year_range(year)?;
        let Some(part) = Part::of(&m) else {
            return Some(DateTimeResolutionResult::date_range(year_timex(year), range, range));
        };
        let range = part.truncate(Granularity::Year, range, reference.date())?;
        Some(DateTimeResolutionResult::date_range(year_timex(year), range, range).with_mod(part.modifier()))
    }

    /// "the first week of July": weeks start on the first Monday of the month.
    fn parse_week_of_month(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = exact_match(&self.date_period().week_of_month, &er.text)?;
        let today = reference.date();
        let cardinal = m.text("cardinal");
        let last = self.culture.is_cardinal_last(cardinal);
        let n = if last { 5 } else { self.config().tables.cardinal(cardinal)? };
        let week_in = |year: i32, month: u32| {
            let monday = if last {
                last_monday_of_month(year, month)?
            } else {
                first_monday_on_or_after(create_date(year, month, 1)?) + Duration::weeks(i64::from(n) - 1)
            };
            Some(week_range(monday))
        };
        let suffix = format!("-W{n:02}");

        if let Some(order) = m.group("order") {
            let first = add_months(
                create_date(today.year(), today.month(), 1)?,
                self.culture.swift_relative(order.text)?,
            )?;
            let range = week_in(first.year(), first.month())?;
            let timex = month_timex(Some(first.year()), first.month()) + &suffix;
            return Some(DateTimeResolutionResult::date_range(timex, range, range));
        }

        let month = self.config().tables.month(m.text("month"))?;
        match m.group("year") {
            Some(g) => {
                let year = g.text.parse().ok()?;
                let range = week_in(year, month)?;
                Some(DateTimeResolutionResult::date_range(
                    month_timex(Some(year), month) + &suffix,
                    range,
                    range,
                ))
            }
            None => {
                let (future, past) = nearest_ranges(today, |y| week_in(y, month))?;
                Some(DateTimeResolutionResult::date_range(
                    month_timex(None, month) + &suffix,
                    future,
                    past,
                ))
            }
        }
    }

    /// "the second week of 2024": ISO weeks.
    fn parse_week_of_year(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = exact_match(&self.date_period().week_of_year, &er.text)?;
        let year = self.spoken_year(&m, reference)?;
        let cardinal = m.text("cardinal");
        let week = if self.culture.is_cardinal_last(cardinal) {
            weeks_in_iso_year(year)
        } else {
            self.config().tables.cardinal(cardinal)?
        };
        let range = week_range(iso_week_monday(year, week)?);
        Some(DateTimeResolutionResult::date_range(week_timex(year, week), range, range))
    }

    /// "the first half of 2024", "H2 2023".
    fn parse_half_year(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = self.date_period().half_year.iter().find_map(|re| exact_match(re, &er.text))?;
        let half = match m.group("number") {
            Some(g) => g.text.parse().ok()?,
            None => self.config().tables.cardinal(m.text("cardinal"))?,
        };
        if !(1..=2).contains(&half) {
            return None;
        }
        let year = self.spoken_year(&m, reference)?;
        let begin = create_date(year, 6 * (half - 1) + 1, 1)?;
        let range = (begin, add_months(begin, 6)?);
        Some(DateTimeResolutionResult::date_range(months_timex(range, 6), range, range))
    }

    /// "Q1 2023", "the third quarter of next year", "2024-Q2".
    fn parse_quarter(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = self.date_period().quarter.iter().find_map(|re| exact_match(re, &er.text))?;
        let quarter = match m.group("number") {
            Some(g) => g.text.parse().ok()?,
            None => self.config().tables.cardinal(m.text("cardinal"))?,
        };
        if !(1..=4).contains(&quarter) {
            return None;
        }
        let first_month = 3 * (quarter - 1) + 1;
        let in_year = |y| {
            let begin = create_date(y, first_month, 1)?;
            Some((begin, add_months(begin, 3)?))
        };
        match self.spoken_year(&m, reference) {
            Some(year) => {
                let range = in_year(year)?;
                Some(DateTimeResolutionResult::date_range(months_timex(range, 3), range, range))
            }
            None => {
                let (future, past) = nearest_ranges(reference.date(), in_year)?;
                let timex = range_timex(
                    &luis_date(None, Some(first_month), 1),
                    &luis_date(None, Some(future.1.month()), 1),
                    &duration_timex(3.0, "MON"),
                );
                Some(DateTimeResolutionResult::date_range(timex, future, past))
            }
        }
    }

    /// "next quarter", "the last 2 quarters". Quarters roll across years.
    fn parse_relative_quarter(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = exact_match(&self.date_period().relative_quarter, &er.text)?;
        let today = reference.date();
        let swift = self.culture.swift_relative(m.text("order"))?;
        let count = match m.group("count") {
            Some(g) => self.config().tables.number(g.text).filter(|n| *n >= 1)? as i32,
            None => 1,
        };
        let months = 3 * count;
        let current = create_date(today.year(), 3 * ((today.month() - 1) / 3) + 1, 1)?;
        let begin = if m.has("count") {
            match swift.signum() {
                -1 => add_months(current, -months)?,
                1 => add_months(current, 3)?,
                _ => current,
            }
        } else {
            add_months(current, 3 * swift)?
        };
        let range = (begin, add_months(begin, months)?);
        Some(DateTimeResolutionResult::date_range(months_timex(range, months), range, range))
    }

    /// "summer", "this winter", "fall 2023". Winter runs December to March.
    fn parse_season(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = exact_match(&self.date_period().season, &er.text)?;
        let today = reference.date();
        let code = self.config().tables.season(m.text("season"))?;
        let year = match (m.group("year"), m.group("order")) {
            (Some(g), _) => Some(g.text.parse::<i32>().ok()?),
            (None, Some(g)) => {
                let current = if code == "WI" && today.month() < 3 {
                    today.year() - 1
                } else {
                    today.year()
                };
                Some(current + self.culture.swift_relative(g.text)?)
            }
            (None, None) => None,
        };
        match year {
            Some(year) => {
                let range = season_range(code, year)?;
                Some(DateTimeResolutionResult::date_range(format!("{year:04}-{code}"), range, range))
            }
            None => {
                let (future, past) = nearest_ranges(today, |y| season_range(code, y))?;
                Some(DateTimeResolutionResult::date_range(code, future, past))
            }
        }
    }

    /// "week 27", "the 53rd week of 2024" (rolls into the next year).
    fn parse_which_week(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = exact_match(&self.date_period().which_week, &er.text)?;
        let digits = m
            .first_of(&["number", "ordinal"])?
            .text
            .trim_end_matches(|c: char| c.is_ascii_alphabetic());
        let week = digits.parse::<u32>().ok().filter(|w| *w >= 1)?;
        let year = match m.group("year") {
            Some(g) => g.text.parse().ok()?,
            None => reference.year(),
        };
        let monday = iso_week_monday(year, week)?;
        let (year, week) = iso_week(monday);
        let range = week_range(monday);
        Some(DateTimeResolutionResult::date_range(week_timex(year, week), range, range))
    }

    /// The date after a cue such as "the week of", with its future and past values.
    fn date_after_cue(
        &self,
        cue: &Regex,
        text: &str,
        reference: NaiveDateTime,
    ) -> Option<(DateTimeParseResult, NaiveDate, NaiveDate)> {
        let text = text.trim_end();
        let date_er = self
            .dates
            .extract(text, reference)
            .into_iter()
            .find(|d| d.end() == text.len())?;
        exact_match(cue, &text[..date_er.start])?;
        let parsed = self.date_parser.parse(&date_er, reference);
        let (future, past) = {
            let value = parsed.value.as_ref()?;
            (value.future_point()?.date(), value.past_point()?.date())
        };
        Some((parsed, future, past))
    }

    /// "the week of July 4th": the Monday-based week containing the date.
    fn parse_week_of(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let (parsed, future, past) = self.date_after_cue(&self.date_period().week_of, &er.text, reference)?;
        let week = |d: NaiveDate| week_range(this_week_day(d, Weekday::Mon));
        let (year, number) = iso_week(future);
        Some(
            DateTimeResolutionResult::date_range(week_timex(year, number), week(future), week(past))
                .with_comment(COMMENT_WEEK_OF)
                .with_sub_entities(vec![parsed]),
        )
    }

    fn parse_month_of(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let (parsed, future, past) = self.date_after_cue(&self.date_period().month_of, &er.text, reference)?;
        Some(
            DateTimeResolutionResult::date_range(
                month_timex(Some(future.year()), future.month()),
                month_range(future.year(), future.month())?,
                month_range(past.year(), past.month())?,
            )
            .with_comment(COMMENT_MONTH_OF)
            .with_sub_entities(vec![parsed]),
        )
    }

    /// "the past 3 weeks" ends today; "the next 2 days" starts tomorrow.
    fn parse_prefixed_duration(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let utility = &self.config().utility;
        let duration_er = self.durations.extract(&er.text, reference).into_iter().next()?;
        let duration_pr = self.duration_parser.parse(&duration_er, reference);
        let (amount, unit) = whole_date_units(&duration_pr)?;
        let length = duration_pr.value.as_ref()?.timex.clone();
        let before = &er.text[..duration_er.start];
        let today = reference.date();
        let (range, modifier) = if match_end(&utility.past_prefix, before).is_some() {
            ((shift(today, -amount, unit)?, today), Modifier::Before)
        } else if match_end(&utility.future_prefix, before).is_some() {
            let tomorrow = today + Duration::days(1);
            ((tomorrow, shift(tomorrow, amount, unit)?), Modifier::After)
        } else {
            return None;
        };
        let timex = range_timex(&luis_date_from(range.0), &luis_date_from(range.1), &length);
        Some(
            DateTimeResolutionResult::date_range(timex, range, range)
                .with_mod(modifier)
                .with_sub_entities(vec![duration_pr]),
        )
    }

    /// "the rest of the week": today up to the end of the period.
    fn parse_rest_of(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = exact_match(&self.date_period().rest_of, &er.text)?;
        let today = reference.date();
        let end = match normalize_key(m.text("unit")).as_str() {
            "week" => this_week_day(today, Weekday::Mon) + Duration::weeks(1),
            "month" => add_months(create_date(today.year(), today.month(), 1)?, 1)?,
            "year" => create_date(today.year() + 1, 1, 1)?,
            _ => return None,
        };
        let range = (today, end);
        Some(DateTimeResolutionResult::date_range(explicit_timex(range), range, range))
    }
}

impl DateTimeParser for DatePeriodParser {
    fn kind(&self) -> EntityKind {
        EntityKind::DatePeriod
    }

    fn parse(&self, er: &ExtractResult, reference: NaiveDateTime) -> DateTimeParseResult {
        parse_with(self, EntityKind::DatePeriod, STRATEGIES, er, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::English;
    use crate::resolution::{END_DATE, START_DATE};
    use std::sync::OnceLock;

    fn culture() -> Arc<dyn Culture> {
        static CULTURE: OnceLock<Arc<dyn Culture>> = OnceLock::new();
        CULTURE
            .get_or_init(|| Arc::new(English::new().unwrap()))
            .clone()
    }

    /// Saturday, 9am.
    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn extract_with(text: &str, options: DateTimeOptions) -> Vec<String> {
        DatePeriodExtractor::with_options(culture(), options)
            .extract(text, reference())
            .into_iter()
            .map(|er| er.text)
            .collect()
    }

    fn extract(text: &str) -> Vec<String> {
        extract_with(text, DateTimeOptions::NONE)
    }

    fn resolve_at(text: &str, reference: NaiveDateTime) -> DateTimeResolutionResult {
        let c = culture();
        let ers = DatePeriodExtractor::new(c.clone()).extract(text, reference);
        assert_eq!(ers.len(), 1, "date ranges in {text:?}: {ers:?}");
        assert_eq!(ers[0].text, text);
        DatePeriodParser::new(c)
            .parse(&ers[0], reference)
            .value
            .unwrap_or_else(|| panic!("unresolved {:?}", ers[0].text))
    }

    fn resolve(text: &str) -> DateTimeResolutionResult {
        resolve_at(text, reference())
    }

    fn future(r: &DateTimeResolutionResult) -> (&str, &str) {
        (
            r.future_resolution.get(START_DATE).map(String::as_str).unwrap_or(""),
            r.future_resolution.get(END_DATE).map(String::as_str).unwrap_or(""),
        )
    }

    fn past(r: &DateTimeResolutionResult) -> (&str, &str) {
        (
            r.past_resolution.get(START_DATE).map(String::as_str).unwrap_or(""),
            r.past_resolution.get(END_DATE).map(String::as_str).unwrap_or(""),
        )
    }

    #[test]
    fn test_quarter_with_year() {
        let r = resolve("Q1 2023");
        assert_eq!(r.timex, "(2023-01-01,2023-04-01,P3M)");
        assert_eq!(future(&r), ("2023-01-01", "2023-04-01"));
        assert_eq!(past(&r), ("2023-01-01", "2023-04-01"));
    }

    #[test]
    fn test_quarter_without_year() {
        let r = resolve("the third quarter");
        assert_eq!(r.timex, "(XXXX-07-01,XXXX-10-01,P3M)");
        assert_eq!(future(&r), ("2024-07-01", "2024-10-01"));
        assert_eq!(past(&r), ("2023-07-01", "2023-10-01"));
    }

    #[test]
    fn test_relative_quarters() {
        let r = resolve("next quarter");
        assert_eq!(r.timex, "(2024-07-01,2024-10-01,P3M)");
        let r = resolve("last 2 quarters");
        assert_eq!(r.timex, "(2023-10-01,2024-04-01,P6M)");
    }

    #[test]
    fn test_day_range_within_month() {
        let r = resolve("May 1-7");
        assert_eq!(r.timex, "(XXXX-05-01,XXXX-05-07,P6D)");
        assert_eq!(future(&r), ("2025-05-01", "2025-05-07"));
        assert_eq!(past(&r), ("2024-05-01", "2024-05-07"));

        let r = resolve("from June 3 to 10, 2024");
        assert_eq!(r.timex, "(2024-06-03,2024-06-10,P7D)");
    }

    #[test]
    fn test_two_dates() {
        let r = resolve("May 1 to May 7");
        assert_eq!(r.timex, "(XXXX-05-01,XXXX-05-07,P6D)");
        assert_eq!(future(&r), ("2025-05-01", "2025-05-07"));
        assert_eq!(past(&r), ("2024-05-01", "2024-05-07"));
        assert_eq!(r.sub_date_time_entities.len(), 2);
    }

    #[test]
    fn test_two_points_inversion_repair() {
        let r = resolve("from today until Friday");
        assert_eq!(r.timex, "(2024-06-15,XXXX-WXX-5,P6D)");
        assert_eq!(future(&r), ("2024-06-15", "2024-06-21"));
        assert_eq!(past(&r), ("2024-06-15", "2024-06-21"));
        assert!(r.comment.is_none());
    }

    #[test]
    fn test_weekday_range_keeps_endpoint_timexes() {
        let r = resolve("from Monday to Friday");
        assert_eq!(r.timex, "(XXXX-WXX-1,XXXX-WXX-5,P4D)");
        assert_eq!(future(&r), ("2024-06-17", "2024-06-21"));
        assert_eq!(past(&r), ("2024-06-10", "2024-06-14"));
        assert!(r.comment.is_none());
    }

    #[test]
    fn test_range_across_february_has_double_timex() {
        let r = resolve("from Feb 28 to March 1");
        assert_eq!(
            r.timex,
            "(XXXX-02-28,XXXX-03-01,P1D)|(XXXX-02-28,XXXX-03-01,P2D)"
        );
        assert_eq!(r.comment.as_deref(), Some(COMMENT_DOUBLE_TIMEX));
        assert_eq!(future(&r), ("2025-02-28", "2025-03-01"));
        assert_eq!(past(&r), ("2024-02-28", "2024-03-01"));
    }

    #[test]
    fn test_leap_day_endpoint_syncs_years() {
        let r = resolve("from Feb 28 to Feb 29");
        assert_eq!(r.timex, "(XXXX-02-28,XXXX-02-29,P1D)");
        assert_eq!(future(&r), ("2028-02-28", "2028-02-29"));
        assert_eq!(past(&r), ("2024-02-28", "2024-02-29"));

        let mid_2023 = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let r = resolve_at("from Feb 29 to March 5", mid_2023);
        assert_eq!(r.timex, "(XXXX-02-29,XXXX-03-05,P5D)");
        assert_eq!(future(&r), ("2024-02-29", "2024-03-05"));
        assert_eq!(past(&r), ("2020-02-29", "2020-03-05"));
        assert!(r.comment.is_none());
    }

    #[test]
    fn test_now_as_an_endpoint() {
        let r = resolve("between now and July 4th");
        assert_eq!(future(&r), ("2024-06-15", "2024-07-04"));
        assert_eq!(r.sub_date_time_entities.len(), 1);
    }

    #[test]
    fn test_month_to_month() {
        let r = resolve("from May to July 2024");
        assert_eq!(r.timex, "(2024-05-01,2024-07-01,P2M)");
        let r = resolve("between September and November");
        assert_eq!(r.timex, "(XXXX-09-01,XXXX-11-01,P2M)");
        assert_eq!(future(&r), ("2024-09-01", "2024-11-01"));
        assert_eq!(past(&r), ("2023-09-01", "2023-11-01"));
    }

    #[test]
    fn test_month_with_year() {
        let r = resolve("March 2024");
        assert_eq!(r.timex, "2024-03");
        assert_eq!(future(&r), ("2024-03-01", "2024-04-01"));
        let r = resolve("July of next year");
        assert_eq!(r.timex, "2025-07");
    }

    #[test]
    fn test_bare_month() {
        let r = resolve("July");
        assert_eq!(r.timex, "XXXX-07");
        assert_eq!(future(&r), ("2024-07-01", "2024-08-01"));
        assert_eq!(past(&r), ("2023-07-01", "2023-08-01"));

        let r = resolve("June");
        assert_eq!(future(&r), ("2024-06-01", "2024-07-01"));
        assert_eq!(past(&r), ("2024-06-01", "2024-07-01"));
    }

    #[test]
    fn test_lowercase_ambiguous_month_ignored() {
        assert!(extract("you may leave").is_empty());
        assert_eq!(extract("in May"), vec!["May"]);
    }

    #[test]
    fn test_relative_week_month_year() {
        let r = resolve("next week");
        assert_eq!(r.timex, "2024-W25");
        assert_eq!(future(&r), ("2024-06-17", "2024-06-24"));
        let r = resolve("this weekend");
        assert_eq!(r.timex, "2024-W24-WE");
        assert_eq!(future(&r), ("2024-06-15", "2024-06-17"));
        let r = resolve("last month");
        assert_eq!(r.timex, "2024-05");
        let r = resolve("next year");
        assert_eq!(r.timex, "2025");
        assert_eq!(future(&r), ("2025-01-01", "2026-01-01"));
    }

    #[test]
    fn test_the_weekend_and_month_of() {
        let r = resolve("the weekend");
        assert_eq!(r.timex, "2024-W24-WE");
        assert_eq!(future(&r), ("2024-06-15", "2024-06-17"));
        assert_eq!(extract("see you at the weekend"), vec!["the weekend"]);

        assert_eq!(extract("we moved in the month of May"), vec!["the month of May"]);
        let r = resolve("month of May");
        assert_eq!(r.timex, "XXXX-05");
        assert_eq!(future(&r), ("2025-05-01", "2025-06-01"));
        assert_eq!(past(&r), ("2024-05-01", "2024-06-01"));
        assert_eq!(resolve("the month of May 2023").timex, "2023-05");

        let r = resolve("end of the month");
        assert_eq!(r.timex, "2024-06");
        assert_eq!(r.modifier, Some(Modifier::End));
        assert!(extract("it grows every year").is_empty());
    }

    #[test]
    fn test_early_mid_late() {
        let r = resolve("early next month");
        assert_eq!(r.timex, "2024-07");
        assert_eq!(r.modifier, Some(Modifier::Start));
        assert_eq!(future(&r), ("2024-07-01", "2024-07-16"));

        let r = resolve("late this year");
        assert_eq!(r.modifier, Some(Modifier::End));
        assert_eq!(future(&r), ("2024-07-01", "2025-01-01"));

        let r = resolve("mid-July");
        assert_eq!(r.modifier, Some(Modifier::Mid));
        assert_eq!(future(&r), ("2024-07-10", "2024-07-21"));
    }

    #[test]
    fn test_earlier_and_later_cut_at_today() {
        let r = resolve("earlier this month");
        assert_eq!(future(&r), ("2024-06-01", "2024-06-15"));
        let r = resolve("later this month");
        assert_eq!(future(&r), ("2024-06-16", "2024-07-01"));
        // not inside the range: same as "late"
        let r = resolve("later next month");
        assert_eq!(future(&r), ("2024-07-16", "2024-08-01"));
    }

    #[test]
    fn test_to_date() {
        let r = resolve("year to date");
        assert_eq!(r.timex, "(2024-01-01,2024-06-15,P166D)");
        let r = resolve("MTD");
        assert_eq!(future(&r), ("2024-06-01", "2024-06-15"));
    }

    #[test]
    fn test_bare_year() {
        let r = resolve("2023");
        assert_eq!(r.timex, "2023");
        assert_eq!(future(&r), ("2023-01-01", "2024-01-01"));
    }

    #[test]
    fn test_early_mid_late_year() {
        let r = resolve("late 2023");
        assert_eq!(r.timex, "2023");
        assert_eq!(r.modifier, Some(Modifier::End));
        assert_eq!(future(&r), ("2023-07-01", "2024-01-01"));
        assert_eq!(past(&r), ("2023-07-01", "2024-01-01"));
        let r = resolve("early 2025");
        assert_eq!(r.modifier, Some(Modifier::Start));
        assert_eq!(future(&r), ("2025-01-01", "2025-07-01"));
        assert_eq!(resolve("mid-2023").modifier, Some(Modifier::Mid));
        assert_eq!(extract("sales peaked in late 2023"), vec!["late 2023"]);
    }

    #[test]
    fn test_year_inside_numbers_rejected() {
        assert!(extract("call 555-2024-1234").is_empty());
        assert!(extract("ratio 13/2024").is_empty());
        assert!(extract("about 1200 people").is_empty());
    }

    #[test]
    fn test_week_of_month() {
        let r = resolve("the first week of July");
        assert_eq!(r.timex, "XXXX-07-W01");
        assert_eq!(future(&r), ("2024-07-01", "2024-07-08"));
        assert_eq!(past(&r), ("2023-07-03", "2023-07-10"));

        let r = resolve("the last week of July 2024");
        assert_eq!(r.timex, "2024-07-W05");
        assert_eq!(future(&r), ("2024-07-29", "2024-08-05"));

        let r = resolve("the second week of next month");
        assert_eq!(r.timex, "2024-07-W02");
        assert_eq!(future(&r), ("2024-07-08", "2024-07-15"));
    }

    #[test]
    fn test_week_of_year() {
        let r = resolve("the second week of 2024");
        assert_eq!(r.timex, "2024-W02");
        assert_eq!(future(&r), ("2024-01-08", "2024-01-15"));
    }

    #[test]
    fn test_half_year() {
        let r = resolve("the first half of 2024");
        assert_eq!(r.timex, "(2024-01-01,2024-07-01,P6M)");
        let r = resolve("H2 2023");
        assert_eq!(r.timex, "(2023-07-01,2024-01-01,P6M)");
    }

    #[test]
    fn test_seasons() {
        let r = resolve("summer");
        assert_eq!(r.timex, "SU");
        assert_eq!(future(&r), ("2024-06-01", "2024-09-01"));
        assert_eq!(past(&r), ("2024-06-01", "2024-09-01"));

        let r = resolve("this winter");
        assert_eq!(r.timex, "2024-WI");
        assert_eq!(future(&r), ("2024-12-01", "2025-03-01"));

        let r = resolve("fall 2023");
        assert_eq!(r.timex, "2023-FA");
    }

    #[test]
    fn test_which_week() {
        let r = resolve("week 27");
        assert_eq!(r.timex, "2024-W27");
        assert_eq!(future(&r), ("2024-07-01", "2024-07-08"));

        let r = resolve("week 53 of 2024");
        assert_eq!(r.timex, "2025-W01");
        assert_eq!(future(&r), ("2024-12-30", "2025-01-06"));
    }

    #[test]
    fn test_week_of_date() {
        let r = resolve("the week of July 4th");
        assert_eq!(r.timex, "2024-W27");
        assert_eq!(r.comment.as_deref(), Some(COMMENT_WEEK_OF));
        assert_eq!(future(&r), ("2024-07-01", "2024-07-08"));
        assert_eq!(past(&r), ("2023-07-03", "2023-07-10"));
    }

    #[test]
    fn test_month_of_date() {
        let r = resolve("the month of July 4th");
        assert_eq!(r.timex, "2024-07");
        assert_eq!(r.comment.as_deref(), Some(COMMENT_MONTH_OF));
        assert_eq!(future(&r), ("2024-07-01", "2024-08-01"));
    }

    #[test]
    fn test_prefixed_durations() {
        let r = resolve("the past 3 weeks");
        assert_eq!(r.timex, "(2024-05-25,2024-06-15,P3W)");
        assert_eq!(r.modifier, Some(Modifier::Before));

        let r = resolve("in the next 2 days");
        assert_eq!(r.timex, "(2024-06-16,2024-06-18,P2D)");
        assert_eq!(r.modifier, Some(Modifier::After));

        // hours belong to date-time ranges
        assert!(extract("the next 3 hours").is_empty());
    }

    #[test]
    fn test_rest_of() {
        let r = resolve("the rest of the week");
        assert_eq!(r.timex, "(2024-06-15,2024-06-17,P2D)");
        let r = resolve("rest of the year");
        assert_eq!(future(&r), ("2024-06-15", "2025-01-01"));
    }

    #[test]
    fn test_skip_from_to_merge() {
        let texts = extract_with("May 1 to May 7", DateTimeOptions::SKIP_FROM_TO_MERGE);
        assert!(!texts.iter().any(|t| t == "May 1 to May 7"));
        assert_eq!(extract("May 1 to May 7"), vec!["May 1 to May 7"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_wrong_kind() {
        let er = ExtractResult::new(0, "next week", EntityKind::Date);
        let pr = DatePeriodParser::new(culture()).parse(&er, reference());
        assert!(pr.value.is_none());
    }

    #[test]
    fn test_crosses_leap_day() {
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
        assert!(crosses_leap_day((d(2, 28), d(3, 1))));
        assert!(crosses_leap_day((d(1, 5), d(3, 10))));
        assert!(!crosses_leap_day((d(3, 1), d(3, 5))));
        assert!(!crosses_leap_day((d(2, 1), d(2, 28))));
    }
}
