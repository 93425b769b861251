//! Points with both a date and a clock time: "tomorrow at 5pm", "5pm on
//! Friday", "tonight at 8", "in 2 hours", "now".

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::agolater::{duration_unit, extract_with_before_and_after, resolve_ago_later, AgoLaterMode};
use crate::culture::{normalize_key, Culture, CultureConfig};
use crate::date::{DateExtractor, DateParser};
use crate::duration::{DurationExtractor, DurationParser};
use crate::extract::{DateTimeExtractor, EntityKind, ExtractResult};
use crate::matching::{exact_match, first_match, is_invalid_day_number_prefix, match_begin, match_end, matches};
use crate::resolution::{parse_with, DateTimeParseResult, DateTimeParser, DateTimeResolutionResult, Strategy};
use crate::time::{TimeExtractor, TimeParser};
use crate::timex::{luis_date_from, FUTURE_REF, PAST_REF, PRESENT_REF};
use crate::token::{merge_all_tokens, Token};

// ── Extractor ───────────────────────────────────────────────────────────────

pub struct DateTimePointExtractor {
    culture: Arc<dyn Culture>,
    dates: DateExtractor,
    times: TimeExtractor,
    durations: DurationExtractor,
    duration_parser: DurationParser,
}

impl DateTimePointExtractor {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self {
            dates: DateExtractor::new(culture.clone()),
            times: TimeExtractor::new(culture.clone()),
            durations: DurationExtractor::new(culture.clone()),
            duration_parser: DurationParser::new(culture.clone()),
            culture,
        }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    /// A date and a time next to each other, in either order.
    fn date_with_time(&self, text: &str, dates: &[ExtractResult], times: &[ExtractResult]) -> Vec<Token> {
        let connector = &self.config().date_time.connector;
        let joined = |first: &ExtractResult, second: &ExtractResult| {
            second.start >= first.end()
                && text
                    .get(first.end()..second.start)
                    .is_some_and(|middle| connector.is_match(middle))
        };
        let mut tokens = Vec::new();
        for date in dates {
            for time in times {
                if joined(date, time) {
                    tokens.push(Token::new(date.start, time.end()));
                } else if joined(time, date) {
                    tokens.push(Token::new(time.start, date.end()));
                }
            }
        }
        tokens
    }

    fn now_words(&self, text: &str) -> Vec<Token> {
        matches(&self.config().date_time.now, text)
            .iter()
            .map(|m| Token::new(m.start(), m.end()))
            .collect()
    }

    /// "tonight at 8", "7 this morning".
    fn time_of_today(&self, text: &str, times: &[ExtractResult]) -> Vec<Token> {
        let dt = &self.config().date_time;
        times
            .iter()
            .filter_map(|time| {
                if let Some(m) = match_end(&dt.time_of_today_before, &text[..time.start]) {
                    return Some(Token::new(m.start(), time.end()));
                }
                first_match(&dt.time_of_today_after, &text[time.end()..])
                    .map(|m| Token::new(time.start, time.end() + m.end()))
            })
            .collect()
    }

    /// "7 this morning": the hour alone is no time, the part of the day makes
    /// it one. A number ending a date ("May 7 this morning") stays with the date.
    fn hour_with_time_of_today(&self, text: &str, dates: &[ExtractResult]) -> Vec<Token> {
        matches(&self.config().date_time.hour_with_time_of_today, text)
            .iter()
            .filter_map(|m| {
                let hour = m.group("hour")?;
                let in_date = dates.iter().any(|d| d.start < hour.end && hour.start < d.end());
                (!in_date && !is_invalid_day_number_prefix(&text[..hour.start]))
                    .then(|| Token::new(m.start(), m.end()))
            })
            .collect()
    }

    fn duration_with_ago_later(&self, text: &str, reference: NaiveDateTime) -> Vec<Token> {
        let durations: Vec<ExtractResult> = self
            .durations
            .extract(text, reference)
            .into_iter()
            .filter(|er| {
                duration_unit(&self.duration_parser.parse(er, reference))
                    .is_some_and(|unit| AgoLaterMode::DateTime.accepts(unit))
            })
            .collect();
        extract_with_before_and_after(text, &durations, &self.config().utility)
    }
}

impl DateTimeExtractor for DateTimePointExtractor {
    fn kind(&self) -> EntityKind {
        EntityKind::DateTime
    }

    fn extract(&self, text: &str, reference: NaiveDateTime) -> Vec<ExtractResult> {
        let dates = self.dates.extract(text, reference);
        let times = self.times.extract(text, reference);
        let mut tokens = self.date_with_time(text, &dates, &times);
        tokens.extend(self.now_words(text));
        tokens.extend(self.time_of_today(text, &times));
        tokens.extend(self.hour_with_time_of_today(text, &dates));
        tokens.extend(self.duration_with_ago_later(text, reference));
        merge_all_tokens(tokens, text, EntityKind::DateTime)
    }
}

// ── Parser ──────────────────────────────────────────────────────────────────

pub struct DateTimePointParser {
    culture: Arc<dyn Culture>,
    dates: DateExtractor,
    date_parser: DateParser,
    times: TimeExtractor,
    time_parser: TimeParser,
    durations: DurationExtractor,
    duration_parser: DurationParser,
}

const STRATEGIES: &[Strategy<DateTimePointParser>] = &[
    ("now", DateTimePointParser::parse_now_word),
    ("date_with_time", DateTimePointParser::parse_date_with_time),
    ("time_of_today", DateTimePointParser::parse_time_of_today),
    ("ago_later", DateTimePointParser::parse_ago_later),
];

impl DateTimePointParser {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self {
            dates: DateExtractor::new(culture.clone()),
            date_parser: DateParser::new(culture.clone()),
            times: TimeExtractor::new(culture.clone()),
            time_parser: TimeParser::new(culture.clone()),
            durations: DurationExtractor::new(culture.clone()),
            duration_parser: DurationParser::new(culture.clone()),
            culture,
        }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    fn parse_now_word(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = exact_match(&self.config().date_time.now, &er.text)?;
        let word = normalize_key(m.text("now"));
        let timex = if word.starts_with("as") {
            FUTURE_REF
        } else if word == "recently" || word == "previously" {
            PAST_REF
        } else {
            PRESENT_REF
        };
        Some(DateTimeResolutionResult::point(timex, reference, reference))
    }

    /// Resolve the date and the time separately and put the clock on both
    /// date candidates.
    fn parse_date_with_time(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let date_er = self.dates.extract(&er.text, reference).into_iter().next()?;
        let time_er = self
            .times
            .extract(&er.text, reference)
            .into_iter()
            .find(|t| !t.overlaps(&date_er))?;
        let date_pr = self.date_parser.parse(&date_er, reference);
        let time_pr = self.time_parser.parse(&time_er, reference);
        let date_value = date_pr.value.as_ref()?;
        let time_value = time_pr.value.as_ref()?;

        let time = time_value.future_point()?.time();
        let future = date_value.future_point()?.date().and_time(time);
        let past = date_value.past_point()?.date().and_time(time);
        let timex = format!("{}{}", date_value.timex, time_value.timex);
        let mut resolved = DateTimeResolutionResult::point(timex, future, past);
        resolved.comment = time_value.comment.clone();
        Some(resolved.with_sub_entities(vec![date_pr, time_pr]))
    }

    /// A time with "tonight" / "this morning": today, with the part of the day
    /// settling am or pm.
    fn parse_time_of_today(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let config = self.config();
        let dt = &config.date_time;
        // "7 this morning" lost its "at" during extraction
        let prefix = config.time_token_prefix;
        let prefixed = format!("{prefix}{}", er.text);
        let time_er = self
            .times
            .extract(&prefixed, reference)
            .into_iter()
            .find(|t| t.start >= prefix.len())?;
        let (start, end) = (time_er.start - prefix.len(), time_er.end() - prefix.len());
        let tod = match_end(&dt.time_of_today_before, &er.text[..start])
            .or_else(|| match_begin(&dt.time_of_today_after, &er.text[end..]))?;
        let mut clock = self.time_parser.clock(&time_er.text)?;
        let morning = normalize_key(tod.text("tod")).contains("morning");
        clock.hour = match (morning, clock.hour) {
            (true, h) if h >= 12 => h - 12,
            (false, h) if h < 12 => h + 12,
            (_, h) => h,
        };
        clock.ambiguous = false;

        let day = reference.date();
        let at = clock.on(day)?;
        let timex = format!("{}{}", luis_date_from(day), clock.timex());
        Some(DateTimeResolutionResult::point(timex, at, at))
    }

    fn parse_ago_later(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        self.durations
            .extract(&er.text, reference)
            .iter()
            .find_map(|duration| {
                let pr = self.duration_parser.parse(duration, reference);
                resolve_ago_later(
                    self.culture.as_ref(),
                    &er.text,
                    duration,
                    &pr,
                    reference,
                    AgoLaterMode::DateTime,
                )
            })
    }
}

impl DateTimeParser for DateTimePointParser {
    fn kind(&self) -> EntityKind {
        EntityKind::DateTime
    }

    fn parse(&self, er: &ExtractResult, reference: NaiveDateTime) -> DateTimeParseResult {
        parse_with(self, EntityKind::DateTime, STRATEGIES, er, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::English;
    use crate::resolution::{COMMENT_AMPM, DATE_TIME};
    use chrono::NaiveDate;
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

    fn extract(text: &str) -> Vec<String> {
        DateTimePointExtractor::new(culture())
            .extract(text, reference())
            .into_iter()
            .map(|er| er.text)
            .collect()
    }

    fn resolve(text: &str) -> DateTimeResolutionResult {
        let c = culture();
        let ers = DateTimePointExtractor::new(c.clone()).extract(text, reference());
        assert_eq!(ers.len(), 1, "date-times in {text:?}: {ers:?}");
        DateTimePointParser::new(c)
            .parse(&ers[0], reference())
            .value
            .unwrap_or_else(|| panic!("unresolved {:?}", ers[0].text))
    }

    fn future(r: &DateTimeResolutionResult) -> &str {
        r.future_resolution.get(DATE_TIME).map(String::as_str).unwrap_or("")
    }

    fn past(r: &DateTimeResolutionResult) -> &str {
        r.past_resolution.get(DATE_TIME).map(String::as_str).unwrap_or("")
    }

    #[test]
    fn test_date_then_time() {
        assert_eq!(extract("let's meet tomorrow at 5pm please"), vec!["tomorrow at 5pm"]);
        let r = resolve("tomorrow at 5pm");
        assert_eq!(r.timex, "2024-06-16T17");
        assert_eq!(future(&r), "2024-06-16 17:00:00");
        assert_eq!(r.sub_date_time_entities.len(), 2);
    }

    #[test]
    fn test_time_then_weekday() {
        let r = resolve("5pm on Friday");
        assert_eq!(r.timex, "XXXX-WXX-5T17");
        assert_eq!(future(&r), "2024-06-21 17:00:00");
        assert_eq!(past(&r), "2024-06-14 17:00:00");
    }

    #[test]
    fn test_open_year_keeps_both_candidates() {
        let r = resolve("July 4th at 10:30");
        assert_eq!(r.timex, "XXXX-07-04T10:30");
        assert_eq!(future(&r), "2024-07-04 10:30:00");
        assert_eq!(past(&r), "2023-07-04 10:30:00");
        assert_eq!(r.comment.as_deref(), Some(COMMENT_AMPM));
    }

    #[test]
    fn test_now_words() {
        assert_eq!(resolve("right now").timex, PRESENT_REF);
        assert_eq!(resolve("as soon as possible").timex, FUTURE_REF);
        assert_eq!(resolve("I saw it recently").timex, PAST_REF);
        assert_eq!(future(&resolve("now")), "2024-06-15 09:00:00");
    }

    #[test]
    fn test_time_of_today() {
        let r = resolve("tonight at 8");
        assert_eq!(r.timex, "2024-06-15T20");
        assert_eq!(r.comment, None);
        assert_eq!(extract("up at 7 this morning"), vec!["7 this morning"]);
        let r = resolve("7 this morning");
        assert_eq!(r.timex, "2024-06-15T07");
    }

    #[test]
    fn test_bare_hour_with_time_of_today() {
        assert_eq!(extract("call me 7 this morning"), vec!["7 this morning"]);
        let r = resolve("nine tonight");
        assert_eq!(r.timex, "2024-06-15T21");
        assert_eq!(future(&r), "2024-06-15 21:00:00");
        assert!(extract("it cost $7 this morning").is_empty());
    }

    #[test]
    fn test_ago_and_later_with_time_units() {
        let r = resolve("in 2 hours");
        assert_eq!(r.timex, "2024-06-15T11:00:00");
        let r = resolve("30 minutes ago");
        assert_eq!(future(&r), "2024-06-15 08:30:00");
        assert!(extract("2 days ago").is_empty());
    }

    #[test]
    fn test_wrong_kind_and_empty() {
        let er = ExtractResult::new(0, "now", EntityKind::Date);
        assert!(DateTimePointParser::new(culture()).parse(&er, reference()).value.is_none());
        assert!(extract("").is_empty());
    }
}
