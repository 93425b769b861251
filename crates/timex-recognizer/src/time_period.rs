//! Time ranges on the reference day: "from 3 to 5pm", "between 10:00 and
//! 11:30", "late evening".

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::culture::{normalize_key, Culture, CultureConfig};
use crate::extract::{DateTimeExtractor, EntityKind, ExtractResult, Modifier};
use crate::matching::{exact_match, is_glued_to_number, matches, RegexMatch};
use crate::period::{merge_two_points, parse_two_points};
use crate::resolution::{
    parse_with, DateTimeParseResult, DateTimeParser, DateTimeResolutionResult, Strategy,
    COMMENT_AMPM,
};
use crate::time::{apply_desc, Clock, TimeExtractor, TimeParser};
use crate::timex::{range_timex, span_timex};
use crate::token::{merge_all_tokens, Token};

// ── Parts of the day ────────────────────────────────────────────────────────

/// A named part of the day and its clock range. The end is exclusive except
/// for night, which runs to the last second of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DayPart {
    pub code: &'static str,
    pub begin: NaiveTime,
    pub end: NaiveTime,
}

impl DayPart {
    /// Look up a part-of-day word: "morning", "afternoon", "night", ...
    pub fn from_word(word: &str) -> Option<Self> {
        let (code, begin, end) = match normalize_key(word).as_str() {
            "morning" => ("TMO", (8, 0, 0), (12, 0, 0)),
            "afternoon" => ("TAF", (12, 0, 0), (16, 0, 0)),
            "evening" => ("TEV", (16, 0, 0), (20, 0, 0)),
            "night" | "tonight" => ("TNI", (20, 0, 0), (23, 59, 59)),
            "daytime" => ("TDT", (8, 0, 0), (18, 0, 0)),
            "business hours" => ("TBH", (8, 0, 0), (18, 0, 0)),
            _ => return None,
        };
        let at = |(h, m, s): (u32, u32, u32)| NaiveTime::from_hms_opt(h, m, s);
        Some(Self {
            code,
            begin: at(begin)?,
            end: at(end)?,
        })
    }

    /// The first half, ending at the midpoint.
    pub fn early(self) -> Self {
        Self {
            end: self.midpoint(),
            ..self
        }
    }

    /// The second half, starting at the midpoint.
    pub fn late(self) -> Self {
        Self {
            begin: self.midpoint(),
            ..self
        }
    }

    fn midpoint(&self) -> NaiveTime {
        self.begin + (self.end - self.begin) / 2
    }

    pub fn on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        (date.and_time(self.begin), date.and_time(self.end))
    }
}

// ── Extractor ───────────────────────────────────────────────────────────────

pub struct TimePeriodExtractor {
    culture: Arc<dyn Culture>,
    times: TimeExtractor,
}

impl TimePeriodExtractor {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self {
            times: TimeExtractor::new(culture.clone()),
            culture,
        }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    /// "from 3 to 5pm", "3-5 pm", "between 3 and 5". Bare "3-5" is not a
    /// time range without "from" or an am/pm marker.
    fn number_ranges(&self, text: &str) -> Vec<Token> {
        let tp = &self.config().time_period;
        matches(&tp.from_to, text)
            .into_iter()
            .filter(is_anchored_range)
            .chain(matches(&tp.between_and, text))
            .filter(|m| !is_glued_to_number(&text[m.end()..]))
            .map(|m| Token::new(m.start(), m.end()))
            .collect()
    }

    fn day_parts(&self, text: &str) -> Vec<Token> {
        matches(&self.config().time_period.time_of_day, text)
            .iter()
            .map(|m| Token::new(m.start(), m.end()))
            .collect()
    }
}

fn is_anchored_range(m: &RegexMatch<'_>) -> bool {
    m.has("from") || m.has("desc1") || m.has("desc2")
}

impl DateTimeExtractor for TimePeriodExtractor {
    fn kind(&self) -> EntityKind {
        EntityKind::TimePeriod
    }

    fn extract(&self, text: &str, reference: NaiveDateTime) -> Vec<ExtractResult> {
        let mut tokens = self.number_ranges(text);
        let times = self.times.extract(text, reference);
        tokens.extend(merge_two_points(text, &times, &self.config().utility));
        tokens.extend(self.day_parts(text));
        merge_all_tokens(tokens, text, EntityKind::TimePeriod)
    }
}

// ── Parser ──────────────────────────────────────────────────────────────────

pub struct TimePeriodParser {
    culture: Arc<dyn Culture>,
    times: TimeExtractor,
    time_parser: TimeParser,
}

const STRATEGIES: &[Strategy<TimePeriodParser>] = &[
    ("number_range", TimePeriodParser::parse_number_range),
    ("two_points", TimePeriodParser::parse_two_points),
    ("time_of_day", TimePeriodParser::parse_time_of_day),
];

impl TimePeriodParser {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self {
            times: TimeExtractor::new(culture.clone()),
            time_parser: TimeParser::new(culture.clone()),
            culture,
        }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    /// Hour and minute of one side of a number range (`suffix` is "1" or "2").
    fn side(&self, m: &RegexMatch<'_>, suffix: &str) -> Option<(u32, Option<u32>)> {
        let hour = match m.group(&format!("hour{suffix}")) {
            Some(g) => g.text.parse().ok()?,
            None => self
                .config()
                .tables
                .number(m.group(&format!("hournum{suffix}"))?.text)?,
        };
        let minute = match m.group(&format!("min{suffix}")) {
            Some(g) => Some(g.text.parse().ok()?),
            None => None,
        };
        Some((hour % 24, minute))
    }

    fn parse_number_range(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let tp = &self.config().time_period;
        let m = exact_match(&tp.from_to, &er.text)
            .filter(is_anchored_range)
            .or_else(|| exact_match(&tp.between_and, &er.text))?;
        let (begin_hour, begin_minute) = self.side(&m, "1")?;
        let (end_hour, end_minute) = self.side(&m, "2")?;
        let desc1 = m.group("desc1").map(|g| g.text);
        let desc2 = m.group("desc2").map(|g| g.text);

        let end_hour = desc2.map_or(end_hour, |d| apply_desc(end_hour, d));
        // "3-5pm" is afternoon on both sides, "11-1pm" is not
        let begin_hour = match (desc1, desc2) {
            (Some(d), _) => apply_desc(begin_hour, d),
            (None, Some(d)) => {
                let shifted = apply_desc(begin_hour, d);
                if shifted <= end_hour {
                    shifted
                } else {
                    begin_hour
                }
            }
            (None, None) => begin_hour,
        };
        // "10am to 2" ends in the afternoon
        let end_hour = if desc1.is_some() && desc2.is_none() && end_hour < begin_hour && end_hour < 12 {
            end_hour + 12
        } else {
            end_hour
        };

        let ambiguous = desc1.is_none() && desc2.is_none();
        let begin = Clock {
            hour: begin_hour,
            minute: begin_minute,
            second: None,
            ambiguous,
        };
        let end = Clock {
            hour: end_hour,
            minute: end_minute,
            second: None,
            ambiguous,
        };
        self.resolve_range(begin, end, reference)
    }

    fn resolve_range(&self, begin: Clock, end: Clock, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let day = reference.date();
        let b = begin.on(day)?;
        let mut e = end.on(day)?;
        if e < b {
            e += Duration::days(1);
        }
        let timex = range_timex(&begin.timex(), &end.timex(), &span_timex(b, e));
        let resolved = DateTimeResolutionResult::range(timex, (b, e), (b, e));
        Some(if begin.ambiguous && end.ambiguous {
            resolved.with_comment(COMMENT_AMPM)
        } else {
            resolved
        })
    }

    /// "10:00 to 11:30", "between 3pm and 5pm".
    fn parse_two_points(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let (first, second) = parse_two_points(&self.times, &self.time_parser, &er.text, reference)?;
        let mut begin = self.time_parser.clock(&first.text)?;
        let end = self.time_parser.clock(&second.text)?;
        // "3:00 to 5:00 pm": the marker on the end carries over
        if begin.ambiguous && !end.ambiguous && end.hour >= 12 && begin.hour + 12 <= end.hour {
            begin.hour += 12;
            begin.ambiguous = false;
        }
        let resolved = self.resolve_range(begin, end, reference)?;
        Some(resolved.with_sub_entities(vec![first, second]))
    }

    /// "morning", "in the late afternoon", "early evening".
    fn parse_time_of_day(&self, er: &ExtractResult, reference: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = exact_match(&self.config().time_period.time_of_day, &er.text)?;
        let part = DayPart::from_word(m.text("tod"))?;
        let (part, modifier) = if m.has("early") {
            (part.early(), Some(Modifier::Start))
        } else if m.has("late") {
            (part.late(), Some(Modifier::End))
        } else {
            (part, None)
        };
        let range = part.on(reference.date());
        let resolved = DateTimeResolutionResult::range(part.code, range, range);
        Some(match modifier {
            Some(modifier) => resolved.with_mod(modifier),
            None => resolved,
        })
    }
}

impl DateTimeParser for TimePeriodParser {
    fn kind(&self) -> EntityKind {
        EntityKind::TimePeriod
    }

    fn parse(&self, er: &ExtractResult, reference: NaiveDateTime) -> DateTimeParseResult {
        parse_with(self, EntityKind::TimePeriod, STRATEGIES, er, reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::English;
    use crate::resolution::{END_TIME, START_TIME};
    use std::sync::OnceLock;

    fn culture() -> Arc<dyn Culture> {
        static CULTURE: OnceLock<Arc<dyn Culture>> = OnceLock::new();
        CULTURE
            .get_or_init(|| Arc::new(English::new().unwrap()))
            .clone()
    }

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn extract(text: &str) -> Vec<String> {
        TimePeriodExtractor::new(culture())
            .extract(text, reference())
            .into_iter()
            .map(|er| er.text)
            .collect()
    }

    fn resolve(text: &str) -> DateTimeResolutionResult {
        let c = culture();
        let ers = TimePeriodExtractor::new(c.clone()).extract(text, reference());
        assert_eq!(ers.len(), 1, "time ranges in {text:?}: {ers:?}");
        TimePeriodParser::new(c)
            .parse(&ers[0], reference())
            .value
            .unwrap_or_else(|| panic!("unresolved {:?}", ers[0].text))
    }

    fn times(r: &DateTimeResolutionResult) -> (&str, &str) {
        (
            r.future_resolution.get(START_TIME).map(String::as_str).unwrap_or(""),
            r.future_resolution.get(END_TIME).map(String::as_str).unwrap_or(""),
        )
    }

    #[test]
    fn test_from_to_with_trailing_desc() {
        let r = resolve("I'm free from 3 to 5pm today");
        assert_eq!(r.timex, "(T15,T17,PT2H)");
        assert_eq!(times(&r), ("15:00:00", "17:00:00"));
        assert_eq!(r.comment, None);
    }

    #[test]
    fn test_desc_not_carried_across_noon() {
        let r = resolve("11-1pm");
        assert_eq!(r.timex, "(T11,T13,PT2H)");
    }

    #[test]
    fn test_between_and() {
        let r = resolve("between 3 and 5 pm");
        assert_eq!(r.timex, "(T15,T17,PT2H)");
        let r = resolve("between 9 and 11");
        assert_eq!(r.comment.as_deref(), Some(COMMENT_AMPM));
    }

    #[test]
    fn test_bare_dash_range_is_not_a_time() {
        assert!(extract("pages 3-5").is_empty());
    }

    #[test]
    fn test_two_clock_points() {
        let r = resolve("10:00 to 11:30");
        assert_eq!(r.timex, "(T10:00,T11:30,PT90M)");
        assert_eq!(r.sub_date_time_entities.len(), 2);
        let r = resolve("from 3:00 until 5:00 pm");
        assert_eq!(times(&r), ("15:00:00", "17:00:00"));
    }

    #[test]
    fn test_range_across_midnight() {
        let r = resolve("from 10pm to 2am");
        assert_eq!(r.timex, "(T22,T02,PT4H)");
        let (b, e) = r.future_range().unwrap();
        assert_eq!(e.date(), b.date().succ_opt().unwrap());
    }

    #[test]
    fn test_time_of_day() {
        let r = resolve("in the afternoon");
        assert_eq!(r.timex, "TAF");
        assert_eq!(times(&r), ("12:00:00", "16:00:00"));
        assert_eq!(r.modifier, None);
        let r = resolve("night");
        assert_eq!(times(&r), ("20:00:00", "23:59:59"));
    }

    #[test]
    fn test_early_and_late_split() {
        let r = resolve("early morning");
        assert_eq!(r.timex, "TMO");
        assert_eq!(times(&r), ("08:00:00", "10:00:00"));
        assert_eq!(r.modifier, Some(Modifier::Start));
        let r = resolve("late evening");
        assert_eq!(times(&r), ("18:00:00", "20:00:00"));
        assert_eq!(r.modifier, Some(Modifier::End));
    }

    #[test]
    fn test_day_part_lookup() {
        assert_eq!(DayPart::from_word("Business  Hours").map(|p| p.code), Some("TBH"));
        assert!(DayPart::from_word("brunch").is_none());
    }

    #[test]
    fn test_wrong_kind() {
        let er = ExtractResult::new(0, "morning", EntityKind::Time);
        assert!(TimePeriodParser::new(culture()).parse(&er, reference()).value.is_none());
    }
}
