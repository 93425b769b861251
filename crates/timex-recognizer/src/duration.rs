//! Durations: "3 days", "an hour and a half", "a couple of weeks", "all day".
//!
//! The extractor unions every cue it finds and then looks left of each span
//! for a "more than" / "less than" qualifier. The parser turns the span into a
//! length in seconds and a `P[T]nU` timex.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::culture::{Culture, CultureConfig};
use crate::extract::{DateTimeExtractor, EntityKind, ExtractData, ExtractResult, Modifier};
use crate::matching::{exact_match, first_match, match_end, matches, RegexMatch};
use crate::resolution::{parse_with, DateTimeParseResult, DateTimeParser, DateTimeResolutionResult, Strategy};
use crate::timex::duration_timex;
use crate::token::{merge_all_tokens, Token};

/// Above this many years, months or weeks a number is not read as a duration.
const MAX_COARSE_AMOUNT: f64 = 1000.0;

// ── Extractor ───────────────────────────────────────────────────────────────

pub struct DurationExtractor {
    culture: Arc<dyn Culture>,
}

impl DurationExtractor {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self { culture }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    /// A cardinal followed by a unit: "3 days", "2.5 hours and a half".
    fn number_with_unit(&self, text: &str) -> Vec<Token> {
        let config = self.config();
        config
            .numbers
            .cardinal
            .extract(text)
            .into_iter()
            .filter_map(|num| {
                let unit = first_match(&config.duration.followed_unit, &text[num.end()..])?;
                Some(Token::new(num.start, num.end() + unit.end()))
            })
            .collect()
    }

    fn regex_tokens(&self, text: &str) -> Vec<Token> {
        let d = &self.config().duration;
        let mut tokens: Vec<Token> = [
            &d.number_combined_with_unit,
            &d.an_unit,
            &d.half_unit,
            &d.all_unit,
            &d.inexact_number_unit,
        ]
        .into_iter()
        .flat_map(|re| matches(re, text))
        .map(|m| Token::new(m.start(), m.end()))
        .collect();
        // "next year" is a relative date; only the unit is a duration
        tokens.extend(
            matches(&d.relative_unit, text)
                .iter()
                .filter_map(|m| m.group("unit"))
                .map(|g| Token::new(g.start, g.end)),
        );
        tokens
    }

    /// Extend a span over a "more than" / "less than" qualifier on its left.
    fn with_qualifier(&self, text: &str, er: ExtractResult) -> ExtractResult {
        let d = &self.config().duration;
        let before = &text[..er.start];
        let qualifier = [(&d.more_than, Modifier::More), (&d.less_than, Modifier::Less)]
            .into_iter()
            .find_map(|(re, modifier)| match_end(re, before).map(|m| (m.start(), modifier)));
        match qualifier {
            Some((start, modifier)) => ExtractResult::from_span(text, start, er.end(), er.kind)
                .map(|er| er.with_data(ExtractData::Mod(modifier)))
                .unwrap_or(er),
            None => er,
        }
    }
}

impl DateTimeExtractor for DurationExtractor {
    fn kind(&self) -> EntityKind {
        EntityKind::Duration
    }

    fn extract(&self, text: &str, _reference: NaiveDateTime) -> Vec<ExtractResult> {
        let mut tokens = self.number_with_unit(text);
        tokens.extend(self.regex_tokens(text));
        merge_all_tokens(tokens, text, EntityKind::Duration)
            .into_iter()
            .map(|er| self.with_qualifier(text, er))
            .collect()
    }
}

// ── Parser ──────────────────────────────────────────────────────────────────

pub struct DurationParser {
    culture: Arc<dyn Culture>,
}

const STRATEGIES: &[Strategy<DurationParser>] = &[
    ("number_with_unit", DurationParser::parse_number_with_unit),
    ("number_combined_with_unit", DurationParser::parse_number_combined_with_unit),
    ("an_unit", DurationParser::parse_an_unit),
    ("inexact_number_unit", DurationParser::parse_inexact_number_unit),
    ("implicit", DurationParser::parse_implicit),
];

impl DurationParser {
    pub fn new(culture: Arc<dyn Culture>) -> Self {
        Self { culture }
    }

    fn config(&self) -> &CultureConfig {
        self.culture.config()
    }

    /// Build the resolution for `amount` of the unit in `m`'s `unit` group,
    /// adding any "and a half" suffix.
    fn resolve(&self, amount: f64, m: &RegexMatch<'_>) -> Option<DateTimeResolutionResult> {
        let tables = &self.config().tables;
        let unit = tables.unit(m.text("unit"))?;
        let extra = m
            .group("suffix_num")
            .and_then(|g| tables.double_number(g.text))
            .unwrap_or(0.0);
        let amount = amount + extra;
        if amount > MAX_COARSE_AMOUNT && matches!(unit, "Y" | "MON" | "W") {
            return None;
        }
        let seconds = amount * tables.seconds_per(unit)?;
        Some(DateTimeResolutionResult::duration(duration_timex(amount, unit), seconds))
    }

    fn parse_number_with_unit(&self, er: &ExtractResult, _: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let numbers = &self.config().numbers;
        let found = numbers.cardinal.extract(&er.text);
        let [num] = found.as_slice() else {
            return None;
        };
        let amount = numbers.parser.parse(num)?;
        let unit = first_match(&self.config().duration.followed_unit, &er.text[num.end()..])?;
        self.resolve(amount, &unit)
    }

    fn parse_number_combined_with_unit(&self, er: &ExtractResult, _: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = first_match(&self.config().duration.number_combined_with_unit, &er.text)?;
        let amount: f64 = m.text("num").parse().ok()?;
        self.resolve(amount, &m)
    }

    fn parse_an_unit(&self, er: &ExtractResult, _: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let d = &self.config().duration;
        if let Some(m) = first_match(&d.an_unit, &er.text) {
            let amount = if m.has("half") { 0.5 } else { 1.0 };
            return self.resolve(amount, &m);
        }
        let m = first_match(&d.half_unit, &er.text)?;
        self.resolve(0.5, &m)
    }

    fn parse_inexact_number_unit(&self, er: &ExtractResult, _: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let m = first_match(&self.config().duration.inexact_number_unit, &er.text)?;
        let amount = if m.has("two") { 2.0 } else { 3.0 };
        self.resolve(amount, &m)
    }

    /// "all day", or a bare unit left over from "next week".
    fn parse_implicit(&self, er: &ExtractResult, _: NaiveDateTime) -> Option<DateTimeResolutionResult> {
        let d = &self.config().duration;
        first_match(&d.all_unit, &er.text)
            .or_else(|| exact_match(&d.followed_unit, &er.text))
            .and_then(|m| self.resolve(1.0, &m))
    }
}

impl DateTimeParser for DurationParser {
    fn kind(&self) -> EntityKind {
        EntityKind::Duration
    }

    fn parse(&self, er: &ExtractResult, reference: NaiveDateTime) -> DateTimeParseResult {
        let mut pr = parse_with(self, EntityKind::Duration, STRATEGIES, er, reference);
        if let (Some(value), Some(modifier)) = (pr.value.as_mut(), er.modifier()) {
            value.modifier = Some(modifier);
        }
        pr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::English;
    use crate::date_util::at_midnight;
    use chrono::NaiveDate;

    fn culture() -> Arc<dyn Culture> {
        Arc::new(English::new().unwrap())
    }

    fn reference() -> NaiveDateTime {
        at_midnight(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    fn extract(text: &str) -> Vec<ExtractResult> {
        DurationExtractor::new(culture()).extract(text, reference())
    }

    fn parse(text: &str) -> (String, f64, Option<Modifier>) {
        let c = culture();
        let er = DurationExtractor::new(c.clone())
            .extract(text, reference())
            .into_iter()
            .next()
            .unwrap();
        let pr = DurationParser::new(c).parse(&er, reference());
        let value = pr.value.unwrap();
        (value.timex.clone(), value.seconds().unwrap(), value.modifier)
    }

    #[test]
    fn test_extract_number_with_unit() {
        let ers = extract("I'll be away for 3 days and back");
        assert_eq!(ers.len(), 1);
        assert_eq!(ers[0].text, "3 days");
        assert_eq!(ers[0].kind, EntityKind::Duration);
    }

    #[test]
    fn test_parse_number_with_unit() {
        assert_eq!(parse("3 days"), ("P3D".to_string(), 259_200.0, None));
        assert_eq!(parse("two hours"), ("PT2H".to_string(), 7_200.0, None));
        assert_eq!(parse("30 minutes").0, "PT30M");
    }

    #[test]
    fn test_parse_and_a_half() {
        let (timex, seconds, _) = parse("2 hours and a half");
        assert_eq!(timex, "PT2.5H");
        assert_eq!(seconds, 9_000.0);
    }

    #[test]
    fn test_parse_combined_unit() {
        assert_eq!(parse("it took 3h").0, "PT3H");
    }

    #[test]
    fn test_parse_article_and_half() {
        assert_eq!(parse("an hour").0, "PT1H");
        assert_eq!(parse("half an hour").0, "PT0.5H");
        assert_eq!(parse("a day").0, "P1D");
        assert_eq!(parse("half day").0, "P0.5D");
    }

    #[test]
    fn test_parse_inexact() {
        assert_eq!(parse("a few weeks").0, "P3W");
        assert_eq!(parse("a couple of days").0, "P2D");
    }

    #[test]
    fn test_parse_implicit() {
        assert_eq!(parse("all day").0, "P1D");
        let ers = extract("next week");
        assert_eq!(ers[0].text, "week");
        assert_eq!(parse("next week").0, "P1W");
    }

    #[test]
    fn test_more_and_less_than() {
        let ers = extract("it lasted more than 3 days");
        assert_eq!(ers[0].text, "more than 3 days");
        assert_eq!(ers[0].modifier(), Some(Modifier::More));
        assert_eq!(parse("less than 2 weeks").2, Some(Modifier::Less));
    }

    #[test]
    fn test_large_coarse_amount_rejected() {
        let c = culture();
        let er = ExtractResult::new(0, "2000 years", EntityKind::Duration);
        assert!(DurationParser::new(c.clone()).parse(&er, reference()).value.is_none());
        let er = ExtractResult::new(0, "2000 seconds", EntityKind::Duration);
        assert!(DurationParser::new(c).parse(&er, reference()).value.is_some());
    }

    #[test]
    fn test_wrong_kind_is_unresolved() {
        let er = ExtractResult::new(0, "3 days", EntityKind::Date);
        assert!(DurationParser::new(culture()).parse(&er, reference()).value.is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract("").is_empty());
    }
}
