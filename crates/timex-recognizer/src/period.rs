//! Ranges built from two points: "May 1 to May 7", "from 3pm till 5pm",
//! "between Monday and Friday".

use chrono::NaiveDateTime;

use crate::culture::UtilityRegexes;
use crate::extract::{DateTimeExtractor, ExtractResult};
use crate::matching::match_end;
use crate::resolution::{DateTimeParseResult, DateTimeParser};
use crate::token::Token;

/// Spans joining adjacent `points` (sorted, from `text`) with a "till" word,
/// or with "and" after a leading "between". A leading "from" is included.
pub(crate) fn merge_two_points(
    text: &str,
    points: &[ExtractResult],
    utility: &UtilityRegexes,
) -> Vec<Token> {
    points
        .windows(2)
        .filter_map(|pair| {
            let (first, second) = (&pair[0], &pair[1]);
            let middle = text.get(first.end()..second.start)?.trim();
            let before = &text[..first.start];
            if utility.till.is_match(middle) {
                let start = match_end(&utility.from_prefix, before).map_or(first.start, |m| m.start());
                Some(Token::new(start, second.end()))
            } else if utility.range_and.is_match(middle) {
                match_end(&utility.between_prefix, before).map(|m| Token::new(m.start(), second.end()))
            } else {
                None
            }
        })
        .collect()
}

/// Extract and parse the first two points inside a range span. Both must resolve.
pub(crate) fn parse_two_points(
    extractor: &dyn DateTimeExtractor,
    parser: &dyn DateTimeParser,
    text: &str,
    reference: NaiveDateTime,
) -> Option<(DateTimeParseResult, DateTimeParseResult)> {
    let points = extractor.extract(text, reference);
    let [first, second, ..] = points.as_slice() else {
        return None;
    };
    let first = parser.parse(first, reference);
    let second = parser.parse(second, reference);
    (first.is_resolved() && second.is_resolved()).then_some((first, second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::{Culture, English};
    use crate::extract::EntityKind;

    fn spans(text: &str, points: &[(usize, &str)]) -> Vec<String> {
        let en = English::new().unwrap();
        let points: Vec<ExtractResult> = points
            .iter()
            .map(|(start, t)| ExtractResult::new(*start, t, EntityKind::Date))
            .collect();
        merge_two_points(text, &points, &en.config().utility)
            .into_iter()
            .map(|t| text[t.start..t.end].to_string())
            .collect()
    }

    #[test]
    fn test_till_joins_points() {
        let text = "away May 1 to May 7";
        assert_eq!(spans(text, &[(5, "May 1"), (14, "May 7")]), vec!["May 1 to May 7"]);
    }

    #[test]
    fn test_from_prefix_included() {
        let text = "from today until Friday";
        assert_eq!(
            spans(text, &[(5, "today"), (17, "Friday")]),
            vec!["from today until Friday"]
        );
    }

    #[test]
    fn test_and_needs_between() {
        let text = "between Monday and Friday";
        assert_eq!(
            spans(text, &[(8, "Monday"), (19, "Friday")]),
            vec!["between Monday and Friday"]
        );
        let text = "Monday and Friday";
        assert!(spans(text, &[(0, "Monday"), (11, "Friday")]).is_empty());
    }

    #[test]
    fn test_unrelated_points_stay_apart() {
        let text = "today, not Friday";
        assert!(spans(text, &[(0, "today"), (11, "Friday")]).is_empty());
        let text = "todayFriday";
        assert!(spans(text, &[(0, "today"), (5, "Friday")]).is_empty());
    }
}
