//! "3 days ago", "in 2 hours", "a week later": durations anchored to the
//! reference by a direction word.

use chrono::{Duration, NaiveDateTime};

use crate::culture::{Culture, UtilityRegexes};
use crate::date_util::swift;
use crate::extract::{ExtractResult, Modifier};
use crate::matching::{first_match, match_end};
use crate::resolution::{DateTimeParseResult, DateTimeResolutionResult};
use crate::timex::{luis_date_from, luis_date_time, parse_duration};
use crate::token::Token;

/// Which entity an ago/later expression resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgoLaterMode {
    /// Day-granular units; resolves to a date.
    Date,
    /// Hour, minute and second units; resolves to a date-time.
    DateTime,
}

impl AgoLaterMode {
    /// Whether a canonical duration unit belongs to this mode.
    pub fn accepts(&self, unit: &str) -> bool {
        match self {
            AgoLaterMode::Date => matches!(unit, "Y" | "MON" | "W" | "D"),
            AgoLaterMode::DateTime => matches!(unit, "H" | "M" | "S"),
        }
    }
}

/// The canonical unit of a parsed duration.
pub fn duration_unit(pr: &DateTimeParseResult) -> Option<&'static str> {
    parse_duration(&pr.value.as_ref()?.timex).map(|(_, unit)| unit)
}

/// Spans of `durations` extended over a trailing "ago" / "later" or a leading "in".
pub fn extract_with_before_and_after(
    text: &str,
    durations: &[ExtractResult],
    utility: &UtilityRegexes,
) -> Vec<Token> {
    durations
        .iter()
        .filter_map(|duration| {
            let after = &text[duration.end()..];
            if let Some(m) = first_match(&utility.ago, after).or_else(|| first_match(&utility.later, after)) {
                return Some(Token::new(duration.start, duration.end() + m.end()));
            }
            let before = &text[..duration.start];
            match_end(&utility.in_connector, before).map(|m| Token::new(m.start(), duration.end()))
        })
        .collect()
}

/// Resolve `text`, which contains the duration `duration_er` (offsets
/// relative to `text`) already parsed as `duration_pr`.
pub fn resolve_ago_later(
    culture: &dyn Culture,
    text: &str,
    duration_er: &ExtractResult,
    duration_pr: &DateTimeParseResult,
    reference: NaiveDateTime,
    mode: AgoLaterMode,
) -> Option<DateTimeResolutionResult> {
    let utility = &culture.config().utility;
    let value = duration_pr.value.as_ref()?;
    let (amount, unit) = parse_duration(&value.timex)?;
    if !mode.accepts(unit) {
        return None;
    }

    let after = text.get(duration_er.end()..)?;
    let before = text.get(..duration_er.start)?;
    let (sign, modifier) = if first_match(&utility.ago, after).is_some() {
        (-1.0, Modifier::Before)
    } else if first_match(&utility.later, after).is_some()
        || match_end(&utility.in_connector, before).is_some()
    {
        (1.0, Modifier::After)
    } else {
        return None;
    };

    let shifted = if amount.fract() == 0.0 {
        swift(reference, (sign * amount) as i64, unit)?
    } else {
        let seconds = value.seconds()?;
        reference.checked_add_signed(Duration::try_milliseconds((sign * seconds * 1000.0) as i64)?)?
    };

    let resolved = match mode {
        AgoLaterMode::Date => {
            let date = shifted.date();
            DateTimeResolutionResult::date(luis_date_from(date), date, date)
        }
        AgoLaterMode::DateTime => {
            DateTimeResolutionResult::point(luis_date_time(shifted), shifted, shifted)
        }
    };
    Some(
        resolved
            .with_mod(modifier)
            .with_sub_entities(vec![duration_pr.clone()]),
    )
}
