//! Extraction results: located spans tagged with an entity kind.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::error::{RecognizerError, Result};

/// Entity kind tag carried by every [`ExtractResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "duration")]
    Duration,
    #[serde(rename = "daterange")]
    DatePeriod,
    #[serde(rename = "timerange")]
    TimePeriod,
    #[serde(rename = "datetime")]
    DateTime,
    #[serde(rename = "datetimerange")]
    DateTimePeriod,
    #[serde(rename = "builtin.num.integer")]
    Integer,
    #[serde(rename = "builtin.num.double")]
    Double,
    #[serde(rename = "builtin.num.ordinal")]
    Ordinal,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Date => "date",
            EntityKind::Time => "time",
            EntityKind::Duration => "duration",
            EntityKind::DatePeriod => "daterange",
            EntityKind::TimePeriod => "timerange",
            EntityKind::DateTime => "datetime",
            EntityKind::DateTimePeriod => "datetimerange",
            EntityKind::Integer => "builtin.num.integer",
            EntityKind::Double => "builtin.num.double",
            EntityKind::Ordinal => "builtin.num.ordinal",
        }
    }
}

/// Modifier annotations attached to a resolution ("more than 3 days", "early May").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Before,
    After,
    More,
    Less,
    Start,
    Mid,
    End,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Before => "before",
            Modifier::After => "after",
            Modifier::More => "more",
            Modifier::Less => "less",
            Modifier::Start => "start",
            Modifier::Mid => "mid",
            Modifier::End => "end",
        }
    }
}

/// Side-channel payload an extractor hands to its parser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ExtractData {
    /// Numeric value of a number extraction.
    Number(f64),
    /// "more than" / "less than" style prefix found left of a duration.
    Mod(Modifier),
    /// Constituents of a merged result, in source order. Offsets are relative
    /// to the merged result's own text.
    SubEntities(Vec<ExtractResult>),
}

/// A located, typed span of the source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractResult {
    /// Byte offset of the span in the source.
    pub start: usize,
    /// Byte length of the span.
    pub length: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ExtractData>,
}

impl ExtractResult {
    pub fn new(start: usize, text: &str, kind: EntityKind) -> Self {
        Self {
            start,
            length: text.len(),
            text: text.to_string(),
            kind,
            data: None,
        }
    }

    /// Slice `[start, end)` out of `source`; `None` if the range is not valid there.
    pub fn from_span(source: &str, start: usize, end: usize, kind: EntityKind) -> Option<Self> {
        let text = source.get(start..end)?;
        Some(Self::new(start, text, kind))
    }

    pub fn with_data(mut self, data: ExtractData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn overlaps(&self, other: &ExtractResult) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    pub fn covers(&self, other: &ExtractResult) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }

    pub fn number(&self) -> Option<f64> {
        match self.data {
            Some(ExtractData::Number(n)) => Some(n),
            _ => None,
        }
    }

    pub fn modifier(&self) -> Option<Modifier> {
        match self.data {
            Some(ExtractData::Mod(m)) => Some(m),
            _ => None,
        }
    }

    pub fn sub_entities(&self) -> &[ExtractResult] {
        match &self.data {
            Some(ExtractData::SubEntities(subs)) => subs,
            _ => &[],
        }
    }

    /// Re-base this result so its offsets are relative to `origin`.
    pub(crate) fn relative_to(mut self, origin: usize) -> Self {
        self.start -= origin;
        self
    }
}

/// Finds entities of one kind in text.
pub trait DateTimeExtractor {
    fn kind(&self) -> EntityKind;

    /// Extract entities relative to `reference`, the anchor for relative
    /// expressions. Returns non-overlapping results in source order.
    fn extract(&self, text: &str, reference: NaiveDateTime) -> Vec<ExtractResult>;

    /// [`extract`](Self::extract) anchored at the local system clock.
    fn extract_now(&self, text: &str) -> Vec<ExtractResult> {
        self.extract(text, Local::now().naive_local())
    }
}

/// Extraction flags, carried in the model cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct DateTimeOptions(u32);

impl DateTimeOptions {
    pub const NONE: Self = Self(0);
    /// Do not join two points into a range ("May 1 to May 7" stays two dates).
    pub const SKIP_FROM_TO_MERGE: Self = Self(1);
    pub const CALENDAR: Self = Self(4);

    const ALL: u32 = Self::SKIP_FROM_TO_MERGE.0 | Self::CALENDAR.0;

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for DateTimeOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl TryFrom<i64> for DateTimeOptions {
    type Error = RecognizerError;

    fn try_from(value: i64) -> Result<Self> {
        match u32::try_from(value) {
            Ok(bits) if bits & !Self::ALL == 0 => Ok(Self(bits)),
            _ => Err(RecognizerError::InvalidOptions(value)),
        }
    }
}

/// Attach the sub-results found inside `[start, end)` to a merged result.
pub(crate) fn with_sub_entities(
    mut merged: ExtractResult,
    parts: &[&ExtractResult],
) -> ExtractResult {
    let subs: Vec<ExtractResult> = parts
        .iter()
        .filter(|p| merged.covers(p))
        .map(|p| (*p).clone().relative_to(merged.start))
        .collect();
    if !subs.is_empty() {
        merged.data = Some(ExtractData::SubEntities(subs));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_tags() {
        assert_eq!(EntityKind::DatePeriod.as_str(), "daterange");
        assert_eq!(EntityKind::Ordinal.as_str(), "builtin.num.ordinal");
        let json = serde_json::to_string(&EntityKind::DateTimePeriod).unwrap();
        assert_eq!(json, "\"datetimerange\"");
    }

    #[test]
    fn test_overlap_and_cover() {
        let a = ExtractResult::new(0, "July 4th", EntityKind::Date);
        let b = ExtractResult::new(5, "4th", EntityKind::Date);
        let c = ExtractResult::new(8, " and", EntityKind::Date);
        assert!(a.overlaps(&b));
        assert!(a.covers(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_sub_entities_rebased() {
        let merged = ExtractResult::new(10, "May 1 to May 7", EntityKind::DatePeriod);
        let first = ExtractResult::new(10, "May 1", EntityKind::Date);
        let second = ExtractResult::new(19, "May 7", EntityKind::Date);
        let outside = ExtractResult::new(40, "today", EntityKind::Date);
        let merged = with_sub_entities(merged, &[&first, &second, &outside]);
        let subs = merged.sub_entities();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].start, 0);
        assert_eq!(subs[1].start, 9);
    }

    #[test]
    fn test_options_from_bits() {
        let both = DateTimeOptions::try_from(5).unwrap();
        assert_eq!(both, DateTimeOptions::SKIP_FROM_TO_MERGE | DateTimeOptions::CALENDAR);
        assert!(both.contains(DateTimeOptions::SKIP_FROM_TO_MERGE));
        assert!(!DateTimeOptions::NONE.contains(DateTimeOptions::CALENDAR));
        assert!(matches!(
            DateTimeOptions::try_from(2),
            Err(RecognizerError::InvalidOptions(2))
        ));
        assert!(DateTimeOptions::try_from(-1).is_err());
    }

    #[test]
    fn test_from_span_rejects_bad_range() {
        assert!(ExtractResult::from_span("abc", 1, 9, EntityKind::Time).is_none());
        let er = ExtractResult::from_span("at noon", 3, 7, EntityKind::Time).unwrap();
        assert_eq!(er.text, "noon");
    }
}
