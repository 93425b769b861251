//! The merged date-time model and its cache.
//!
//! [`DateTimeModel`] runs every extractor over the text, keeps the longest
//! non-overlapping spans, parses each one with its own parser and flattens the
//! resolution into string maps. [`ModelCache`] shares built models by
//! `(culture, model type, options)`; building a culture compiles all of its
//! regexes, so a model should be built once and reused.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use timex_recognizer::{DateTimeOptions, ModelCache};
//!
//! let cache = ModelCache::new();
//! let model = cache.get_or_create("en-us", DateTimeOptions::NONE).unwrap();
//! let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
//!
//! let results = model.parse("see you tomorrow at 5pm", reference);
//! assert_eq!(results[0].type_name, "datetimeV2.datetime");
//! assert_eq!(results[0].resolution[0]["value"], "2024-06-16 17:00:00");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::culture::{self, Culture, DEFAULT_CULTURE};
use crate::date::{DateExtractor, DateParser};
use crate::date_period::{DatePeriodExtractor, DatePeriodParser};
use crate::date_util::at_midnight;
use crate::datetime::{DateTimePointExtractor, DateTimePointParser};
use crate::datetime_period::{DateTimePeriodExtractor, DateTimePeriodParser};
use crate::duration::{DurationExtractor, DurationParser};
use crate::error::{RecognizerError, Result};
use crate::extract::{DateTimeExtractor, DateTimeOptions, EntityKind, ExtractResult, Modifier};
use crate::resolution::{
    DateTimeParseResult, DateTimeParser, END_DATE, END_DATE_TIME, END_TIME, START_DATE,
    START_DATE_TIME, START_TIME,
};
use crate::time::{TimeExtractor, TimeParser};
use crate::time_period::{TimePeriodExtractor, TimePeriodParser};
use crate::timex::ALTERNATIVE_DELIMITER;

/// Prefix of every [`ModelResult::type_name`].
pub const TYPE_NAME_PREFIX: &str = "datetimeV2";

/// One flattened resolution: `timex`, `type`, then `value` or `start`/`end`,
/// and `Mod` when the span carries a modifier.
pub type ResolutionEntry = BTreeMap<String, String>;

// ── Results ─────────────────────────────────────────────────────────────────

/// A recognized span with its resolutions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelResult {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    pub text: String,
    /// `datetimeV2.<kind>`, e.g. `datetimeV2.daterange`.
    #[serde(rename = "typeName")]
    pub type_name: String,
    /// Past resolution first, then future when it differs.
    pub resolution: Vec<ResolutionEntry>,
}

impl ModelResult {
    /// Flatten a resolved parse. Unresolved parses have nothing to report.
    pub fn from_parse(pr: &DateTimeParseResult) -> Option<Self> {
        let value = pr.value.as_ref().filter(|v| v.success)?;

        // A double timex holds the future alternative first.
        let mut alternatives = value.timex.split(ALTERNATIVE_DELIMITER);
        let future_timex = alternatives.next().unwrap_or_default();
        let past_timex = alternatives.next().unwrap_or(future_timex);

        let past = resolution_entry(pr.kind, past_timex, &value.past_resolution, value.modifier);
        let future =
            resolution_entry(pr.kind, future_timex, &value.future_resolution, value.modifier);
        let mut resolution = vec![past];
        if !resolution.contains(&future) {
            resolution.push(future);
        }

        Some(Self {
            start: pr.start,
            end: pr.end(),
            text: pr.text.clone(),
            type_name: format!("{TYPE_NAME_PREFIX}.{}", pr.kind.as_str()),
            resolution,
        })
    }
}

fn resolution_entry(
    kind: EntityKind,
    timex: &str,
    values: &BTreeMap<String, String>,
    modifier: Option<Modifier>,
) -> ResolutionEntry {
    let mut entry = ResolutionEntry::new();
    entry.insert("timex".to_string(), timex.to_string());
    entry.insert("type".to_string(), kind.as_str().to_string());
    for (key, value) in values {
        let key = match key.as_str() {
            START_DATE | START_TIME | START_DATE_TIME => "start",
            END_DATE | END_TIME | END_DATE_TIME => "end",
            _ => "value",
        };
        entry.insert(key.to_string(), value.clone());
    }
    if let Some(modifier) = modifier {
        entry.insert("Mod".to_string(), modifier.as_str().to_string());
    }
    entry
}

// ── Model ───────────────────────────────────────────────────────────────────

type Stage = (
    Box<dyn DateTimeExtractor + Send + Sync>,
    Box<dyn DateTimeParser + Send + Sync>,
);

fn stage(
    extractor: impl DateTimeExtractor + Send + Sync + 'static,
    parser: impl DateTimeParser + Send + Sync + 'static,
) -> Stage {
    (Box::new(extractor), Box::new(parser))
}

/// All seven extractor/parser pairs of one culture behind a single call.
pub struct DateTimeModel {
    culture: String,
    options: DateTimeOptions,
    stages: Vec<Stage>,
}

impl DateTimeModel {
    pub fn new(culture: Arc<dyn Culture>, options: DateTimeOptions) -> Self {
        let c = || Arc::clone(&culture);
        // Earlier stages win ties between equal spans.
        let stages = vec![
            stage(DateExtractor::new(c()), DateParser::new(c())),
            stage(TimeExtractor::new(c()), TimeParser::new(c())),
            stage(DatePeriodExtractor::with_options(c(), options), DatePeriodParser::new(c())),
            stage(TimePeriodExtractor::new(c()), TimePeriodParser::new(c())),
            stage(DurationExtractor::new(c()), DurationParser::new(c())),
            stage(DateTimePointExtractor::new(c()), DateTimePointParser::new(c())),
            stage(
                DateTimePeriodExtractor::with_options(c(), options),
                DateTimePeriodParser::new(c()),
            ),
        ];
        Self {
            culture: culture.name().to_lowercase(),
            options,
            stages,
        }
    }

    pub fn culture(&self) -> &str {
        &self.culture
    }

    pub fn options(&self) -> DateTimeOptions {
        self.options
    }

    /// Recognize every temporal entity in `text`, in source order.
    pub fn parse(&self, text: &str, reference: NaiveDateTime) -> Vec<ModelResult> {
        let resolved: Vec<DateTimeParseResult> = self
            .stages
            .iter()
            .flat_map(|(extractor, parser)| {
                extractor
                    .extract(text, reference)
                    .into_iter()
                    .map(|er| parser.parse(&er, reference))
                    .filter(|pr| {
                        let ok = pr.is_resolved();
                        if !ok {
                            debug!(text = %pr.text, kind = pr.kind.as_str(), "unresolved span dropped");
                        }
                        ok
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        keep_longest(resolved, |pr| (pr.start, pr.end()))
            .iter()
            .filter_map(ModelResult::from_parse)
            .collect()
    }

    /// [`parse`](Self::parse) anchored at the local system clock.
    pub fn parse_now(&self, text: &str) -> Vec<ModelResult> {
        self.parse(text, Local::now().naive_local())
    }

    /// The merged extraction, without parsing.
    pub fn extract(&self, text: &str, reference: NaiveDateTime) -> Vec<ExtractResult> {
        let all: Vec<ExtractResult> = self
            .stages
            .iter()
            .flat_map(|(extractor, _)| extractor.extract(text, reference))
            .collect();
        keep_longest(all, |er| (er.start, er.end()))
    }
}

impl std::fmt::Debug for DateTimeModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateTimeModel")
            .field("culture", &self.culture)
            .field("options", &self.options)
            .field("stages", &self.stages.len())
            .finish()
    }
}

/// Greedy overlap removal: longer spans first, earlier spans on a tie, stage
/// order after that. The survivors come back in source order.
fn keep_longest<T>(mut items: Vec<T>, span: impl Fn(&T) -> (usize, usize)) -> Vec<T> {
    items.sort_by_key(|item| {
        let (start, end) = span(item);
        (std::cmp::Reverse(end - start), start)
    });
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let (start, end) = span(&item);
        let clashes = kept.iter().any(|k| {
            let (ks, ke) = span(k);
            start < ke && ks < end
        });
        if !clashes {
            kept.push(item);
        }
    }
    kept.sort_by_key(|item| span(item).0);
    kept
}

// ── Cache ───────────────────────────────────────────────────────────────────

/// Model families the cache can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ModelType {
    DateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ModelKey {
    culture: String,
    model: ModelType,
    options: DateTimeOptions,
}

impl ModelKey {
    fn new(culture: &str, options: DateTimeOptions) -> Self {
        Self {
            culture: culture.to_lowercase(),
            model: ModelType::DateTime,
            options,
        }
    }
}

impl std::fmt::Display for ModelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{:?}/{}", self.culture, self.model, self.options.bits())
    }
}

/// Shared models keyed by culture, model type and options.
///
/// Lookups take a lock for the whole get-or-build, so concurrent callers
/// asking for the same key always receive the same `Arc`.
#[derive(Debug, Default)]
pub struct ModelCache {
    models: Mutex<HashMap<ModelKey, Arc<DateTimeModel>>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached model for `culture`, building it on first use.
    ///
    /// # Errors
    ///
    /// [`RecognizerError::UnsupportedCulture`] for an unknown culture name,
    /// or [`RecognizerError::InvalidPattern`] if the culture fails to build.
    pub fn get_or_create(&self, culture: &str, options: DateTimeOptions) -> Result<Arc<DateTimeModel>> {
        let key = ModelKey::new(culture, options);
        let mut models = self.models.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = models.get(&key) {
            return Ok(Arc::clone(model));
        }
        debug!(key = %key, "building model");
        let model = Arc::new(DateTimeModel::new(culture::for_name(culture)?, options));
        models.insert(key, Arc::clone(&model));
        Ok(model)
    }

    /// Like [`get_or_create`](Self::get_or_create), but an unknown culture
    /// falls back to `en-us` when `fallback` is set.
    pub fn get(
        &self,
        culture: &str,
        options: DateTimeOptions,
        fallback: bool,
    ) -> Result<Arc<DateTimeModel>> {
        match self.get_or_create(culture, options) {
            Err(RecognizerError::UnsupportedCulture(name)) if fallback => {
                debug!(culture = %name, fallback = DEFAULT_CULTURE, "culture not supported");
                self.get_or_create(DEFAULT_CULTURE, options)
            }
            other => other,
        }
    }

    /// Add a prebuilt model under its own culture and options.
    ///
    /// # Errors
    ///
    /// [`RecognizerError::DuplicateModel`] if the key is already taken.
    pub fn register(&self, model: DateTimeModel) -> Result<Arc<DateTimeModel>> {
        let key = ModelKey::new(model.culture(), model.options());
        let mut models = self.models.lock().unwrap_or_else(PoisonError::into_inner);
        if models.contains_key(&key) {
            return Err(RecognizerError::DuplicateModel(key.to_string()));
        }
        let model = Arc::new(model);
        models.insert(key, Arc::clone(&model));
        Ok(model)
    }

    pub fn clear(&self) {
        self.models.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn len(&self) -> usize {
        self.models.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a reference datetime: `2024-06-15T09:00:00`, `2024-06-15 09:00`,
/// or a bare date meaning midnight.
///
/// # Errors
///
/// [`RecognizerError::InvalidReference`] when no format fits.
pub fn parse_reference(text: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    let text = text.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().map(at_midnight))
        .ok_or_else(|| RecognizerError::InvalidReference(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    fn model() -> Arc<DateTimeModel> {
        static MODEL: OnceLock<Arc<DateTimeModel>> = OnceLock::new();
        MODEL
            .get_or_init(|| {
                let culture = culture::for_name(DEFAULT_CULTURE).unwrap();
                Arc::new(DateTimeModel::new(culture, DateTimeOptions::NONE))
            })
            .clone()
    }

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn parse(text: &str) -> Vec<ModelResult> {
        model().parse(text, reference())
    }

    #[test]
    fn test_datetime_in_sentence() {
        let results = parse("I'll be back tomorrow at 5pm");
        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.text, "tomorrow at 5pm");
        assert_eq!((r.start, r.end), (13, 28));
        assert_eq!(r.type_name, "datetimeV2.datetime");
        assert_eq!(r.resolution.len(), 1);
        assert_eq!(r.resolution[0]["timex"], "2024-06-16T17");
        assert_eq!(r.resolution[0]["type"], "datetime");
        assert_eq!(r.resolution[0]["value"], "2024-06-16 17:00:00");
    }

    #[test]
    fn test_ambiguous_weekday_has_past_and_future() {
        let results = parse("Monday");
        assert_eq!(results.len(), 1);
        let values: Vec<&str> = results[0].resolution.iter().map(|e| e["value"].as_str()).collect();
        assert_eq!(values, vec!["2024-06-10", "2024-06-17"]);
        assert!(results[0].resolution.iter().all(|e| e["timex"] == "XXXX-WXX-1"));
    }

    #[test]
    fn test_same_past_and_future_collapse() {
        let results = parse("3 days ago");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].type_name, "datetimeV2.date");
        assert_eq!(results[0].resolution.len(), 1);
        assert_eq!(results[0].resolution[0]["value"], "2024-06-12");
    }

    #[test]
    fn test_range_entries_use_start_and_end() {
        let results = parse("revenue for Q1 2023 was flat");
        assert_eq!(results.len(), 1);
        let entry = &results[0].resolution[0];
        assert_eq!(results[0].type_name, "datetimeV2.daterange");
        assert_eq!(entry["start"], "2023-01-01");
        assert_eq!(entry["end"], "2023-04-01");
        assert_eq!(entry["timex"], "(2023-01-01,2023-04-01,P3M)");
        assert!(!entry.contains_key("value"));
    }

    #[test]
    fn test_modifier_is_reported() {
        let results = parse("early next month");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].resolution[0]["Mod"], "start");
    }

    #[test]
    fn test_longer_span_wins() {
        let results = parse("see you next week");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "next week");
        assert_eq!(results[0].type_name, "datetimeV2.daterange");

        let results = parse("from May 1 to May 7");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "from May 1 to May 7");
    }

    #[test]
    fn test_results_in_source_order() {
        let results = parse("Q1 2023 lasted 3 months, not 2 weeks");
        let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Q1 2023", "3 months", "2 weeks"]);
        assert_eq!(results[2].type_name, "datetimeV2.duration");
        assert_eq!(results[2].resolution[0]["timex"], "P2W");
        assert_eq!(results[2].resolution[0]["value"], "1209600");
    }

    #[test]
    fn test_double_timex_splits() {
        let results = parse("from Feb 28 to March 1");
        assert_eq!(results.len(), 1);
        let entries = &results[0].resolution;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["timex"], "(XXXX-02-28,XXXX-03-01,P2D)");
        assert_eq!(entries[0]["start"], "2024-02-28");
        assert_eq!(entries[1]["timex"], "(XXXX-02-28,XXXX-03-01,P1D)");
        assert_eq!(entries[1]["start"], "2025-02-28");
        assert!(entries.iter().all(|e| !e["timex"].contains(ALTERNATIVE_DELIMITER)));
    }

    #[test]
    fn test_nothing_temporal() {
        assert!(parse("").is_empty());
        assert!(parse("the quick brown fox").is_empty());
    }

    #[test]
    fn test_skip_merge_option() {
        let culture = culture::for_name("en-us").unwrap();
        let model = DateTimeModel::new(culture, DateTimeOptions::SKIP_FROM_TO_MERGE);
        let texts: Vec<String> = model
            .parse("May 1 to May 7", reference())
            .into_iter()
            .map(|r| r.text)
            .collect();
        assert_eq!(texts, vec!["May 1", "May 7"]);
    }

    #[test]
    fn test_merged_extract_matches_parse() {
        let text = "lunch tomorrow and a call in 2 hours";
        let extracted: Vec<String> =
            model().extract(text, reference()).into_iter().map(|er| er.text).collect();
        let parsed: Vec<String> = parse(text).into_iter().map(|r| r.text).collect();
        assert_eq!(extracted, parsed);
    }

    #[test]
    fn test_keep_longest_tie_goes_to_earlier_span() {
        let spans = vec![(4, 9), (0, 5), (10, 12), (0, 3)];
        let kept = keep_longest(spans, |s| *s);
        assert_eq!(kept, vec![(0, 5), (10, 12)]);
    }

    #[test]
    fn test_serializes_type_name() {
        let json = serde_json::to_value(&parse("tomorrow")[0]).unwrap();
        assert_eq!(json["typeName"], "datetimeV2.date");
        assert_eq!(json["resolution"][0]["value"], "2024-06-16");
    }

    // ── Cache ───────────────────────────────────────────────────────────────

    #[test]
    fn test_cache_returns_same_instance() {
        let cache = ModelCache::new();
        let a = cache.get_or_create("en-us", DateTimeOptions::NONE).unwrap();
        let b = cache.get_or_create("EN-US", DateTimeOptions::NONE).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        let c = cache.get_or_create("en-us", DateTimeOptions::SKIP_FROM_TO_MERGE).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_unknown_culture() {
        let cache = ModelCache::new();
        let err = cache.get_or_create("fr-fr", DateTimeOptions::NONE).unwrap_err();
        assert!(matches!(err, RecognizerError::UnsupportedCulture(name) if name == "fr-fr"));
        assert!(cache.get("fr-fr", DateTimeOptions::NONE, false).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_fallback_to_default() {
        let cache = ModelCache::new();
        let model = cache.get("fr-fr", DateTimeOptions::NONE, true).unwrap();
        assert_eq!(model.culture(), DEFAULT_CULTURE);
        let again = cache.get_or_create(DEFAULT_CULTURE, DateTimeOptions::NONE).unwrap();
        assert!(Arc::ptr_eq(&model, &again));
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let cache = ModelCache::new();
        let culture = culture::for_name("en-us").unwrap();
        cache
            .register(DateTimeModel::new(Arc::clone(&culture), DateTimeOptions::NONE))
            .unwrap();
        let err = cache
            .register(DateTimeModel::new(Arc::clone(&culture), DateTimeOptions::NONE))
            .unwrap_err();
        assert!(matches!(err, RecognizerError::DuplicateModel(_)));
        cache
            .register(DateTimeModel::new(culture, DateTimeOptions::CALENDAR))
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_clear_empties_cache() {
        let cache = ModelCache::new();
        cache.get_or_create("en-us", DateTimeOptions::NONE).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_shared_across_threads() {
        let cache = Arc::new(ModelCache::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get_or_create("en-us", DateTimeOptions::NONE).unwrap())
            })
            .collect();
        let models: Vec<Arc<DateTimeModel>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(models.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(cache.len(), 1);
    }

    // ── Reference parsing ───────────────────────────────────────────────────

    #[test]
    fn test_parse_reference_formats() {
        assert_eq!(parse_reference("2024-06-15T09:00:00").unwrap(), reference());
        assert_eq!(parse_reference("2024-06-15 09:00").unwrap(), reference());
        assert_eq!(
            parse_reference(" 2024-06-15 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_reference_rejects_garbage() {
        let err = parse_reference("next tuesday").unwrap_err();
        assert!(matches!(err, RecognizerError::InvalidReference(_)));
        assert!(parse_reference("2024-02-30").is_err());
    }
}
