//! # timex-recognizer
//!
//! Deterministic recognition of dates, times, durations and periods in
//! natural-language text.
//!
//! Every entity family is an extractor/parser pair. The extractor finds spans
//! with culture-specific regex families and merges overlapping candidates; the
//! parser turns each span into a TIMEX string plus concrete future and past
//! values resolved against a reference datetime. When the text leaves the year
//! (or week, or day) open, both readings are kept.
//!
//! ## Modules
//!
//! - [`date`] - "May 5th", "next Friday", "3 days ago"
//! - [`time`] - "5pm", "half past seven", "noon"
//! - [`duration`] - "3 hours", "a couple of weeks", "all day"
//! - [`date_period`] - "Q1 2023", "next week", "May 1 to May 7"
//! - [`time_period`] - "3pm-5pm", "this morning"
//! - [`datetime`] - "tomorrow at 5pm", "in 2 hours"
//! - [`datetime_period`] - "Friday 3pm to 5pm", "tonight", "the past 3 hours"
//! - [`model`] - all of the above merged, plus a shared model cache
//! - [`culture`] - per-culture regexes, tables and behavioral hooks
//! - [`timex`] - TIMEX formatting and re-parsing
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use timex_recognizer::{culture, DateTimeModel, DateTimeOptions};
//!
//! let model = DateTimeModel::new(culture::for_name("en-us").unwrap(), DateTimeOptions::NONE);
//! let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
//!
//! let results = model.parse("revenue for Q1 2023 was flat", reference);
//! assert_eq!(results[0].text, "Q1 2023");
//! assert_eq!(results[0].resolution[0]["timex"], "(2023-01-01,2023-04-01,P3M)");
//! ```

pub mod agolater;
pub mod culture;
pub mod date;
pub mod date_period;
pub mod date_util;
pub mod datetime;
pub mod datetime_period;
pub mod duration;
pub mod error;
pub mod extract;
pub mod matching;
pub mod model;
pub mod number;
mod period;
pub mod resolution;
pub mod time;
pub mod time_period;
pub mod timex;
pub mod token;

pub use culture::{Culture, CultureConfig, English, DEFAULT_CULTURE};
pub use date::{DateExtractor, DateParser};
pub use date_period::{DatePeriodExtractor, DatePeriodParser};
pub use datetime::{DateTimePointExtractor, DateTimePointParser};
pub use datetime_period::{DateTimePeriodExtractor, DateTimePeriodParser};
pub use duration::{DurationExtractor, DurationParser};
pub use error::{RecognizerError, Result};
pub use extract::{DateTimeExtractor, DateTimeOptions, EntityKind, ExtractData, ExtractResult, Modifier};
pub use model::{parse_reference, DateTimeModel, ModelCache, ModelResult, ModelType, ResolutionEntry};
pub use number::{NumberExtractor, NumberMode, NumberParser};
pub use resolution::{DateTimeParseResult, DateTimeParser, DateTimeResolutionResult, DateTimeValue};
pub use time::{TimeExtractor, TimeParser};
pub use time_period::{TimePeriodExtractor, TimePeriodParser};
pub use token::Token;
