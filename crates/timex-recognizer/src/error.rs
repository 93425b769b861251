//! Error types for timex-recognizer operations.
//!
//! Only configuration problems surface as errors. Input text never fails:
//! extractors return an empty list and parsers return an empty resolution.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecognizerError {
    #[error("Invalid pattern `{name}`: {source}")]
    InvalidPattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Unsupported culture: {0}")]
    UnsupportedCulture(String),

    #[error("Model already registered: {0}")]
    DuplicateModel(String),

    #[error("Invalid reference datetime: {0}")]
    InvalidReference(String),

    #[error("Invalid options value: {0}")]
    InvalidOptions(i64),
}

pub type Result<T> = std::result::Result<T, RecognizerError>;
