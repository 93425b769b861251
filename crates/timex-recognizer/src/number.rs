//! Number capability consumed by the date-time extractors.
//!
//! The date-time pipeline only needs three things from numbers: where they
//! are, what kind they are (integer, decimal, ordinal) and their value. The
//! [`NumberExtractor`] / [`NumberParser`] traits are that seam; the English
//! implementation below covers digits, thousands separators, decimals and
//! spelled numbers up to 999, plus ordinals up to "thirty-first".

use std::collections::HashMap;

use regex::Regex;

use crate::culture::compile;
use crate::error::Result;
use crate::extract::{EntityKind, ExtractData, ExtractResult};

pub trait NumberExtractor: Send + Sync {
    /// Non-overlapping number spans with their value in [`ExtractData::Number`].
    fn extract(&self, text: &str) -> Vec<ExtractResult>;
}

pub trait NumberParser: Send + Sync {
    fn parse(&self, er: &ExtractResult) -> Option<f64>;
}

/// Which numbers an extractor reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberMode {
    /// Whole numbers only.
    Integer,
    /// Whole numbers and decimals.
    Cardinal,
    /// `1st`, `twenty-second`, ...
    Ordinal,
}

// ── English vocabulary ──────────────────────────────────────────────────────

const UNITS: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
];

const TENS: &[(&str, u32)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

const ORDINALS: &[(&str, u32)] = &[
    ("first", 1),
    ("second", 2),
    ("third", 3),
    ("fourth", 4),
    ("fifth", 5),
    ("sixth", 6),
    ("seventh", 7),
    ("eighth", 8),
    ("ninth", 9),
    ("tenth", 10),
    ("eleventh", 11),
    ("twelfth", 12),
    ("thirteenth", 13),
    ("fourteenth", 14),
    ("fifteenth", 15),
    ("sixteenth", 16),
    ("seventeenth", 17),
    ("eighteenth", 18),
    ("nineteenth", 19),
    ("twentieth", 20),
    ("thirtieth", 30),
];

const BELOW_TWENTY: &str = "nineteen|eighteen|seventeen|sixteen|fifteen|fourteen|thirteen|twelve|eleven|ten|nine|eight|seven|six|five|four|three|two|one|zero";
const TENS_WORDS: &str = "twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety";
const UNIT_WORDS: &str = "one|two|three|four|five|six|seven|eight|nine";
const ORDINAL_UNIT_WORDS: &str = "first|second|third|fourth|fifth|sixth|seventh|eighth|ninth";
const ORDINAL_SIMPLE_WORDS: &str = "thirtieth|twentieth|nineteenth|eighteenth|seventeenth|sixteenth|fifteenth|fourteenth|thirteenth|twelfth|eleventh|tenth|ninth|eighth|seventh|sixth|fifth|fourth|third|second|first";

/// Spelled whole numbers from zero to nine hundred ninety-nine.
pub(crate) fn spelled_integer_pattern() -> String {
    let below_hundred = format!("(?:(?:{TENS_WORDS})(?:[\\s-]+(?:{UNIT_WORDS}))?|{BELOW_TWENTY})");
    format!("(?:(?:{UNIT_WORDS}|a)\\s+hundred(?:\\s+(?:and\\s+)?{below_hundred})?|{below_hundred})")
}

/// Spelled ordinals from first to thirty-first.
pub(crate) fn spelled_ordinal_pattern() -> String {
    format!("(?:(?:twenty|thirty)[\\s-](?:{ORDINAL_UNIT_WORDS})|{ORDINAL_SIMPLE_WORDS})")
}

/// Value lookup for the spelled vocabulary, keyed by lowercase word.
#[derive(Debug)]
struct Vocabulary {
    cardinal: HashMap<&'static str, u32>,
    tens: HashMap<&'static str, u32>,
    ordinal: HashMap<&'static str, u32>,
}

impl Vocabulary {
    fn english() -> Self {
        Self {
            cardinal: UNITS.iter().copied().collect(),
            tens: TENS.iter().copied().collect(),
            ordinal: ORDINALS.iter().copied().collect(),
        }
    }

    /// Value of a spelled number or ordinal ("two hundred and five", "twenty-first").
    fn spelled_value(&self, text: &str) -> Option<f64> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|w| !w.is_empty() && *w != "and")
            .collect();
        if words.is_empty() {
            return None;
        }
        let mut current = 0u32;
        for word in words {
            if word == "hundred" {
                current = current.max(1) * 100;
            } else if word == "a" {
                current += 1;
            } else if let Some(v) = self
                .cardinal
                .get(word)
                .or_else(|| self.tens.get(word))
                .or_else(|| self.ordinal.get(word))
            {
                current += v;
            } else {
                return None;
            }
        }
        Some(current as f64)
    }
}

/// Value of a number as written: digits (with thousands separators or a
/// decimal part), a digit ordinal (`21st`), or spelled words.
fn value_of(vocabulary: &Vocabulary, text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let digits = trimmed
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .replace(',', "");
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return digits.parse().ok();
    }
    vocabulary.spelled_value(trimmed)
}

// ── Extractor ───────────────────────────────────────────────────────────────

/// English number extractor for one [`NumberMode`].
#[derive(Debug)]
pub struct EnglishNumberExtractor {
    mode: NumberMode,
    patterns: Vec<(Regex, EntityKind)>,
    vocabulary: Vocabulary,
}

impl EnglishNumberExtractor {
    pub fn new(mode: NumberMode) -> Result<Self> {
        let spelled = spelled_integer_pattern();
        let digits_integer = compile("number.integer", r"\b(?:\d{1,3}(?:,\d{3})+|\d+)\b")?;
        let words_integer = compile("number.integer_words", &format!(r"\b{spelled}\b"))?;
        let patterns = match mode {
            NumberMode::Integer => vec![
                (digits_integer, EntityKind::Integer),
                (words_integer, EntityKind::Integer),
            ],
            NumberMode::Cardinal => vec![
                (
                    compile("number.decimal", r"\b\d+\.\d+\b")?,
                    EntityKind::Double,
                ),
                (digits_integer, EntityKind::Integer),
                (words_integer, EntityKind::Integer),
            ],
            NumberMode::Ordinal => vec![
                (
                    compile("number.ordinal", r"\b\d+(?:st|nd|rd|th)\b")?,
                    EntityKind::Ordinal,
                ),
                (
                    compile(
                        "number.ordinal_words",
                        &format!(r"\b{}\b", spelled_ordinal_pattern()),
                    )?,
                    EntityKind::Ordinal,
                ),
            ],
        };
        Ok(Self {
            mode,
            patterns,
            vocabulary: Vocabulary::english(),
        })
    }

    pub fn mode(&self) -> NumberMode {
        self.mode
    }

    /// Whether the digits at `[start, end)` are glued to a decimal part, which
    /// makes them a fragment of a larger number rather than an integer.
    fn is_decimal_fragment(&self, text: &str, start: usize, end: usize) -> bool {
        if self.mode != NumberMode::Integer {
            return false;
        }
        let before = &text[..start];
        let after = &text[end..];
        let digit_after_dot = after
            .strip_prefix('.')
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()));
        let digit_before_dot = before
            .strip_suffix('.')
            .is_some_and(|rest| rest.ends_with(|c: char| c.is_ascii_digit()));
        digit_after_dot || digit_before_dot
    }
}

impl NumberExtractor for EnglishNumberExtractor {
    fn extract(&self, text: &str) -> Vec<ExtractResult> {
        let mut candidates: Vec<(usize, usize, EntityKind)> = self
            .patterns
            .iter()
            .flat_map(|(re, kind)| re.find_iter(text).map(move |m| (m.start(), m.end(), *kind)))
            .filter(|(s, e, _)| !self.is_decimal_fragment(text, *s, *e))
            .collect();
        // earliest first, longest first on a tie
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut results: Vec<ExtractResult> = Vec::new();
        for (start, end, kind) in candidates {
            if results.last().is_some_and(|last| start < last.end()) {
                continue;
            }
            let Some(er) = ExtractResult::from_span(text, start, end, kind) else {
                continue;
            };
            let Some(value) = value_of(&self.vocabulary, &er.text) else {
                continue;
            };
            results.push(er.with_data(ExtractData::Number(value)));
        }
        results
    }
}

/// Reads the value an extractor attached, or re-derives it from the text.
#[derive(Debug)]
pub struct EnglishNumberParser {
    vocabulary: Vocabulary,
}

impl EnglishNumberParser {
    pub fn new() -> Self {
        Self {
            vocabulary: Vocabulary::english(),
        }
    }
}

impl Default for EnglishNumberParser {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberParser for EnglishNumberParser {
    fn parse(&self, er: &ExtractResult) -> Option<f64> {
        er.number().or_else(|| value_of(&self.vocabulary, &er.text))
    }
}
