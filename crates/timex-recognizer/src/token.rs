//! Span merging shared by every extractor.
//!
//! Extractors collect candidate [`Token`]s from many regex families and
//! subroutines, then call [`merge_all_tokens`] once to turn them into
//! non-overlapping [`ExtractResult`]s.

use crate::extract::{EntityKind, ExtractResult};

/// A half-open byte span `[start, end)` over the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token {
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Merge possibly-overlapping tokens into extraction results of one kind.
///
/// Overlapping tokens collapse into their interval union. Each merged span is
/// trimmed of surrounding whitespace; spans that trim to nothing are dropped.
/// Tokens that fall outside `source` or split a UTF-8 character are ignored.
pub fn merge_all_tokens(tokens: Vec<Token>, source: &str, kind: EntityKind) -> Vec<ExtractResult> {
    let mut tokens: Vec<Token> = tokens
        .into_iter()
        .filter(|t| t.start < t.end && t.end <= source.len())
        .collect();
    tokens.sort();

    let mut spans: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match spans.last_mut() {
            Some(last) if token.start < last.end => last.end = last.end.max(token.end),
            _ => spans.push(token),
        }
    }

    spans
        .into_iter()
        .filter_map(|span| trim_span(source, span))
        .map(|span| ExtractResult::new(span.start, &source[span.start..span.end], kind))
        .collect()
}

/// Shrink a span so it starts and ends on non-whitespace.
fn trim_span(source: &str, span: Token) -> Option<Token> {
    let slice = source.get(span.start..span.end)?;
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return None;
    }
    let leading = slice.len() - slice.trim_start().len();
    let start = span.start + leading;
    Some(Token::new(start, start + trimmed.len()))
}
