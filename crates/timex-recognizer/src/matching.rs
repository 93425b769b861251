//! Structured regex matches with named-group access.
//!
//! A missing or empty capture group reads as `None`, never a panic, so parsers
//! can read optional groups (`year`, `desc`, `relmonth`, ...) freely.

use regex::{Captures, Regex};

/// One captured group: its text and byte offsets within the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group<'t> {
    pub text: &'t str,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug)]
pub struct RegexMatch<'t> {
    whole: regex::Match<'t>,
    caps: Captures<'t>,
}

impl<'t> RegexMatch<'t> {
    fn whole(&self) -> regex::Match<'t> {
        self.whole
    }

    pub fn start(&self) -> usize {
        self.whole().start()
    }

    pub fn end(&self) -> usize {
        self.whole().end()
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_str(&self) -> &'t str {
        self.whole().as_str()
    }

    /// The named group, if it participated and matched non-empty text.
    pub fn group(&self, name: &str) -> Option<Group<'t>> {
        self.caps
            .name(name)
            .filter(|m| !m.as_str().is_empty())
            .map(|m| Group {
                text: m.as_str(),
                start: m.start(),
                end: m.end(),
            })
    }

    /// Text of the named group, or `""` when absent.
    pub fn text(&self, name: &str) -> &'t str {
        self.group(name).map(|g| g.text).unwrap_or("")
    }

    pub fn has(&self, name: &str) -> bool {
        self.group(name).is_some()
    }

    /// The `token` group's span when the pattern has one, else the whole match.
    pub fn token_span(&self) -> (usize, usize) {
        self.group("token")
            .map_or((self.start(), self.end()), |g| (g.start, g.end))
    }

    /// The first of `names` that matched.
    pub fn first_of(&self, names: &[&str]) -> Option<Group<'t>> {
        names.iter().find_map(|n| self.group(n))
    }
}

/// All non-overlapping matches of `re` in `text`.
pub fn matches<'t>(re: &Regex, text: &'t str) -> Vec<RegexMatch<'t>> {
    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0).filter(|m| !m.as_str().is_empty())?;
            Some(RegexMatch { whole, caps })
        })
        .collect()
}

pub fn first_match<'t>(re: &Regex, text: &'t str) -> Option<RegexMatch<'t>> {
    matches(re, text).into_iter().next()
}

/// A match spanning the whole of `text`, ignoring surrounding whitespace.
pub fn exact_match<'t>(re: &Regex, text: &'t str) -> Option<RegexMatch<'t>> {
    matches(re, text)
        .into_iter()
        .find(|m| is_blank(&text[..m.start()]) && is_blank(&text[m.end()..]))
}

/// A match that ends where `text` ends, ignoring trailing whitespace.
pub fn match_end<'t>(re: &Regex, text: &'t str) -> Option<RegexMatch<'t>> {
    matches(re, text)
        .into_iter()
        .find(|m| is_blank(&text[m.end()..]))
}

/// A match that starts where `text` starts, ignoring leading whitespace.
pub fn match_begin<'t>(re: &Regex, text: &'t str) -> Option<RegexMatch<'t>> {
    matches(re, text)
        .into_iter()
        .find(|m| is_blank(&text[..m.start()]))
}

pub fn is_exact_match(re: &Regex, text: &str) -> bool {
    exact_match(re, text).is_some()
}

/// A match whose token span (see [`RegexMatch::token_span`]) covers
/// `text[from..]` exactly, ignoring surrounding whitespace.
pub fn token_match<'t>(re: &Regex, text: &'t str, from: usize) -> Option<RegexMatch<'t>> {
    matches(re, text).into_iter().find(|m| {
        let (start, end) = m.token_span();
        start >= from && is_blank(&text[from..start]) && is_blank(&text[end..])
    })
}

/// Run `f` on the token match of `text`, retrying with `prefix` prepended so
/// patterns anchored on a cue word ("on", "at") apply to the bare fragment.
pub fn with_token_match<R>(
    re: &Regex,
    text: &str,
    prefix: &str,
    f: impl FnOnce(&RegexMatch<'_>) -> Option<R>,
) -> Option<R> {
    if let Some(m) = token_match(re, text, 0) {
        return f(&m);
    }
    let prefixed = format!("{prefix}{text}");
    let m = token_match(re, &prefixed, prefix.len())?;
    f(&m)
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Whether a number ending right before `after` is glued to more digits: a
/// clock time, a decimal, a percentage or a numeric date (`5:30`, `5.5`,
/// `5%`, `5/7`).
pub fn is_glued_to_number(after: &str) -> bool {
    let mut chars = after.chars();
    match chars.next() {
        Some('%') | Some(':') => true,
        Some('.') | Some('/') | Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Whether the text right before a number makes it part of something else:
/// a decimal, a clock time or a currency amount (`3.`, `10:`, `$`).
pub fn is_invalid_day_number_prefix(prefix: &str) -> bool {
    let trimmed = prefix.trim_end();
    match trimmed.chars().last() {
        Some('$') | Some('€') | Some('£') | Some('¥') => true,
        Some(':') | Some('.') => trimmed
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(p: &str) -> Regex {
        Regex::new(&format!("(?i){p}")).unwrap()
    }

    #[test]
    fn test_missing_group_is_none() {
        let r = re(r"(?P<month>may)(?:\s+(?P<year>\d{4}))?");
        let m = first_match(&r, "in May").unwrap();
        assert_eq!(m.text("month"), "May");
        assert!(m.group("year").is_none());
        assert!(m.group("not_a_group").is_none());
        assert_eq!(m.text("year"), "");
    }

    #[test]
    fn test_group_offsets() {
        let r = re(r"(?P<day>\d+)th");
        let m = first_match(&r, "the 27th").unwrap();
        let g = m.group("day").unwrap();
        assert_eq!((g.start, g.end), (4, 6));
    }

    #[test]
    fn test_exact_match_ignores_padding() {
        let r = re(r"today|tomorrow");
        assert!(is_exact_match(&r, "  today "));
        assert!(!is_exact_match(&r, "today ok"));
    }

    #[test]
    fn test_match_end_and_begin() {
        let r = re(r"\bnext\b");
        assert!(match_end(&r, "see you next ").is_some());
        assert!(match_end(&r, "next time").is_none());
        assert!(match_begin(&r, " next time").is_some());
        let anchored = re(r"\bin\s*$");
        assert!(match_end(&anchored, "due in  ").is_some());
    }

    #[test]
    fn test_token_match_with_prefix() {
        let r = re(r"\bon\s+(?P<token>\d+(?:st|nd|rd|th))\b");
        assert!(token_match(&r, "5th", 0).is_none());
        let day = with_token_match(&r, "5th", "on ", |m| Some(m.text("token").to_string()));
        assert_eq!(day.as_deref(), Some("5th"));
        assert!(with_token_match(&r, "5th May", "on ", |_| Some(())).is_none());
    }

    #[test]
    fn test_glued_to_number() {
        assert!(is_glued_to_number(":30"));
        assert!(is_glued_to_number(".5 kg"));
        assert!(is_glued_to_number("%"));
        assert!(!is_glued_to_number(". Then"));
        assert!(!is_glued_to_number(" days"));
    }

    #[test]
    fn test_invalid_day_number_prefix() {
        assert!(is_invalid_day_number_prefix("costs $"));
        assert!(is_invalid_day_number_prefix("at 10:"));
        assert!(is_invalid_day_number_prefix("pi is 3."));
        assert!(!is_invalid_day_number_prefix("on the "));
        assert!(!is_invalid_day_number_prefix("end."));
    }
}
