//! TIMEX formatting and the companion date re-parser.
//!
//! Grammar produced here:
//!
//! - dates: `2024-07-04`, `XXXX-07-04`, `XXXX-XX-04`, `XXXX-WXX-5`
//! - times: `T17`, `T17:30`, `T17:30:15`
//! - durations: `P3D`, `P0.5Y`, `PT2H`
//! - ranges: `(2024-07-01,2024-08-01,P1M)`
//! - weeks and named periods: `2024-W27`, `2024-W27-WE`, `XXXX-07-W02`, `2024-SU`
//! - anchors: `PRESENT_REF`, `FUTURE_REF`, `PAST_REF`
//!
//! `X` marks an unspecified field. Alternatives that differ between the future
//! and past resolutions are joined with `|`.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

/// Placeholder for an unspecified year.
pub const FUZZY_YEAR: &str = "XXXX";

/// Delimiter between alternative timexes.
pub const ALTERNATIVE_DELIMITER: char = '|';

/// "now", "at the moment".
pub const PRESENT_REF: &str = "PRESENT_REF";
/// "as soon as possible".
pub const FUTURE_REF: &str = "FUTURE_REF";
/// "recently", "previously".
pub const PAST_REF: &str = "PAST_REF";

/// A date timex with optional year and month (`XXXX-07-04`, `XXXX-XX-04`).
pub fn luis_date(year: Option<i32>, month: Option<u32>, day: u32) -> String {
    let year = year.map_or_else(|| FUZZY_YEAR.to_string(), |y| format!("{y:04}"));
    let month = month.map_or_else(|| "XX".to_string(), |m| format!("{m:02}"));
    format!("{year}-{month}-{day:02}")
}

pub fn luis_date_from(date: NaiveDate) -> String {
    luis_date(Some(date.year()), Some(date.month()), date.day())
}

/// `HH:MM:SS` without the leading `T`.
pub fn luis_time(hour: u32, minute: u32, second: u32) -> String {
    format!("{hour:02}:{minute:02}:{second:02}")
}

pub fn luis_date_time(value: NaiveDateTime) -> String {
    format!(
        "{}T{}",
        luis_date_from(value.date()),
        luis_time(value.hour(), value.minute(), value.second())
    )
}

/// Clock timex at the precision that was spoken: `T05`, `T05:30`, `T05:30:20`.
pub fn time_timex(hour: u32, minute: Option<u32>, second: Option<u32>) -> String {
    match (minute, second) {
        (_, Some(s)) => format!("T{hour:02}:{:02}:{s:02}", minute.unwrap_or(0)),
        (Some(m), None) => format!("T{hour:02}:{m:02}"),
        (None, None) => format!("T{hour:02}"),
    }
}

/// Weekday timex with Monday = 1 through Sunday = 7.
pub fn weekday_timex(weekday: Weekday) -> String {
    format!("{FUZZY_YEAR}-WXX-{}", weekday.number_from_monday())
}

pub fn week_timex(year: i32, week: u32) -> String {
    format!("{year:04}-W{week:02}")
}

pub fn month_timex(year: Option<i32>, month: u32) -> String {
    match year {
        Some(y) => format!("{y:04}-{month:02}"),
        None => format!("{FUZZY_YEAR}-{month:02}"),
    }
}

pub fn year_timex(year: i32) -> String {
    format!("{year:04}")
}

/// Duration timex. `unit` is one of `Y`, `MON`, `W`, `D`, `H`, `M`, `S`; the
/// first character of the unit becomes the suffix and sub-day units get `T`.
pub fn duration_timex(amount: f64, unit: &str) -> String {
    let sub_day = matches!(unit, "H" | "M" | "S");
    let suffix = unit.chars().next().unwrap_or('D');
    format!(
        "P{}{}{}",
        if sub_day { "T" } else { "" },
        format_number(amount),
        suffix
    )
}

/// `(begin,end,duration)` for an explicit interval.
pub fn range_timex(begin: &str, end: &str, duration: &str) -> String {
    format!("({begin},{end},{duration})")
}

/// Day-granular range timex: `(t1,t2,P{days}D)`, where the day count comes
/// from the resolved boundary dates.
pub fn date_period_timex(begin: NaiveDate, end: NaiveDate, begin_timex: &str, end_timex: &str) -> String {
    let days = if begin_timex.is_empty() || end_timex.is_empty() {
        "XX".to_string()
    } else {
        (end - begin).num_days().to_string()
    };
    range_timex(begin_timex, end_timex, &format!("P{days}D"))
}

/// Duration timex of the gap between two instants, in the largest unit that
/// divides it evenly: `P2D`, `PT3H`, `PT90M`.
pub fn span_timex(begin: NaiveDateTime, end: NaiveDateTime) -> String {
    let seconds = (end - begin).num_seconds();
    if seconds != 0 && seconds % 86_400 == 0 {
        format!("P{}D", seconds / 86_400)
    } else if seconds % 3_600 == 0 {
        format!("PT{}H", seconds / 3_600)
    } else if seconds % 60 == 0 {
        format!("PT{}M", seconds / 60)
    } else {
        format!("PT{seconds}S")
    }
}

/// Join two alternatives with `|`, collapsing identical ones.
pub fn merge_alternatives(first: &str, second: &str) -> String {
    if first == second {
        first.to_string()
    } else {
        format!("{first}{ALTERNATIVE_DELIMITER}{second}")
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_time(value: NaiveDateTime) -> String {
    value.format("%H:%M:%S").to_string()
}

pub fn format_date_time(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render a number the way timexes and duration resolutions expect:
/// integral values without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{value:.6}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Split a single-unit duration timex back into amount and unit code:
/// `P3W` gives `(3.0, "W")`, `PT90M` gives `(90.0, "M")`, `P6M` gives `(6.0, "MON")`.
pub fn parse_duration(timex: &str) -> Option<(f64, &'static str)> {
    let body = timex.strip_prefix('P')?;
    let (sub_day, body) = match body.strip_prefix('T') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    let suffix = body.chars().last()?;
    let amount: f64 = body[..body.len() - suffix.len_utf8()].parse().ok()?;
    let unit = match (sub_day, suffix) {
        (false, 'Y') => "Y",
        (false, 'M') => "MON",
        (false, 'W') => "W",
        (false, 'D') => "D",
        (true, 'H') => "H",
        (true, 'M') => "M",
        (true, 'S') => "S",
        _ => return None,
    };
    Some((amount, unit))
}

/// Re-parse a fully specified date timex (`YYYY-MM-DD`).
///
/// Partial timexes (`XXXX-...`) and non-date forms return `None`.
pub fn parse_date(timex: &str) -> Option<NaiveDate> {
    let mut parts = timex.splitn(3, '-');
    let year = parts.next()?;
    let month = parts.next()?;
    let day = parts.next()?;
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
