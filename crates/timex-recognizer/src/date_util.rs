//! Calendar arithmetic shared by the parsers.
//!
//! Every constructor here is "safe": an impossible date (February 30, week 54)
//! yields `None` and the caller decides whether to skip the candidate or roll
//! to a neighbouring month or year.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// How far `generate_dates` searches for a year in which a month/day exists.
const LEAP_SEARCH_YEARS: i32 = 8;

pub fn create_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalize a month that may have run past either end of the year.
pub fn roll_month(year: i32, month: i32) -> (i32, u32) {
    let zero_based = month - 1;
    let year = year + zero_based.div_euclid(12);
    (year, (zero_based.rem_euclid(12) + 1) as u32)
}

/// Build a date from a month that may overflow the year; an invalid day stays invalid.
pub fn create_date_rolling_month(year: i32, month: i32, day: u32) -> Option<NaiveDate> {
    let (y, m) = roll_month(year, month);
    create_date(y, m, day)
}

pub fn at_midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (ny, nm) = roll_month(year, month as i32 + 1);
    let first_next = create_date(ny, nm, 1)?;
    Some(first_next.pred_opt()?.day())
}

/// Shift by whole months, clamping the day to the end of the target month.
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

pub fn add_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    add_months(date, years.checked_mul(12)?)
}

// ── Weekdays ────────────────────────────────────────────────────────────────

/// The `weekday` of the Monday-based week containing `date` (may be past or future).
pub fn this_week_day(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let diff = weekday.num_days_from_monday() as i64 - date.weekday().num_days_from_monday() as i64;
    date + Duration::days(diff)
}

/// The next `weekday` strictly after `date`: 1 to 7 days ahead.
pub fn upcoming_weekday(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let days_ahead = (weekday.num_days_from_monday() as i64
        - date.weekday().num_days_from_monday() as i64
        + 7)
        % 7;
    let days_ahead = if days_ahead == 0 { 7 } else { days_ahead };
    date + Duration::days(days_ahead)
}

/// The most recent `weekday` strictly before `date`: 1 to 7 days back.
pub fn previous_weekday(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let days_back = (date.weekday().num_days_from_monday() as i64
        - weekday.num_days_from_monday() as i64
        + 7)
        % 7;
    let days_back = if days_back == 0 { 7 } else { days_back };
    date - Duration::days(days_back)
}

/// The `n`th `weekday` counted from the first of the month, without checking
/// that the result stays inside the month.
pub fn nth_weekday_from_first(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    let first = create_date(year, month, 1)?;
    let diff = (weekday.num_days_from_monday() as i64
        - first.weekday().num_days_from_monday() as i64
        + 7)
        % 7;
    let first_occurrence = first + Duration::days(diff);
    Some(first_occurrence + Duration::weeks(n.saturating_sub(1) as i64))
}

/// The `n`th `weekday` of a month. `n` of 5 falls back to the last occurrence
/// when the month has only four.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    let target = nth_weekday_from_first(year, month, weekday, n)?;
    if target.month() == month {
        Some(target)
    } else if n == 5 {
        Some(target - Duration::weeks(1))
    } else {
        None
    }
}

pub fn first_monday_on_or_after(date: NaiveDate) -> NaiveDate {
    if date.weekday() == Weekday::Mon {
        date
    } else {
        upcoming_weekday(date, Weekday::Mon)
    }
}

/// The last Monday that falls inside the month.
pub fn last_monday_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let last = create_date(year, month, days_in_month(year, month)?)?;
    Some(last - Duration::days(last.weekday().num_days_from_monday() as i64))
}

// ── ISO weeks ───────────────────────────────────────────────────────────────

pub fn iso_week(date: NaiveDate) -> (i32, u32) {
    let w = date.iso_week();
    (w.year(), w.week())
}

pub fn weeks_in_iso_year(year: i32) -> u32 {
    create_date(year, 12, 28).map_or(52, |d| d.iso_week().week())
}

/// Monday of ISO week `week` in `year`, rolling extra weeks into the next year.
pub fn iso_week_monday(year: i32, week: u32) -> Option<NaiveDate> {
    let (mut year, mut week) = (year, week.max(1));
    while week > weeks_in_iso_year(year) {
        week -= weeks_in_iso_year(year);
        year += 1;
    }
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

// ── Year handling ───────────────────────────────────────────────────────────

/// Expand a two-digit year. Values at or above `min_past` become 19xx and
/// values below `max_future` become 20xx. A value in neither window has no
/// expansion. Years with more than two digits pass through.
pub fn normalize_two_digit_year(year: i32, min_past: i32, max_future: i32) -> Option<i32> {
    if !(0..100).contains(&year) {
        Some(year)
    } else if year >= min_past {
        Some(1900 + year)
    } else if year < max_future {
        Some(2000 + year)
    } else {
        None
    }
}

pub fn is_feb_29(date: NaiveDate) -> bool {
    date.month() == 2 && date.day() == 29
}

/// Future and past candidates for a month/day.
///
/// With an explicit year both candidates are that date. Without one, future is
/// the earliest occurrence on or after `reference` and past the latest on or
/// before it, probing neighbouring years so February 29 lands on a leap year.
pub fn generate_dates(
    no_year: bool,
    reference: NaiveDate,
    year: i32,
    month: u32,
    day: u32,
) -> Option<(NaiveDate, NaiveDate)> {
    if !no_year {
        let date = create_date(year, month, day)?;
        return Some((date, date));
    }
    let future = (reference.year()..=reference.year() + LEAP_SEARCH_YEARS)
        .filter_map(|y| create_date(y, month, day))
        .find(|d| *d >= reference)?;
    let past = (reference.year() - LEAP_SEARCH_YEARS..=reference.year())
        .rev()
        .filter_map(|y| create_date(y, month, day))
        .find(|d| *d <= reference)?;
    Some((future, past))
}

/// Candidates for a bare day of month ("the 27th").
///
/// Past is the current month's occurrence. Future is the current month's
/// occurrence when it has not passed yet, otherwise the next month that has
/// that day. A day the current month lacks resolves to the nearest months
/// that have it on each side.
pub fn month_day_candidates(reference: NaiveDate, day: u32) -> Option<(NaiveDate, NaiveDate)> {
    let (y, m) = (reference.year(), reference.month() as i32);
    let this_month = create_date_rolling_month(y, m, day);
    let future = match this_month {
        Some(d) if d >= reference => d,
        _ => (1..=12).find_map(|k| create_date_rolling_month(y, m + k, day))?,
    };
    let past = match this_month {
        Some(d) => d,
        None => (1..=12).find_map(|k| create_date_rolling_month(y, m - k, day))?,
    };
    Some((future, past))
}

// ── Swifting ────────────────────────────────────────────────────────────────

/// Move `value` by `amount` units, where the unit is one of the canonical
/// duration codes (`Y`, `MON`, `W`, `D`, `H`, `M`, `S`).
pub fn swift(value: NaiveDateTime, amount: i64, unit: &str) -> Option<NaiveDateTime> {
    match unit {
        "Y" => {
            let date = add_years(value.date(), i32::try_from(amount).ok()?)?;
            Some(date.and_time(value.time()))
        }
        "MON" => {
            let date = add_months(value.date(), i32::try_from(amount).ok()?)?;
            Some(date.and_time(value.time()))
        }
        "W" => value.checked_add_signed(Duration::try_weeks(amount)?),
        "D" => value.checked_add_signed(Duration::try_days(amount)?),
        "H" => value.checked_add_signed(Duration::try_hours(amount)?),
        "M" => value.checked_add_signed(Duration::try_minutes(amount)?),
        "S" => value.checked_add_signed(Duration::try_seconds(amount)?),
        _ => None,
    }
}
