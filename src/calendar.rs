// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Date and calendar engine.
//!
//! Every date crossing an API boundary is a `YYYY-MM-DD` string. These helpers
//! validate that form, do day arithmetic on it, and lay out month grids.
//! Months are zero-indexed (0 = January) to match the calendar API.

use chrono::{Datelike, Days, Local, NaiveDate};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Number of cells in a month grid (six full weeks).
pub const GRID_CELLS: usize = 42;

const DATE_FORMAT: &str = "%Y-%m-%d";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Date engine errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month {0}: expected 0-11")]
    InvalidMonth(u32),

    #[error("Date out of supported range")]
    OutOfRange,
}

/// One day in a month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: String,
    pub is_current_month: bool,
    pub day_number: u32,
}

/// A (year, zero-indexed month) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

/// Previous/next month links for calendar navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthNavigation {
    pub prev: YearMonth,
    pub next: YearMonth,
}

fn date_shape() -> &'static Regex {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    DATE_REGEX.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"))
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` string.
///
/// The string must have the exact shape and name a real day; it must also
/// format back to itself, so `2024-02-30` and `2023-02-29` are rejected.
pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
    if !date_shape().is_match(s) {
        return Err(DateError::InvalidDate(s.to_string()));
    }
    let date = NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| DateError::InvalidDate(s.to_string()))?;
    if format_date(date) != s {
        return Err(DateError::InvalidDate(s.to_string()));
    }
    Ok(date)
}

pub fn is_valid_date(s: &str) -> bool {
    parse_date(s).is_ok()
}

/// Current local calendar day.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current local calendar day as `YYYY-MM-DD`.
pub fn today() -> String {
    format_date(local_today())
}

pub fn is_today_on(s: &str, today: NaiveDate) -> bool {
    parse_date(s).map(|d| d == today).unwrap_or(false)
}

/// True when `s` is strictly after `today` (any time today is not future).
pub fn is_future_on(s: &str, today: NaiveDate) -> bool {
    parse_date(s).map(|d| d > today).unwrap_or(false)
}

/// True when `s` is strictly before the start of `today`.
pub fn is_past_on(s: &str, today: NaiveDate) -> bool {
    parse_date(s).map(|d| d < today).unwrap_or(false)
}

pub fn is_today(s: &str) -> bool {
    is_today_on(s, local_today())
}

pub fn is_future(s: &str) -> bool {
    is_future_on(s, local_today())
}

pub fn is_past(s: &str) -> bool {
    is_past_on(s, local_today())
}

/// Shift a date by `n` days, rolling over months and years.
pub fn add_days(s: &str, n: i64) -> Result<String, DateError> {
    let date = parse_date(s)?;
    let magnitude = Days::new(n.unsigned_abs());
    let shifted = if n >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.map(format_date).ok_or(DateError::OutOfRange)
}

pub fn subtract_days(s: &str, n: i64) -> Result<String, DateError> {
    let negated = n.checked_neg().ok_or(DateError::OutOfRange)?;
    add_days(s, negated)
}

/// Absolute number of days between two dates.
pub fn days_between(a: &str, b: &str) -> Result<i64, DateError> {
    let a = parse_date(a)?;
    let b = parse_date(b)?;
    Ok((b - a).num_days().abs())
}

/// e.g. "January 15, 2024"
pub fn format_display(s: &str) -> Result<String, DateError> {
    Ok(parse_date(s)?.format("%B %-d, %Y").to_string())
}

/// e.g. "Monday, January 15, 2024"
pub fn format_long_display(s: &str) -> Result<String, DateError> {
    Ok(parse_date(s)?.format("%A, %B %-d, %Y").to_string())
}

pub fn day_name(s: &str) -> Result<String, DateError> {
    Ok(parse_date(s)?.format("%A").to_string())
}

pub fn month_name(s: &str) -> Result<String, DateError> {
    Ok(parse_date(s)?.format("%B").to_string())
}

/// Name of a zero-indexed month.
pub fn month_label(month: u32) -> Result<&'static str, DateError> {
    MONTH_NAMES
        .get(month as usize)
        .copied()
        .ok_or(DateError::InvalidMonth(month))
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, DateError> {
    if month > 11 {
        return Err(DateError::InvalidMonth(month));
    }
    NaiveDate::from_ymd_opt(year, month + 1, 1).ok_or(DateError::OutOfRange)
}

/// First and last day of a zero-indexed month, as `YYYY-MM-DD`.
pub fn month_bounds(year: i32, month: u32) -> Result<(String, String), DateError> {
    let first = first_of_month(year, month)?;
    let next = navigation_months(year, month).next;
    let last = first_of_month(next.year, next.month)?
        .pred_opt()
        .ok_or(DateError::OutOfRange)?;
    Ok((format_date(first), format_date(last)))
}

/// Lay out a month as 42 consecutive days starting on the Sunday on or
/// before the 1st. Leading and trailing cells belong to adjacent months.
pub fn calendar_grid(year: i32, month: u32) -> Result<Vec<CalendarCell>, DateError> {
    let first = first_of_month(year, month)?;
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let start = first
        .checked_sub_days(Days::new(lead))
        .ok_or(DateError::OutOfRange)?;

    let cells: Vec<CalendarCell> = start
        .iter_days()
        .take(GRID_CELLS)
        .map(|day| CalendarCell {
            date: format_date(day),
            is_current_month: day.month0() == month && day.year() == year,
            day_number: day.day(),
        })
        .collect();

    // iter_days stops early only at the end of chrono's supported range.
    if cells.len() != GRID_CELLS {
        return Err(DateError::OutOfRange);
    }
    Ok(cells)
}

/// Previous and next months, rolling the year at January and December.
pub fn navigation_months(year: i32, month: u32) -> MonthNavigation {
    let prev = if month == 0 {
        YearMonth {
            year: year - 1,
            month: 11,
        }
    } else {
        YearMonth {
            year,
            month: month - 1,
        }
    };
    let next = if month >= 11 {
        YearMonth {
            year: year + 1,
            month: 0,
        }
    } else {
        YearMonth {
            year,
            month: month + 1,
        }
    };
    MonthNavigation { prev, next }
}

/// True when (year, month) lies after the month containing `today`.
pub fn is_after_month(year: i32, month: u32, today: NaiveDate) -> bool {
    (year, month) > (today.year(), today.month0())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn grid_start_weekday(cells: &[CalendarCell]) -> Option<Weekday> {
        cells
            .first()
            .and_then(|c| parse_date(&c.date).ok())
            .map(|d| d.weekday())
    }

    #[test]
    fn test_valid_dates() {
        assert!(is_valid_date("2024-02-29"));
        assert!(is_valid_date("2024-12-31"));
        assert!(is_valid_date("2000-01-01"));
    }

    #[test]
    fn test_invalid_dates() {
        assert!(!is_valid_date("2024-02-30"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("2024-13-01"));
        assert!(!is_valid_date("2024-1-01"));
        assert!(!is_valid_date("2024-01-01T00:00:00"));
        assert!(!is_valid_date("24-01-01"));
        assert!(!is_valid_date(""));
        assert!(!is_valid_date("abcd-ef-gh"));
    }

    #[test]
    fn test_relative_day_checks() {
        let today = ymd(2024, 3, 10);
        assert!(is_today_on("2024-03-10", today));
        assert!(!is_future_on("2024-03-10", today));
        assert!(!is_past_on("2024-03-10", today));

        assert!(is_future_on("2024-03-11", today));
        assert!(is_past_on("2024-03-09", today));
        assert!(!is_future_on("garbage", today));
        assert!(!is_past_on("garbage", today));
    }

    #[test]
    fn test_add_days_rollover() {
        assert_eq!(add_days("2024-01-31", 1).unwrap(), "2024-02-01");
        assert_eq!(add_days("2024-02-28", 1).unwrap(), "2024-02-29");
        assert_eq!(add_days("2023-02-28", 1).unwrap(), "2023-03-01");
        assert_eq!(add_days("2024-12-31", 1).unwrap(), "2025-01-01");
        assert_eq!(add_days("2024-01-01", -1).unwrap(), "2023-12-31");
        assert_eq!(add_days("2024-03-15", 0).unwrap(), "2024-03-15");
    }

    #[test]
    fn test_subtract_is_negated_add() {
        for n in [-400, -31, -1, 0, 1, 29, 365, 1000] {
            assert_eq!(
                subtract_days("2024-02-29", n).unwrap(),
                add_days("2024-02-29", -n).unwrap()
            );
        }
    }

    #[test]
    fn test_add_then_subtract_is_identity() {
        for date in ["2024-02-29", "2023-12-31", "1999-01-01", "2024-07-04"] {
            for n in [-1000, -60, -1, 0, 1, 45, 366, 10_000] {
                let shifted = add_days(date, n).unwrap();
                assert_eq!(subtract_days(&shifted, n).unwrap(), date);
            }
        }
    }

    #[test]
    fn test_add_days_rejects_bad_input() {
        assert!(matches!(
            add_days("2024-02-30", 1),
            Err(DateError::InvalidDate(_))
        ));
        assert_eq!(subtract_days("2024-01-01", i64::MIN), Err(DateError::OutOfRange));
        assert_eq!(add_days("2024-01-01", i64::MAX), Err(DateError::OutOfRange));
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(format_display("2024-01-15").unwrap(), "January 15, 2024");
        assert_eq!(
            format_long_display("2024-01-15").unwrap(),
            "Monday, January 15, 2024"
        );
        assert_eq!(format_display("2024-07-04").unwrap(), "July 4, 2024");
        assert_eq!(day_name("2024-01-15").unwrap(), "Monday");
        assert_eq!(month_name("2024-01-15").unwrap(), "January");
        assert!(format_display("2024-02-30").is_err());
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between("2024-01-01", "2024-01-31").unwrap(), 30);
        assert_eq!(days_between("2024-01-31", "2024-01-01").unwrap(), 30);
        assert_eq!(days_between("2024-01-01", "2025-01-01").unwrap(), 366);
    }

    #[test]
    fn test_grid_shape_every_month() {
        for year in [1999, 2000, 2023, 2024, 2025, 2100] {
            for month in 0..12 {
                let cells = calendar_grid(year, month).unwrap();
                assert_eq!(cells.len(), GRID_CELLS);
                assert_eq!(grid_start_weekday(&cells), Some(Weekday::Sun));

                // Exactly one contiguous run of current-month cells.
                let first = cells.iter().position(|c| c.is_current_month).unwrap();
                let run = cells[first..]
                    .iter()
                    .take_while(|c| c.is_current_month)
                    .count();
                let total = cells.iter().filter(|c| c.is_current_month).count();
                assert_eq!(run, total);

                let (_, last) = month_bounds(year, month).unwrap();
                let expected_days = parse_date(&last).unwrap().day() as usize;
                assert_eq!(run, expected_days, "{year}-{month}");
                assert_eq!(cells[first].day_number, 1);
            }
        }
    }

    #[test]
    fn test_grid_february_2015_starts_on_the_first() {
        // February 2015 begins on a Sunday and has 28 days.
        let cells = calendar_grid(2015, 1).unwrap();
        assert_eq!(cells[0].date, "2015-02-01");
        assert!(cells[0].is_current_month);
        assert_eq!(cells[27].date, "2015-02-28");
        assert!(!cells[28].is_current_month);
        assert_eq!(cells[41].date, "2015-03-14");
    }

    #[test]
    fn test_grid_padding_from_previous_month() {
        // March 2024 begins on a Friday.
        let cells = calendar_grid(2024, 2).unwrap();
        assert_eq!(cells[0].date, "2024-02-25");
        assert!(!cells[0].is_current_month);
        assert_eq!(cells[0].day_number, 25);
        assert_eq!(cells[5].date, "2024-03-01");
        assert!(cells[5].is_current_month);
    }

    #[test]
    fn test_grid_rejects_bad_month() {
        assert_eq!(calendar_grid(2024, 12), Err(DateError::InvalidMonth(12)));
    }

    #[test]
    fn test_navigation_rollover() {
        let nav = navigation_months(2024, 0);
        assert_eq!(nav.prev, YearMonth { year: 2023, month: 11 });
        assert_eq!(nav.next, YearMonth { year: 2024, month: 1 });

        let nav = navigation_months(2024, 11);
        assert_eq!(nav.prev, YearMonth { year: 2024, month: 10 });
        assert_eq!(nav.next, YearMonth { year: 2025, month: 0 });
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(2024, 1).unwrap(),
            ("2024-02-01".to_string(), "2024-02-29".to_string())
        );
        assert_eq!(
            month_bounds(2024, 11).unwrap(),
            ("2024-12-01".to_string(), "2024-12-31".to_string())
        );
    }

    #[test]
    fn test_is_after_month() {
        let today = ymd(2024, 6, 15);
        assert!(is_after_month(2024, 6, today));
        assert!(is_after_month(2025, 0, today));
        assert!(!is_after_month(2024, 5, today));
        assert!(!is_after_month(2023, 11, today));
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(0).unwrap(), "January");
        assert_eq!(month_label(11).unwrap(), "December");
        assert!(month_label(12).is_err());
    }
}
