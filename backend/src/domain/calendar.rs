//! Calendar grid construction for the operations dashboard.
//!
//! This module contains the date calculations behind the monthly status
//! calendar: building a full-weeks grid for a target month, padded with
//! trailing days of the previous month and leading days of the next one.
//! The UI only handles presentation; all grid math lives here.
//!
//! Everything in this module is a pure function. Navigation state and
//! status attachment live in [`crate::domain::calendar_status`] and
//! [`crate::domain::status_rollup`].

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use shared::{CalendarDay, DayStatus};

/// Options controlling how a month grid is laid out.
///
/// `today` is supplied by the caller so that grid construction stays a pure
/// function of its inputs; use [`GridOptions::current`] at the edge.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    pub week_starts_on_monday: bool,
    /// The weekday considered non-operational (Sunday in the source data)
    pub rest_day: Weekday,
    pub today: NaiveDate,
}

impl GridOptions {
    /// Options for the caller's current date, with the default layout:
    /// weeks start on Monday, Sunday is the rest day.
    pub fn current() -> Self {
        Self {
            week_starts_on_monday: true,
            rest_day: Weekday::Sun,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Same layout defaults with an explicit `today`, for deterministic use.
    pub fn for_today(today: NaiveDate) -> Self {
        Self {
            week_starts_on_monday: true,
            rest_day: Weekday::Sun,
            today,
        }
    }
}

/// Build the full-weeks grid for a month.
///
/// The grid starts on the configured week-start weekday and ends on the day
/// before the next week-start weekday, so its length is always a multiple
/// of 7. Padding days carry `is_in_target_month == false`. Facts and rollup
/// are attached later by the status engine; every day starts as
/// [`DayStatus::NoData`] with no facts.
///
/// An invalid month number yields an empty grid.
pub fn build_month_grid(year: i32, month: u32, options: &GridOptions) -> Vec<CalendarDay> {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => date,
        None => return Vec::new(),
    };

    let front_padding = if options.week_starts_on_monday {
        first.weekday().num_days_from_monday()
    } else {
        first.weekday().num_days_from_sunday()
    };

    let day_count = days_in_month(month, year);
    // Round up to whole weeks
    let grid_len = ((front_padding + day_count + 6) / 7) * 7;
    let grid_start = first - Duration::days(i64::from(front_padding));

    grid_start
        .iter_days()
        .take(grid_len as usize)
        .map(|date| CalendarDay {
            date,
            ordinal_in_month: date.day(),
            is_in_target_month: date.month() == month && date.year() == year,
            is_today: date == options.today,
            is_rest_day: date.weekday() == options.rest_day,
            facts: Vec::new(),
            rollup: DayStatus::NoData,
        })
        .collect()
}

/// Get the number of days in a given month and year.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Check if a year is a leap year.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Get the human-readable name for a month number.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Invalid Month",
    }
}

/// The month before `(year, month)`.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// The month after `(year, month)`.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}
