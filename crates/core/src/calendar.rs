//! Calendar metadata for a month: one entry per day with weekday class.
//!
//! Weekdays use the 0-6 numbering where Sunday is 0 and Saturday is 6. The
//! two endpoints of that range are the weekend.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::month::MonthKey;

/// Weekday index of Sunday.
pub const SUNDAY: u8 = 0;

/// Weekday index of Saturday.
pub const SATURDAY: u8 = 6;

/// One day column of the monthly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    /// Day of month, 1-based.
    pub day: u32,
    pub iso_date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday.
    pub weekday_index: u8,
    pub is_weekend: bool,
}

/// Weekday index of `date` (Sunday = 0).
pub fn weekday_index(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always 0..=6.
    date.weekday().num_days_from_sunday() as u8
}

/// Whether `date` falls on a weekend.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(weekday_index(date), SUNDAY | SATURDAY)
}

/// Build the ordered day list for `month`.
pub fn build_calendar(month: MonthKey) -> Vec<CalendarDay> {
    month
        .dates()
        .map(|date| {
            let index = weekday_index(date);
            CalendarDay {
                day: date.day(),
                iso_date: date,
                weekday_index: index,
                is_weekend: matches!(index, SUNDAY | SATURDAY),
            }
        })
        .collect()
}
