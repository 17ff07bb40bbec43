//! Month keys (`YYYY-MM`) and ISO 8601 date parsing.
//!
//! A [`MonthKey`] partitions attendance records; it is never stored as an
//! entity of its own.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Earliest and latest years a month key may name.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// A validated `YYYY-MM` month key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Build a month key from numeric parts.
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CoreError::Validation(format!(
                "Year {year} out of range ({MIN_YEAR}-{MAX_YEAR})"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(CoreError::Validation(format!(
                "Month {month} out of range (1-12)"
            )));
        }
        Ok(Self { year, month })
    }

    /// Parse a strict `YYYY-MM` string. Zero padding is required.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let invalid =
            || CoreError::Validation(format!("Invalid month '{input}'. Expected YYYY-MM"));

        let (year, month) = input.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 || !all_digits(year) || !all_digits(month) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Number of calendar days in this month (28-31).
    ///
    /// Measured as the distance from the first of this month to the first of
    /// the next one.
    pub fn days_in_month(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        match (
            NaiveDate::from_ymd_opt(self.year, self.month, 1),
            NaiveDate::from_ymd_opt(next_year, next_month, 1),
        ) {
            (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
            _ => 0,
        }
    }

    /// All dates of the month in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=self.days_in_month())
            .filter_map(move |day| NaiveDate::from_ymd_opt(self.year, self.month, day))
    }

    /// Whether `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Reject dates outside this month.
    pub fn ensure_contains(&self, date: NaiveDate) -> Result<(), CoreError> {
        if self.contains(date) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Date {date} is outside month {self}"
            )))
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, CoreError> {
    let invalid =
        || CoreError::Validation(format!("Invalid date '{input}'. Expected YYYY-MM-DD"));

    let bytes = input.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(invalid());
    }
    // chrono tolerates padded and signed fields, so pin every field to digits.
    let digit_fields = [&bytes[0..4], &bytes[5..7], &bytes[8..10]];
    if !digit_fields.iter().all(|field| field.iter().all(u8::is_ascii_digit)) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())
}

/// Parse a date and require it to fall inside `month`.
pub fn parse_date_in_month(input: &str, month: MonthKey) -> Result<NaiveDate, CoreError> {
    let date = parse_iso_date(input)?;
    month.ensure_contains(date)?;
    Ok(date)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // -- parse -----------------------------------------------------------------

    #[test]
    fn parses_padded_month() {
        let key = MonthKey::parse("2024-03").unwrap();
        assert_eq!(key.year(), 2024);
        assert_eq!(key.month(), 3);
        assert_eq!(key.to_string(), "2024-03");
    }

    #[test]
    fn rejects_unpadded_month() {
        assert_matches!(MonthKey::parse("2024-3"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_month_thirteen() {
        assert_matches!(MonthKey::parse("2024-13"), Err(CoreError::Validation(_)));
        assert_matches!(MonthKey::parse("2024-00"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_garbage() {
        for raw in ["", "2024", "2024/03", "24-03", "2024-03-01", "abcd-ef", "+024-03"] {
            assert!(MonthKey::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn month_key_serde_uses_string_form() {
        let key = MonthKey::parse("2023-11").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2023-11\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<MonthKey>("\"2023-1\"").is_err());
    }

    // -- days_in_month ---------------------------------------------------------

    #[test]
    fn february_lengths_follow_leap_rules() {
        assert_eq!(MonthKey::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthKey::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthKey::new(1900, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthKey::new(2000, 2).unwrap().days_in_month(), 29);
    }

    #[test]
    fn thirty_and_thirty_one_day_months() {
        assert_eq!(MonthKey::new(2024, 4).unwrap().days_in_month(), 30);
        assert_eq!(MonthKey::new(2024, 12).unwrap().days_in_month(), 31);
        assert_eq!(MonthKey::new(9999, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn dates_cover_whole_month() {
        let key = MonthKey::new(2024, 2).unwrap();
        let dates: Vec<_> = key.dates().collect();
        assert_eq!(dates.len(), 29);
        assert_eq!(dates[0].to_string(), "2024-02-01");
        assert_eq!(dates[28].to_string(), "2024-02-29");
    }

    // -- dates -----------------------------------------------------------------

    #[test]
    fn parse_iso_date_is_strict() {
        assert!(parse_iso_date("2024-03-05").is_ok());
        assert!(parse_iso_date("2024-3-5").is_err());
        assert!(parse_iso_date("2024-02-30").is_err());
        assert!(parse_iso_date("05/03/2024").is_err());
    }

    #[test]
    fn parse_iso_date_rejects_padded_or_signed_fields() {
        for raw in ["2024-03- 5", "2024- 3-05", "+024-03-05", " 024-03-05", "2024-03-+5"] {
            assert_matches!(parse_iso_date(raw), Err(CoreError::Validation(_)), "{raw}");
        }
    }

    #[test]
    fn date_outside_month_rejected() {
        let key = MonthKey::parse("2024-03").unwrap();
        assert!(parse_date_in_month("2024-03-31", key).is_ok());
        let err = parse_date_in_month("2024-04-01", key).unwrap_err();
        assert!(err.to_string().contains("outside month 2024-03"));
    }
}
