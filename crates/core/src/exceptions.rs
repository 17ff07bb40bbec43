//! Per-session weekend exception ledger.
//!
//! An exception unlocks one weekend date so it becomes editable and counts
//! toward the month's countable days. The ledger is a plain value owned by
//! whoever owns the session; nothing here is persisted.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::calendar::CalendarDay;
use crate::month::MonthKey;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekendExceptions {
    unlocked: BTreeSet<NaiveDate>,
}

impl WeekendExceptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, date: NaiveDate) -> bool {
        self.unlocked.contains(&date)
    }

    /// Flip the flag for `date` and return its new state.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.unlocked.remove(&date) {
            false
        } else {
            self.unlocked.insert(date);
            true
        }
    }

    /// Whether a calendar day counts toward `laborables`.
    pub fn is_countable(&self, day: &CalendarDay) -> bool {
        !day.is_weekend || self.is_unlocked(day.iso_date)
    }

    /// Unlocked dates inside `month`, ascending.
    pub fn unlocked_in(&self, month: MonthKey) -> Vec<NaiveDate> {
        self.unlocked
            .iter()
            .copied()
            .filter(|date| month.contains(*date))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::build_calendar;
    use crate::month::parse_iso_date;

    fn date(raw: &str) -> NaiveDate {
        parse_iso_date(raw).unwrap()
    }

    #[test]
    fn toggle_flips_and_reports_state() {
        let mut ledger = WeekendExceptions::new();
        let saturday = date("2024-06-01");
        assert!(!ledger.is_unlocked(saturday));
        assert!(ledger.toggle(saturday));
        assert!(ledger.is_unlocked(saturday));
        assert!(!ledger.toggle(saturday));
        assert!(!ledger.is_unlocked(saturday));
        assert!(ledger.unlocked_in(MonthKey::parse("2024-06").unwrap()).is_empty());
    }

    #[test]
    fn flags_are_independent_per_date() {
        let mut ledger = WeekendExceptions::new();
        ledger.toggle(date("2024-06-01"));
        assert!(!ledger.is_unlocked(date("2024-06-02")));
        assert_eq!(
            ledger.unlocked_in(MonthKey::parse("2024-06").unwrap()),
            vec![date("2024-06-01")]
        );
    }

    #[test]
    fn countable_days_include_unlocked_weekends_only() {
        let month = MonthKey::parse("2024-06").unwrap();
        let cal = build_calendar(month);
        let mut ledger = WeekendExceptions::new();
        ledger.toggle(cal[0].iso_date);

        assert!(ledger.is_countable(&cal[0]));
        assert!(!ledger.is_countable(&cal[1]));
        assert!(ledger.is_countable(&cal[2]));
    }

    #[test]
    fn unlocked_in_filters_by_month() {
        let mut ledger = WeekendExceptions::new();
        ledger.toggle(date("2024-06-01"));
        ledger.toggle(date("2024-06-30"));
        ledger.toggle(date("2024-07-06"));

        let june = MonthKey::parse("2024-06").unwrap();
        assert_eq!(
            ledger.unlocked_in(june),
            vec![date("2024-06-01"), date("2024-06-30")]
        );
    }
}
