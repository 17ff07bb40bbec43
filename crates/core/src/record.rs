//! Per-(person, month) attendance documents.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::month::MonthKey;
use crate::status::DayStatus;
use crate::types::DbId;

/// Sparse status map for one person-month. A missing key means unset.
pub type DayMap = BTreeMap<NaiveDate, DayStatus>;

/// Free-text notes for one person-month. Values are never empty.
pub type NoteMap = BTreeMap<NaiveDate, String>;

/// The attendance document for one person in one month.
///
/// Totals are deliberately absent: they are recomputed from `days` every
/// time they are needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub person_id: DbId,
    pub month: MonthKey,
    pub days: DayMap,
    pub notes: NoteMap,
}

impl AttendanceRecord {
    pub fn empty(person_id: DbId, month: MonthKey) -> Self {
        Self {
            person_id,
            month,
            days: DayMap::new(),
            notes: NoteMap::new(),
        }
    }

    /// Drop entries keyed outside `self.month`, returning how many were removed.
    pub fn retain_in_month(&mut self) -> usize {
        let month = self.month;
        let before = self.days.len() + self.notes.len();
        self.days.retain(|date, _| month.contains(*date));
        self.notes.retain(|date, text| month.contains(*date) && !text.trim().is_empty());
        before - (self.days.len() + self.notes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::parse_iso_date;

    #[test]
    fn retain_in_month_drops_foreign_and_blank_entries() {
        let month = MonthKey::parse("2024-03").unwrap();
        let mut record = AttendanceRecord::empty(1, month);
        record
            .days
            .insert(parse_iso_date("2024-03-04").unwrap(), DayStatus::Present);
        record
            .days
            .insert(parse_iso_date("2024-04-01").unwrap(), DayStatus::Absent);
        record
            .notes
            .insert(parse_iso_date("2024-03-05").unwrap(), "  ".to_string());

        assert_eq!(record.retain_in_month(), 2);
        assert_eq!(record.days.len(), 1);
        assert!(record.notes.is_empty());
    }
}
