//! Attendance record model.
//!
//! `days` and `notes` are JSONB objects keyed by ISO date. Entries that fail to
//! parse are skipped with a warning rather than failing the whole month.

use asistencia_core::month::{parse_iso_date, MonthKey};
use asistencia_core::record::{self, DayMap, NoteMap};
use asistencia_core::status::DayStatus;
use asistencia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `attendance_records` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttendanceRecord {
    pub id: DbId,
    pub person_id: DbId,
    pub month: String,
    pub days: serde_json::Value,
    pub notes: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AttendanceRecord {
    /// Convert into the domain record, dropping malformed entries.
    ///
    /// Returns `None` if the stored month itself is malformed.
    pub fn into_domain(self) -> Option<record::AttendanceRecord> {
        let month = match MonthKey::parse(&self.month) {
            Ok(month) => month,
            Err(e) => {
                tracing::warn!(record_id = self.id, month = %self.month, error = %e, "Skipping record with malformed month");
                return None;
            }
        };

        let mut days = DayMap::new();
        for (key, value) in json_entries(&self.days) {
            let parsed = parse_iso_date(key).ok().zip(
                value
                    .as_str()
                    .and_then(|s| s.parse::<DayStatus>().ok()),
            );
            match parsed {
                Some((date, status)) => {
                    days.insert(date, status);
                }
                None => tracing::warn!(
                    record_id = self.id,
                    key,
                    value = %value,
                    "Skipping malformed day entry"
                ),
            }
        }

        let mut notes = NoteMap::new();
        for (key, value) in json_entries(&self.notes) {
            match (parse_iso_date(key), value.as_str()) {
                (Ok(date), Some(text)) => {
                    notes.insert(date, text.to_string());
                }
                _ => tracing::warn!(record_id = self.id, key, "Skipping malformed note entry"),
            }
        }

        Some(record::AttendanceRecord {
            person_id: self.person_id,
            month,
            days,
            notes,
        })
    }
}

fn json_entries(value: &serde_json::Value) -> impl Iterator<Item = (&str, &serde_json::Value)> {
    value
        .as_object()
        .into_iter()
        .flat_map(|map| map.iter().map(|(k, v)| (k.as_str(), v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(month: &str, days: serde_json::Value, notes: serde_json::Value) -> AttendanceRecord {
        AttendanceRecord {
            id: 1,
            person_id: 7,
            month: month.to_string(),
            days,
            notes,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn converts_valid_entries() {
        let record = row(
            "2024-04",
            json!({"2024-04-01": "present", "2024-04-02": "late"}),
            json!({"2024-04-02": "traffic"}),
        )
        .into_domain()
        .unwrap();

        assert_eq!(record.person_id, 7);
        assert_eq!(record.days.len(), 2);
        assert_eq!(
            record.days[&parse_iso_date("2024-04-02").unwrap()],
            DayStatus::Late
        );
        assert_eq!(record.notes.values().next().unwrap(), "traffic");
    }

    #[test]
    fn skips_malformed_entries() {
        let record = row(
            "2024-04",
            json!({"2024-04-01": "present", "yesterday": "absent", "2024-04-03": "sick", "2024-04-04": 3}),
            json!({"2024-04-01": 5, "bad": "x"}),
        )
        .into_domain()
        .unwrap();

        assert_eq!(record.days.len(), 1);
        assert!(record.notes.is_empty());
    }

    #[test]
    fn malformed_month_is_dropped() {
        assert!(row("April", json!({}), json!({})).into_domain().is_none());
    }
}
