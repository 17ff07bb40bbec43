//! Attendance record store adapter.
//!
//! The grid engine never talks to a database directly; it issues one logical
//! read or write at a time through [`AttendanceStore`]. The Postgres
//! implementation lives in the `db` crate; `memory::MemoryStore` backs tests
//! and is compiled in for other crates with the `test-util` feature.

#[cfg(any(test, feature = "test-util"))]
pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::month::MonthKey;
use crate::people::{NewPerson, Person};
use crate::record::AttendanceRecord;
use crate::status::DayStatus;
use crate::types::DbId;

/// Failure reported by a store adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Person {0} does not exist")]
    UnknownPerson(DbId),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Everything the grid needs to render one month.
#[derive(Debug, Clone, Default)]
pub struct MonthSnapshot {
    /// Active people plus inactive people with a record in the month.
    pub people: Vec<Person>,
    /// At most one record per person.
    pub records: Vec<AttendanceRecord>,
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Load people and records relevant to `month`.
    async fn load_month(&self, month: MonthKey) -> Result<MonthSnapshot, StoreError>;

    /// Upsert one day's status, creating the person-month record if absent.
    async fn write_day_status(
        &self,
        person_id: DbId,
        date: NaiveDate,
        month: MonthKey,
        status: DayStatus,
    ) -> Result<(), StoreError>;

    /// Upsert one day's note, or remove it when `text` is `None`.
    async fn write_note(
        &self,
        person_id: DbId,
        date: NaiveDate,
        month: MonthKey,
        text: Option<&str>,
    ) -> Result<(), StoreError>;

    async fn create_person(&self, input: &NewPerson) -> Result<Person, StoreError>;

    /// Soft (de)activation. Returns `None` if the person does not exist.
    async fn set_person_active(
        &self,
        person_id: DbId,
        active: bool,
    ) -> Result<Option<Person>, StoreError>;

    /// Delete a person together with all their records and notes.
    /// Returns `true` if the person existed.
    async fn delete_person(&self, person_id: DbId) -> Result<bool, StoreError>;
}
