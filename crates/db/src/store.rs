//! Postgres implementation of [`AttendanceStore`].

use async_trait::async_trait;
use chrono::NaiveDate;

use asistencia_core::month::MonthKey;
use asistencia_core::people::{NewPerson, Person};
use asistencia_core::status::DayStatus;
use asistencia_core::store::{AttendanceStore, MonthSnapshot, StoreError};
use asistencia_core::types::DbId;

use crate::models::person::CreatePerson;
use crate::repositories::{AttendanceRecordRepo, PersonRepo};
use crate::DbPool;

/// PostgreSQL error code for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Store adapter over the `people` and `attendance_records` tables.
#[derive(Debug, Clone)]
pub struct PgAttendanceStore {
    pool: DbPool,
}

impl PgAttendanceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error to a [`StoreError`], attributing FK violations to
/// `person_id` when one is involved.
fn classify(err: sqlx::Error, person_id: Option<DbId>) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match (db_err.code().as_deref(), person_id) {
            (Some(FOREIGN_KEY_VIOLATION), Some(id)) => return StoreError::UnknownPerson(id),
            (Some(UNIQUE_VIOLATION), _) => {
                let message = match db_err.constraint() {
                    Some("uq_people_document_number") => {
                        "Document number already registered".to_string()
                    }
                    Some(constraint) => format!("Duplicate value violates {constraint}"),
                    None => "Duplicate value".to_string(),
                };
                return StoreError::Conflict(message);
            }
            _ => {}
        }
    }
    StoreError::Backend(err.to_string())
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[async_trait]
impl AttendanceStore for PgAttendanceStore {
    async fn load_month(&self, month: MonthKey) -> Result<MonthSnapshot, StoreError> {
        let key = month.to_string();
        let people = PersonRepo::list_for_month(&self.pool, &key)
            .await
            .map_err(|e| classify(e, None))?;
        let records = AttendanceRecordRepo::list_by_month(&self.pool, &key)
            .await
            .map_err(|e| classify(e, None))?;

        Ok(MonthSnapshot {
            people: people.into_iter().map(Person::from).collect(),
            records: records
                .into_iter()
                .filter_map(|row| row.into_domain())
                .collect(),
        })
    }

    async fn write_day_status(
        &self,
        person_id: DbId,
        date: NaiveDate,
        month: MonthKey,
        status: DayStatus,
    ) -> Result<(), StoreError> {
        AttendanceRecordRepo::upsert_day_status(
            &self.pool,
            person_id,
            &month.to_string(),
            &iso(date),
            status.as_str(),
        )
        .await
        .map_err(|e| classify(e, Some(person_id)))?;
        Ok(())
    }

    async fn write_note(
        &self,
        person_id: DbId,
        date: NaiveDate,
        month: MonthKey,
        text: Option<&str>,
    ) -> Result<(), StoreError> {
        let key = month.to_string();
        match text {
            Some(text) => {
                AttendanceRecordRepo::upsert_note(&self.pool, person_id, &key, &iso(date), text)
                    .await
                    .map_err(|e| classify(e, Some(person_id)))?;
            }
            None => {
                let removed =
                    AttendanceRecordRepo::remove_note(&self.pool, person_id, &key, &iso(date))
                        .await
                        .map_err(|e| classify(e, Some(person_id)))?;
                // Nothing to clear is fine, as long as the person exists.
                if removed.is_none()
                    && PersonRepo::find_by_id(&self.pool, person_id)
                        .await
                        .map_err(|e| classify(e, None))?
                        .is_none()
                {
                    return Err(StoreError::UnknownPerson(person_id));
                }
            }
        }
        Ok(())
    }

    async fn create_person(&self, input: &NewPerson) -> Result<Person, StoreError> {
        PersonRepo::create(&self.pool, &CreatePerson::from(input))
            .await
            .map(Person::from)
            .map_err(|e| classify(e, None))
    }

    async fn set_person_active(
        &self,
        person_id: DbId,
        active: bool,
    ) -> Result<Option<Person>, StoreError> {
        PersonRepo::set_active(&self.pool, person_id, active)
            .await
            .map(|row| row.map(Person::from))
            .map_err(|e| classify(e, None))
    }

    async fn delete_person(&self, person_id: DbId) -> Result<bool, StoreError> {
        PersonRepo::delete(&self.pool, person_id)
            .await
            .map_err(|e| classify(e, None))
    }
}
