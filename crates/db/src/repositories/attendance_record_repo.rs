//! Repository for the `attendance_records` table.
//!
//! Day and note writes merge one key into the JSONB object with `||`, so two
//! sessions editing different cells of the same person-month never clobber
//! each other.

use asistencia_core::types::DbId;
use sqlx::PgPool;

use crate::models::attendance_record::AttendanceRecord;

/// Column list for attendance_records queries.
const COLUMNS: &str = "id, person_id, month, days, notes, created_at, updated_at";

/// Provides upserts and month reads for attendance records.
pub struct AttendanceRecordRepo;

impl AttendanceRecordRepo {
    /// All records for one `YYYY-MM` month.
    pub async fn list_by_month(
        pool: &PgPool,
        month: &str,
    ) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records
             WHERE month = $1
             ORDER BY person_id"
        );
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(month)
            .fetch_all(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        person_id: DbId,
        month: &str,
    ) -> Result<Option<AttendanceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records
             WHERE person_id = $1 AND month = $2"
        );
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(person_id)
            .bind(month)
            .fetch_optional(pool)
            .await
    }

    /// Set one day's status, creating the person-month record if absent.
    pub async fn upsert_day_status(
        pool: &PgPool,
        person_id: DbId,
        month: &str,
        date: &str,
        status: &str,
    ) -> Result<AttendanceRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance_records (person_id, month, days)
             VALUES ($1, $2, jsonb_build_object($3::text, $4::text))
             ON CONFLICT (person_id, month) DO UPDATE
                SET days = attendance_records.days || EXCLUDED.days
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(person_id)
            .bind(month)
            .bind(date)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    /// Set one day's note, creating the person-month record if absent.
    pub async fn upsert_note(
        pool: &PgPool,
        person_id: DbId,
        month: &str,
        date: &str,
        text: &str,
    ) -> Result<AttendanceRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance_records (person_id, month, notes)
             VALUES ($1, $2, jsonb_build_object($3::text, $4::text))
             ON CONFLICT (person_id, month) DO UPDATE
                SET notes = attendance_records.notes || EXCLUDED.notes
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(person_id)
            .bind(month)
            .bind(date)
            .bind(text)
            .fetch_one(pool)
            .await
    }

    /// Remove one day's note. Returns `None` if no record exists.
    pub async fn remove_note(
        pool: &PgPool,
        person_id: DbId,
        month: &str,
        date: &str,
    ) -> Result<Option<AttendanceRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE attendance_records SET notes = notes - $3::text
             WHERE person_id = $1 AND month = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(person_id)
            .bind(month)
            .bind(date)
            .fetch_optional(pool)
            .await
    }
}
