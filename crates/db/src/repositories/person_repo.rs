//! Repository for the `people` table.

use asistencia_core::types::DbId;
use sqlx::PgPool;

use crate::models::person::{CreatePerson, Person};

/// Column list for people queries.
const COLUMNS: &str = "id, full_name, document_number, active, created_at, updated_at";

/// Provides CRUD operations for people.
pub struct PersonRepo;

impl PersonRepo {
    /// Insert a new active person, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePerson) -> Result<Person, sqlx::Error> {
        let query = format!(
            "INSERT INTO people (full_name, document_number)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(&input.full_name)
            .bind(&input.document_number)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM people WHERE id = $1");
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List people ordered by name. Inactive people only when asked for.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM people
             WHERE active OR $1
             ORDER BY full_name, id"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// People relevant to `month`: every active person plus inactive people
    /// holding a record for that month.
    pub async fn list_for_month(pool: &PgPool, month: &str) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM people
             WHERE active
                OR id IN (SELECT person_id FROM attendance_records WHERE month = $1)
             ORDER BY full_name, id"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(month)
            .fetch_all(pool)
            .await
    }

    /// Set the soft-active flag, returning the updated row.
    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        active: bool,
    ) -> Result<Option<Person>, sqlx::Error> {
        let query = format!(
            "UPDATE people SET active = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .bind(active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a person. Attendance records go with them via `ON DELETE CASCADE`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
