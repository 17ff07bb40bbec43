use asistencia_core::people;
use asistencia_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `people` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Person {
    pub id: DbId,
    pub full_name: String,
    pub document_number: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a person. Callers validate before insert.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePerson {
    pub full_name: String,
    pub document_number: String,
}

impl From<&people::NewPerson> for CreatePerson {
    fn from(input: &people::NewPerson) -> Self {
        Self {
            full_name: input.full_name.clone(),
            document_number: input.document_number.clone(),
        }
    }
}

impl From<Person> for people::Person {
    fn from(row: Person) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            document_number: row.document_number,
            active: row.active,
        }
    }
}
