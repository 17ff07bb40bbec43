use crate::store::StoreError;
use crate::types::DbId;

/// Domain error shared by the grid engine and the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// No month has been loaded into the grid yet.
    #[error("No month loaded")]
    NoMonthLoaded,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A store operation that cannot be applied optimistically failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
