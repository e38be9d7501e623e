use crate::types::DbId;

/// Domain errors raised by validation and lookups.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced record does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Caller-supplied input was rejected.
    #[error("Validation failed: {0}")]
    Validation(String),
}
