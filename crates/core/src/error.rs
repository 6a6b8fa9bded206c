use crate::types::DbId;
use crate::validation::FieldViolation;
use crate::watch::{StoreError, WatchKey};

/// Domain-level error surfaced by the watch service and the validators.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// One or more fields violated their rules. Never empty.
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldViolation>),

    /// A partial update carried no fields at all.
    #[error("Request body is empty")]
    EmptyUpdate,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The uniqueness triple is already taken by another record.
    #[error("Conflict: watch {0} already exists")]
    Conflict(WatchKey),

    /// Unexpected persistence failure. Callers must not leak the detail.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Convenience alias used throughout the core.
pub type CoreResult<T> = Result<T, CoreError>;

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
