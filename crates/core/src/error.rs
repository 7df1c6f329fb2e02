//! Domain-level error type shared across the workspace.

use crate::types::JobId;

/// Domain-level errors.
///
/// Variants map onto HTTP semantics in the API layer: `Validation` ->
/// 400, `NotFound` -> 404, `Conflict` -> 409, `Internal` -> 500.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input failed synchronous validation; no job was created.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"Job"`.
        entity: &'static str,
        /// Identifier that failed to resolve.
        id: JobId,
    },

    /// The operation conflicts with the entity's current state.
    #[error("{0}")]
    Conflict(String),

    /// An unexpected internal failure.
    #[error("{0}")]
    Internal(String),
}
