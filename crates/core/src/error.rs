//! Domain error taxonomy shared across the workspace.

use crate::types::DbId;
use crate::validation::FieldViolation;

/// Domain-level errors.
///
/// The API layer maps each variant to an HTTP status and a stable error
/// code; see `campus_api::error`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The payload violated one or more field-level validation rules.
    ///
    /// All violations for the payload are collected, not just the first.
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    /// A uniqueness or state conflict (duplicate subscription, duplicate
    /// course title, concurrent toggle race).
    #[error("{0}")]
    Conflict(String),

    /// Authentication is missing or invalid.
    #[error("{0}")]
    Unauthorized(String),

    /// The authenticated identity is not allowed to perform the action.
    /// The entity store is never touched when this is returned.
    #[error("{0}")]
    Forbidden(String),

    /// An external collaborator (the payment provider) failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Anything else. Message is logged server-side, never echoed verbatim.
    #[error("{0}")]
    Internal(String),
}
