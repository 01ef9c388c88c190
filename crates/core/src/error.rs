use crate::types::DbId;

/// Domain-level failure shared by every layer.
///
/// The HTTP layer maps each variant onto a status code; the messages are
/// shown to end users as-is.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} introuvable: {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }

    /// Shorthand for a conflict.
    pub fn conflict(msg: impl Into<String>) -> Self {
        CoreError::Conflict(msg.into())
    }
}
