//! Centralized error types for todosync.

use thiserror::Error;

/// Main error type for todosync core operations.
#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Unknown id scheme: '{0}' (expected 'uuid' or 'timestamp')")]
    UnknownIdScheme(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for todosync core operations.
pub type TodoResult<T> = Result<T, TodoError>;

impl TodoError {
    /// Create a malformed event error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedEvent(msg.into())
    }
}
