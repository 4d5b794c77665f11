//! Unified error types for the enrichment pipeline.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the enrichment pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Raw event carries no `$session_id`; it cannot be attached to a
    /// session and is marked FAILED without retry.
    #[error("missing $session_id in raw event {0}")]
    MissingSession(Uuid),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(String),

    #[error("task timed out after {0}s")]
    Timeout(u64),

    #[error("shutting down")]
    Shutdown,

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
