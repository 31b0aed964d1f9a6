//! Error taxonomy shared by the store, the repositories and the auth service.
//!
//! Core operations fail with a specific kind; mapping kinds onto HTTP status
//! codes is left to the request layer.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing, invalid or expired credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The on-disk document could not be parsed.
    #[error("Corrupt data: {0}")]
    CorruptData(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized(reason.into())
    }
}
