use thiserror::Error;

use veria_core::VeriaError;

/// Errors surfaced by the ISMS backend adapter.
#[derive(Debug, Error)]
pub enum IsmsError {
    /// Authentication against the backend failed. Distinct from plain
    /// unavailability so callers can tell the user to re-authenticate.
    #[error("Authentication with the ISMS backend failed")]
    AuthFailed,

    #[error("ISMS backend unreachable: {0}")]
    Unavailable(String),

    #[error("No {object_type} named '{name}' was found")]
    NotFound { object_type: String, name: String },

    #[error("Found {count} objects named '{name}' in different domains")]
    Ambiguous { name: String, count: usize },

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("ISMS backend error: {0}")]
    Backend(String),
}

impl From<IsmsError> for VeriaError {
    fn from(err: IsmsError) -> Self {
        VeriaError::Isms(err.to_string())
    }
}

/// A specialized `Result` type for ISMS adapter operations.
pub type Result<T> = std::result::Result<T, IsmsError>;
