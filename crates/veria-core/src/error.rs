use thiserror::Error;

/// Top-level error type for the Veria assistant.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for VeriaError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VeriaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ISMS backend error: {0}")]
    Isms(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Reasoning error: {0}")]
    Llm(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for VeriaError {
    fn from(err: toml::de::Error) -> Self {
        VeriaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VeriaError {
    fn from(err: toml::ser::Error) -> Self {
        VeriaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VeriaError {
    fn from(err: serde_json::Error) -> Self {
        VeriaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Veria operations.
pub type Result<T> = std::result::Result<T, VeriaError>;
