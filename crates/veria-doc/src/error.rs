use thiserror::Error;

use veria_core::{FileKind, VeriaError};

/// Errors surfaced by the document parser adapter.
#[derive(Debug, Error)]
pub enum DocError {
    #[error("Could not parse {kind:?} document: {reason}")]
    Parse { kind: FileKind, reason: String },

    #[error("Unsupported document kind: {0}")]
    Unsupported(String),

    #[error("Document is empty")]
    Empty,
}

impl From<DocError> for VeriaError {
    fn from(err: DocError) -> Self {
        VeriaError::Document(err.to_string())
    }
}

/// A specialized `Result` type for document operations.
pub type Result<T> = std::result::Result<T, DocError>;
