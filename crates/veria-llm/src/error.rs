use thiserror::Error;

use veria_core::VeriaError;

/// Errors surfaced by the reasoning adapter.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The service could not be reached at all.
    #[error("Reasoning service unavailable: {0}")]
    Unavailable(String),

    /// The service answered, but not in a usable form.
    #[error("Reasoning service returned a malformed response: {0}")]
    Malformed(String),

    /// The call exceeded the configured deadline.
    #[error("Reasoning call timed out after {0}s")]
    Timeout(u64),
}

impl From<LlmError> for VeriaError {
    fn from(err: LlmError) -> Self {
        VeriaError::Llm(err.to_string())
    }
}

/// A specialized `Result` type for reasoning operations.
pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_distinct_from_malformed() {
        let down = LlmError::Unavailable("connection refused".to_string());
        let bad = LlmError::Malformed("empty completion".to_string());
        assert!(matches!(down, LlmError::Unavailable(_)));
        assert!(matches!(bad, LlmError::Malformed(_)));
    }

    #[test]
    fn test_timeout_display() {
        assert_eq!(
            LlmError::Timeout(30).to_string(),
            "Reasoning call timed out after 30s"
        );
    }

    #[test]
    fn test_conversion_to_veria_error() {
        let err: VeriaError = LlmError::Timeout(5).into();
        assert!(matches!(err, VeriaError::Llm(_)));
    }
}
