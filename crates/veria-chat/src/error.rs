use thiserror::Error;
use uuid::Uuid;

use veria_core::VeriaError;
use veria_doc::DocError;
use veria_isms::IsmsError;
use veria_llm::LlmError;

/// Errors raised while handling one conversation turn.
///
/// Every variant except `Config` is recoverable: the orchestrator turns
/// it into a clarifying or apologetic response instead of failing the
/// turn. `Config` means the routing rules themselves are malformed and
/// is fatal at startup only.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message too long: {0} characters")]
    MessageTooLong(usize),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("No {object_type} named '{name}' was found")]
    NotFound { object_type: String, name: String },

    #[error("'{name}' matches {count} objects")]
    Ambiguous { name: String, count: usize },

    #[error("Backend unavailable: {0}")]
    ToolUnavailable(String),

    #[error("Authentication with the ISMS backend is required")]
    AuthRequired,

    #[error("Conversation state error: {0}")]
    State(String),

    #[error("Routing configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// Whether the turn can continue with a user-facing message.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ChatError::Config(_))
    }
}

impl From<IsmsError> for ChatError {
    fn from(err: IsmsError) -> Self {
        match err {
            IsmsError::AuthFailed => ChatError::AuthRequired,
            IsmsError::Unavailable(msg) => ChatError::ToolUnavailable(msg),
            IsmsError::NotFound { object_type, name } => ChatError::NotFound { object_type, name },
            IsmsError::Ambiguous { name, count } => ChatError::Ambiguous { name, count },
            IsmsError::InvalidInput(msg) => ChatError::Validation(msg),
            IsmsError::Backend(msg) => ChatError::ToolUnavailable(msg),
        }
    }
}

impl From<DocError> for ChatError {
    fn from(err: DocError) -> Self {
        ChatError::Validation(err.to_string())
    }
}

impl From<LlmError> for ChatError {
    fn from(err: LlmError) -> Self {
        ChatError::ToolUnavailable(err.to_string())
    }
}

impl From<ChatError> for VeriaError {
    fn from(err: ChatError) -> Self {
        VeriaError::Chat(err.to_string())
    }
}

/// A specialized `Result` type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability() {
        assert!(ChatError::Validation("bad".into()).is_recoverable());
        assert!(ChatError::ToolUnavailable("down".into()).is_recoverable());
        assert!(!ChatError::Config("bad regex".into()).is_recoverable());
    }

    #[test]
    fn test_from_isms_error() {
        let err: ChatError = IsmsError::AuthFailed.into();
        assert!(matches!(err, ChatError::AuthRequired));

        let err: ChatError = IsmsError::NotFound {
            object_type: "asset".into(),
            name: "X".into(),
        }
        .into();
        assert!(matches!(err, ChatError::NotFound { .. }));

        let err: ChatError = IsmsError::Ambiguous {
            name: "X".into(),
            count: 2,
        }
        .into();
        assert!(matches!(err, ChatError::Ambiguous { count: 2, .. }));
    }

    #[test]
    fn test_from_llm_error_is_tool_unavailable() {
        let err: ChatError = LlmError::Timeout(30).into();
        assert!(matches!(err, ChatError::ToolUnavailable(_)));
    }

    #[test]
    fn test_display_not_found() {
        let err = ChatError::NotFound {
            object_type: "scope".into(),
            name: "HQ".into(),
        };
        assert_eq!(err.to_string(), "No scope named 'HQ' was found");
    }
}
