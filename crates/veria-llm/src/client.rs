use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use veria_core::ChatMessage;

use crate::error::{LlmError, Result};

/// Contract for the reasoning collaborator.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Answer a free-text query given recent conversation history and an
    /// optional document excerpt for grounding.
    async fn reason(
        &self,
        query: &str,
        history: &[ChatMessage],
        document_context: Option<&str>,
    ) -> Result<String>;
}

/// Run one reasoning call under a deadline.
///
/// An elapsed deadline becomes `LlmError::Timeout`; the orchestrator
/// treats it like any other recoverable tool failure.
pub async fn reason_with_timeout(
    client: &dyn LlmClient,
    timeout_secs: u64,
    query: &str,
    history: &[ChatMessage],
    document_context: Option<&str>,
) -> Result<String> {
    let deadline = Duration::from_secs(timeout_secs);
    match tokio::time::timeout(deadline, client.reason(query, history, document_context)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(timeout_secs, "reasoning call exceeded deadline");
            Err(LlmError::Timeout(timeout_secs))
        }
    }
}
