//! Route handlers for the chat API.
//!
//! Each handler extracts JSON or path parameters via axum extractors,
//! calls into the orchestrator, and returns JSON responses.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use veria_chat::{Response, ChatError};
use veria_core::types::{FileKind, SourceAttachment};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

/// A document attached to a chat turn. The kind is inferred from the
/// file name extension.
#[derive(Debug, Deserialize)]
pub struct AttachmentRequest {
    pub file_name: String,
    #[serde(default)]
    pub data: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Omitted on the first turn; the server assigns a session.
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub message: String,
    pub attachment: Option<AttachmentRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub response: Response,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub messages: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let attachment = request
        .attachment
        .map(|a| {
            let kind = FileKind::from_file_name(&a.file_name).ok_or_else(|| {
                ApiError::BadRequest(format!("unsupported file type: {}", a.file_name))
            })?;
            Ok::<_, ApiError>(SourceAttachment::new(a.file_name, kind, a.data))
        })
        .transpose()?;

    let outcome = state
        .orchestrator
        .handle_turn(request.session_id, &request.message, attachment)
        .await?;

    Ok(Json(ChatResponse {
        session_id: outcome.session_id,
        response: outcome.response,
    }))
}

/// GET /api/sessions/{id}/history
pub async fn session_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let messages = state
        .orchestrator
        .sessions()
        .history(id)
        .await
        .map_err(|e| match e {
            ChatError::SessionNotFound(id) => {
                ApiError::NotFound(format!("session not found: {id}"))
            }
            other => other.into(),
        })?;

    Ok(Json(HistoryResponse {
        session_id: id,
        messages: messages
            .into_iter()
            .map(|m| HistoryEntry {
                role: match m.role {
                    veria_core::types::MessageRole::User => "user".to_string(),
                    veria_core::types::MessageRole::Assistant => "assistant".to_string(),
                },
                content: m.content,
                created_at: m.created_at,
            })
            .collect(),
    }))
}
