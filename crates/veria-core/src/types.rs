use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One message in a session's ordered history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(session_id: Uuid, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Kind of an attached source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Spreadsheet,
    Word,
    Pdf,
}

impl FileKind {
    /// Infer the kind from a file name extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".xlsx") || lower.ends_with(".xls") || lower.ends_with(".csv") {
            Some(FileKind::Spreadsheet)
        } else if lower.ends_with(".docx") || lower.ends_with(".doc") {
            Some(FileKind::Word)
        } else if lower.ends_with(".pdf") {
            Some(FileKind::Pdf)
        } else {
            None
        }
    }
}

/// A source document attached to one chat turn by the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceAttachment {
    pub file_name: String,
    pub kind: FileKind,
    #[serde(default)]
    pub data: Vec<u8>,
}

impl SourceAttachment {
    pub fn new(file_name: impl Into<String>, kind: FileKind, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            data,
        }
    }
}
