//! Conversation state: per-session history, the stored document, and
//! the pending multi-step operation. Sessions live in memory behind a
//! store keyed by UUID; expired sessions are evicted on access.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use veria_core::config::SessionConfig;
use veria_core::types::{ChatMessage, MessageRole};
use veria_doc::{ColumnMapping, ParsedDocument, ParsedTable};
use veria_isms::{ObjectFields, ReportType, Subtype};

use crate::error::{ChatError, Result};

/// A scope offered to the user during report target selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeChoice {
    pub id: String,
    pub name: String,
}

/// A document parsed earlier in the session, kept so follow-up replies
/// ("ii", "import all") can act on it.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub file_name: String,
    pub parsed: ParsedDocument,
}

impl StoredDocument {
    /// Plain description of the document's shape, used when the
    /// reasoning service cannot be asked.
    pub fn structural_summary(&self) -> String {
        match self.parsed.primary_table() {
            Some(table) => format!(
                "'{}' contains {} rows with columns: {}.",
                self.file_name,
                table.rows.len(),
                table.columns.join(", ")
            ),
            None => format!(
                "'{}' contains {} characters of text and no tables.",
                self.file_name,
                self.parsed.text.len()
            ),
        }
    }
}

/// A multi-step operation waiting for the user's next reply.
///
/// At most one is pending per session; starting a new top-level command
/// replaces it.
#[derive(Debug, Clone)]
pub enum PendingOperation {
    /// A create needs a subtype before the backend will accept it.
    AwaitingSubtype {
        object_type: String,
        fields: ObjectFields,
        candidates: Vec<Subtype>,
    },
    /// A report needs one or more target scopes.
    AwaitingReportScope {
        report_type: ReportType,
        candidates: Vec<ScopeChoice>,
        selected: Vec<ScopeChoice>,
    },
    /// A parsed document is ready; waiting for go-ahead to import.
    /// Carries the rows and column mapping itself, so a later upload
    /// cannot change what a confirmation imports.
    AwaitingBulkImportConfirm {
        file_name: String,
        table: ParsedTable,
        mapping: ColumnMapping,
    },
}

/// One conversation.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub history: Vec<ChatMessage>,
    pub pending: Option<PendingOperation>,
    pub document: Option<StoredDocument>,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            last_active: now,
            history: Vec::new(),
            pending: None,
            document: None,
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn is_expired(&self, timeout_minutes: i64) -> bool {
        Utc::now() - self.last_active > Duration::minutes(timeout_minutes)
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    /// Append a message, trimming history to the configured window.
    pub fn push(&mut self, role: MessageRole, content: impl Into<String>, history_turns: usize) {
        self.history.push(ChatMessage::new(self.id, role, content));
        // One turn is a user message plus an assistant message.
        let cap = history_turns * 2;
        if self.history.len() > cap {
            let excess = self.history.len() - cap;
            self.history.drain(..excess);
        }
    }

    /// Replace any pending operation with a new one.
    pub fn set_pending(&mut self, pending: PendingOperation) {
        self.pending = Some(pending);
    }

    pub fn take_pending(&mut self) -> Option<PendingOperation> {
        self.pending.take()
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }
}

type SharedSession = Arc<tokio::sync::Mutex<Session>>;

/// In-memory session store. The outer lock is held only to look up the
/// per-session handle; turn processing locks the session itself so slow
/// turns never block other sessions.
pub struct SessionStore {
    config: SessionConfig,
    sessions: Mutex<HashMap<Uuid, SharedSession>>,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Reject messages the pipeline will never handle meaningfully.
    pub fn validate(&self, message: &str) -> Result<()> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.len() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(message.len()));
        }
        Ok(())
    }

    pub fn create(&self) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let mut sessions = self.lock()?;
        sessions.insert(id, Arc::new(tokio::sync::Mutex::new(Session::new(id))));
        debug!(session_id = %id, "session created");
        Ok(id)
    }

    /// Look up a live session, evicting it first if its idle timeout
    /// has passed.
    pub fn get(&self, id: Uuid) -> Result<SharedSession> {
        let mut sessions = self.lock()?;
        let expired = match sessions.get(&id) {
            None => return Err(ChatError::SessionNotFound(id)),
            Some(shared) => match shared.try_lock() {
                Ok(session) => session.is_expired(self.config.timeout_minutes),
                // A locked session is mid-turn and by definition live.
                Err(_) => false,
            },
        };
        if expired {
            sessions.remove(&id);
            debug!(session_id = %id, "expired session evicted");
            return Err(ChatError::SessionNotFound(id));
        }
        Ok(Arc::clone(sessions.get(&id).ok_or(ChatError::SessionNotFound(id))?))
    }

    /// Resolve an optional session id, creating a fresh session when
    /// none was given or the given one has expired.
    pub fn get_or_create(&self, id: Option<Uuid>) -> Result<(Uuid, SharedSession)> {
        if let Some(id) = id {
            match self.get(id) {
                Ok(shared) => return Ok((id, shared)),
                Err(ChatError::SessionNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        let id = self.create()?;
        let shared = self.get(id)?;
        Ok((id, shared))
    }

    pub async fn history(&self, id: Uuid) -> Result<Vec<ChatMessage>> {
        let shared = self.get(id)?;
        let session = shared.lock().await;
        Ok(session.history.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, SharedSession>>> {
        self.sessions
            .lock()
            .map_err(|_| ChatError::State("session store lock poisoned".to_string()))
    }
}
