//! Application state shared across route handlers.

use std::sync::Arc;
use std::time::Instant;

use veria_chat::Orchestrator;

/// Shared application state, cloned cheaply into each handler task.
#[derive(Clone)]
pub struct AppState {
    /// The assistant core serving all sessions.
    pub orchestrator: Arc<Orchestrator>,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            start_time: Instant::now(),
        }
    }
}
