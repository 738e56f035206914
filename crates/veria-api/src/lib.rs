//! Veria API crate - axum HTTP server exposing the assistant core.
//!
//! Provides the REST API for the Veria assistant: the chat endpoint,
//! session history, and health checks.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
