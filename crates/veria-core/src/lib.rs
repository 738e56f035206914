//! Core types, configuration, and errors shared across the Veria workspace.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::VeriaConfig;
pub use error::{Result, VeriaError};
pub use types::{ChatMessage, FileKind, MessageRole, SourceAttachment};
