//! LLM reasoning adapter contract.
//!
//! The core delegates knowledge questions and document analysis here.
//! Unavailability is a distinct error from a malformed answer so the
//! orchestrator can decide between fallback text and a retry.

pub mod client;
pub mod error;

pub use client::{reason_with_timeout, LlmClient};
pub use error::{LlmError, Result};
