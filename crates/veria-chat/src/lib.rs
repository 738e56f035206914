//! Conversation core of the Veria assistant: intent routing, parameter
//! extraction, multi-step conversation state, and the orchestrator that
//! dispatches turns to the ISMS, document, and reasoning adapters.

pub mod error;
pub mod extract;
pub mod followup;
pub mod orchestrator;
pub mod response;
pub mod router;
pub mod state;
pub mod types;
pub mod vocab;

pub use error::{ChatError, Result};
pub use orchestrator::{Orchestrator, TurnOutcome};
pub use response::{Response, ResponsePayload};
pub use router::IntentRouter;
pub use state::{PendingOperation, ScopeChoice, Session, SessionStore, StoredDocument};
pub use types::{Confidence, CrudVerb, ExtractedParams, Intent, IntentCategory};
pub use vocab::ObjectVocabulary;
