//! Adapter contract for the remote ISMS object-management backend,
//! plus multi-domain object name resolution.

pub mod client;
pub mod error;
pub mod memory;
pub mod resolve;
pub mod types;

pub use client::IsmsClient;
pub use error::{IsmsError, Result};
pub use memory::InMemoryIsms;
pub use resolve::resolve_object;
pub use types::{
    Domain, ObjectFields, ObjectRecord, ReportArtifact, ReportRequest, ReportTarget, ReportType,
    Subtype,
};
