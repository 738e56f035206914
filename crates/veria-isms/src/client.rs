use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Domain, ObjectFields, ObjectRecord, ReportArtifact, ReportRequest, Subtype,
};

/// Contract for the remote object-management backend.
///
/// The HTTP implementation lives with the deployment; the core only
/// depends on this trait. All calls are subject to the adapter's own
/// timeout; a timed-out call surfaces as `IsmsError::Unavailable`.
#[async_trait]
pub trait IsmsClient: Send + Sync {
    /// Create an object of the given type inside a domain.
    async fn create_object(
        &self,
        object_type: &str,
        fields: ObjectFields,
        domain_id: &str,
    ) -> Result<ObjectRecord>;

    /// List all objects of one type inside a domain.
    async fn list_objects(&self, object_type: &str, domain_id: &str) -> Result<Vec<ObjectRecord>>;

    /// Fetch one object by backend id.
    async fn get_object(&self, object_type: &str, id: &str) -> Result<ObjectRecord>;

    /// Update fields of an existing object.
    async fn update_object(&self, id: &str, fields: ObjectFields) -> Result<ObjectRecord>;

    /// Delete an object by backend id.
    async fn delete_object(&self, id: &str) -> Result<()>;

    /// List all domains the caller may access. The first entry is the
    /// default domain for new sessions.
    async fn list_domains(&self) -> Result<Vec<Domain>>;

    /// List the valid subtypes for one object type in a domain.
    async fn list_subtypes(&self, object_type: &str, domain_id: &str) -> Result<Vec<Subtype>>;

    /// List the scopes of a domain (report targets).
    async fn list_scopes(&self, domain_id: &str) -> Result<Vec<ObjectRecord>>;

    /// Render a report over the request's target scopes.
    async fn generate_report(&self, request: ReportRequest) -> Result<ReportArtifact>;
}
