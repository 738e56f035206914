//! In-memory backend used by tests and local development.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::client::IsmsClient;
use crate::error::{IsmsError, Result};
use crate::types::{
    Domain, ObjectFields, ObjectRecord, ReportArtifact, ReportRequest, Subtype,
};

#[derive(Default)]
struct State {
    domains: Vec<Domain>,
    objects: Vec<ObjectRecord>,
    subtypes: HashMap<String, Vec<Subtype>>,
    unavailable: bool,
}

/// A fully functional in-memory `IsmsClient`.
#[derive(Default)]
pub struct InMemoryIsms {
    state: Mutex<State>,
}

impl InMemoryIsms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_domain(&self, id: &str, name: &str) {
        self.state.lock().unwrap().domains.push(Domain {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    pub fn set_subtypes(&self, object_type: &str, subtypes: Vec<Subtype>) {
        self.state
            .lock()
            .unwrap()
            .subtypes
            .insert(object_type.to_string(), subtypes);
    }

    /// Simulate a backend outage; every call fails with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap().unavailable = unavailable;
    }

    pub fn object_count(&self) -> usize {
        self.state.lock().unwrap().objects.len()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        let state = self
            .state
            .lock()
            .map_err(|_| IsmsError::Backend("state lock poisoned".to_string()))?;
        if state.unavailable {
            return Err(IsmsError::Unavailable("backend offline".to_string()));
        }
        Ok(state)
    }
}

#[async_trait]
impl IsmsClient for InMemoryIsms {
    async fn create_object(
        &self,
        object_type: &str,
        fields: ObjectFields,
        domain_id: &str,
    ) -> Result<ObjectRecord> {
        let mut state = self.lock()?;
        let name = fields
            .name
            .clone()
            .ok_or_else(|| IsmsError::InvalidInput("a name is required".to_string()))?;
        if name.trim().is_empty() {
            return Err(IsmsError::InvalidInput("a name is required".to_string()));
        }
        let record = ObjectRecord {
            id: Uuid::new_v4().to_string(),
            object_type: object_type.to_string(),
            name,
            abbreviation: fields.abbreviation,
            description: fields.description,
            subtype: fields.subtype,
            status: fields.status,
            domain_id: domain_id.to_string(),
        };
        state.objects.push(record.clone());
        Ok(record)
    }

    async fn list_objects(&self, object_type: &str, domain_id: &str) -> Result<Vec<ObjectRecord>> {
        let state = self.lock()?;
        Ok(state
            .objects
            .iter()
            .filter(|o| o.object_type == object_type && o.domain_id == domain_id)
            .cloned()
            .collect())
    }

    async fn get_object(&self, object_type: &str, id: &str) -> Result<ObjectRecord> {
        let state = self.lock()?;
        state
            .objects
            .iter()
            .find(|o| o.object_type == object_type && o.id == id)
            .cloned()
            .ok_or_else(|| IsmsError::NotFound {
                object_type: object_type.to_string(),
                name: id.to_string(),
            })
    }

    async fn update_object(&self, id: &str, fields: ObjectFields) -> Result<ObjectRecord> {
        let mut state = self.lock()?;
        let record = state
            .objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| IsmsError::NotFound {
                object_type: "object".to_string(),
                name: id.to_string(),
            })?;
        if let Some(name) = fields.name {
            record.name = name;
        }
        if fields.abbreviation.is_some() {
            record.abbreviation = fields.abbreviation;
        }
        if fields.description.is_some() {
            record.description = fields.description;
        }
        if fields.subtype.is_some() {
            record.subtype = fields.subtype;
        }
        if fields.status.is_some() {
            record.status = fields.status;
        }
        Ok(record.clone())
    }

    async fn delete_object(&self, id: &str) -> Result<()> {
        let mut state = self.lock()?;
        let before = state.objects.len();
        state.objects.retain(|o| o.id != id);
        if state.objects.len() == before {
            return Err(IsmsError::NotFound {
                object_type: "object".to_string(),
                name: id.to_string(),
            });
        }
        Ok(())
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        let state = self.lock()?;
        Ok(state.domains.clone())
    }

    async fn list_subtypes(&self, object_type: &str, _domain_id: &str) -> Result<Vec<Subtype>> {
        let state = self.lock()?;
        Ok(state
            .subtypes
            .get(object_type)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_scopes(&self, domain_id: &str) -> Result<Vec<ObjectRecord>> {
        self.list_objects("scope", domain_id).await
    }

    async fn generate_report(&self, request: ReportRequest) -> Result<ReportArtifact> {
        let _state = self.lock()?;
        if request.targets.is_empty() {
            return Err(IsmsError::InvalidInput(
                "a report needs at least one target scope".to_string(),
            ));
        }
        Ok(ReportArtifact {
            file_name: format!("{}.pdf", request.report_type.slug()),
            content_type: request.output_type.clone(),
            data: Vec::new(),
        })
    }
}
