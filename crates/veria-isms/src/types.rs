use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An organizational domain in the ISMS backend. Objects live in exactly
/// one domain; name resolution may search across several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
}

/// One object managed by the ISMS backend (scope, asset, control, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: String,
    pub object_type: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub domain_id: String,
}

/// Field values for create/update calls. Unknown fields go through
/// `extra` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl ObjectFields {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set one arbitrary field by key, routing known keys to their
    /// typed slots.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            "name" => self.name = Some(value),
            "abbreviation" => self.abbreviation = Some(value),
            "description" => self.description = Some(value),
            "subtype" => self.subtype = Some(value),
            "status" => self.status = Some(value),
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
    }
}

/// A subtype choice offered by the backend for one object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtype {
    pub id: String,
    pub label: String,
}

impl Subtype {
    /// Normalize a backend subtype id for matching user input:
    /// strips a leading `XXX_` style prefix and lowercases.
    pub fn normalized_id(&self) -> String {
        let id = match self.id.split_once('_') {
            Some((prefix, rest)) if prefix.len() <= 4 && prefix.chars().all(|c| c.is_ascii_uppercase()) => rest,
            _ => self.id.as_str(),
        };
        id.to_lowercase()
    }
}

/// Supported report kinds, identified by their backend slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    InventoryOfAssets,
    RiskAssessment,
    StatementOfApplicability,
}

impl ReportType {
    pub fn slug(&self) -> &'static str {
        match self {
            ReportType::InventoryOfAssets => "inventory-of-assets",
            ReportType::RiskAssessment => "risk-assessment",
            ReportType::StatementOfApplicability => "statement-of-applicability",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "inventory-of-assets" => Some(ReportType::InventoryOfAssets),
            "risk-assessment" => Some(ReportType::RiskAssessment),
            "statement-of-applicability" => Some(ReportType::StatementOfApplicability),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReportType::InventoryOfAssets => "Inventory of Assets",
            ReportType::RiskAssessment => "Risk Assessment",
            ReportType::StatementOfApplicability => "Statement of Applicability",
        }
    }
}

/// One target scope a report is generated over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTarget {
    pub id: String,
    /// Backend model type of the target; reports always target scopes.
    #[serde(rename = "type")]
    pub model_type: String,
}

impl ReportTarget {
    pub fn scope(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model_type: "scope".to_string(),
        }
    }
}

/// A fully specified report generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub output_type: String,
    pub language: String,
    pub time_zone: String,
    pub targets: Vec<ReportTarget>,
}

/// A rendered report returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportArtifact {
    pub file_name: String,
    pub content_type: String,
    #[serde(default)]
    pub data: Vec<u8>,
}
