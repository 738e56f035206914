use serde::{Deserialize, Serialize};

use veria_isms::ReportType;

/// Deterministic CRUD-style verbs against the ISMS backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudVerb {
    Create,
    List,
    Get,
    Update,
    Delete,
    Analyze,
}

/// Closed set of intent categories. The orchestrator matches this
/// exhaustively; there is no dynamic handler dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentCategory {
    Crud(CrudVerb),
    Report,
    BulkImport,
    DocumentAnalysis,
    DocumentQuery,
    KnowledgeQuestion,
    Greeting,
    Thanks,
    Conversational,
}

/// How the classification was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    /// Matched a deterministic routing rule.
    Pattern,
    /// Delegated to the reasoning service.
    Llm,
    /// Degraded guess because the reasoning service was unavailable.
    Fallback,
}

/// Structured fields pulled out of free text.
///
/// `None` is the explicit "missing" marker: the orchestrator turns a
/// missing required field into a clarifying question, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedParams {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub description: Option<String>,
    pub subtype: Option<String>,
    /// Field key targeted by an update.
    pub field: Option<String>,
    /// New value for an update.
    pub value: Option<String>,
}

/// Immutable classification result for one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub category: IntentCategory,
    pub object_type: Option<String>,
    pub report_type: Option<ReportType>,
    #[serde(default)]
    pub params: ExtractedParams,
    pub confidence: Confidence,
}

impl Intent {
    pub fn new(category: IntentCategory) -> Self {
        Self {
            category,
            object_type: None,
            report_type: None,
            params: ExtractedParams::default(),
            confidence: Confidence::Pattern,
        }
    }

    pub fn with_object_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = Some(object_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_builder() {
        let intent = Intent::new(IntentCategory::Crud(CrudVerb::List)).with_object_type("process");
        assert_eq!(intent.category, IntentCategory::Crud(CrudVerb::List));
        assert_eq!(intent.object_type.as_deref(), Some("process"));
        assert_eq!(intent.confidence, Confidence::Pattern);
    }

    #[test]
    fn test_extracted_params_default_is_all_missing() {
        let params = ExtractedParams::default();
        assert!(params.name.is_none());
        assert!(params.field.is_none());
        assert!(params.value.is_none());
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&IntentCategory::Crud(CrudVerb::Create)).unwrap();
        assert!(json.contains("create"));
    }
}
