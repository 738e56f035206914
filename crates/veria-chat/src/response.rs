//! Response construction: every user-visible string the assistant
//! produces is built here, so handlers stay free of copy and the texts
//! stay consistent across flows.

use serde::{Deserialize, Serialize};

use veria_isms::{ObjectRecord, ReportArtifact, ReportType, Subtype};

use crate::error::ChatError;
use crate::state::ScopeChoice;
use crate::vocab::ObjectVocabulary;

/// Canned reply when the reasoning service cannot be reached. The text
/// is deterministic so transports and tests can rely on it.
pub const LLM_UNAVAILABLE_FALLBACK: &str = "I could not reach the reasoning service just now. \
     I can still help with direct commands, for example 'list assets', \
     'create scope named Production', or 'generate inventory of assets report'.";

pub const GREETING_TEXT: &str = "Hello! I can manage your ISMS objects (scopes, assets, controls, \
     processes, persons, scenarios, incidents, documents), generate \
     reports, and import assets from spreadsheets. What would you like \
     to do?";

pub const THANKS_TEXT: &str = "You're welcome! Anything else I can do for you?";

/// Structured payload accompanying the text, for transports that render
/// richer views than plain chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponsePayload {
    ObjectList { objects: Vec<ObjectRecord> },
    Object { object: ObjectRecord },
    Report { report: ReportArtifact },
}

/// One assistant reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ResponsePayload>,
}

impl Response {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: None,
        }
    }

    pub fn with_payload(text: impl Into<String>, payload: ResponsePayload) -> Self {
        Self {
            text: text.into(),
            payload: Some(payload),
        }
    }
}

/// A listing, one numbered line per object.
pub fn object_list(type_plural: &str, objects: Vec<ObjectRecord>) -> Response {
    if objects.is_empty() {
        return Response::text(format!("No {type_plural} found."));
    }
    let mut text = format!("Found {} {type_plural}:\n", objects.len());
    for (i, obj) in objects.iter().enumerate() {
        text.push_str(&format!("{}. {}", i + 1, obj.name));
        if let Some(subtype) = &obj.subtype {
            text.push_str(&format!(" ({subtype})"));
        }
        text.push('\n');
    }
    Response::with_payload(text.trim_end().to_string(), ResponsePayload::ObjectList { objects })
}

pub fn object_details(object: ObjectRecord) -> Response {
    let mut text = format!("**{}** ({})\n", object.name, object.object_type);
    if let Some(abbr) = &object.abbreviation {
        text.push_str(&format!("Abbreviation: {abbr}\n"));
    }
    if let Some(subtype) = &object.subtype {
        text.push_str(&format!("Subtype: {subtype}\n"));
    }
    if let Some(status) = &object.status {
        text.push_str(&format!("Status: {status}\n"));
    }
    if let Some(desc) = &object.description {
        text.push_str(&format!("Description: {desc}\n"));
    }
    Response::with_payload(text.trim_end().to_string(), ResponsePayload::Object { object })
}

pub fn object_created(object: ObjectRecord) -> Response {
    let text = format!(
        "Created {} '{}'{}.",
        object.object_type,
        object.name,
        object
            .subtype
            .as_deref()
            .map(|s| format!(" ({s})"))
            .unwrap_or_default()
    );
    Response::with_payload(text, ResponsePayload::Object { object })
}

pub fn object_updated(object: ObjectRecord, field: &str) -> Response {
    let text = format!(
        "Updated {} of {} '{}'.",
        field, object.object_type, object.name
    );
    Response::with_payload(text, ResponsePayload::Object { object })
}

pub fn object_deleted(object_type: &str, name: &str) -> Response {
    Response::text(format!("Deleted {object_type} '{name}'."))
}

/// Ask which subtype the new object should get.
pub fn subtype_prompt(object_type: &str, name: &str, candidates: &[Subtype]) -> Response {
    let mut text = format!("Which subtype should the {object_type} '{name}' have?\n");
    for (i, c) in candidates.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, c.label));
    }
    text.push_str("Reply with a number or a subtype name.");
    Response::text(text)
}

/// Ask which scopes a report should cover.
pub fn scope_prompt(report_type: ReportType, candidates: &[ScopeChoice]) -> Response {
    let mut text = format!(
        "Which scopes should the {} cover?\n",
        report_type.display_name()
    );
    for (i, c) in candidates.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, c.name));
    }
    text.push_str("Reply with numbers (e.g. '1, 3'), 'all', or a scope name; say 'done' when finished.");
    Response::text(text)
}

pub fn scopes_added(selected: &[ScopeChoice]) -> Response {
    let names: Vec<&str> = selected.iter().map(|s| s.name.as_str()).collect();
    Response::text(format!(
        "Selected scopes: {}. Add more, or say 'done' to generate the report.",
        names.join(", ")
    ))
}

pub fn report_ready(report_type: ReportType, report: ReportArtifact) -> Response {
    let text = format!(
        "Your {} is ready: {}",
        report_type.display_name(),
        report.file_name
    );
    Response::with_payload(text, ResponsePayload::Report { report })
}

/// The menu shown after a document with tabular content is uploaded.
pub fn document_menu(file_name: &str, row_count: usize) -> Response {
    Response::text(format!(
        "I parsed '{file_name}' and found {row_count} rows. What would you like to do?\n\
         i. Import all rows as assets\n\
         ii. Import and let me review each row\n\
         iii. Summarize the document\n\
         iv. Ask questions about the document"
    ))
}

pub fn bulk_confirm_prompt(row_count: usize) -> Response {
    Response::text(format!(
        "Ready to import {row_count} assets. Proceed? (yes/no)"
    ))
}

/// Outcome summary of a bulk import.
pub fn bulk_summary(created: &[String], failed: &[(String, String)]) -> Response {
    let mut text = format!("Imported {} of {} assets.", created.len(), created.len() + failed.len());
    if !created.is_empty() {
        text.push_str(&format!("\nCreated: {}", created.join(", ")));
    }
    if !failed.is_empty() {
        text.push_str("\nFailed:");
        for (name, reason) in failed {
            text.push_str(&format!("\n- {name}: {reason}"));
        }
    }
    Response::text(text)
}

pub fn cancelled() -> Response {
    Response::text("Okay, I've cancelled that. What would you like to do instead?")
}

/// User-facing rendering of a recoverable error.
pub fn error_text(err: &ChatError, vocab: &ObjectVocabulary) -> Response {
    let text = match err {
        ChatError::AuthRequired => {
            "I could not authenticate with the ISMS backend. Please check the \
             configured credentials and try again."
                .to_string()
        }
        ChatError::ToolUnavailable(_) => {
            "The ISMS backend is not reachable right now. Please try again in a moment.".to_string()
        }
        ChatError::NotFound { object_type, name } => {
            let plural = vocab.plural(object_type);
            format!(
                "I couldn't find a {object_type} named '{name}'. \
                 You can say 'list {plural}' to see what exists."
            )
        }
        ChatError::Ambiguous { name, count } => {
            format!(
                "'{name}' matches {count} objects. Please use a more specific \
                 name or the object's id."
            )
        }
        other => other.to_string(),
    };
    Response::text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    use veria_core::config::RouterConfig;

    fn vocab() -> ObjectVocabulary {
        ObjectVocabulary::from_config(&RouterConfig::default()).unwrap()
    }

    fn record(name: &str) -> ObjectRecord {
        ObjectRecord {
            id: "o1".to_string(),
            object_type: "asset".to_string(),
            name: name.to_string(),
            abbreviation: None,
            description: None,
            subtype: Some("it-system".to_string()),
            status: Some("NEW".to_string()),
            domain_id: "d1".to_string(),
        }
    }

    #[test]
    fn test_object_list_numbers_entries() {
        let resp = object_list("assets", vec![record("Mail Server"), record("Web Server")]);
        assert!(resp.text.starts_with("Found 2 assets:"));
        assert!(resp.text.contains("1. Mail Server"));
        assert!(resp.text.contains("2. Web Server"));
        assert!(matches!(
            resp.payload,
            Some(ResponsePayload::ObjectList { ref objects }) if objects.len() == 2
        ));
    }

    #[test]
    fn test_object_list_empty() {
        let resp = object_list("scopes", vec![]);
        assert_eq!(resp.text, "No scopes found.");
        assert!(resp.payload.is_none());
    }

    #[test]
    fn test_created_mentions_subtype() {
        let resp = object_created(record("Mail Server"));
        assert_eq!(resp.text, "Created asset 'Mail Server' (it-system).");
    }

    #[test]
    fn test_subtype_prompt_lists_choices() {
        let candidates = vec![
            Subtype {
                id: "AST_IT-System".to_string(),
                label: "IT System".to_string(),
            },
            Subtype {
                id: "AST_Application".to_string(),
                label: "Application".to_string(),
            },
        ];
        let resp = subtype_prompt("asset", "Server", &candidates);
        assert!(resp.text.contains("1. IT System"));
        assert!(resp.text.contains("2. Application"));
    }

    #[test]
    fn test_bulk_summary_reports_failures() {
        let resp = bulk_summary(
            &["A".to_string(), "B".to_string()],
            &[("C".to_string(), "duplicate name".to_string())],
        );
        assert!(resp.text.starts_with("Imported 2 of 3 assets."));
        assert!(resp.text.contains("- C: duplicate name"));
    }

    #[test]
    fn test_error_text_not_found_suggests_listing() {
        let resp = error_text(
            &ChatError::NotFound {
                object_type: "scope".to_string(),
                name: "HQ".to_string(),
            },
            &vocab(),
        );
        assert!(resp.text.contains("list scopes"));
    }

    #[test]
    fn test_error_text_not_found_uses_canonical_plural() {
        let resp = error_text(
            &ChatError::NotFound {
                object_type: "process".to_string(),
                name: "Payroll".to_string(),
            },
            &vocab(),
        );
        assert!(resp.text.contains("list processes"));
        assert!(!resp.text.contains("processs"));
    }

    #[test]
    fn test_error_text_auth_is_distinct_from_unavailable() {
        let auth = error_text(&ChatError::AuthRequired, &vocab());
        let down = error_text(&ChatError::ToolUnavailable("x".to_string()), &vocab());
        assert_ne!(auth.text, down.text);
        assert!(auth.text.contains("authenticate"));
    }

    #[test]
    fn test_response_serializes_without_null_payload() {
        let json = serde_json::to_string(&Response::text("hi")).unwrap();
        assert!(!json.contains("payload"));
    }
}
