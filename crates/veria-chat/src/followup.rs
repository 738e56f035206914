//! Follow-up resolution: interprets a reply against the session's
//! pending operation. Matching is deliberately conservative; anything
//! that does not look like an answer falls through to fresh routing,
//! which replaces the pending operation.

use veria_isms::Subtype;

use crate::extract::{parse_selection, Selection};
use crate::state::{PendingOperation, ScopeChoice};

/// Outcome of interpreting a reply as a follow-up.
#[derive(Debug, Clone, PartialEq)]
pub enum FollowUpDecision {
    /// The user picked a subtype; the deferred create can proceed.
    SubtypeChosen(Subtype),
    /// The user added scopes to the report target selection.
    ReportAddScopes(Vec<ScopeChoice>),
    /// The user closed the scope selection; generate the report.
    ReportConfirm,
    /// The user picked an import option from the document menu; ask
    /// for an explicit go-ahead before committing.
    BulkImportRequested,
    /// The user confirmed the bulk import; commit it.
    BulkConfirm,
    /// The user backed out; drop the pending operation.
    Cancel,
    /// A selection was attempted but does not map to any offered
    /// option; drop the pending operation and tell the user.
    Invalid(String),
    /// Not an answer to the pending question; route it as a fresh
    /// message.
    NotFollowUp,
}

/// Interpret a reply against the pending operation.
pub fn resolve(pending: &PendingOperation, message: &str) -> FollowUpDecision {
    if message.trim().is_empty() {
        return FollowUpDecision::NotFollowUp;
    }
    match pending {
        PendingOperation::AwaitingSubtype { candidates, .. } => {
            resolve_subtype(candidates, message)
        }
        PendingOperation::AwaitingReportScope { candidates, .. } => {
            resolve_report_scope(candidates, message)
        }
        PendingOperation::AwaitingBulkImportConfirm { .. } => resolve_bulk(message),
    }
}

fn resolve_subtype(candidates: &[Subtype], message: &str) -> FollowUpDecision {
    match parse_selection(message) {
        Selection::Ordinal(n) => match candidates.get(n.wrapping_sub(1)) {
            Some(subtype) => FollowUpDecision::SubtypeChosen(subtype.clone()),
            None => FollowUpDecision::Invalid(format!(
                "{n} is not one of the {} offered subtypes",
                candidates.len()
            )),
        },
        Selection::Decline => FollowUpDecision::Cancel,
        Selection::Text(text) => {
            let wanted = text.to_lowercase();
            candidates
                .iter()
                .find(|c| {
                    c.label.to_lowercase() == wanted
                        || c.normalized_id() == wanted
                        || c.label.to_lowercase().contains(&wanted)
                })
                .map(|c| FollowUpDecision::SubtypeChosen(c.clone()))
                .unwrap_or(FollowUpDecision::NotFollowUp)
        }
        _ => FollowUpDecision::NotFollowUp,
    }
}

fn resolve_report_scope(candidates: &[ScopeChoice], message: &str) -> FollowUpDecision {
    let pick = |indices: &[usize]| -> FollowUpDecision {
        let mut chosen = Vec::new();
        for &n in indices {
            match candidates.get(n.wrapping_sub(1)) {
                Some(scope) => chosen.push(scope.clone()),
                None => {
                    return FollowUpDecision::Invalid(format!(
                        "{n} is not one of the {} listed scopes",
                        candidates.len()
                    ))
                }
            }
        }
        FollowUpDecision::ReportAddScopes(chosen)
    };

    match parse_selection(message) {
        Selection::Ordinal(n) => pick(&[n]),
        Selection::Ordinals(ns) => pick(&ns),
        Selection::All => FollowUpDecision::ReportAddScopes(candidates.to_vec()),
        Selection::Done | Selection::Affirm => FollowUpDecision::ReportConfirm,
        Selection::Decline => FollowUpDecision::Cancel,
        Selection::Text(text) => {
            let wanted = text.to_lowercase();
            candidates
                .iter()
                .find(|c| {
                    let name = c.name.to_lowercase();
                    name == wanted || name.contains(&wanted)
                })
                .map(|c| FollowUpDecision::ReportAddScopes(vec![c.clone()]))
                .unwrap_or(FollowUpDecision::NotFollowUp)
        }
    }
}

fn resolve_bulk(message: &str) -> FollowUpDecision {
    // The document menu numbers its import options in roman numerals,
    // which parse as plain text.
    if matches!(
        message.trim().to_lowercase().as_str(),
        "i" | "ii" | "one" | "two"
    ) {
        return FollowUpDecision::BulkImportRequested;
    }
    match parse_selection(message) {
        Selection::Affirm | Selection::Done => FollowUpDecision::BulkConfirm,
        // Both numbered menu entries lead to the import confirmation.
        Selection::Ordinal(1) | Selection::Ordinal(2) => FollowUpDecision::BulkImportRequested,
        Selection::Decline => FollowUpDecision::Cancel,
        _ => FollowUpDecision::NotFollowUp,
    }
}
