//! Turn orchestration: validates the message, resolves follow-ups
//! against pending state, routes fresh messages, and dispatches to the
//! intent handlers. All backend access goes through the adapter traits.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use veria_core::config::VeriaConfig;
use veria_core::types::{MessageRole, SourceAttachment};
use veria_doc::{ColumnMapping, DocumentParser, ParsedTable};
use veria_isms::{
    resolve_object, IsmsClient, ObjectFields, ReportRequest, ReportTarget, ReportType,
};
use veria_llm::{reason_with_timeout, LlmClient};

use crate::error::{ChatError, Result};
use crate::followup::{self, FollowUpDecision};
use crate::response::{self, Response, GREETING_TEXT, LLM_UNAVAILABLE_FALLBACK, THANKS_TEXT};
use crate::router::IntentRouter;
use crate::state::{PendingOperation, ScopeChoice, Session, SessionStore, StoredDocument};
use crate::types::{Confidence, CrudVerb, Intent, IntentCategory};

/// Result of one handled turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session_id: Uuid,
    pub response: Response,
}

/// The assistant core. One instance serves all sessions.
pub struct Orchestrator {
    config: VeriaConfig,
    router: IntentRouter,
    sessions: SessionStore,
    isms: Arc<dyn IsmsClient>,
    parser: Arc<dyn DocumentParser>,
    llm: Option<Arc<dyn LlmClient>>,
}

impl Orchestrator {
    pub fn new(
        config: VeriaConfig,
        isms: Arc<dyn IsmsClient>,
        parser: Arc<dyn DocumentParser>,
        llm: Option<Arc<dyn LlmClient>>,
    ) -> Result<Self> {
        let router = IntentRouter::new(&config.router)?;
        let sessions = SessionStore::new(config.session.clone());
        Ok(Self {
            config,
            router,
            sessions,
            isms,
            parser,
            llm,
        })
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one user turn end to end.
    ///
    /// Recoverable failures become apologetic responses; only transport
    /// level problems (unknown session, invalid message) surface as
    /// errors.
    pub async fn handle_turn(
        &self,
        session_id: Option<Uuid>,
        message: &str,
        attachment: Option<SourceAttachment>,
    ) -> Result<TurnOutcome> {
        // An upload may arrive without accompanying text.
        if attachment.is_none() {
            self.sessions.validate(message)?;
        } else if message.len() > self.config.session.max_message_length {
            return Err(ChatError::MessageTooLong(message.len()));
        }

        let (session_id, shared) = self.sessions.get_or_create(session_id)?;
        let mut session = shared.lock().await;
        session.touch();

        let turns = self.config.session.history_turns;
        let user_entry = if message.trim().is_empty() {
            attachment
                .as_ref()
                .map(|a| format!("[uploaded {}]", a.file_name))
                .unwrap_or_default()
        } else {
            message.to_string()
        };
        session.push(MessageRole::User, user_entry, turns);

        let response = match self.dispatch(&mut session, message, attachment).await {
            Ok(response) => response,
            Err(e) if e.is_recoverable() => {
                warn!(session_id = %session_id, error = %e, "turn degraded to error response");
                response::error_text(&e, self.router.vocabulary())
            }
            Err(e) => return Err(e),
        };

        session.push(MessageRole::Assistant, response.text.clone(), turns);
        Ok(TurnOutcome {
            session_id,
            response,
        })
    }

    async fn dispatch(
        &self,
        session: &mut Session,
        message: &str,
        attachment: Option<SourceAttachment>,
    ) -> Result<Response> {
        if let Some(attachment) = attachment {
            let parsed = self.parser.parse(&attachment.data, attachment.kind).await?;
            let row_count = parsed.primary_table().map(|t| t.rows.len()).unwrap_or(0);
            info!(file = %attachment.file_name, row_count, "document stored in session");
            session.document = Some(StoredDocument {
                file_name: attachment.file_name.clone(),
                parsed,
            });
            if message.trim().is_empty() {
                let pending = session.document.as_ref().and_then(|doc| {
                    let table = doc.parsed.primary_table()?;
                    let mapping = table.column_mapping()?;
                    Some(PendingOperation::AwaitingBulkImportConfirm {
                        file_name: doc.file_name.clone(),
                        table: table.clone(),
                        mapping,
                    })
                });
                if let Some(pending) = pending {
                    session.set_pending(pending);
                }
                return Ok(response::document_menu(&attachment.file_name, row_count));
            }
        }

        if let Some(response) = self.handle_follow_up(session, message).await? {
            return Ok(response);
        }

        let mut intent = self.router.route(message, session.has_document());
        debug!(category = ?intent.category, confidence = ?intent.confidence, "message routed");
        self.handle_intent(session, &mut intent, message).await
    }

    /// Try the message as an answer to the pending operation. `None`
    /// means it was not one; the caller routes it fresh (the pending
    /// operation has then already been dropped).
    async fn handle_follow_up(
        &self,
        session: &mut Session,
        message: &str,
    ) -> Result<Option<Response>> {
        let Some(pending) = session.pending.clone() else {
            return Ok(None);
        };
        let decision = followup::resolve(&pending, message);
        debug!(decision = ?decision, "follow-up resolved");

        let response = match (decision, pending) {
            (FollowUpDecision::NotFollowUp, _) => {
                session.clear_pending();
                return Ok(None);
            }
            (FollowUpDecision::Cancel, _) => {
                session.clear_pending();
                response::cancelled()
            }
            (FollowUpDecision::Invalid(reason), _) => {
                session.clear_pending();
                Response::text(format!(
                    "{reason}, so I've cancelled that operation. Please start again."
                ))
            }
            (
                FollowUpDecision::SubtypeChosen(subtype),
                PendingOperation::AwaitingSubtype {
                    object_type,
                    mut fields,
                    ..
                },
            ) => {
                session.clear_pending();
                fields.subtype = Some(subtype.id);
                let domain = self.default_domain_id().await?;
                let record = self.isms.create_object(&object_type, fields, &domain).await?;
                response::object_created(record)
            }
            (
                FollowUpDecision::ReportAddScopes(added),
                PendingOperation::AwaitingReportScope {
                    report_type,
                    candidates,
                    mut selected,
                },
            ) => {
                for scope in added {
                    if !selected.iter().any(|s| s.id == scope.id) {
                        selected.push(scope);
                    }
                }
                let response = response::scopes_added(&selected);
                session.set_pending(PendingOperation::AwaitingReportScope {
                    report_type,
                    candidates,
                    selected,
                });
                response
            }
            (
                FollowUpDecision::ReportConfirm,
                PendingOperation::AwaitingReportScope {
                    report_type,
                    candidates,
                    selected,
                },
            ) => {
                if selected.is_empty() {
                    let response = Response::text(
                        "Pick at least one scope first; reply with numbers, a scope name, or 'all'.",
                    );
                    session.set_pending(PendingOperation::AwaitingReportScope {
                        report_type,
                        candidates,
                        selected,
                    });
                    response
                } else {
                    session.clear_pending();
                    self.generate_report(report_type, &selected).await?
                }
            }
            (
                FollowUpDecision::BulkImportRequested,
                PendingOperation::AwaitingBulkImportConfirm { table, .. },
            ) => {
                // The pending confirmation stays in place.
                response::bulk_confirm_prompt(table.rows.len())
            }
            (
                FollowUpDecision::BulkConfirm,
                PendingOperation::AwaitingBulkImportConfirm { table, mapping, .. },
            ) => {
                session.clear_pending();
                self.commit_bulk_import(&table, mapping).await?
            }
            // A decision that does not fit the pending operation means
            // the state machine drifted; start over.
            (decision, _) => {
                warn!(decision = ?decision, "follow-up decision did not match pending state");
                session.clear_pending();
                return Ok(None);
            }
        };
        Ok(Some(response))
    }

    async fn handle_intent(
        &self,
        session: &mut Session,
        intent: &mut Intent,
        message: &str,
    ) -> Result<Response> {
        match intent.category {
            IntentCategory::Greeting => Ok(Response::text(GREETING_TEXT)),
            IntentCategory::Thanks => Ok(Response::text(THANKS_TEXT)),
            IntentCategory::Crud(CrudVerb::Create) => {
                self.handle_create(session, intent, message).await
            }
            IntentCategory::Crud(CrudVerb::List) => self.handle_list(intent).await,
            IntentCategory::Crud(CrudVerb::Get) | IntentCategory::Crud(CrudVerb::Analyze) => {
                self.handle_get(intent).await
            }
            IntentCategory::Crud(CrudVerb::Update) => self.handle_update(intent).await,
            IntentCategory::Crud(CrudVerb::Delete) => self.handle_delete(intent).await,
            IntentCategory::Report => {
                let report_type = intent.report_type.unwrap_or(ReportType::InventoryOfAssets);
                self.handle_report(session, report_type).await
            }
            IntentCategory::BulkImport => self.begin_bulk_import(session),
            IntentCategory::DocumentAnalysis => self.handle_document_analysis(session).await,
            IntentCategory::DocumentQuery => self.handle_document_query(session, message).await,
            IntentCategory::KnowledgeQuestion | IntentCategory::Conversational => {
                Ok(self.reason_or_fallback(session, intent, message).await)
            }
        }
    }

    // -- CRUD handlers --

    async fn handle_create(
        &self,
        session: &mut Session,
        intent: &Intent,
        message: &str,
    ) -> Result<Response> {
        let Some(object_type) = intent.object_type.clone() else {
            return Ok(Response::text(
                "What type of object would you like to create? For example: \
                 'create asset named Mail Server'.",
            ));
        };
        let Some(name) = intent.params.name.clone() else {
            return Ok(Response::text(format!(
                "What should the new {object_type} be called?"
            )));
        };

        let mut fields = ObjectFields::named(name.clone());
        fields.abbreviation = intent.params.abbreviation.clone();
        fields.description = intent.params.description.clone();
        fields.status = Some(self.config.isms.default_status.clone());

        let domain = self.default_domain_id().await?;
        let candidates = self.isms.list_subtypes(&object_type, &domain).await?;

        if candidates.is_empty() {
            fields.subtype = intent.params.subtype.clone();
        } else if let Some(chosen) =
            choose_subtype(&candidates, intent.params.subtype.as_deref(), message)
        {
            fields.subtype = Some(chosen.id.clone());
        } else if candidates.len() == 1 {
            fields.subtype = Some(candidates[0].id.clone());
        } else {
            let response = response::subtype_prompt(&object_type, &name, &candidates);
            session.set_pending(PendingOperation::AwaitingSubtype {
                object_type,
                fields,
                candidates,
            });
            return Ok(response);
        }

        let record = self.isms.create_object(&object_type, fields, &domain).await?;
        info!(object_type = %record.object_type, name = %record.name, "object created");
        Ok(response::object_created(record))
    }

    async fn handle_list(&self, intent: &Intent) -> Result<Response> {
        let Some(object_type) = intent.object_type.as_deref() else {
            return Ok(Response::text(
                "What would you like to list? For example: 'list assets'.",
            ));
        };
        let domain = self.default_domain_id().await?;
        let objects = self.isms.list_objects(object_type, &domain).await?;
        Ok(response::object_list(
            self.router.vocabulary().plural(object_type),
            objects,
        ))
    }

    async fn handle_get(&self, intent: &Intent) -> Result<Response> {
        let (object_type, name) = self.require_target(intent)?;
        let domain = self.default_domain_id().await?;
        let record = resolve_object(self.isms.as_ref(), &object_type, &name, &domain).await?;
        Ok(response::object_details(record))
    }

    async fn handle_update(&self, intent: &Intent) -> Result<Response> {
        let (object_type, name) = self.require_target(intent)?;
        let (Some(field), Some(value)) = (&intent.params.field, &intent.params.value) else {
            return Ok(Response::text(format!(
                "Which field should I change on {object_type} '{name}'? For example: \
                 \"update {object_type} '{name}' description to 'new text'\"."
            )));
        };

        let domain = self.default_domain_id().await?;
        let record = resolve_object(self.isms.as_ref(), &object_type, &name, &domain).await?;
        let mut fields = ObjectFields::default();
        fields.set(field, value.clone());
        let updated = self.isms.update_object(&record.id, fields).await?;
        info!(object_type = %updated.object_type, name = %updated.name, field, "object updated");
        Ok(response::object_updated(updated, field))
    }

    async fn handle_delete(&self, intent: &Intent) -> Result<Response> {
        let (object_type, name) = self.require_target(intent)?;
        let domain = self.default_domain_id().await?;
        let record = resolve_object(self.isms.as_ref(), &object_type, &name, &domain).await?;
        self.isms.delete_object(&record.id).await?;
        info!(object_type = %record.object_type, name = %record.name, "object deleted");
        Ok(response::object_deleted(&record.object_type, &record.name))
    }

    fn require_target(&self, intent: &Intent) -> Result<(String, String)> {
        let object_type = intent
            .object_type
            .clone()
            .ok_or_else(|| ChatError::Validation("Please tell me the object type.".to_string()))?;
        let name = intent.params.name.clone().ok_or_else(|| {
            ChatError::Validation(format!("Which {object_type} do you mean? Give me its name."))
        })?;
        Ok((object_type, name))
    }

    // -- reports --

    async fn handle_report(
        &self,
        session: &mut Session,
        report_type: ReportType,
    ) -> Result<Response> {
        let domain = self.default_domain_id().await?;
        let scopes = self.isms.list_scopes(&domain).await?;
        let candidates: Vec<ScopeChoice> = scopes
            .into_iter()
            .map(|s| ScopeChoice {
                id: s.id,
                name: s.name,
            })
            .collect();

        match candidates.len() {
            0 => Ok(Response::text(
                "There are no scopes yet, and a report needs at least one target scope. \
                 You can say 'create scope named Production' first.",
            )),
            1 => self.generate_report(report_type, &candidates).await,
            _ => {
                let response = response::scope_prompt(report_type, &candidates);
                session.set_pending(PendingOperation::AwaitingReportScope {
                    report_type,
                    candidates,
                    selected: Vec::new(),
                });
                Ok(response)
            }
        }
    }

    async fn generate_report(
        &self,
        report_type: ReportType,
        targets: &[ScopeChoice],
    ) -> Result<Response> {
        let request = ReportRequest {
            report_type,
            output_type: self.config.report.output_type.clone(),
            language: self.config.report.language.clone(),
            time_zone: self.config.report.time_zone.clone(),
            targets: targets
                .iter()
                .map(|s| ReportTarget::scope(s.id.clone()))
                .collect(),
        };
        let artifact = self.isms.generate_report(request).await?;
        info!(report_type = report_type.slug(), targets = targets.len(), "report generated");
        Ok(response::report_ready(report_type, artifact))
    }

    // -- documents --

    /// Stage a bulk import: snapshot the stored document's rows into a
    /// pending confirmation and ask for the go-ahead. Nothing is
    /// created until the user confirms.
    fn begin_bulk_import(&self, session: &mut Session) -> Result<Response> {
        let (file_name, table, mapping) = {
            let doc = session.document.as_ref().ok_or_else(|| {
                ChatError::Validation(
                    "Please upload a spreadsheet first; then I can import its rows as assets."
                        .to_string(),
                )
            })?;
            let table = doc.parsed.primary_table().ok_or_else(|| {
                ChatError::Validation(
                    "The uploaded document has no table rows to import.".to_string(),
                )
            })?;
            let mapping = table.column_mapping().ok_or_else(|| {
                ChatError::Validation(
                    "I couldn't find a name column in the uploaded table.".to_string(),
                )
            })?;
            (doc.file_name.clone(), table.clone(), mapping)
        };

        let row_count = table.rows.len();
        session.set_pending(PendingOperation::AwaitingBulkImportConfirm {
            file_name,
            table,
            mapping,
        });
        Ok(response::bulk_confirm_prompt(row_count))
    }

    async fn commit_bulk_import(
        &self,
        table: &ParsedTable,
        mapping: ColumnMapping,
    ) -> Result<Response> {
        let domain = self.default_domain_id().await?;
        let mut created = Vec::new();
        let mut failed = Vec::new();

        for row in &table.rows {
            let name = row.get(mapping.name).map(|s| s.trim()).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            let mut fields = ObjectFields::named(name);
            fields.status = Some(self.config.isms.default_status.clone());
            if let Some(i) = mapping.description {
                fields.description = row.get(i).map(|s| s.trim()).filter(|s| !s.is_empty()).map(String::from);
            }
            if let Some(i) = mapping.subtype {
                fields.subtype = row.get(i).map(|s| s.trim()).filter(|s| !s.is_empty()).map(String::from);
            }
            match self.isms.create_object("asset", fields, &domain).await {
                Ok(record) => created.push(record.name),
                Err(e) => failed.push((name.to_string(), e.to_string())),
            }
        }

        info!(created = created.len(), failed = failed.len(), "bulk import finished");
        Ok(response::bulk_summary(&created, &failed))
    }

    async fn handle_document_analysis(&self, session: &mut Session) -> Result<Response> {
        let Some(doc) = &session.document else {
            return Ok(Response::text("Please upload a document first."));
        };
        let summary = doc.structural_summary();
        let query = "Summarize this document for an ISMS officer.";
        match self.try_reason(session, query).await {
            Some(answer) => Ok(Response::text(answer)),
            None => Ok(Response::text(summary)),
        }
    }

    async fn handle_document_query(&self, session: &mut Session, message: &str) -> Result<Response> {
        let Some(doc) = &session.document else {
            return Ok(Response::text("Please upload a document first."));
        };
        let summary = doc.structural_summary();
        match self.try_reason(session, message).await {
            Some(answer) => Ok(Response::text(answer)),
            None => Ok(Response::text(summary)),
        }
    }

    // -- reasoning --

    async fn reason_or_fallback(
        &self,
        session: &Session,
        intent: &mut Intent,
        query: &str,
    ) -> Response {
        match self.try_reason(session, query).await {
            Some(answer) => Response::text(answer),
            None => {
                intent.confidence = Confidence::Fallback;
                debug!(confidence = ?intent.confidence, "degraded reply");
                Response::text(LLM_UNAVAILABLE_FALLBACK)
            }
        }
    }

    async fn try_reason(&self, session: &Session, query: &str) -> Option<String> {
        if !self.config.llm.enabled {
            return None;
        }
        let llm = self.llm.as_ref()?;
        let document_context = session.document.as_ref().map(|d| d.parsed.text.as_str());
        match reason_with_timeout(
            llm.as_ref(),
            self.config.llm.timeout_secs,
            query,
            &session.history,
            document_context,
        )
        .await
        {
            Ok(answer) => Some(answer),
            Err(e) => {
                warn!(error = %e, "reasoning unavailable, falling back");
                None
            }
        }
    }

    async fn default_domain_id(&self) -> Result<String> {
        let domains = self.isms.list_domains().await?;
        domains
            .into_iter()
            .next()
            .map(|d| d.id)
            .ok_or_else(|| ChatError::ToolUnavailable("no accessible domains".to_string()))
    }
}

/// Pick a subtype without asking: an explicit request matched against
/// the candidates, or a candidate mentioned verbatim in the message.
fn choose_subtype<'a>(
    candidates: &'a [veria_isms::Subtype],
    explicit: Option<&str>,
    message: &str,
) -> Option<&'a veria_isms::Subtype> {
    if let Some(wanted) = explicit {
        let wanted = wanted.to_lowercase();
        return candidates
            .iter()
            .find(|c| c.normalized_id() == wanted || c.label.to_lowercase() == wanted);
    }
    let lower = message.to_lowercase();
    candidates
        .iter()
        .find(|c| lower.contains(&c.normalized_id()) || lower.contains(&c.label.to_lowercase()))
}
