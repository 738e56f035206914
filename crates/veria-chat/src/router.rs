//! Intent routing: an ordered table of `RoutingRule` records evaluated
//! by one generic loop. Priority and word-boundary behavior are data,
//! not code order; the first matching rule wins.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use veria_core::config::RouterConfig;
use veria_isms::ReportType;

use crate::error::{ChatError, Result};
use crate::extract::{self, extract_report_type};
use crate::types::{Confidence, CrudVerb, Intent, IntentCategory};
use crate::vocab::ObjectVocabulary;

/// Messages that are exactly one of these are greetings; a greeting
/// embedded in a longer sentence is not.
const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
];

/// Openers that mark a knowledge question. These must never be routed
/// to a deterministic CRUD handler.
const QUESTION_STARTERS: &[&str] = &[
    "how do",
    "how can",
    "how to",
    "what is",
    "what are",
    "what does",
    "what should",
    "why",
    "explain",
    "tell me about",
    "describe",
];

static THANKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:thanks|thank\s*you|thx|ty)\b").expect("thanks pattern"));

static SINGLE_ASSET_CREATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcreate\s+asset\s+(\w+)").expect("single-asset pattern")
});

/// Extra condition a rule's match must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleGuard {
    None,
    /// Only applies when the turn (or session) has a parsed document.
    RequiresDocument,
    /// Bulk triggers must not swallow a single-asset create command.
    NotSingleAssetCreate,
    /// Keyword detectors suppressed when question words are present.
    NoQuestionWords,
}

/// One routing rule. Rules are evaluated in descending priority; the
/// explicit-command rule always outranks every keyword detector so a
/// named entity's text cannot reroute the command.
pub struct RoutingRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub category: IntentCategory,
    pub priority: i32,
    pub guard: RuleGuard,
}

/// Classifies one message into an `Intent`.
pub struct IntentRouter {
    vocab: ObjectVocabulary,
    rules: Vec<RoutingRule>,
}

impl IntentRouter {
    /// Compile the rule table. Fails with `ChatError::Config` on a
    /// malformed pattern; this is fatal at startup, never at runtime.
    pub fn new(config: &RouterConfig) -> Result<Self> {
        let vocab = ObjectVocabulary::from_config(config)?;
        let alt = vocab.alternation();

        let specs: Vec<(&'static str, String, IntentCategory, i32, RuleGuard)> = vec![
            (
                "create-named",
                format!(r"(?i)\b(?:create|add|new|make)\s+(?:a\s+|an\s+)?(?:{alt})\s+(?:named|called)\b"),
                IntentCategory::Crud(CrudVerb::Create),
                100,
                RuleGuard::None,
            ),
            (
                "update",
                format!(r"(?i)\b(?:update|edit|modify)\s+(?:the\s+)?(?:{alt})\b"),
                IntentCategory::Crud(CrudVerb::Update),
                95,
                RuleGuard::None,
            ),
            (
                "delete",
                format!(r"(?i)\b(?:delete|remove)\s+(?:the\s+)?(?:{alt})\b"),
                IntentCategory::Crud(CrudVerb::Delete),
                93,
                RuleGuard::None,
            ),
            (
                "import-menu",
                r"(?i)^(?:i|ii|1|2|one|two)$".to_string(),
                IntentCategory::BulkImport,
                90,
                RuleGuard::RequiresDocument,
            ),
            (
                "analysis-menu",
                r"(?i)^(?:iii|3|three)$".to_string(),
                IntentCategory::DocumentAnalysis,
                89,
                RuleGuard::RequiresDocument,
            ),
            (
                "query-menu",
                r"(?i)^(?:iv|4|four)$".to_string(),
                IntentCategory::DocumentQuery,
                89,
                RuleGuard::RequiresDocument,
            ),
            (
                "report",
                r"(?i)\b(?:generate|create|make|get)\b.*\b(?:report|inventory\s+of\s+assets|risk\s+assessment|statement\s+of\s+applicability)\b"
                    .to_string(),
                IntentCategory::Report,
                88,
                RuleGuard::NoQuestionWords,
            ),
            (
                "bulk-import",
                r"(?i)\b(?:bulk(?:\s+(?:import|create))?|import(?:\s+(?:all|assets|the\s+assets))?|create\s+all(?:\s+assets)?|create\s+assets|create\s+asset\s+all)\b"
                    .to_string(),
                IntentCategory::BulkImport,
                87,
                RuleGuard::NotSingleAssetCreate,
            ),
            (
                "create",
                format!(r"(?i)\b(?:create|add|make|new)\b.*\b(?:{alt})\b"),
                IntentCategory::Crud(CrudVerb::Create),
                85,
                RuleGuard::None,
            ),
            (
                "list",
                format!(r"(?i)\b(?:list|show|display)\b.*\b(?:{alt})\b"),
                IntentCategory::Crud(CrudVerb::List),
                80,
                RuleGuard::None,
            ),
            (
                "get",
                format!(r"(?i)\b(?:get|view)\b.*\b(?:{alt})\b"),
                IntentCategory::Crud(CrudVerb::Get),
                75,
                RuleGuard::None,
            ),
            (
                "analyze-object",
                format!(r"(?i)\banaly[sz]e\b.*\b(?:{alt})\b"),
                IntentCategory::Crud(CrudVerb::Analyze),
                70,
                RuleGuard::None,
            ),
            (
                "document-analysis",
                r"(?i)\b(?:analy[sz]e|analysis|summari[sz]e|summary)\b".to_string(),
                IntentCategory::DocumentAnalysis,
                60,
                RuleGuard::RequiresDocument,
            ),
            (
                "document-query",
                r"(?i)\b(?:rows?|columns?|how\s+many|count)\b".to_string(),
                IntentCategory::DocumentQuery,
                55,
                RuleGuard::RequiresDocument,
            ),
        ];

        let mut rules = Vec::with_capacity(specs.len());
        for (name, pattern, category, priority, guard) in specs {
            let pattern = Regex::new(&pattern)
                .map_err(|e| ChatError::Config(format!("rule '{name}': {e}")))?;
            rules.push(RoutingRule {
                name,
                pattern,
                category,
                priority,
                guard,
            });
        }
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));

        Ok(Self { vocab, rules })
    }

    pub fn vocabulary(&self) -> &ObjectVocabulary {
        &self.vocab
    }

    /// Classify a fresh (non-follow-up) message.
    ///
    /// Never fails on user input: unrecognized messages degrade to the
    /// knowledge-question or conversational category.
    pub fn route(&self, message: &str, has_document: bool) -> Intent {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return delegated(IntentCategory::Conversational);
        }

        let lower = trimmed.to_lowercase();
        if GREETINGS.contains(&lower.as_str()) {
            return Intent::new(IntentCategory::Greeting);
        }
        if THANKS.is_match(trimmed) {
            return Intent::new(IntentCategory::Thanks);
        }

        let normalized = self.vocab.normalize_typos(trimmed);
        let normalized_lower = normalized.to_lowercase();

        if QUESTION_STARTERS
            .iter()
            .any(|s| normalized_lower.starts_with(s))
        {
            return delegated(IntentCategory::KnowledgeQuestion);
        }

        for rule in &self.rules {
            if !self.guard_passes(rule.guard, &normalized_lower, has_document) {
                continue;
            }
            if !rule.pattern.is_match(&normalized) {
                continue;
            }
            debug!(rule = rule.name, "routing rule matched");
            return self.build_intent(rule, &normalized);
        }

        if normalized_lower.contains('?')
            || normalized_lower.starts_with("what")
            || normalized_lower.starts_with("how")
        {
            delegated(IntentCategory::KnowledgeQuestion)
        } else {
            delegated(IntentCategory::Conversational)
        }
    }

    fn guard_passes(&self, guard: RuleGuard, message_lower: &str, has_document: bool) -> bool {
        match guard {
            RuleGuard::None => true,
            RuleGuard::RequiresDocument => has_document,
            RuleGuard::NotSingleAssetCreate => !is_single_asset_create(message_lower),
            RuleGuard::NoQuestionWords => !["what", "how", "why", "which"]
                .iter()
                .any(|q| contains_word(message_lower, q)),
        }
    }

    fn build_intent(&self, rule: &RoutingRule, normalized: &str) -> Intent {
        let mut intent = Intent::new(rule.category);
        intent.confidence = Confidence::Pattern;

        match rule.category {
            IntentCategory::Crud(_) => {
                intent.object_type = self
                    .vocab
                    .detect_object_type(normalized)
                    .map(str::to_string);
                intent.params = extract::extract(normalized, rule.category);
            }
            IntentCategory::Report => {
                // A generic "generate report" defaults to the inventory.
                intent.report_type =
                    Some(extract_report_type(normalized).unwrap_or(ReportType::InventoryOfAssets));
            }
            _ => {}
        }
        intent
    }
}

/// An intent answered by the reasoning service rather than a
/// deterministic handler.
fn delegated(category: IntentCategory) -> Intent {
    let mut intent = Intent::new(category);
    intent.confidence = Confidence::Llm;
    intent
}

/// True for commands like "create asset WebServer" that create exactly
/// one named asset and must not be read as a bulk-import trigger.
fn is_single_asset_create(message_lower: &str) -> bool {
    if let Some(caps) = SINGLE_ASSET_CREATE.captures(message_lower) {
        let name = caps[1].trim();
        return !matches!(name, "asset" | "assets" | "all" | "the")
            && name.len() > 2
            && !name.contains("import")
            && !name.contains("bulk");
    }
    false
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w == word)
}
