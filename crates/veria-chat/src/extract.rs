//! Parameter extraction: pulls object names, field updates, selection
//! tokens, and report types out of free text. Pure functions, no side
//! effects; a field that cannot be determined stays `None` and the
//! orchestrator asks a clarifying question.

use std::sync::LazyLock;

use regex::Regex;

use veria_isms::ReportType;

use crate::types::{CrudVerb, ExtractedParams, IntentCategory};

/// Words that terminate an unquoted name capture. A name runs up to the
/// first stop keyword, not a fixed word count.
const STOP_KEYWORDS: &[&str] = &[
    "in",
    "for",
    "with",
    "using",
    "to",
    "the",
    "and",
    "description",
    "abbreviation",
    "abbr",
    "subtype",
    "status",
    "named",
    "called",
];

static CREATE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:create|add|new|make)\s+(?:a\s+|an\s+)?[A-Za-z]+\s+["']([^"']+)["']"#)
        .expect("invalid create-quoted pattern")
});

static NAMED_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:named|called)\s+["']([^"']+)["']"#).expect("invalid named-quoted pattern")
});

static NAMED_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:named|called)\s+(.+)$").expect("invalid named-bare pattern")
});

static CREATE_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:create|add|new|make)\s+(?:a\s+|an\s+)?[A-Za-z]+\s+(.+)$")
        .expect("invalid create-bare pattern")
});

static TARGET_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:get|view|delete|remove|analyze)\s+(?:the\s+)?[A-Za-z]+\s+["']([^"']+)["']"#)
        .expect("invalid target-quoted pattern")
});

static TARGET_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:get|view|delete|remove|analyze)\s+(?:the\s+)?[A-Za-z]+\s+(.+)$")
        .expect("invalid target-bare pattern")
});

static UPDATE_REST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:update|edit|modify)\s+(?:the\s+)?[A-Za-z]+\s+(.+)$")
        .expect("invalid update pattern")
});

static UPDATE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<name>.+?)\s+(?:set\s+)?(?P<field>name|description|abbreviation|subtype|status)\s+(?:to|=|as)?\s*(?P<value>.+)$",
    )
    .expect("invalid update-field pattern")
});

static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdescription\s+(.+)$").expect("invalid description pattern")
});

static ABBREVIATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\babbr(?:eviation)?\s+(.+)$").expect("invalid abbreviation pattern")
});

static SUBTYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bsubtype\s+(\S+)").expect("invalid subtype pattern")
});

static ORDINAL_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}(?:[\s,]+\d{1,2})*$").expect("invalid ordinal pattern"));

/// Extract structured parameters for one intent category.
pub fn extract(message: &str, category: IntentCategory) -> ExtractedParams {
    match category {
        IntentCategory::Crud(CrudVerb::Create) => extract_create(message),
        IntentCategory::Crud(CrudVerb::Update) => extract_update(message),
        IntentCategory::Crud(CrudVerb::Get)
        | IntentCategory::Crud(CrudVerb::Delete)
        | IntentCategory::Crud(CrudVerb::Analyze) => extract_target(message),
        _ => ExtractedParams::default(),
    }
}

fn extract_create(message: &str) -> ExtractedParams {
    let mut params = ExtractedParams::default();

    // Quoted names take precedence over any unquoted heuristic.
    if let Some(caps) = NAMED_QUOTED
        .captures(message)
        .or_else(|| CREATE_QUOTED.captures(message))
    {
        params.name = Some(clean_name(&caps[1]));
    } else if let Some(caps) = NAMED_BARE.captures(message) {
        params.name = nonempty(trim_at_stop_keyword(&caps[1]));
    } else if let Some(caps) = CREATE_BARE.captures(message) {
        params.name = nonempty(trim_at_stop_keyword(&caps[1]));
    }

    if let Some(caps) = DESCRIPTION.captures(message) {
        params.description = nonempty(quoted_or_trimmed(&caps[1]));
    }
    if let Some(caps) = ABBREVIATION.captures(message) {
        params.abbreviation = nonempty(quoted_or_trimmed(&caps[1]));
    }
    if let Some(caps) = SUBTYPE.captures(message) {
        params.subtype = Some(caps[1].to_lowercase());
    }

    params
}

fn extract_update(message: &str) -> ExtractedParams {
    let mut params = ExtractedParams::default();
    let Some(rest) = UPDATE_REST.captures(message) else {
        return params;
    };

    if let Some(caps) = UPDATE_FIELD.captures(rest[1].trim()) {
        params.name = nonempty(clean_name(strip_quotes(caps["name"].trim())));
        params.field = Some(caps["field"].to_lowercase());
        params.value = nonempty(strip_quotes(caps["value"].trim()).to_string());
    } else {
        // No field/value pair; at least salvage the target name.
        params.name = nonempty(trim_at_stop_keyword(&rest[1]));
    }
    params
}

fn extract_target(message: &str) -> ExtractedParams {
    let mut params = ExtractedParams::default();
    if let Some(caps) = TARGET_QUOTED.captures(message) {
        params.name = Some(clean_name(&caps[1]));
    } else if let Some(caps) = TARGET_BARE.captures(message) {
        params.name = nonempty(trim_at_stop_keyword(&caps[1]));
    }
    params
}

/// Identify the requested report type from its phrase, most specific
/// phrase first. `None` means "report" was requested generically.
pub fn extract_report_type(message: &str) -> Option<ReportType> {
    let m = message.to_lowercase();
    if m.contains("inventory") && m.contains("asset") {
        Some(ReportType::InventoryOfAssets)
    } else if m.contains("risk") && m.contains("assessment") {
        Some(ReportType::RiskAssessment)
    } else if m.contains("statement") && m.contains("applicability") {
        Some(ReportType::StatementOfApplicability)
    } else if m.contains("inventory") {
        Some(ReportType::InventoryOfAssets)
    } else if m.contains("risk") {
        Some(ReportType::RiskAssessment)
    } else if m.contains("statement") {
        Some(ReportType::StatementOfApplicability)
    } else {
        None
    }
}

/// Interpretation of a short follow-up reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// 1-based choice out of a presented list.
    Ordinal(usize),
    /// Several 1-based choices.
    Ordinals(Vec<usize>),
    Affirm,
    Decline,
    /// Close a multi-step selection ("done", "generate", "confirm").
    Done,
    All,
    /// Anything else; possibly a candidate name, possibly a new command.
    Text(String),
}

/// Parse a follow-up reply into a selection token.
pub fn parse_selection(message: &str) -> Selection {
    let m = message.trim().to_lowercase();
    match m.as_str() {
        "yes" | "y" | "ok" | "okay" | "sure" | "yep" => return Selection::Affirm,
        "no" | "n" | "cancel" | "stop" | "abort" | "never mind" | "nevermind" => {
            return Selection::Decline
        }
        "all" | "all of them" | "everything" => return Selection::All,
        "done" | "confirm" | "generate" | "go ahead" | "proceed" | "finish" => {
            return Selection::Done
        }
        "first" | "1st" => return Selection::Ordinal(1),
        "second" | "2nd" => return Selection::Ordinal(2),
        "third" | "3rd" => return Selection::Ordinal(3),
        "fourth" | "4th" => return Selection::Ordinal(4),
        "fifth" | "5th" => return Selection::Ordinal(5),
        _ => {}
    }

    if ORDINAL_LIST.is_match(&m) {
        let numbers: Vec<usize> = m
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect();
        return match numbers.as_slice() {
            [one] => Selection::Ordinal(*one),
            _ => Selection::Ordinals(numbers),
        };
    }

    Selection::Text(message.trim().to_string())
}

// -- helpers --

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    for quote in ['\'', '"'] {
        if let Some(inner) = s
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    s
}

/// Underscores become spaces and runs of whitespace collapse.
fn clean_name(raw: &str) -> String {
    raw.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn trim_at_stop_keyword(raw: &str) -> String {
    let words: Vec<&str> = raw
        .split_whitespace()
        .take_while(|w| {
            let lower = w.to_lowercase();
            !STOP_KEYWORDS.contains(&lower.as_str())
        })
        .collect();
    clean_name(strip_quotes(&words.join(" ")))
}

fn quoted_or_trimmed(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('\'') || trimmed.starts_with('"') {
        strip_quotes(trimmed).to_string()
    } else {
        trim_at_stop_keyword(trimmed)
    }
}

fn nonempty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
