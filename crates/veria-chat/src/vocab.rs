//! Object-type vocabulary: typo normalization, word-boundary keyword
//! detection, and explicit singular/plural mapping.

use regex::Regex;

use veria_core::config::RouterConfig;

use crate::error::{ChatError, Result};

struct TypoRule {
    pattern: Regex,
    replacement: String,
}

struct TypeKeyword {
    pattern: Regex,
    keyword: String,
    singular: String,
}

/// Compiled vocabulary for one router configuration.
///
/// All patterns are compiled once at startup; a malformed configuration
/// fails construction with `ChatError::Config` rather than degrading at
/// match time.
pub struct ObjectVocabulary {
    typo_rules: Vec<TypoRule>,
    /// Keywords sorted longest first so plurals match before their
    /// singular prefix.
    keywords: Vec<TypeKeyword>,
    pairs: Vec<(String, String)>,
}

impl ObjectVocabulary {
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        let mut typo_rules = Vec::new();
        for (typo, replacement) in &config.typo_variations {
            let pattern = compile(&format!(r"(?i)\b{}\b", regex::escape(typo)))?;
            typo_rules.push(TypoRule {
                pattern,
                replacement: replacement.clone(),
            });
        }

        let mut keywords = Vec::new();
        for names in &config.object_types {
            for (keyword, singular) in [
                (names.plural.clone(), names.singular.clone()),
                (names.singular.clone(), names.singular.clone()),
            ] {
                let pattern = compile(&format!(r"(?i)\b{}\b", regex::escape(&keyword)))?;
                keywords.push(TypeKeyword {
                    pattern,
                    keyword,
                    singular,
                });
            }
        }
        keywords.sort_by(|a, b| b.keyword.len().cmp(&a.keyword.len()));

        let pairs = config
            .object_types
            .iter()
            .map(|n| (n.singular.clone(), n.plural.clone()))
            .collect();

        Ok(Self {
            typo_rules,
            keywords,
            pairs,
        })
    }

    /// Replace known misspellings, whole words only.
    pub fn normalize_typos(&self, message: &str) -> String {
        let mut out = message.to_string();
        for rule in &self.typo_rules {
            out = rule
                .pattern
                .replace_all(&out, rule.replacement.as_str())
                .into_owned();
        }
        out
    }

    /// Find the object type mentioned in a message, longest keyword
    /// first, and return its singular form.
    pub fn detect_object_type(&self, message: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| k.pattern.is_match(message))
            .map(|k| k.singular.as_str())
    }

    /// Canonical English plural for one object type. An unknown type
    /// passes through unchanged.
    pub fn plural<'a>(&'a self, singular: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(s, _)| s == singular)
            .map(|(_, p)| p.as_str())
            .unwrap_or(singular)
    }

    pub fn singulars(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(s, _)| s.as_str())
    }

    /// Regex alternation over every keyword (plural and singular),
    /// longest first, for embedding into routing rules.
    pub fn alternation(&self) -> String {
        self.keywords
            .iter()
            .map(|k| regex::escape(&k.keyword))
            .collect::<Vec<_>>()
            .join("|")
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ChatError::Config(format!("bad pattern '{pattern}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> ObjectVocabulary {
        ObjectVocabulary::from_config(&RouterConfig::default()).unwrap()
    }

    #[test]
    fn test_every_type_has_canonical_plural() {
        let v = vocab();
        let expected = [
            ("scope", "scopes"),
            ("asset", "assets"),
            ("control", "controls"),
            ("process", "processes"),
            ("person", "persons"),
            ("scenario", "scenarios"),
            ("incident", "incidents"),
            ("document", "documents"),
        ];
        for (singular, plural) in expected {
            assert_eq!(v.plural(singular), plural, "plural of {singular}");
        }
    }

    #[test]
    fn test_plural_unknown_type_passes_through() {
        assert_eq!(vocab().plural("widget"), "widget");
    }

    #[test]
    fn test_detect_plural_resolves_to_singular() {
        let v = vocab();
        assert_eq!(v.detect_object_type("list processes"), Some("process"));
        assert_eq!(v.detect_object_type("show all scopes"), Some("scope"));
        assert_eq!(v.detect_object_type("list assets"), Some("asset"));
    }

    #[test]
    fn test_detect_singular() {
        let v = vocab();
        assert_eq!(v.detect_object_type("create a process"), Some("process"));
        assert_eq!(v.detect_object_type("delete the incident"), Some("incident"));
    }

    #[test]
    fn test_detect_requires_word_boundary() {
        let v = vocab();
        // "assets" inside a longer word must not match
        assert_eq!(v.detect_object_type("reassetsment plan"), None);
        assert_eq!(v.detect_object_type("microscopes are fun"), None);
    }

    #[test]
    fn test_detect_nothing() {
        let v = vocab();
        assert_eq!(v.detect_object_type("hello there"), None);
    }

    #[test]
    fn test_typo_normalization_whole_word() {
        let v = vocab();
        assert_eq!(v.normalize_typos("creat a scop"), "create a scope");
        assert_eq!(v.normalize_typos("list assests"), "list assets");
        // substring of a longer word is untouched
        assert_eq!(v.normalize_typos("lucrative deal"), "lucrative deal");
    }

    #[test]
    fn test_typo_crate_becomes_create() {
        let v = vocab();
        assert_eq!(v.normalize_typos("crate asset Server"), "create asset Server");
    }

    #[test]
    fn test_alternation_lists_longest_first() {
        let v = vocab();
        let alt = v.alternation();
        let processes = alt.find("processes").unwrap();
        let process = alt.rfind("process").unwrap();
        assert!(processes < process);
    }
}
