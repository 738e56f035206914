use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, VeriaError};

/// Top-level configuration for the Veria assistant.
///
/// Loaded from `~/.veria/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VeriaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub isms: IsmsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl VeriaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VeriaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| VeriaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Display name the assistant introduces itself with.
    pub assistant_name: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            assistant_name: "Veria".to_string(),
        }
    }
}

/// One ISMS object type the router recognizes, with its canonical
/// English plural. Plurals are explicit data so that irregular forms
/// like "processes" never fall back to naive suffixing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTypeNames {
    pub singular: String,
    pub plural: String,
}

impl ObjectTypeNames {
    pub fn new(singular: &str, plural: &str) -> Self {
        Self {
            singular: singular.to_string(),
            plural: plural.to_string(),
        }
    }
}

/// Intent router settings.
///
/// The typo table maps known misspellings to the keyword they stand for.
/// It is deployment tuning, not a structural contract, which is why it
/// lives in configuration rather than code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Recognized object types with explicit plurals.
    pub object_types: Vec<ObjectTypeNames>,
    /// Known misspellings, replaced whole-word before matching.
    pub typo_variations: BTreeMap<String, String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        let object_types = vec![
            ObjectTypeNames::new("scope", "scopes"),
            ObjectTypeNames::new("asset", "assets"),
            ObjectTypeNames::new("control", "controls"),
            ObjectTypeNames::new("process", "processes"),
            ObjectTypeNames::new("person", "persons"),
            ObjectTypeNames::new("scenario", "scenarios"),
            ObjectTypeNames::new("incident", "incidents"),
            ObjectTypeNames::new("document", "documents"),
        ];

        let typo_variations = BTreeMap::from(
            [
                ("creat", "create"),
                ("crate", "create"),
                ("assest", "asset"),
                ("assests", "assets"),
                ("scop", "scope"),
                ("scops", "scopes"),
                ("scpe", "scope"),
                ("scoope", "scope"),
                ("persn", "person"),
                ("persns", "persons"),
            ]
            .map(|(typo, fix)| (typo.to_string(), fix.to_string())),
        );

        Self {
            object_types,
            typo_variations,
        }
    }
}

/// Session store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minutes of inactivity before a session expires.
    pub timeout_minutes: i64,
    /// Conversation turns of history passed to the reasoning service.
    pub history_turns: usize,
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: 60,
            history_turns: 10,
            max_message_length: 4000,
        }
    }
}

/// ISMS backend adapter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IsmsConfig {
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Status assigned to newly created objects.
    pub default_status: String,
}

impl Default for IsmsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            default_status: "NEW".to_string(),
        }
    }
}

/// LLM reasoning adapter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Whether reasoning delegation is enabled at all.
    pub enabled: bool,
    /// Timeout for one reasoning call in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 30,
        }
    }
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// MIME type of the rendered report artifact.
    pub output_type: String,
    /// Report language code.
    pub language: String,
    /// Time zone stamped into generated reports.
    pub time_zone: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_type: "application/pdf".to_string(),
            language: "en".to_string(),
            time_zone: "UTC".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = VeriaConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.session.timeout_minutes, 60);
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.report.output_type, "application/pdf");
        assert_eq!(config.report.language, "en");
        assert_eq!(config.report.time_zone, "UTC");
    }

    #[test]
    fn test_default_object_types_have_explicit_plurals() {
        let config = RouterConfig::default();
        let process = config
            .object_types
            .iter()
            .find(|t| t.singular == "process")
            .unwrap();
        assert_eq!(process.plural, "processes");
        let asset = config
            .object_types
            .iter()
            .find(|t| t.singular == "asset")
            .unwrap();
        assert_eq!(asset.plural, "assets");
    }

    #[test]
    fn test_default_typo_table() {
        let config = RouterConfig::default();
        assert_eq!(config.typo_variations.get("creat").unwrap(), "create");
        assert_eq!(config.typo_variations.get("assest").unwrap(), "asset");
        assert_eq!(config.typo_variations.get("scops").unwrap(), "scopes");
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"
assistant_name = "Compliance Bot"

[session]
timeout_minutes = 15
history_turns = 4
max_message_length = 1000

[llm]
enabled = false
timeout_secs = 5
"#;
        let file = create_temp_config(content);
        let config = VeriaConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.assistant_name, "Compliance Bot");
        assert_eq!(config.session.timeout_minutes, 15);
        assert!(!config.llm.enabled);
        assert_eq!(config.llm.timeout_secs, 5);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[general]
log_level = "warn"
"#;
        let file = create_temp_config(content);
        let config = VeriaConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.session.timeout_minutes, 60);
        assert_eq!(config.report.language, "en");
    }

    #[test]
    fn test_load_custom_typo_table() {
        let content = r#"
[router]
typo_variations = { "asett" = "asset" }
"#;
        let file = create_temp_config(content);
        let config = VeriaConfig::load(file.path()).unwrap();
        assert_eq!(config.router.typo_variations.get("asett").unwrap(), "asset");
        // Providing the table replaces the defaults wholesale
        assert!(!config.router.typo_variations.contains_key("creat"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = VeriaConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.session.timeout_minutes, 60);
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "this is {{ not valid TOML";
        let file = create_temp_config(content);
        assert!(VeriaConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let config = VeriaConfig::default();
        config.save(&path).unwrap();
        assert!(path.exists());

        let reloaded = VeriaConfig::load(&path).unwrap();
        assert_eq!(reloaded.general.log_level, config.general.log_level);
        assert_eq!(
            reloaded.router.object_types.len(),
            config.router.object_types.len()
        );
        assert_eq!(
            reloaded.router.typo_variations,
            config.router.typo_variations
        );
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = VeriaConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.router.object_types.len(), 8);
    }
}
