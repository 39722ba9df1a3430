//! # Station Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PACKLIST_BOX_PREFIX=WB_                                            │
//! │     PACKLIST_MAIL_RECIPIENT=warehouse@example.com                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $PACKLIST_CONFIG, or                                               │
//! │     ~/.config/packlist-station/station.toml (Linux)                    │
//! │     ~/Library/Application Support/com.packlist.station/station.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # station.toml
//! [scan]
//! box_prefix = "WB_"
//! marking_prefixes = []
//!
//! [export]
//! file_name = "PackingList.xlsx"
//! sheet_name = "My Sheet"
//! # cache_dir = "/var/tmp/packlist"
//! yes_label = "да"
//! no_label = "нет"
//!
//! [share]
//! # program = "xdg-open"
//! dialog_title = "Packing List"
//!
//! [mail]
//! recipient = "youremail@example.com"
//! subject = "Packing List"
//! body_prefix = "Here is the packing list: "
//! ```
//!
//! Configuration is read once at startup and never changes afterwards.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use packlist_core::validation::validate_box_prefix;
use packlist_core::{CoreResult, MarkingDetector, NoMarking, ScanRules, DEFAULT_BOX_PREFIX};
use packlist_export::{
    ExportCache, ExportLayout, ExportResult, MarkingLabels, DEFAULT_FILE_NAME, DEFAULT_SHEET_NAME,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Explicit config file location.
pub const CONFIG_PATH_ENV: &str = "PACKLIST_CONFIG";

/// Longest worksheet name a workbook accepts.
const MAX_SHEET_NAME_LEN: usize = 31;

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

/// How decoded codes are classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Prefix every box code carries.
    #[serde(default = "default_box_prefix")]
    pub box_prefix: String,

    /// Product codes starting with any of these carry a marking code (KIZ).
    /// Empty means no product is marked.
    #[serde(default)]
    pub marking_prefixes: Vec<String>,
}

fn default_box_prefix() -> String {
    DEFAULT_BOX_PREFIX.to_string()
}

impl Default for ScanSettings {
    fn default() -> Self {
        ScanSettings {
            box_prefix: default_box_prefix(),
            marking_prefixes: Vec::new(),
        }
    }
}

/// Where and how the workbook is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_file_name")]
    pub file_name: String,

    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Overrides the platform cache directory.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    #[serde(default = "default_yes_label")]
    pub yes_label: String,

    #[serde(default = "default_no_label")]
    pub no_label: String,
}

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

fn default_yes_label() -> String {
    MarkingLabels::default().yes
}

fn default_no_label() -> String {
    MarkingLabels::default().no
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            file_name: default_file_name(),
            sheet_name: default_sheet_name(),
            cache_dir: None,
            yes_label: default_yes_label(),
            no_label: default_no_label(),
        }
    }
}

/// Share sheet handoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSettings {
    /// Program that receives the export path. Platform opener when unset.
    #[serde(default)]
    pub program: Option<String>,

    #[serde(default = "default_title")]
    pub dialog_title: String,
}

fn default_title() -> String {
    "Packing List".to_string()
}

impl Default for ShareSettings {
    fn default() -> Self {
        ShareSettings {
            program: None,
            dialog_title: default_title(),
        }
    }
}

/// Mail handoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailSettings {
    #[serde(default = "default_recipient")]
    pub recipient: String,

    #[serde(default = "default_title")]
    pub subject: String,

    /// Text placed before the export URI in the mail body.
    #[serde(default = "default_body_prefix")]
    pub body_prefix: String,

    /// Program that opens `mailto:` links. Platform opener when unset.
    #[serde(default)]
    pub program: Option<String>,
}

fn default_recipient() -> String {
    "youremail@example.com".to_string()
}

fn default_body_prefix() -> String {
    "Here is the packing list: ".to_string()
}

impl Default for MailSettings {
    fn default() -> Self {
        MailSettings {
            recipient: default_recipient(),
            subject: default_title(),
            body_prefix: default_body_prefix(),
            program: None,
        }
    }
}

// =============================================================================
// Station Configuration
// =============================================================================

/// Complete station configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    #[serde(default)]
    pub scan: ScanSettings,

    #[serde(default)]
    pub export: ExportSettings,

    #[serde(default)]
    pub share: ShareSettings,

    #[serde(default)]
    pub mail: MailSettings,
}

impl StationConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (station.toml), if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading station config from file");
                let contents = std::fs::read_to_string(path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_box_prefix(&self.scan.box_prefix)
            .map_err(|e| ConfigError::Invalid(format!("scan.box_prefix: {}", e)))?;

        if self.scan.marking_prefixes.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::Invalid(
                "scan.marking_prefixes must not contain empty entries".into(),
            ));
        }

        let file_name = &self.export.file_name;
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "export.file_name must be a bare file name, got: '{}'",
                file_name
            )));
        }
        if !file_name.to_lowercase().ends_with(".xlsx") {
            return Err(ConfigError::Invalid(format!(
                "export.file_name must end with .xlsx, got: '{}'",
                file_name
            )));
        }

        let sheet = &self.export.sheet_name;
        if sheet.trim().is_empty()
            || sheet.chars().count() > MAX_SHEET_NAME_LEN
            || sheet.contains(['[', ']', ':', '*', '?', '/', '\\'])
        {
            return Err(ConfigError::Invalid(format!(
                "export.sheet_name is not a valid worksheet name: '{}'",
                sheet
            )));
        }

        if self.export.yes_label.is_empty()
            || self.export.no_label.is_empty()
            || self.export.yes_label == self.export.no_label
        {
            return Err(ConfigError::Invalid(
                "export.yes_label and export.no_label must be distinct and non-empty".into(),
            ));
        }

        let recipient = &self.mail.recipient;
        if !recipient.contains('@') || recipient.contains(['?', '&', ' ']) {
            return Err(ConfigError::Invalid(format!(
                "mail.recipient is not an email address: '{}'",
                recipient
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(prefix) = std::env::var("PACKLIST_BOX_PREFIX") {
            debug!(prefix = %prefix, "Overriding box prefix from environment");
            self.scan.box_prefix = prefix;
        }

        if let Ok(dir) = std::env::var("PACKLIST_EXPORT_DIR") {
            debug!(dir = %dir, "Overriding export directory from environment");
            self.export.cache_dir = Some(PathBuf::from(dir));
        }

        if let Ok(name) = std::env::var("PACKLIST_EXPORT_FILE") {
            self.export.file_name = name;
        }

        if let Ok(sheet) = std::env::var("PACKLIST_SHEET_NAME") {
            self.export.sheet_name = sheet;
        }

        if let Ok(program) = std::env::var("PACKLIST_SHARE_PROGRAM") {
            self.share.program = Some(program);
        }

        if let Ok(recipient) = std::env::var("PACKLIST_MAIL_RECIPIENT") {
            debug!(recipient = %recipient, "Overriding mail recipient from environment");
            self.mail.recipient = recipient;
        }

        if let Ok(program) = std::env::var("PACKLIST_MAIL_PROGRAM") {
            self.mail.program = Some(program);
        }
    }

    /// Returns the config file path: `$PACKLIST_CONFIG`, else the platform
    /// config directory.
    pub fn resolve_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "packlist", "station")
            .map(|dirs| dirs.config_dir().join("station.toml"))
    }
}

// =============================================================================
// Config State
// =============================================================================

/// Station configuration plus the values derived from it.
///
/// ## Thread Safety
/// Read-only after startup, so no mutex.
#[derive(Debug, Clone, Default)]
pub struct ConfigState {
    config: StationConfig,
    source: Option<PathBuf>,
}

impl ConfigState {
    /// Wraps an already loaded configuration.
    pub fn new(config: StationConfig) -> Self {
        ConfigState {
            config,
            source: None,
        }
    }

    /// Resolves the config path and loads from it.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = StationConfig::resolve_path(explicit);
        let config = StationConfig::load(path.as_deref())?;

        Ok(ConfigState {
            config,
            source: path.filter(|p| p.exists()),
        })
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    /// File the configuration was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Scan rules for a new session.
    pub fn scan_rules(&self) -> CoreResult<ScanRules> {
        ScanRules::with_box_prefix(self.config.scan.box_prefix.clone())
    }

    /// Marking predicate for a new session.
    pub fn marking_detector(&self) -> Arc<dyn MarkingDetector> {
        let prefixes = self.config.scan.marking_prefixes.clone();
        if prefixes.is_empty() {
            return Arc::new(NoMarking);
        }
        Arc::new(move |barcode: &str| prefixes.iter().any(|p| barcode.starts_with(p.as_str())))
    }

    /// Workbook layout.
    pub fn layout(&self) -> ExportLayout {
        ExportLayout {
            sheet_name: self.config.export.sheet_name.clone(),
            labels: MarkingLabels {
                yes: self.config.export.yes_label.clone(),
                no: self.config.export.no_label.clone(),
            },
        }
    }

    /// Export file location.
    pub fn export_cache(&self) -> ExportResult<ExportCache> {
        ExportCache::resolve(
            self.config.export.cache_dir.as_deref(),
            &self.config.export.file_name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: [&str; 8] = [
        CONFIG_PATH_ENV,
        "PACKLIST_BOX_PREFIX",
        "PACKLIST_EXPORT_DIR",
        "PACKLIST_EXPORT_FILE",
        "PACKLIST_SHEET_NAME",
        "PACKLIST_SHARE_PROGRAM",
        "PACKLIST_MAIL_RECIPIENT",
        "PACKLIST_MAIL_PROGRAM",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_default_config() {
        clear_env();
        let config = StationConfig::default();
        assert_eq!(config.scan.box_prefix, "WB_");
        assert_eq!(config.export.file_name, "PackingList.xlsx");
        assert_eq!(config.export.sheet_name, "My Sheet");
        assert_eq!(config.export.yes_label, "да");
        assert_eq!(config.mail.recipient, "youremail@example.com");
        assert_eq!(config.mail.subject, "Packing List");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_from_file_with_partial_sections() {
        clear_env();
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("station.toml");
        std::fs::write(
            &path,
            r#"
[scan]
box_prefix = "BX-"

[mail]
recipient = "warehouse@example.com"
"#,
        )
        .unwrap();

        let config = StationConfig::load(Some(&path)).unwrap();

        assert_eq!(config.scan.box_prefix, "BX-");
        assert_eq!(config.mail.recipient, "warehouse@example.com");
        assert_eq!(config.mail.subject, "Packing List");
        assert_eq!(config.export, ExportSettings::default());
    }

    #[test]
    #[serial]
    fn test_missing_file_uses_defaults() {
        clear_env();
        let tmp = tempfile::tempdir().unwrap();
        let config = StationConfig::load(Some(&tmp.path().join("absent.toml"))).unwrap();
        assert_eq!(config, StationConfig::default());
    }

    #[test]
    #[serial]
    fn test_malformed_file_is_parse_error() {
        clear_env();
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("station.toml");
        std::fs::write(&path, "[scan\nbox_prefix = ").unwrap();

        let err = StationConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        // A broken file stops startup instead of silently falling back to defaults.
        assert!(ConfigState::load(Some(path)).is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("station.toml");
        std::fs::write(&path, "[scan]\nbox_prefix = \"BX-\"\n").unwrap();

        std::env::set_var("PACKLIST_BOX_PREFIX", "CRATE_");
        std::env::set_var("PACKLIST_EXPORT_DIR", tmp.path());
        std::env::set_var("PACKLIST_MAIL_RECIPIENT", "ops@example.com");
        let config = StationConfig::load(Some(&path));
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.scan.box_prefix, "CRATE_");
        assert_eq!(config.export.cache_dir.as_deref(), Some(tmp.path()));
        assert_eq!(config.mail.recipient, "ops@example.com");
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_fails_validation() {
        clear_env();
        std::env::set_var("PACKLIST_BOX_PREFIX", "W B");
        let result = StationConfig::load(None);
        clear_env();

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    #[serial]
    fn test_resolve_path_prefers_explicit_then_env() {
        clear_env();
        let explicit = PathBuf::from("/etc/packlist/station.toml");
        assert_eq!(
            StationConfig::resolve_path(Some(explicit.clone())),
            Some(explicit)
        );

        std::env::set_var(CONFIG_PATH_ENV, "/srv/station.toml");
        let resolved = StationConfig::resolve_path(None);
        clear_env();
        assert_eq!(resolved, Some(PathBuf::from("/srv/station.toml")));
    }

    #[test]
    fn test_validation() {
        let mut config = StationConfig::default();

        config.export.file_name = "out.csv".to_string();
        assert!(config.validate().is_err());

        config.export.file_name = "../PackingList.xlsx".to_string();
        assert!(config.validate().is_err());

        config.export.file_name = "Box.XLSX".to_string();
        assert!(config.validate().is_ok());

        config.export.sheet_name = "a".repeat(32);
        assert!(config.validate().is_err());
        config.export.sheet_name = "Sheet[1]".to_string();
        assert!(config.validate().is_err());
        config.export.sheet_name = "Packing".to_string();

        config.export.no_label = config.export.yes_label.clone();
        assert!(config.validate().is_err());
        config.export.no_label = "нет".to_string();

        config.mail.recipient = "nobody".to_string();
        assert!(config.validate().is_err());
        config.mail.recipient = "a@b.c".to_string();

        config.scan.marking_prefixes = vec![String::new()];
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_encoded_config_loads_back() {
        clear_env();
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("station.toml");

        let mut config = StationConfig::default();
        config.scan.marking_prefixes = vec!["01".to_string()];
        config.export.cache_dir = Some(tmp.path().to_path_buf());
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(StationConfig::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_config_state_derivations() {
        let mut config = StationConfig::default();
        config.scan.box_prefix = "BX-".to_string();
        config.scan.marking_prefixes = vec!["01".to_string()];
        config.export.sheet_name = "Packing".to_string();
        config.export.cache_dir = Some(PathBuf::from("/tmp/packlist"));
        let state = ConfigState::new(config);

        assert_eq!(state.scan_rules().unwrap().box_prefix, "BX-");
        assert_eq!(state.layout().sheet_name, "Packing");
        assert_eq!(state.layout().labels, MarkingLabels::default());
        assert_eq!(
            state.export_cache().unwrap().file_path(),
            PathBuf::from("/tmp/packlist/PackingList.xlsx")
        );

        let marking = state.marking_detector();
        assert!(marking.has_marking("0104601234567890"));
        assert!(!marking.has_marking("ABC123"));
        assert!(!ConfigState::default().marking_detector().has_marking("0104601234567890"));
    }
}
