use std::path::PathBuf;
use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::Language;

/// Upper bound for the deferred full-load delay.
pub const MAX_FULL_LOAD_DELAY_MS: u64 = 60_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "translationFiles.filePattern")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortalSettings {
    /// Language selected when a session starts.
    pub default_language: Language,

    /// Delay between mounting the UI scope and starting the full load.
    /// Keeps the fetch out of the way of first paint.
    pub full_load_delay_ms: u64,

    pub translation_files: TranslationFilesConfig,

    /// Compare full tables against core tables when they load.
    /// Missing core keys are backfilled, contradictions are logged.
    pub consistency_check: bool,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    /// Directory holding the full translation files.
    /// Relative paths are resolved against the workspace root.
    pub directory: PathBuf,
    pub file_pattern: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `PORTAL_I18N_LOG` is unset.
    pub level: String,
    /// Write daily rolling log files here in addition to stderr.
    pub directory: Option<PathBuf>,
}

impl PortalSettings {
    /// # Errors
    /// - Delay out of range
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Invalid log filter
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.full_load_delay_ms > MAX_FULL_LOAD_DELAY_MS {
            errors.push(ValidationError::new(
                "fullLoadDelayMs",
                format!(
                    "The delay must be at most {MAX_FULL_LOAD_DELAY_MS} ms, got {}",
                    self.full_load_delay_ms
                ),
            ));
        }

        if self.translation_files.directory.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.directory",
                "The directory cannot be empty. Example: \"locales/full\"",
            ));
        }

        if self.translation_files.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.filePattern",
                "The pattern cannot be empty. Example: \"**/*.json\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.translation_files.file_pattern) {
            errors.push(ValidationError::new(
                "translationFiles.filePattern",
                format!("Invalid glob pattern '{}': {e}", self.translation_files.file_pattern),
            ));
        }

        if let Err(e) = tracing_subscriber::EnvFilter::try_new(&self.logging.level) {
            errors.push(ValidationError::new(
                "logging.level",
                format!("Invalid log filter '{}': {e}", self.logging.level),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    #[must_use]
    pub const fn full_load_delay(&self) -> Duration {
        Duration::from_millis(self.full_load_delay_ms)
    }
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            default_language: Language::default(),
            full_load_delay_ms: 1_000,
            translation_files: TranslationFilesConfig::default(),
            consistency_check: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self { directory: PathBuf::from("locales/full"), file_pattern: "**/*.json".to_string() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), directory: None }
    }
}
