use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::document::DocumentKind;

/// Application configuration module
/// This module handles the pipeline configuration including loading,
/// validating and saving configuration settings.
/// Represents the pipeline configuration for one folder
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Whether the folder holds book documents or articles
    #[serde(default)]
    pub document_kind: DocumentKind,

    /// Maximum number of documents processed at once
    #[serde(default = "default_max_concurrent_documents")]
    pub max_concurrent_documents: usize,

    /// Maximum characters per flat translation file
    #[serde(default = "default_max_chars_per_file")]
    pub max_chars_per_file: usize,

    /// Stem shared by the intermediate file and the flat files
    #[serde(default = "default_job_name")]
    pub job_name: String,

    /// Extension of the documents to process
    #[serde(default = "default_document_extension")]
    pub document_extension: String,

    /// How placeholders the translation lost or duplicated are restored
    #[serde(default)]
    pub placeholder_policy: PlaceholderPolicy,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Placeholder restoration policy
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderPolicy {
    // @policy: map the placeholder proportionally into the translation
    #[default]
    Proportional,
    // @policy: refuse to guess, flag the record instead
    Strict,
}

impl std::fmt::Display for PlaceholderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Proportional => write!(f, "proportional"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for PlaceholderPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "proportional" => Ok(Self::Proportional),
            "strict" => Ok(Self::Strict),
            _ => Err(anyhow!("Invalid placeholder policy: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_max_concurrent_documents() -> usize {
    4
}

fn default_max_chars_per_file() -> usize {
    20000
}

fn default_job_name() -> String {
    "translation".to_string()
}

fn default_document_extension() -> String {
    "md".to_string()
}

impl Config {
    /// Create a configuration for a language pair with default settings
    pub fn new(source_language: &str, target_language: &str, document_kind: DocumentKind) -> Self {
        Self {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            document_kind,
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if crate::language_utils::language_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!(
                "Source and target language must differ, both are '{}'",
                self.source_language
            ));
        }

        if self.max_concurrent_documents == 0 {
            return Err(anyhow!("max_concurrent_documents must be at least 1"));
        }

        if self.max_chars_per_file == 0 {
            return Err(anyhow!("max_chars_per_file must be at least 1"));
        }

        if self.job_name.trim().is_empty() || self.job_name.contains(['/', '\\']) {
            return Err(anyhow!("Invalid job name: '{}'", self.job_name));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "es".to_string(),
            document_kind: DocumentKind::default(),
            max_concurrent_documents: default_max_concurrent_documents(),
            max_chars_per_file: default_max_chars_per_file(),
            job_name: default_job_name(),
            document_extension: default_document_extension(),
            placeholder_policy: PlaceholderPolicy::default(),
            log_level: LogLevel::default(),
        }
    }
}
