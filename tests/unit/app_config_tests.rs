/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use wikitrans::app_config::{Config, LogLevel, PlaceholderPolicy};
use wikitrans::document::DocumentKind;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "es");
    assert_eq!(config.document_kind, DocumentKind::Article);
    assert_eq!(config.max_concurrent_documents, 4);
    assert_eq!(config.job_name, "translation");
    assert_eq!(config.document_extension, "md");
    assert_eq!(config.placeholder_policy, PlaceholderPolicy::Proportional);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::new("en", "fr", DocumentKind::Book);
    assert!(config.validate().is_ok());

    // Invalid source language
    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en".to_string();

    // Same language written two ways
    config.target_language = "eng".to_string();
    assert!(config.validate().is_err());
    config.target_language = "fr".to_string();

    config.max_concurrent_documents = 0;
    assert!(config.validate().is_err());
    config.max_concurrent_documents = 2;

    config.job_name = "nested/job".to_string();
    assert!(config.validate().is_err());
}

/// Test that a configuration survives a save and load cycle
#[test]
fn test_config_saveAndLoad_shouldPreserveSettings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("wikitrans.json");

    let mut config = Config::new("en", "de", DocumentKind::Book);
    config.placeholder_policy = PlaceholderPolicy::Strict;
    config.max_chars_per_file = 5000;
    config.save_to_file(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.target_language, "de");
    assert_eq!(loaded.document_kind, DocumentKind::Book);
    assert_eq!(loaded.placeholder_policy, PlaceholderPolicy::Strict);
    assert_eq!(loaded.max_chars_per_file, 5000);
    Ok(())
}

/// Test that a missing configuration file is reported with its path
#[test]
fn test_config_fromFile_withMissingFile_shouldFail() {
    let result = Config::from_file("does_not_exist.json");
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("does_not_exist.json"));
}

/// Test that the lowercase wire names are used for enums
#[test]
fn test_config_json_shouldUseLowercaseEnumNames() -> Result<()> {
    let json = r#"{
        "source_language": "en",
        "target_language": "pt",
        "document_kind": "book",
        "placeholder_policy": "strict",
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.document_kind, DocumentKind::Book);
    assert_eq!(config.placeholder_policy, PlaceholderPolicy::Strict);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}
