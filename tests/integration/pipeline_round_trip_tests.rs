/*!
 * Round trips of whole folders through both pipeline phases
 */

use anyhow::Result;
use std::fs;
use std::sync::Arc;
use wikitrans::app_config::Config;
use wikitrans::document::DocumentKind;
use wikitrans::file_utils::{FileManager, FileStore};
use wikitrans::translation::{FolderBuilder, TranslationJob, TranslationJobBuilder};
use crate::common;

/// Test that a same-language job rebuilds every document byte for byte
#[tokio::test]
async fn test_roundTrip_withSameLanguage_shouldReproduceSource() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let source = temp_dir.path().join("source");
    let work = temp_dir.path().join("work");
    let output = temp_dir.path().join("output");
    common::create_test_file(&source, "papers/god.md", common::SAMPLE_ARTICLE)?;

    // The flat files written for "en" are read back as the "en" translation
    let config = Config::new("en", "en", DocumentKind::Book);
    let store: Arc<dyn FileStore> = Arc::new(FileManager);

    let job = TranslationJobBuilder::new(config.clone(), store.clone(), common::english_resolver())?;
    let prepared = job.build(&source, &work).await?;
    assert_eq!(prepared.documents, 1);
    assert_eq!(prepared.translatable_records, 8);

    let folder = FolderBuilder::new(config, store, common::english_resolver())?;
    let summary = folder.build(&source, &work, &output).await?;

    assert_eq!(summary.documents, 1);
    assert_eq!(fs::read_to_string(output.join("papers/god.md"))?, common::SAMPLE_ARTICLE);
    Ok(())
}

/// Test that the intermediate file keeps records but never raw lines
#[tokio::test]
async fn test_prepare_shouldWriteIntermediateFileWithoutRawLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = temp_dir.path().join("source");
    let work = temp_dir.path().join("work");
    common::create_test_file(&source, "god.md", common::SAMPLE_ARTICLE)?;

    let config = Config::new("en", "es", DocumentKind::Article);
    let job = TranslationJobBuilder::new(config, Arc::new(FileManager), common::spanish_resolver())?;
    let summary = job.build(&source, &work).await?;

    let saved = TranslationJob::load(&FileManager, &summary.intermediate_file)?;
    let entry = &saved.documents["god.md"];
    assert_eq!(saved.target_language, "es");
    assert_eq!(entry.records.len(), 30);
    assert!(entry.records.iter().all(|record| record.line.is_empty()));
    assert_eq!(saved.translatable_count(), 8);
    Ok(())
}

/// Test that flat files are split by size and keep document order
#[tokio::test]
async fn test_prepare_withSmallFiles_shouldSplitFlatFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = temp_dir.path().join("source");
    let work = temp_dir.path().join("work");
    common::create_test_file(&source, "a.md", "First line of a\nSecond line of a")?;
    common::create_test_file(&source, "b.md", "Only line of b")?;

    let mut config = Config::new("en", "es", DocumentKind::Article);
    config.max_chars_per_file = 20;
    let job = TranslationJobBuilder::new(config, Arc::new(FileManager), common::spanish_resolver())?;
    let summary = job.build(&source, &work).await?;

    assert_eq!(summary.flat_files.len(), 3);
    assert_eq!(summary.flat_files[0], work.join("translation_000.en.txt"));
    assert_eq!(fs::read_to_string(&summary.flat_files[0])?, "First line of a");
    assert_eq!(fs::read_to_string(&summary.flat_files[2])?, "Only line of b");
    Ok(())
}

/// Test that unresolvable references are counted as warnings only
#[tokio::test]
async fn test_prepare_withUnknownReference_shouldSucceedWithWarning() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = temp_dir.path().join("source");
    let work = temp_dir.path().join("work");
    common::create_test_file(
        &source,
        "a.md",
        "See [UB 99:1.1](/en/The_Urantia_Book/99#p1_1) for more.",
    )?;

    let config = Config::new("en", "es", DocumentKind::Article);
    let job = TranslationJobBuilder::new(config, Arc::new(FileManager), common::spanish_resolver())?;
    let summary = job.build(&source, &work).await?;

    assert_eq!(summary.warnings, 1);
    let saved = TranslationJob::load(&FileManager, &summary.intermediate_file)?;
    assert_eq!(saved.documents["a.md"].errors.len(), 1);
    assert!(saved.documents["a.md"].errors[0].contains("99:1.1"));
    Ok(())
}
