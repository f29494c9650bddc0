/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;
use wikitrans::file_utils::{FileManager, FileStore};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "page.md", "content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that find_files walks nested folders and returns sorted paths
#[test]
fn test_find_files_withNestedFolders_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "b.md", "b")?;
    common::create_test_file(temp_dir.path(), "topics/a.md", "a")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "ignored")?;

    let files = FileManager::find_files(temp_dir.path(), ".md")?;
    let keys: Vec<String> = files
        .iter()
        .map(|file| FileManager::document_key(temp_dir.path(), file))
        .collect();

    assert_eq!(keys, vec!["b.md", "topics/a.md"]);
    Ok(())
}

/// Test that writing through the store creates missing parent folders
#[test]
fn test_fileStore_write_withMissingParents_shouldCreateThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out/es/page.md");

    let store = FileManager;
    store.write(&target, "Hola")?;

    assert!(store.exists(&target));
    assert_eq!(store.read_to_string(&target)?, "Hola");
    Ok(())
}

/// Test flat file naming for both directions of the job
#[test]
fn test_flat_file_path_shouldBeParsedBackForItsLanguageOnly() {
    let path = FileManager::flat_file_path("/work", "job", 7, "es");
    assert_eq!(path, Path::new("/work/job_007.es.txt"));

    assert_eq!(FileManager::parse_flat_file_index(&path, "job", "es"), Some(7));
    assert_eq!(FileManager::parse_flat_file_index(&path, "job", "en"), None);
    assert_eq!(FileManager::parse_flat_file_index(&path, "other", "es"), None);
    assert_eq!(
        FileManager::parse_flat_file_index(Path::new("/work/job_7.es.txt"), "job", "es"),
        None
    );
}
