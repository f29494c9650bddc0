use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Storage the builders read documents from and write results to
pub trait FileStore: Send + Sync {
    /// Read a whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write text to a file, creating parent directories as needed
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Whether a file exists at the path
    fn exists(&self, path: &Path) -> bool;

    /// Files below `dir` with the given extension, sorted by path
    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>>;
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Path of a flat translation file
    // @params: work_dir, job_name, file_index, language
    pub fn flat_file_path<P: AsRef<Path>>(
        work_dir: P,
        job_name: &str,
        file_index: usize,
        language: &str,
    ) -> PathBuf {
        work_dir
            .as_ref()
            .join(format!("{}_{:03}.{}.txt", job_name, file_index, language))
    }

    /// Parse the file index out of a flat translation file name
    pub fn parse_flat_file_index(path: &Path, job_name: &str, language: &str) -> Option<usize> {
        let name = path.file_name()?.to_str()?;
        let rest = name.strip_prefix(job_name)?.strip_prefix('_')?;
        let digits = rest.strip_suffix(&format!(".{}.txt", language))?;
        if digits.len() < 3 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Document key of a file: its path relative to the folder, `/`-separated
    pub fn document_key<P1: AsRef<Path>, P2: AsRef<Path>>(root: P1, file: P2) -> String {
        let file = file.as_ref();
        let relative = file.strip_prefix(root.as_ref()).unwrap_or(file);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}

impl FileStore for FileManager {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        Self::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        Self::write_to_file(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        Self::file_exists(path)
    }

    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        Self::find_files(dir, extension)
    }
}
