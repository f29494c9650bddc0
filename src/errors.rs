/*!
 * Error types for the wikitrans pipeline.
 *
 * Per-record and per-document failures are collected as `PipelineError`
 * values and merged upward into a `PipelineErrors` set, which is only
 * returned once every document of a folder has been attempted.
 */

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single failure raised while extracting or rebuilding a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Quote span content lines do not match the paragraphs of its reference
    #[error("{document} line {}: quote span has {lines} content lines but {reference} spans {paragraphs} paragraphs", .line + 1)]
    StructuralMismatch {
        /// Document key
        document: String,
        /// Zero-based line index
        line: usize,
        /// Reference the span resolved to
        reference: String,
        /// Content lines found in the span
        lines: usize,
        /// Paragraphs covered by the reference
        paragraphs: usize,
    },

    /// The target-language resolver has no paragraph for a reference
    #[error("{document} line {}: reference {reference} not found", .line + 1)]
    ReferenceNotFound {
        /// Document key
        document: String,
        /// Zero-based line index
        line: usize,
        /// Reference that failed to resolve
        reference: String,
    },

    /// A translatable record has no translated text
    #[error("{document} line {}: translation missing", .line + 1)]
    MissingTranslation {
        /// Document key
        document: String,
        /// Zero-based line index
        line: usize,
    },

    /// A placeholder could not be placed and the placement policy refused to guess
    #[error("{document} line {}: placeholder {{{index}}} could not be placed", .line + 1)]
    PlaceholderUnresolved {
        /// Document key
        document: String,
        /// Zero-based line index
        line: usize,
        /// Extract index of the placeholder
        index: usize,
    },

    /// Rebuild invoked without a prior extraction pass
    #[error("Intermediate file not found: {0}")]
    IntermediateFileMissing(PathBuf),

    /// Rebuild invoked before any translated file was delivered
    #[error("No translated files found for job '{job}' in {dir}")]
    TranslatedFilesMissing {
        /// Work folder that was searched
        dir: PathBuf,
        /// Job name used in the file pattern
        job: String,
    },

    /// The source document no longer matches the records extracted from it
    #[error("{document}: source has {found} lines but {expected} records were extracted")]
    SourceChanged {
        /// Document key
        document: String,
        /// Records in the intermediate file
        expected: usize,
        /// Lines in the source document now
        found: usize,
    },

    /// Reading or writing a file failed
    #[error("File error: {0}")]
    File(String),

    /// The intermediate file could not be parsed or written
    #[error("Intermediate data error: {0}")]
    Serialization(String),

    /// A document job did not run to completion
    #[error("Document task failed: {0}")]
    TaskFailed(String),
}

impl PipelineError {
    /// Document key the error belongs to, when it is document-scoped
    pub fn document(&self) -> Option<&str> {
        match self {
            Self::StructuralMismatch { document, .. }
            | Self::ReferenceNotFound { document, .. }
            | Self::MissingTranslation { document, .. }
            | Self::PlaceholderUnresolved { document, .. }
            | Self::SourceChanged { document, .. } => Some(document),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for PipelineError {
    fn from(error: anyhow::Error) -> Self {
        Self::File(format!("{:#}", error))
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Aggregated failures of a folder-level operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineErrors(Vec<PipelineError>);

impl PipelineErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: PipelineError) {
        self.0.push(error);
    }

    pub fn extend<I: IntoIterator<Item = PipelineError>>(&mut self, errors: I) {
        self.0.extend(errors);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[PipelineError] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<PipelineError> {
        self.0
    }

    /// `Ok(value)` when nothing was collected, otherwise the whole set
    pub fn into_result<T>(self, value: T) -> Result<T, PipelineErrors> {
        if self.0.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<PipelineError> for PipelineErrors {
    fn from(error: PipelineError) -> Self {
        Self(vec![error])
    }
}

impl From<Vec<PipelineError>> for PipelineErrors {
    fn from(errors: Vec<PipelineError>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for PipelineErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for PipelineErrors {}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more documents failed
    #[error("Pipeline failed: {0}")]
    Pipeline(#[from] PipelineErrors),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
