/*!
 * Core line model for the extraction/reinsertion pipeline.
 *
 * A `LineRecord` is created for every line of a document during extraction,
 * persisted (without its raw text) in the intermediate file, and rebuilt
 * during the build phase where it picks up its translation.
 */

use serde::{Deserialize, Serialize};

use super::reference::StructuredReference;

/// Whether a folder holds book chapters or wiki articles.
///
/// Book documents keep their navigation blocks and carry page, verse and
/// generated-title markup; article documents have navigation stripped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Book,
    #[default]
    Article,
}

impl DocumentKind {
    pub fn is_book(self) -> bool {
        matches!(self, Self::Book)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Book => write!(f, "book"),
            Self::Article => write!(f, "article"),
        }
    }
}

/// Role of a line inside the nested document structure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LineRole {
    Title,
    Description,
    Header,
    Copyright,
    Navigator,
    #[serde(rename = "bookfront")]
    BookFront,
    Image,
    Math,
    Quote,
    Blank,
    Other,
}

/// Contiguous run of quotation lines resolved to a single paragraph reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuoteSpan {
    /// First line index of the run
    pub start: usize,

    /// Last line index of the run (inclusive)
    pub end: usize,

    /// Reference found unambiguously inside the run
    pub reference: StructuredReference,
}

impl QuoteSpan {
    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }
}

/// Position of a record's text inside the flat translation files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TranslationSlot {
    /// Flat file index
    pub file: usize,

    /// Zero-based line inside that file
    pub line: usize,
}

/// One line of a document as it travels through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineRecord {
    /// Zero-based position in the document
    pub index: usize,

    /// Original raw text; never persisted, the source document holds it
    #[serde(skip)]
    pub line: String,

    /// Structural role
    pub role: LineRole,

    /// Text sent for translation, with placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translatable_text: Option<String>,

    /// Pass the line through unchanged
    #[serde(default)]
    pub ignore: bool,

    /// Drop the line from the rebuilt document
    #[serde(default)]
    pub remove: bool,

    /// Substrings replaced by placeholder `{i}`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extracts: Vec<String>,

    /// Quotation run this line belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_span: Option<QuoteSpan>,

    /// Where the translatable text was written for translation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<TranslationSlot>,

    /// Translated text, only present during the build phase
    #[serde(skip)]
    pub translation: Option<String>,
}

impl LineRecord {
    /// Create an untranslatable record for a raw line.
    pub fn new(index: usize, line: impl Into<String>, role: LineRole) -> Self {
        Self {
            index,
            line: line.into(),
            role,
            translatable_text: None,
            ignore: true,
            remove: false,
            extracts: Vec::new(),
            quote_span: None,
            slot: None,
            translation: None,
        }
    }

    /// Whether the record has text to send for translation.
    pub fn is_translatable(&self) -> bool {
        !self.ignore && !self.remove && self.translatable_text.is_some()
    }

    /// Leading whitespace of the raw line.
    pub fn indentation(&self) -> &str {
        let trimmed = self.line.trim_start();
        &self.line[..self.line.len() - trimmed.len()]
    }
}
