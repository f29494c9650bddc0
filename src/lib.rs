/*!
 * # wikitrans
 *
 * Translation extraction and reinsertion for the multi-language editions of a
 * wiki corpus built around a book of numbered papers, sections and paragraphs.
 *
 * ## Features
 *
 * - Line classification of Markdown documents with front matter, navigation,
 *   image and math blocks
 * - Extraction of translatable text with `{N}` placeholders for links,
 *   markup and math
 * - Quotations of the book replaced by the target edition's own paragraphs
 * - Reinsertion of placeholders into translated text, with a proportional
 *   fallback for lost ones
 * - Folder-level jobs with bounded concurrency and aggregated errors
 *
 * ## Architecture
 *
 * - `app_config`: Configuration management
 * - `document`: Line records, references and link rewriting
 * - `extraction`: Classifier, quote spans and line extraction
 * - `translation`: Finalizer and the job and folder builders
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language codes and edition typography
 * - `logging`: Stderr logger for embedding applications
 * - `errors`: Error types
 */

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod language_utils;
pub mod logging;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, LogLevel, PlaceholderPolicy};
pub use app_controller::Controller;
pub use document::{DocumentKind, DocumentResolver, LineRecord, LineRole, ParagraphIndex, StructuredReference};
pub use errors::{AppError, PipelineError, PipelineErrors};
pub use extraction::LineExtractor;
pub use file_utils::{FileManager, FileStore};
pub use language_utils::{get_language_name, language_codes_match, normalize_language_code};
pub use translation::{Finalizer, FolderBuilder, TranslationJobBuilder};
