/*!
 * Extraction half of the pipeline.
 *
 * - `classifier`: region state machine deciding each line's role
 * - `quotes`: quotation runs resolved to paragraph references
 * - `markers`: `{N}` placeholders and their validation
 * - `extractor`: builds the per-line records of a document
 */

pub mod classifier;
pub mod extractor;
pub mod markers;
pub mod quotes;

pub use classifier::{LineClass, LineClassifier, Region, RegionState};
pub use extractor::{DocumentExtraction, LineExtractor};
pub use markers::{ExtractionMarker, PlaceholderReport, PlaceholderValidator};
pub use quotes::{QuoteLine, QuoteRun, QuoteSpanResolver, QuoteStyle};
