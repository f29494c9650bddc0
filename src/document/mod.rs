/*!
 * Document modeling for the translation pipeline.
 *
 * - `model`: per-line records, roles and quote spans
 * - `reference`: structured paragraph references, the resolver seam and
 *   cross-document link rewriting
 */

pub mod model;
pub mod reference;

// Re-export types used by other modules
pub use model::{DocumentKind, LineRecord, LineRole, QuoteSpan, TranslationSlot};
pub use reference::{DocumentResolver, LinkRewriter, ParagraphIndex, StructuredReference};
