/*!
 * Reinsertion half of the pipeline.
 *
 * - `placement`: where lost placeholders go back
 * - `fixups`: quotation marks, citations and line breaks of translated lines
 * - `finalizer`: rebuilds the lines of one document
 * - `batch`: bounded all-settle fan-out over documents
 * - `job`: extraction phase of a folder, intermediate and flat files
 * - `folder`: build phase of a folder
 */

pub mod batch;
pub mod finalizer;
pub mod fixups;
pub mod folder;
pub mod job;
pub mod placement;

// Re-export main types for easier usage
pub use self::batch::BatchRunner;
pub use self::finalizer::{FinalizedDocument, Finalizer};
pub use self::fixups::TextFixups;
pub use self::folder::{FolderBuilder, FolderSummary};
pub use self::job::{JobSummary, TranslatedFiles, TranslationJob, TranslationJobBuilder};
pub use self::placement::{PlaceholderPlacement, ProportionalPlacement, StrictPlacement, proportional_offset};
