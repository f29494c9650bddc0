/*!
 * Folder rebuild.
 *
 * The build phase of a folder: the intermediate file and the translated flat
 * files are merged back onto the source documents, each document is
 * finalized, and clean documents are written to the output folder. Every
 * document is attempted before failures are reported together.
 */

use anyhow::Result;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::document::DocumentResolver;
use crate::errors::{PipelineError, PipelineErrors};
use crate::file_utils::FileStore;
use crate::language_utils::language_codes_match;

use super::batch::BatchRunner;
use super::finalizer::Finalizer;
use super::job::{split_lines, DocumentEntry, TranslatedFiles, TranslationJob};
use super::placement::placement_for;

/// Outcome of a successful rebuild
#[derive(Debug, Clone, PartialEq)]
pub struct FolderSummary {
    pub documents: usize,
    pub lines: usize,
    pub written: Vec<PathBuf>,
}

/// Result of rebuilding one document
#[derive(Debug)]
struct DocumentOutcome {
    path: PathBuf,
    lines: usize,
    errors: Vec<PipelineError>,
}

/// Rebuilds the translated documents of a folder
pub struct FolderBuilder {
    config: Config,
    store: Arc<dyn FileStore>,
    finalizer: Arc<Finalizer>,
}

impl FolderBuilder {
    pub fn new(config: Config, store: Arc<dyn FileStore>, resolver: Arc<dyn DocumentResolver>) -> Result<Self> {
        let finalizer = Finalizer::new(
            &config.source_language,
            &config.target_language,
            resolver,
            placement_for(config.placeholder_policy),
        )?;
        Ok(Self {
            config,
            store,
            finalizer: Arc::new(finalizer),
        })
    }

    /// Merge translations into the documents of `source_dir` and write the
    /// results below `output_dir`
    pub async fn build(
        &self,
        source_dir: &Path,
        work_dir: &Path,
        output_dir: &Path,
    ) -> Result<FolderSummary, PipelineErrors> {
        let intermediate = TranslationJob::path(work_dir, &self.config.job_name);
        let job = TranslationJob::load(self.store.as_ref(), &intermediate)?;
        let translated = Arc::new(TranslatedFiles::read(
            self.store.as_ref(),
            work_dir,
            &self.config.job_name,
            &self.config.target_language,
        )?);

        if !language_codes_match(&job.target_language, &self.config.target_language) {
            warn!(
                "Intermediate file was extracted for '{}', rebuilding for '{}'",
                job.target_language, self.config.target_language
            );
        }
        info!(
            "Rebuilding {} documents from {} translated files",
            job.documents.len(),
            translated.len()
        );

        let items: Vec<(String, DocumentEntry)> = job.documents.into_iter().collect();
        let store = self.store.clone();
        let finalizer = self.finalizer.clone();
        let source_root = source_dir.to_path_buf();
        let output_root = output_dir.to_path_buf();

        let results = BatchRunner::new(self.config.max_concurrent_documents)
            .settle_all(items, move |(key, entry)| {
                rebuild_document(
                    store.as_ref(),
                    &finalizer,
                    &translated,
                    &source_root,
                    &output_root,
                    &key,
                    entry,
                )
            })
            .await;

        let mut errors = PipelineErrors::new();
        let mut summary = FolderSummary { documents: 0, lines: 0, written: Vec::new() };
        for result in results {
            match result {
                Ok(outcome) if outcome.errors.is_empty() => {
                    summary.documents += 1;
                    summary.lines += outcome.lines;
                    summary.written.push(outcome.path);
                }
                Ok(outcome) => errors.extend(outcome.errors),
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            error!("Rebuild failed with {}", errors);
            return Err(errors);
        }
        info!("Rebuilt {} documents into {:?}", summary.documents, output_dir);
        Ok(summary)
    }
}

/// Merge, finalize and write one document; errors are returned, not raised
fn rebuild_document(
    store: &dyn FileStore,
    finalizer: &Finalizer,
    translated: &TranslatedFiles,
    source_dir: &Path,
    output_dir: &Path,
    key: &str,
    entry: DocumentEntry,
) -> DocumentOutcome {
    let path = output_dir.join(key);
    let failed = |errors: Vec<PipelineError>| DocumentOutcome {
        path: path.clone(),
        lines: 0,
        errors,
    };

    let content = match store.read_to_string(&source_dir.join(key)) {
        Ok(content) => content,
        Err(e) => return failed(vec![e.into()]),
    };
    let lines = split_lines(&content);

    let mut records = entry.records;
    if lines.len() != records.len() {
        return failed(vec![PipelineError::SourceChanged {
            document: key.to_string(),
            expected: records.len(),
            found: lines.len(),
        }]);
    }

    for (record, line) in records.iter_mut().zip(lines) {
        record.line = line;
        record.translation = record
            .slot
            .and_then(|slot| translated.get(slot))
            .map(str::to_string);
    }

    let finalized = finalizer.finalize(key, &records);
    if !finalized.is_clean() {
        warn!("{}: {} error(s), not written", key, finalized.errors.len());
        return failed(finalized.errors);
    }

    if let Err(e) = store.write(&path, &finalized.content()) {
        return failed(vec![e.into()]);
    }
    DocumentOutcome {
        lines: finalized.lines.len(),
        path,
        errors: Vec::new(),
    }
}
