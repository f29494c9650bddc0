/*!
 * Translation jobs.
 *
 * The extraction phase of a folder: every document is extracted, its
 * translatable text is written to numbered flat files for translation, and
 * the records are saved to an intermediate JSON file that maps each flat
 * file line back to its document and line.
 */

use anyhow::Result;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::document::{DocumentKind, DocumentResolver, LineRecord, TranslationSlot};
use crate::errors::{PipelineError, PipelineErrors};
use crate::extraction::{DocumentExtraction, LineExtractor};
use crate::file_utils::{FileManager, FileStore};

use super::batch::BatchRunner;

/// Split document text into lines, dropping `\r` of CRLF endings
pub fn split_lines(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Records and extraction problems of one document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentEntry {
    pub records: Vec<LineRecord>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Contents of the intermediate file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationJob {
    pub source_language: String,
    pub target_language: String,
    pub document_kind: DocumentKind,
    pub documents: BTreeMap<String, DocumentEntry>,
}

impl TranslationJob {
    /// Path of the intermediate file for a job
    pub fn path(work_dir: &Path, job_name: &str) -> PathBuf {
        work_dir.join(format!("{}.json", job_name))
    }

    pub fn load(store: &dyn FileStore, path: &Path) -> Result<Self, PipelineError> {
        if !store.exists(path) {
            return Err(PipelineError::IntermediateFileMissing(path.to_path_buf()));
        }
        let json = store.read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, store: &dyn FileStore, path: &Path) -> Result<(), PipelineError> {
        let json = serde_json::to_string_pretty(self)?;
        store.write(path, &json)?;
        Ok(())
    }

    pub fn translatable_count(&self) -> usize {
        self.documents
            .values()
            .flat_map(|entry| entry.records.iter())
            .filter(|record| record.slot.is_some())
            .count()
    }
}

/// Packs translatable lines into flat files of bounded size
#[derive(Debug, Default)]
pub struct FlatFileWriter {
    max_chars: usize,
    files: Vec<Vec<String>>,
    current_chars: usize,
}

impl FlatFileWriter {
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
            ..Self::default()
        }
    }

    /// Append a line, opening a new file when it would not fit; a line is
    /// never split
    pub fn push(&mut self, text: &str) -> TranslationSlot {
        let size = text.chars().count() + 1;
        let needs_file = match self.files.last() {
            None => true,
            Some(lines) => !lines.is_empty() && self.current_chars + size > self.max_chars,
        };
        if needs_file {
            self.files.push(Vec::new());
            self.current_chars = 0;
        }

        let file = self.files.len() - 1;
        let lines = &mut self.files[file];
        lines.push(text.to_string());
        self.current_chars += size;

        TranslationSlot {
            file,
            line: lines.len() - 1,
        }
    }

    pub fn into_files(self) -> Vec<Vec<String>> {
        self.files
    }
}

/// Flat file lines delivered by translators, keyed by file index
#[derive(Debug, Clone, Default)]
pub struct TranslatedFiles {
    files: BTreeMap<usize, Vec<String>>,
}

impl TranslatedFiles {
    /// Read every `<job>_<NNN>.<language>.txt` file of the work folder
    pub fn read(
        store: &dyn FileStore,
        work_dir: &Path,
        job_name: &str,
        language: &str,
    ) -> Result<Self, PipelineError> {
        let mut files = BTreeMap::new();
        for path in store.list_files(work_dir, "txt")? {
            let Some(index) = FileManager::parse_flat_file_index(&path, job_name, language) else {
                continue;
            };
            let content = store.read_to_string(&path)?;
            files.insert(index, content.lines().map(str::to_string).collect());
        }

        if files.is_empty() {
            return Err(PipelineError::TranslatedFilesMissing {
                dir: work_dir.to_path_buf(),
                job: job_name.to_string(),
            });
        }
        debug!("Read {} translated files for job '{}'", files.len(), job_name);
        Ok(Self { files })
    }

    pub fn from_files(files: BTreeMap<usize, Vec<String>>) -> Self {
        Self { files }
    }

    /// Translated text at a slot; blank lines count as missing
    pub fn get(&self, slot: TranslationSlot) -> Option<&str> {
        self.files
            .get(&slot.file)
            .and_then(|lines| lines.get(slot.line))
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Outcome of an extraction run
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub documents: usize,
    pub translatable_records: usize,
    pub warnings: usize,
    pub intermediate_file: PathBuf,
    pub flat_files: Vec<PathBuf>,
}

/// Builds the translation job of a folder
pub struct TranslationJobBuilder {
    config: Config,
    store: Arc<dyn FileStore>,
    extractor: Arc<LineExtractor>,
}

impl TranslationJobBuilder {
    pub fn new(config: Config, store: Arc<dyn FileStore>, resolver: Arc<dyn DocumentResolver>) -> Result<Self> {
        let extractor = LineExtractor::new(
            &config.source_language,
            &config.target_language,
            config.document_kind,
            resolver,
        )?;
        Ok(Self {
            config,
            store,
            extractor: Arc::new(extractor),
        })
    }

    pub fn intermediate_path(&self, work_dir: &Path) -> PathBuf {
        TranslationJob::path(work_dir, &self.config.job_name)
    }

    /// Extract every document of `source_dir` and write the intermediate file
    /// and the flat files to translate into `work_dir`
    pub async fn build(&self, source_dir: &Path, work_dir: &Path) -> Result<JobSummary, PipelineErrors> {
        let files = self
            .store
            .list_files(source_dir, &self.config.document_extension)
            .map_err(PipelineError::from)?;
        info!(
            "Extracting {} documents from {:?} ({} -> {}, {})",
            files.len(),
            source_dir,
            self.config.source_language,
            self.config.target_language,
            self.config.document_kind
        );

        let items: Vec<(String, PathBuf)> = files
            .into_iter()
            .map(|path| (FileManager::document_key(source_dir, &path), path))
            .collect();

        let store = self.store.clone();
        let extractor = self.extractor.clone();
        let results = BatchRunner::new(self.config.max_concurrent_documents)
            .settle_all(items, move |(key, path)| {
                let content = store.read_to_string(&path)?;
                let lines = split_lines(&content);
                Ok::<_, PipelineError>((key.clone(), extractor.extract_document(&key, &lines)))
            })
            .await;

        let mut errors = PipelineErrors::new();
        let mut extractions: BTreeMap<String, DocumentExtraction> = BTreeMap::new();
        for result in results {
            match result.and_then(|inner| inner) {
                Ok((key, extraction)) => {
                    extractions.insert(key, extraction);
                }
                Err(e) => errors.push(e),
            }
        }
        if !errors.is_empty() {
            error!("Extraction failed for {} document(s)", errors.len());
            return Err(errors);
        }

        let assembled = self.assemble(extractions);
        self.write(assembled, work_dir).map_err(PipelineErrors::from)
    }

    /// Assign flat file slots in document key order
    fn assemble(&self, extractions: BTreeMap<String, DocumentExtraction>) -> (TranslationJob, Vec<Vec<String>>, usize) {
        let mut writer = FlatFileWriter::new(self.config.max_chars_per_file);
        let mut documents = BTreeMap::new();
        let mut warnings = 0;

        for (key, extraction) in extractions {
            let DocumentExtraction { mut records, warnings: found, .. } = extraction;
            for record in records.iter_mut().filter(|record| record.is_translatable()) {
                if let Some(text) = record.translatable_text.as_deref() {
                    record.slot = Some(writer.push(text));
                }
            }
            if !found.is_empty() {
                warn!("{}: {} unresolved reference(s)", key, found.len());
            }
            warnings += found.len();
            documents.insert(
                key,
                DocumentEntry {
                    records,
                    errors: found.iter().map(ToString::to_string).collect(),
                },
            );
        }

        let job = TranslationJob {
            source_language: self.config.source_language.clone(),
            target_language: self.config.target_language.clone(),
            document_kind: self.config.document_kind,
            documents,
        };
        (job, writer.into_files(), warnings)
    }

    fn write(
        &self,
        (job, files, warnings): (TranslationJob, Vec<Vec<String>>, usize),
        work_dir: &Path,
    ) -> Result<JobSummary, PipelineError> {
        let mut flat_files = Vec::with_capacity(files.len());
        for (index, lines) in files.iter().enumerate() {
            let path = FileManager::flat_file_path(
                work_dir,
                &self.config.job_name,
                index,
                &self.config.source_language,
            );
            self.store.write(&path, &lines.join("\n"))?;
            flat_files.push(path);
        }

        let intermediate_file = self.intermediate_path(work_dir);
        job.save(self.store.as_ref(), &intermediate_file)?;

        let summary = JobSummary {
            documents: job.documents.len(),
            translatable_records: job.translatable_count(),
            warnings,
            intermediate_file,
            flat_files,
        };
        info!(
            "Job '{}': {} documents, {} lines to translate in {} files",
            self.config.job_name,
            summary.documents,
            summary.translatable_records,
            summary.flat_files.len()
        );
        Ok(summary)
    }
}
