use log::{error, info};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::document::DocumentResolver;
use crate::errors::AppError;
use crate::file_utils::{FileManager, FileStore};
use crate::logging;
use crate::translation::{FolderBuilder, FolderSummary, JobSummary, TranslationJobBuilder};

// @module: Application controller for folder translation jobs

/// Wires configuration, file store and resolver into the two pipeline phases
pub struct Controller {
    // @field: Pipeline configuration
    config: Config,
    store: Arc<dyn FileStore>,
    resolver: Arc<dyn DocumentResolver>,
}

impl Controller {
    // @method: Controller over the local file system
    pub fn with_config(config: Config, resolver: Arc<dyn DocumentResolver>) -> Result<Self, AppError> {
        Self::with_store(config, Arc::new(FileManager), resolver)
    }

    // @method: Controller over any file store
    pub fn with_store(
        config: Config,
        store: Arc<dyn FileStore>,
        resolver: Arc<dyn DocumentResolver>,
    ) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self { config, store, resolver })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Install the stderr logger at the configured level. When another backend
    /// is already installed only the level is applied.
    pub fn init_logging(&self) {
        if logging::init(self.config.log_level).is_err() {
            log::set_max_level(self.config.log_level.into());
        }
    }

    /// Extraction phase: write the intermediate file and the files to translate
    pub async fn prepare(&self, source_dir: &Path, work_dir: &Path) -> Result<JobSummary, AppError> {
        let start_time = Instant::now();
        if !FileManager::dir_exists(source_dir) {
            return Err(AppError::File(format!("Source folder does not exist: {:?}", source_dir)));
        }

        let builder = TranslationJobBuilder::new(self.config.clone(), self.store.clone(), self.resolver.clone())?;
        let summary = builder.build(source_dir, work_dir).await.inspect_err(|e| {
            error!("Extraction of {:?} failed: {}", source_dir, e);
        })?;

        info!(
            "Prepared {} documents in {}",
            summary.documents,
            Self::format_duration(start_time.elapsed())
        );
        Ok(summary)
    }

    /// Build phase: merge translations and write the translated documents
    pub async fn build(&self, source_dir: &Path, work_dir: &Path, output_dir: &Path) -> Result<FolderSummary, AppError> {
        let start_time = Instant::now();

        let builder = FolderBuilder::new(self.config.clone(), self.store.clone(), self.resolver.clone())?;
        let summary = builder.build(source_dir, work_dir, output_dir).await?;

        info!(
            "Built {} documents in {}",
            summary.documents,
            Self::format_duration(start_time.elapsed())
        );
        Ok(summary)
    }

    // @formats: Duration as a short human readable string
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
