/*!
 * Batch processing of documents.
 *
 * Runs one blocking job per document with bounded, unordered concurrency and
 * waits for every job to settle. Results come back in input order; a job that
 * panics is reported as a `TaskFailed` error instead of aborting the batch.
 */

use futures::stream::{self, StreamExt};
use log::{debug, error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::PipelineError;

/// Bounded fan-out over independent document jobs
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
    /// Maximum number of jobs running at once
    max_concurrent: usize,
}

impl BatchRunner {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Run `job` on every item and collect all outcomes, in item order
    pub async fn settle_all<T, R, F>(&self, items: Vec<T>, job: F) -> Vec<Result<R, PipelineError>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        let job = Arc::new(job);
        let total = items.len();
        let settled = Arc::new(AtomicUsize::new(0));
        let start_time = Instant::now();

        let mut results = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| {
                let job = job.clone();
                let settled = settled.clone();

                async move {
                    let result = tokio::task::spawn_blocking(move || job(item))
                        .await
                        .map_err(|e| {
                            error!("Document job {} of {} failed: {}", index + 1, total, e);
                            PipelineError::TaskFailed(format!("job {}: {}", index + 1, e))
                        });

                    let current = settled.fetch_add(1, Ordering::SeqCst) + 1;
                    debug!("Settled {} of {} document jobs", current, total);

                    (index, result)
                }
            })
            .buffer_unordered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        // Restore input order
        results.sort_by_key(|(index, _)| *index);

        debug!("{} document jobs settled in {:?}", total, start_time.elapsed());
        results.into_iter().map(|(_, result)| result).collect()
    }
}
