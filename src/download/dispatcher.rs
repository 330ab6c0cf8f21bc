//! Bounded concurrent dispatch of independent download attempts.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::engine::{EngineError, MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::{DownloadEngine, DownloadListener, DownloadRequest, StatusCode};

/// Runs download attempts as separate Tokio tasks sharing one engine and
/// one listener.
///
/// A semaphore permit is acquired inside each task before the attempt starts
/// and released when it ends, so at most `concurrency` attempts transfer at
/// once. The listener tells attempts apart by `task_id`.
#[derive(Clone)]
pub struct DownloadDispatcher {
    engine: DownloadEngine,
    listener: Arc<dyn DownloadListener>,
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl DownloadDispatcher {
    /// Creates a dispatcher allowing `concurrency` simultaneous attempts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// 1..=100.
    pub fn new(
        engine: DownloadEngine,
        listener: Arc<dyn DownloadListener>,
        concurrency: usize,
    ) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }
        Ok(Self {
            engine,
            listener,
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Spawns an attempt for `request`; the handle resolves once its terminal
    /// callback has been delivered.
    pub fn submit(&self, request: DownloadRequest, task_id: i32) -> JoinHandle<()> {
        let engine = self.engine.clone();
        let listener = Arc::clone(&self.listener);
        let semaphore = Arc::clone(&self.semaphore);

        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                warn!(task_id, "dispatcher semaphore closed");
                listener.on_download_error(task_id, StatusCode::Other, "dispatcher is shut down");
                return;
            };
            debug!(task_id, url = %request.url(), "dispatching download");
            engine.download(&request, task_id, listener.as_ref()).await;
        })
    }
}
