//! Download engine driving one resumable single-file transfer per call.
//!
//! An attempt runs through these phases:
//!
//! 1. validation (network status, URL syntax)
//! 2. local reconciliation (directory, final file, temp file)
//! 3. HTTP negotiation (optional `Range`, status and total length)
//! 4. storage check against the declared total
//! 5. chunked transfer into the temp file with progress and cancel polling
//! 6. promotion of the temp file, or cleanup
//!
//! Results are delivered through a [`DownloadListener`]; nothing is returned
//! to the caller and no failure escapes as a panic or `Err`.
//!
//! # Example
//!
//! ```no_run
//! use resume_downloader::download::{
//!     DownloadEngine, DownloadListener, DownloadRequest, EngineConfig, StatusCode,
//! };
//!
//! struct Printer;
//!
//! impl DownloadListener for Printer {
//!     fn on_download_error(&self, task_id: i32, status: StatusCode, message: &str) {
//!         eprintln!("#{task_id} failed: {status} {message}");
//!     }
//!     fn on_start(&self, _task_id: i32) {}
//!     fn on_progress(&self, task_id: i32, progress: u8) {
//!         println!("#{task_id} {progress}%");
//!     }
//!     fn on_finish(&self, task_id: i32, file_path: &str) {
//!         println!("#{task_id} saved to {file_path}");
//!     }
//!     fn on_cancel(&self, _task_id: i32) {}
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(&EngineConfig::default())?;
//! let request = DownloadRequest::new("https://example.com/file.zip", "./downloads", "file.zip");
//! engine.download(&request, 1, &Printer).await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use reqwest::header::{CONTENT_ENCODING, CONTENT_RANGE};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use super::body::BodyReader;
use super::constants::CHUNK_SIZE;
use super::environment::{AssumeOnline, FsStorageProbe, NetworkStatus, StorageProbe};
use super::headers::is_gzip_content;
use super::partial::{self, Reconciled};
use super::progress::ProgressThrottle;
use super::range::parse_content_range_total;
use super::validation::is_valid_url;
use super::{DownloadError, DownloadListener, DownloadRequest, EngineConfig, HttpClient};

/// Minimum allowed concurrency value.
pub(crate) const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub(crate) const MAX_CONCURRENCY: usize = 100;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Error type for constructing engines and dispatchers.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// How a successful attempt ended.
#[derive(Debug)]
enum Outcome {
    Finished(String),
    AlreadyComplete(String),
    Canceled,
}

/// Resumable single-file download engine.
///
/// The engine holds no per-download state: every call to
/// [`download`](Self::download) creates and resolves its own temp file and
/// counters, so one engine can serve many concurrent attempts. Attempts must
/// target distinct `(file_dir, file_name)` pairs.
///
/// Construct one per application and share it (it is cheap to clone).
#[derive(Debug, Clone)]
pub struct DownloadEngine {
    client: HttpClient,
    network: Arc<dyn NetworkStatus>,
    storage: Arc<dyn StorageProbe>,
}

impl DownloadEngine {
    /// Creates an engine with its own HTTP client and default collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        Ok(Self::with_client(HttpClient::with_config(config)?))
    }

    /// Creates an engine around an existing client.
    #[must_use]
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            network: Arc::new(AssumeOnline),
            storage: Arc::new(FsStorageProbe),
        }
    }

    /// Replaces the network-status collaborator.
    #[must_use]
    pub fn with_network_status(mut self, network: Arc<dyn NetworkStatus>) -> Self {
        self.network = network;
        self
    }

    /// Replaces the free-space collaborator.
    #[must_use]
    pub fn with_storage_probe(mut self, storage: Arc<dyn StorageProbe>) -> Self {
        self.storage = storage;
        self
    }

    /// Runs one download attempt and reports its lifecycle to `listener`.
    ///
    /// Exactly one terminal callback (`on_finish`, `on_cancel` or
    /// `on_download_error`) is delivered, and nothing after it. Callbacks run
    /// on the current task in order.
    ///
    /// A resumable request whose final file already exists reports
    /// `on_progress(100)` and `on_finish` without touching the network.
    /// A non-resumable request never leaves its temp file behind.
    #[instrument(skip(self, request, listener), fields(url = %request.url()))]
    pub async fn download(
        &self,
        request: &DownloadRequest,
        task_id: i32,
        listener: &dyn DownloadListener,
    ) {
        if let Err(error) = self.validate(request) {
            report_error(task_id, &error, listener);
            return;
        }

        let outcome = self.attempt(request, task_id, listener).await;

        if !request.is_range() {
            partial::discard_temp(&request.temp_path()).await;
        }

        match outcome {
            Ok(Outcome::Finished(path)) => {
                info!(path = %path, "download complete");
                listener.on_finish(task_id, &path);
            }
            Ok(Outcome::AlreadyComplete(path)) => {
                info!(path = %path, "file already downloaded");
                listener.on_progress(task_id, 100);
                listener.on_finish(task_id, &path);
            }
            Ok(Outcome::Canceled) => {
                info!("download canceled");
                listener.on_cancel(task_id);
            }
            Err(error) => report_error(task_id, &error, listener),
        }
    }

    fn validate(&self, request: &DownloadRequest) -> Result<(), DownloadError> {
        if !self.network.is_available() {
            return Err(DownloadError::NetworkUnavailable);
        }
        if !is_valid_url(request.url()) {
            return Err(DownloadError::invalid_url(request.url()));
        }
        Ok(())
    }

    async fn attempt(
        &self,
        request: &DownloadRequest,
        task_id: i32,
        listener: &dyn DownloadListener,
    ) -> Result<Outcome, DownloadError> {
        let mut resume_offset = match partial::reconcile(request).await? {
            Reconciled::AlreadyComplete(path) => {
                return Ok(Outcome::AlreadyComplete(partial::display_path(&path)));
            }
            Reconciled::Ready { resume_offset } => resume_offset,
        };
        let temp = request.temp_path();
        let target = request.target_path();

        let range_offset = (request.is_range() && resume_offset > 0).then_some(resume_offset);
        let response = self.client.get(request.url(), range_offset).await?;

        let total = match response.status().as_u16() {
            206 if request.is_range() => {
                let header = response
                    .headers()
                    .get(CONTENT_RANGE)
                    .and_then(|value| value.to_str().ok());
                let total = header
                    .and_then(parse_content_range_total)
                    .ok_or_else(|| DownloadError::content_range(header))?;
                Some(total)
            }
            200 => {
                if range_offset.is_some() {
                    warn!(
                        offset = resume_offset,
                        "server ignored range request, restarting from zero"
                    );
                    partial::recreate_temp(&temp).await?;
                    resume_offset = 0;
                }
                response.content_length()
            }
            status => return Err(DownloadError::unexpected_status(request.url(), status)),
        };
        debug!(?total, resume_offset, "resolved total length");

        if let Some(required) = total {
            let dir = request.file_dir();
            match self.storage.available_space(dir) {
                Ok(available) if available < required => {
                    return Err(DownloadError::storage_not_enough(dir, required, available));
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "free space unknown, skipping storage check"),
            }
        }

        listener.on_start(task_id);

        let gzip = is_gzip_content(
            response
                .headers()
                .get(CONTENT_ENCODING)
                .and_then(|value| value.to_str().ok()),
        );
        let mut body = BodyReader::new(Box::pin(response.bytes_stream()), gzip, request.url());
        let mut file = partial::open_at(&temp, resume_offset).await?;

        let mut throttle = ProgressThrottle::new(total);
        let mut count = resume_offset;
        let mut buffer = [0u8; CHUNK_SIZE];
        let mut canceled = false;

        loop {
            let read = body.read_chunk(&mut buffer).await?;
            if read == 0 {
                break;
            }
            if request.is_canceled() {
                canceled = true;
                break;
            }
            file.write_all(&buffer[..read])
                .await
                .map_err(|e| DownloadError::io(&temp, e))?;
            count += read as u64;
            if let Some(progress) = throttle.observe(count) {
                listener.on_progress(task_id, progress);
            }
        }

        file.flush().await.map_err(|e| DownloadError::io(&temp, e))?;
        drop(file);
        drop(body);

        if canceled {
            debug!(
                persisted = count,
                progress = throttle.last_reported(),
                "cancel flag observed"
            );
            return Ok(Outcome::Canceled);
        }

        partial::promote(&temp, &target).await?;
        Ok(Outcome::Finished(partial::display_path(&target)))
    }
}

fn report_error(task_id: i32, error: &DownloadError, listener: &dyn DownloadListener) {
    let status = error.status_code();
    let message = error.to_string();
    warn!(status = %status, error = %message, "download failed");
    listener.on_download_error(task_id, status, &message);
}
