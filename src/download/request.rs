//! Download request description and cooperative cancellation handle.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::constants::TEMP_SUFFIX;

/// Shared cancellation signal for one download attempt.
///
/// Clones observe the same flag: the caller keeps one clone and the engine
/// polls another once per body chunk. Cancellation is cooperative, so a
/// blocked read or write finishes before the flag takes effect.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    canceled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Creates a flag in the not-canceled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }
}

/// A single-file download request.
///
/// `file_dir` and `file_name` identify one logical target for the lifetime
/// of an attempt. Two concurrent attempts must not share a target; nothing
/// enforces that.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    url: String,
    file_dir: PathBuf,
    file_name: String,
    range: bool,
    cancel: CancelFlag,
}

impl DownloadRequest {
    /// Creates a resumable request with a fresh cancel flag.
    pub fn new(
        url: impl Into<String>,
        file_dir: impl Into<PathBuf>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            file_dir: file_dir.into(),
            file_name: file_name.into(),
            range: true,
            cancel: CancelFlag::new(),
        }
    }

    /// Enables or disables range resume.
    #[must_use]
    pub fn with_range(mut self, range: bool) -> Self {
        self.range = range;
        self
    }

    /// Attaches an externally owned cancel flag.
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn file_dir(&self) -> &Path {
        &self.file_dir
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Whether a previously persisted temp file may be continued.
    #[must_use]
    pub fn is_range(&self) -> bool {
        self.range
    }

    /// The cancel flag polled by the engine.
    #[must_use]
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.cancel.is_canceled()
    }

    /// Final destination: `<file_dir>/<file_name>`.
    #[must_use]
    pub fn target_path(&self) -> PathBuf {
        self.file_dir.join(&self.file_name)
    }

    /// Staging file: `<file_dir>/<file_name>.temp`.
    #[must_use]
    pub fn temp_path(&self) -> PathBuf {
        self.file_dir.join(format!("{}{TEMP_SUFFIX}", self.file_name))
    }
}
