//! Callback contract for download attempts.

use super::StatusCode;

/// Receives the lifecycle of download attempts.
///
/// All callbacks run synchronously on the task executing
/// [`DownloadEngine::download`](super::DownloadEngine::download). For a given
/// `task_id` the order is: `on_start`, zero or more `on_progress` with
/// non-decreasing values, then exactly one of `on_finish`, `on_cancel`, or
/// `on_download_error`. The resumable short-circuit for an already complete
/// file skips `on_start` and reports `on_progress(100)` then `on_finish`.
///
/// `task_id` lets one listener tell concurrent downloads apart. Implementations
/// shared across tasks must synchronize any per-task state themselves.
pub trait DownloadListener: Send + Sync {
    /// An attempt ended with an error.
    fn on_download_error(&self, task_id: i32, status: StatusCode, message: &str);

    /// HTTP negotiation succeeded and the body transfer is about to begin.
    fn on_start(&self, task_id: i32);

    /// Percentage of the total length persisted so far.
    fn on_progress(&self, task_id: i32, progress: u8);

    /// The file is complete at `file_path`.
    fn on_finish(&self, task_id: i32, file_path: &str);

    /// The attempt observed the cancel flag and stopped.
    fn on_cancel(&self, task_id: i32);
}
