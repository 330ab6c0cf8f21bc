//! Local file reconciliation: destination directory, final file and temp file.
//!
//! The temp file length is the resume offset: every byte in it was persisted
//! from position 0 onward, and it is never pre-extended to the total length.

use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncSeekExt;
use tracing::debug;

use super::{DownloadError, DownloadRequest};

/// State of the target after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Reconciled {
    /// A resumable request whose final file already exists.
    AlreadyComplete(PathBuf),
    /// The temp file is ready; transfer continues from `resume_offset`.
    Ready { resume_offset: u64 },
}

/// Prepares the destination directory, final file and temp file for an attempt.
pub(crate) async fn reconcile(request: &DownloadRequest) -> Result<Reconciled, DownloadError> {
    let dir = request.file_dir();
    if !path_exists(dir).await {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DownloadError::io(dir, e))?;
    }

    let target = request.target_path();
    debug!(path = %target.display(), "download file save path");
    if path_exists(&target).await {
        if request.is_range() {
            return Ok(Reconciled::AlreadyComplete(target));
        }
        debug!(path = %target.display(), "removing stale final file");
        tokio::fs::remove_file(&target)
            .await
            .map_err(|e| DownloadError::io(&target, e))?;
    }

    let temp = request.temp_path();
    if request.is_range()
        && let Some(length) = reusable_length(&temp).await
    {
        debug!(path = %temp.display(), length, "reusing temp file");
        return Ok(Reconciled::Ready {
            resume_offset: length,
        });
    }

    recreate_temp(&temp).await?;
    Ok(Reconciled::Ready { resume_offset: 0 })
}

/// Deletes any existing temp file and creates an empty one readable and
/// writable by the owner only.
pub(crate) async fn recreate_temp(temp: &Path) -> Result<(), DownloadError> {
    match tokio::fs::remove_file(temp).await {
        Ok(()) => debug!(path = %temp.display(), "deleted previous temp file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(DownloadError::io(temp, e)),
    }

    let mut options = OpenOptions::new();
    options.read(true).write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);
    options
        .open(temp)
        .await
        .map_err(|e| DownloadError::io(temp, e))?;
    Ok(())
}

/// Opens the temp file for read/write positioned at `offset`.
///
/// The file is neither truncated nor extended.
pub(crate) async fn open_at(temp: &Path, offset: u64) -> Result<File, DownloadError> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(temp)
        .await
        .map_err(|e| DownloadError::io(temp, e))?;
    file.seek(SeekFrom::Start(offset))
        .await
        .map_err(|e| DownloadError::io(temp, e))?;
    Ok(file)
}

/// Renames the finished temp file onto the final path.
pub(crate) async fn promote(temp: &Path, target: &Path) -> Result<(), DownloadError> {
    tokio::fs::rename(temp, target)
        .await
        .map_err(|e| DownloadError::io(target, e))
}

/// Best-effort removal of the temp file.
pub(crate) async fn discard_temp(temp: &Path) {
    match tokio::fs::remove_file(temp).await {
        Ok(()) => debug!(path = %temp.display(), "deleted temp file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => debug!(path = %temp.display(), error = %e, "failed to delete temp file"),
    }
}

/// Absolute form of `path` for reporting, falling back to `path` itself.
pub(crate) fn display_path(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

// Some(len) only for an existing regular file that opens for both reading and writing.
async fn reusable_length(temp: &Path) -> Option<u64> {
    let metadata = tokio::fs::metadata(temp).await.ok()?;
    if !metadata.is_file() {
        return None;
    }
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(temp)
        .await
        .ok()?;
    Some(metadata.len())
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
