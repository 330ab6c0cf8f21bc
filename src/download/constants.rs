//! Constants for the download module (timeouts, chunking, file layout).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Number of body bytes read and written per loop iteration.
///
/// Cancellation is polled once per chunk, so this also bounds how much data
/// lands on disk after a cancel request.
pub const CHUNK_SIZE: usize = 1024;

/// Suffix appended to the target file name for the in-progress staging file.
pub const TEMP_SUFFIX: &str = ".temp";
