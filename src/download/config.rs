//! Engine configuration.

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use crate::user_agent;

/// Settings for the HTTP client owned by a [`DownloadEngine`](super::DownloadEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Per-read timeout in seconds; resets after every successful read.
    pub read_timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            user_agent: user_agent::default_download_user_agent(),
        }
    }
}
