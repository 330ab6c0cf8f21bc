//! Terminal error classification delivered with every error callback.

use std::fmt;

use serde::Serialize;

/// Closed set of error codes reported through
/// [`DownloadListener::on_download_error`](super::DownloadListener::on_download_error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusCode {
    /// No network connectivity when the attempt started.
    #[serde(rename = "ERROR_NETWORK_NOT_AVAILABLE")]
    NetworkNotAvailable,
    /// The request URL is malformed.
    #[serde(rename = "ERROR_URL_SYNTAX_ERROR")]
    UrlSyntaxError,
    /// A resume response carried a missing or unparseable `Content-Range`.
    #[serde(rename = "ERROR_SERVER_EXCEPTION")]
    ServerException,
    /// Unexpected HTTP status or uncategorized failure.
    #[serde(rename = "ERROR_OTHER")]
    Other,
    /// The destination has less free space than the declared total length.
    #[serde(rename = "ERROR_STORAGE_NOT_ENOUGH")]
    StorageNotEnough,
    /// Connect or read timed out.
    #[serde(rename = "ERROR_DOWNLOAD_TIMEOUT")]
    DownloadTimeout,
    /// The host name could not be resolved.
    #[serde(rename = "ERROR_SERVER_NOT_FOUND")]
    ServerNotFound,
}

impl StatusCode {
    /// Returns the stable label for logs and machine-readable output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NetworkNotAvailable => "ERROR_NETWORK_NOT_AVAILABLE",
            Self::UrlSyntaxError => "ERROR_URL_SYNTAX_ERROR",
            Self::ServerException => "ERROR_SERVER_EXCEPTION",
            Self::Other => "ERROR_OTHER",
            Self::StorageNotEnough => "ERROR_STORAGE_NOT_ENOUGH",
            Self::DownloadTimeout => "ERROR_DOWNLOAD_TIMEOUT",
            Self::ServerNotFound => "ERROR_SERVER_NOT_FOUND",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
