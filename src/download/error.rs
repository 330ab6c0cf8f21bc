//! Error types for the download module.
//!
//! Every failure of a download attempt is represented as a [`DownloadError`]
//! value and translated to a [`StatusCode`] at the top of the attempt.

use std::error::Error as _;
use std::path::PathBuf;

use thiserror::Error;

use super::StatusCode;

/// Errors that can end a download attempt.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The network-status collaborator reported no connectivity.
    #[error("Network is not available")]
    NetworkUnavailable,

    /// The provided URL is malformed or invalid.
    #[error("URL is wrong: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// A 206 resume response had a missing or malformed `Content-Range` header.
    #[error("Content-Range error in server HTTP header information: {header:?}")]
    ContentRange {
        /// The raw header value, if the server sent one.
        header: Option<String>,
    },

    /// The server answered with a status other than 200/206.
    #[error("Server response code error: {status}")]
    UnexpectedStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Free space in the destination directory is below the total length.
    #[error(
        "not enough storage in {}: need {required} bytes, {available} available",
        dir.display()
    )]
    StorageNotEnough {
        /// The destination directory.
        dir: PathBuf,
        /// Declared total length of the resource.
        required: u64,
        /// Free space reported for the directory.
        available: u64,
    },

    /// Request timed out while connecting or reading.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The host name could not be resolved.
    #[error("host not found for {url}: {source}")]
    HostNotFound {
        /// The URL whose host failed to resolve.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Any other network-level error (connection refused, TLS, reset, ...).
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// File system error during reconciliation or transfer.
    #[error("IO error on {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The body declared gzip encoding but could not be decoded.
    #[error("failed to decode gzip body from {url}: {source}")]
    Decode {
        /// The URL whose body failed to decode.
        url: String,
        /// The underlying decoder error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Classifies a transport error from reqwest.
    ///
    /// Timeouts become [`DownloadError::Timeout`], name resolution failures
    /// become [`DownloadError::HostNotFound`], everything else is a
    /// [`DownloadError::Network`] error.
    pub fn from_transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::timeout(url)
        } else if is_host_resolution_failure(&source) {
            Self::HostNotFound { url, source }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a `Content-Range` parse error.
    pub fn content_range(header: Option<&str>) -> Self {
        Self::ContentRange {
            header: header.map(str::to_string),
        }
    }

    /// Creates an unexpected HTTP status error.
    pub fn unexpected_status(url: impl Into<String>, status: u16) -> Self {
        Self::UnexpectedStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an insufficient storage error.
    pub fn storage_not_enough(dir: impl Into<PathBuf>, required: u64, available: u64) -> Self {
        Self::StorageNotEnough {
            dir: dir.into(),
            required,
            available,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a gzip decode error.
    pub fn decode(url: impl Into<String>, source: std::io::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Maps this error onto the status code reported to listeners.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NetworkUnavailable => StatusCode::NetworkNotAvailable,
            Self::InvalidUrl { .. } => StatusCode::UrlSyntaxError,
            Self::ContentRange { .. } => StatusCode::ServerException,
            Self::StorageNotEnough { .. } => StatusCode::StorageNotEnough,
            Self::Timeout { .. } => StatusCode::DownloadTimeout,
            Self::HostNotFound { .. } => StatusCode::ServerNotFound,
            Self::UnexpectedStatus { .. }
            | Self::Network { .. }
            | Self::Io { .. }
            | Self::Decode { .. } => StatusCode::Other,
        }
    }
}

// hyper-util reports resolver failures as a connect error wrapping "dns error",
// whose own source is the getaddrinfo io::Error.
fn is_host_resolution_failure(error: &reqwest::Error) -> bool {
    if !error.is_connect() {
        return false;
    }
    std::iter::successors(error.source(), |&cause| cause.source()).any(|cause| {
        let message = cause.to_string().to_ascii_lowercase();
        message.contains("dns error")
            || message.contains("failed to lookup address")
            || message.contains("name or service not known")
            || message.contains("no such host")
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_embeds_code() {
        let error = DownloadError::unexpected_status("https://example.com/a.bin", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert_eq!(error.status_code(), StatusCode::Other);
    }

    #[test]
    fn test_content_range_maps_to_server_exception() {
        let error = DownloadError::content_range(Some("bytes 0-9/abc"));
        assert_eq!(error.status_code(), StatusCode::ServerException);
        assert!(error.to_string().contains("Content-Range"));

        let missing = DownloadError::content_range(None);
        assert_eq!(missing.status_code(), StatusCode::ServerException);
    }

    #[test]
    fn test_storage_not_enough_display() {
        let error = DownloadError::storage_not_enough("/tmp/downloads", 2048, 1024);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/downloads"), "Expected dir in: {msg}");
        assert!(msg.contains("2048"), "Expected required bytes in: {msg}");
        assert_eq!(error.status_code(), StatusCode::StorageNotEnough);
    }

    #[test]
    fn test_validation_errors_map_to_their_codes() {
        assert_eq!(
            DownloadError::NetworkUnavailable.status_code(),
            StatusCode::NetworkNotAvailable
        );
        assert_eq!(
            DownloadError::invalid_url("not-a-url").status_code(),
            StatusCode::UrlSyntaxError
        );
        assert_eq!(
            DownloadError::timeout("https://example.com").status_code(),
            StatusCode::DownloadTimeout
        );
    }

    #[test]
    fn test_io_error_maps_to_other() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = DownloadError::io(PathBuf::from("/tmp/test.bin.temp"), io_error);
        assert!(error.to_string().contains("/tmp/test.bin.temp"));
        assert_eq!(error.status_code(), StatusCode::Other);
    }
}
