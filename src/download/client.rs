//! HTTP client wrapper for download requests.
//!
//! This module provides the `HttpClient` struct which sends the GET for an
//! attempt, optionally with a `Range` header, and classifies transport
//! failures into [`DownloadError`] values.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::RANGE;
use tracing::{debug, instrument};

use super::config::EngineConfig;
use super::error::DownloadError;
use super::range::range_header_value;

/// HTTP client for download attempts.
///
/// Created once and shared by every attempt of an engine, taking advantage of
/// connection pooling. It never asks for a compressed transfer encoding, so
/// byte offsets in `Range` requests always refer to the stored bytes.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with default timeouts and User-Agent.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error if the TLS backend or resolver cannot be
    /// initialized.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_config(&EngineConfig::default())
    }

    /// Creates a client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error if the client cannot be built.
    pub fn with_config(config: &EngineConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    /// Sends a GET for `url`, requesting bytes from `resume_offset` onward
    /// when given.
    ///
    /// Any HTTP status is returned as a response; interpreting it is up to
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Timeout`], [`DownloadError::HostNotFound`] or
    /// [`DownloadError::Network`] when no response is received.
    #[instrument(level = "debug", skip(self))]
    pub async fn get(
        &self,
        url: &str,
        resume_offset: Option<u64>,
    ) -> Result<reqwest::Response, DownloadError> {
        let mut request = self.client.get(url);
        if let Some(offset) = resume_offset {
            let range = range_header_value(offset);
            debug!(range = %range, "requesting byte range");
            request = request.header(RANGE, range);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DownloadError::from_transport(url, e))?;

        debug!(status = response.status().as_u16(), "response received");
        for (name, value) in response.headers() {
            debug!(header = %name, value = ?value, "response header");
        }
        Ok(response)
    }
}
