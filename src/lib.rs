//! Resume Downloader Core Library
//!
//! This library provides a resumable single-file HTTP download engine: a URL
//! is streamed into `<dir>/<name>.temp` and promoted to `<dir>/<name>` once
//! complete, so an interrupted transfer can continue with a byte-range
//! request on the next attempt.
//!
//! # Architecture
//!
//! - [`download`] - Download engine, listener contract, error taxonomy and
//!   concurrent dispatcher

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use download::{
    CancelFlag, DEFAULT_CONCURRENCY, DownloadDispatcher, DownloadEngine, DownloadError,
    DownloadListener, DownloadRequest, EngineConfig, EngineError, HttpClient, StatusCode,
};
