//! Resumable single-file HTTP download engine.
//!
//! This module downloads one URL into one target file, staging bytes in a
//! `<name>.temp` file so an interrupted transfer can continue with an HTTP
//! byte-range request.
//!
//! # Features
//!
//! - Resume from the temp file length via `Range: bytes=<offset>-`
//! - Total length from `Content-Range` (206) or `Content-Length` (200)
//! - Free-space check before any byte is written
//! - Throttled progress notifications and cooperative cancellation
//! - Typed failures mapped onto a closed [`StatusCode`] set
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use resume_downloader::download::{
//!     DownloadDispatcher, DownloadEngine, DownloadListener, DownloadRequest, EngineConfig,
//!     StatusCode,
//! };
//!
//! struct Quiet;
//!
//! impl DownloadListener for Quiet {
//!     fn on_download_error(&self, _: i32, _: StatusCode, _: &str) {}
//!     fn on_start(&self, _: i32) {}
//!     fn on_progress(&self, _: i32, _: u8) {}
//!     fn on_finish(&self, _: i32, _: &str) {}
//!     fn on_cancel(&self, _: i32) {}
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(&EngineConfig::default())?;
//! let dispatcher = DownloadDispatcher::new(engine, Arc::new(Quiet), 2)?;
//! let request = DownloadRequest::new("https://example.com/a.iso", "./downloads", "a.iso");
//! dispatcher.submit(request, 1).await?;
//! # Ok(())
//! # }
//! ```

mod body;
mod client;
mod config;
mod constants;
mod dispatcher;
mod engine;
mod environment;
mod error;
pub mod filename;
pub mod headers;
mod listener;
mod partial;
mod progress;
pub mod range;
mod request;
mod status;
pub mod validation;

pub use client::HttpClient;
pub use config::EngineConfig;
pub use constants::{CHUNK_SIZE, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, TEMP_SUFFIX};
pub use dispatcher::DownloadDispatcher;
pub use engine::{DEFAULT_CONCURRENCY, DownloadEngine, EngineError};
pub use environment::{AssumeOnline, FsStorageProbe, NetworkStatus, StorageProbe};
pub use error::DownloadError;
pub use listener::DownloadListener;
pub use progress::ProgressThrottle;
pub use request::{CancelFlag, DownloadRequest};
pub use status::StatusCode;

