//! Error types for nightly operations.
//!
//! This module defines [`NightlyError`], the single error type surfaced by
//! the fatal paths of a run: fetching the digest, parsing it, and publishing
//! the resulting JSON. Degraded conditions (a malformed digest entry, a
//! README without a usable image) never become a `NightlyError`; they are
//! absorbed into default field values by the component that detects them.
//!
//! # Example
//!
//! ```rust
//! use nightly_core::{NightlyError, Result};
//!
//! fn require_token(token: &str) -> Result<&str> {
//!     if token.is_empty() {
//!         return Err(NightlyError::ConfigError("GITHUB_TOKEN not specified".to_string()));
//!     }
//!     Ok(token)
//! }
//! # assert!(require_token("").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for digest extraction, enrichment, and publishing.
#[derive(Error, Debug)]
pub enum NightlyError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps network errors, DNS failures, connection issues, and other
    /// transport-level problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Transport failure reported by a non-reqwest [`Fetcher`](crate::Fetcher).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A fetch completed but the server did not answer with a success status.
    #[error("GET {url} returned status {status}")]
    UnexpectedStatus { status: u16, url: String },

    /// HTML parsing errors, including invalid CSS selectors.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// JSON (de)serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid configuration, such as publish credentials.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The content store rejected the upload.
    #[error("uploading to {url} failed with status {status}, msg: {message}")]
    PublishFailed { status: u16, url: String, message: String },
}

/// Result type alias for NightlyError.
pub type Result<T> = std::result::Result<T, NightlyError>;
