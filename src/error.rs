//! Error types for thing-archiver
//!
//! This module provides the error taxonomy used throughout the library:
//! - Configuration errors (no usable auth token, invalid settings)
//! - Remote errors (non-2xx API responses, transport failures, undecodable records)
//! - Filesystem errors (output directories, publishing archived files)
//!
//! Whether an error is fatal or recoverable depends on where it happens, not on
//! its variant. The archiver turns sub-resource and asset errors into entries of
//! its run report and only lets errors from the core record escape.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for thing-archiver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for thing-archiver
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "token")
        key: Option<String>,
    },

    /// The remote API answered with a non-success status
    #[error("API error: {path} returned HTTP {status}{}", format_body(.body))]
    Api {
        /// Request path or URL that failed
        path: String,
        /// HTTP status code returned by the server
        status: u16,
        /// Response body text, if any was returned
        body: Option<String>,
    },

    /// Network error (connect, timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A remote record did not have the expected shape
    #[error("invalid {what} record: {reason}")]
    InvalidRecord {
        /// What kind of record was being decoded (e.g., "thing", "files")
        what: String,
        /// Why decoding failed
        reason: String,
    },

    /// Could not create or publish something on disk
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        /// The path that could not be created or written
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The operator interrupted the run
    #[error("interrupted by user")]
    Interrupted,
}

fn format_body(body: &Option<String>) -> String {
    match body.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => format!(": {text}"),
        _ => String::new(),
    }
}

impl Error {
    /// Build a configuration error for a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Build a filesystem error for `path`
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// HTTP status code carried by this error, if the server answered
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Process exit code the CLI reports for this error
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        1
    }
}
