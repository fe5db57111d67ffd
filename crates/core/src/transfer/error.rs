//! Error types for the transfer module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while transferring artifact items.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Failed to construct the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// Item-selection pattern could not be compiled.
    #[error("Invalid item pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Source root does not exist.
    #[error("Source not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Listing the source items failed.
    #[error("Failed to list items at {url}: {reason}")]
    Listing { url: String, reason: String },

    /// Remote store answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// Remote request failed before a response was received.
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// Item path would escape the destination root.
    #[error("Invalid item path: {path}")]
    InvalidItemPath { path: String },

    /// I/O error on a specific path.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Engine-specific failure.
    #[error("Transfer failed: {0}")]
    Failed(String),
}

impl TransferError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Maps a transport error for `url`.
    pub fn request(url: &str, error: reqwest::Error) -> Self {
        Self::Request {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}
