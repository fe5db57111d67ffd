//! Error types for build queries.

use thiserror::Error;

/// Errors returned by a build query service.
#[derive(Debug, Error)]
pub enum BuildApiError {
    /// Failed to construct the HTTP client.
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    /// Request timed out.
    #[error("request timed out: {url}")]
    Timeout { url: String },

    /// Could not reach the service.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Credentials were rejected.
    #[error("authentication failed (HTTP {status}) for {url}")]
    Unauthorized { status: u16, url: String },

    /// Service answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// Response body could not be decoded.
    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// Any other request failure.
    #[error("request failed: {0}")]
    Request(String),
}

impl BuildApiError {
    /// Maps a transport error for `url`.
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::ConnectionFailed(error.to_string())
        } else if error.is_decode() {
            Self::Decode {
                url: url.to_string(),
                reason: error.to_string(),
            }
        } else {
            Self::Request(error.to_string())
        }
    }
}
