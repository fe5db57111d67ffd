//! Configuration for the transfer engine.

use serde::{Deserialize, Serialize};

/// Configuration for the item transfer engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Buffer size for file copies in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Simultaneous file transfers per job when the caller sets no limit.
    #[serde(default = "default_parallel_limit")]
    pub default_parallel_limit: usize,

    /// Timeout for a single listing or content request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_buffer_size() -> usize {
    1024 * 1024 // 1 MB
}

fn default_parallel_limit() -> usize {
    4
}

fn default_request_timeout() -> u64 {
    600
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            default_parallel_limit: default_parallel_limit(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl TransferConfig {
    /// Sets the buffer size for copies.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Sets the default per-job parallelism.
    pub fn with_default_parallel_limit(mut self, limit: usize) -> Self {
        self.default_parallel_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransferConfig::default();
        assert_eq!(config.buffer_size, 1024 * 1024);
        assert_eq!(config.default_parallel_limit, 4);
        assert_eq!(config.request_timeout_secs, 600);
    }

    #[test]
    fn test_config_builder() {
        let config = TransferConfig::default()
            .with_buffer_size(4096)
            .with_default_parallel_limit(16);
        assert_eq!(config.buffer_size, 4096);
        assert_eq!(config.default_parallel_limit, 16);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TransferConfig = toml::from_str("default_parallel_limit = 2").unwrap();
        assert_eq!(config.default_parallel_limit, 2);
        assert_eq!(config.buffer_size, 1024 * 1024);
    }
}
