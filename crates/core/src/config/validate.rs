use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Collection URL is an http(s) URL
/// - Request timeout is not 0
/// - Transfer buffer size and default parallel limit are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let url = config.service.collection_url.trim();
    if url.is_empty() {
        return Err(ConfigError::ValidationError(
            "service.collection_url is required".to_string(),
        ));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "service.collection_url must be an http(s) URL, got '{}'",
            url
        )));
    }

    if config.service.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "service.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.transfer.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "transfer.buffer_size cannot be 0".to_string(),
        ));
    }

    if config.transfer.default_parallel_limit == 0 {
        return Err(ConfigError::ValidationError(
            "transfer.default_parallel_limit cannot be 0".to_string(),
        ));
    }

    Ok(())
}
