use serde::{Deserialize, Serialize};

use crate::transfer::TransferConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// Build service connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Collection URL of the build service (e.g., "https://dev.azure.com/org")
    #[serde(default)]
    pub collection_url: String,
    /// Personal access token used for build queries and container reads
    #[serde(default)]
    pub access_token: Option<String>,
    /// Request timeout in seconds (default: 60)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// REST API version sent with build queries (default: "2.0")
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            collection_url: String::new(),
            access_token: None,
            timeout_secs: default_timeout(),
            api_version: default_api_version(),
        }
    }
}

impl ServiceConfig {
    /// Collection URL without trailing slash.
    pub fn base_url(&self) -> &str {
        self.collection_url.trim().trim_end_matches('/')
    }
}

fn default_timeout() -> u32 {
    60
}

fn default_api_version() -> String {
    "2.0".to_string()
}

/// Sanitized config for display (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub service: SanitizedServiceConfig,
    pub transfer: TransferConfig,
}

/// Sanitized service config (access token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedServiceConfig {
    pub collection_url: String,
    pub access_token_configured: bool,
    pub timeout_secs: u32,
    pub api_version: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            service: SanitizedServiceConfig {
                collection_url: config.service.collection_url.clone(),
                access_token_configured: config
                    .service
                    .access_token
                    .as_deref()
                    .is_some_and(|t| !t.is_empty()),
                timeout_secs: config.service.timeout_secs,
                api_version: config.service.api_version.clone(),
            },
            transfer: config.transfer.clone(),
        }
    }
}
