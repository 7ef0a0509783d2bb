//! Configuration loaded from the process environment

use anyhow::{bail, Context, Result};
use onboard_lib::RetryPolicy;
use serde::Deserialize;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Service name attached to every log event
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Tracing filter directive (e.g. "info", "onboard_lib=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Inventory API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token for the inventory API
    #[serde(default)]
    pub secure_api_token: String,

    /// Attempts per API call on rate limiting or transport failure
    #[serde(default = "default_api_max_retries")]
    pub api_max_retries: u32,
}

fn default_service_name() -> String {
    "managed-clusters-onboard-tracking".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_url() -> String {
    "https://secure.sysdig.com".to_string()
}

fn default_api_max_retries() -> u32 {
    5
}

impl AppConfig {
    /// Load from environment variables (SERVICE_NAME, LOG_LEVEL, LOG_FORMAT,
    /// API_URL, SECURE_API_TOKEN, API_MAX_RETRIES)
    pub fn load() -> Result<Self> {
        Self::from_source(config::Environment::default())
    }

    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to read configuration")?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("Failed to parse configuration")?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            bail!("SERVICE_NAME is missing");
        }
        if self.secure_api_token.trim().is_empty() {
            bail!("SECURE_API_TOKEN environment variable not set");
        }
        if self.api_url.trim().is_empty() {
            bail!("API_URL environment variable not set");
        }
        if self.api_max_retries == 0 {
            bail!("API_MAX_RETRIES must be at least 1");
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_attempts(self.api_max_retries)
    }
}
