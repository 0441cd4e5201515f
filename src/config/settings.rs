//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use super::file::CredentialStore;
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::DEFAULT_BODY_LOG_LIMIT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.exa.ai";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Exa API configuration
    pub api: ApiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Exa API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API key, if one was found
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Where the key came from
    pub key_source: Option<KeySource>,
    /// API base URL
    pub base_url: String,
    /// One-shot request timeout in seconds
    pub timeout: u64,
    /// Cap on traced bodies in characters
    pub body_log_limit: usize,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("key_source", &self.key_source)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("body_log_limit", &self.body_log_limit)
            .finish()
    }
}

/// Origin of the resolved API key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeySource {
    Environment,
    File(std::path::PathBuf),
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the environment and the default credential file
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let store = CredentialStore::default_location()?;
        Self::load(&store)
    }

    /// Load settings, falling back to `store` when `EXA_API_KEY` is unset
    pub fn load(store: &CredentialStore) -> Result<Self> {
        let (api_key, key_source) = match non_empty_env("EXA_API_KEY") {
            Some(key) => (Some(key), Some(KeySource::Environment)),
            None => match store.load() {
                Ok(Some(key)) => (Some(key), Some(KeySource::File(store.path().to_path_buf()))),
                Ok(None) => (None, None),
                Err(e) => {
                    debug!("Credential file not usable: {:#}", e);
                    (None, None)
                }
            },
        };

        let settings = Self {
            api: ApiConfig {
                api_key,
                key_source,
                base_url: non_empty_env("EXA_API_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout: get_env_or_default("EXA_TIMEOUT", "60")
                    .parse()
                    .context("Invalid timeout value")?,
                body_log_limit: get_env_or_default(
                    "EXA_DEBUG_BODY_LIMIT",
                    &DEFAULT_BODY_LOG_LIMIT.to_string(),
                )
                .parse()
                .context("Invalid debug body limit")?,
            },
            logging: LoggingConfig {
                level: get_env_or_default("RUST_LOG", "warn"),
                format: get_env_or_default("LOG_FORMAT", "text"),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    fn validate(&self) -> Result<()> {
        // Validate URL format
        if !self.api.base_url.starts_with("http") {
            anyhow::bail!("Invalid Exa base URL format, should start with 'http'");
        }

        if self.api.timeout == 0 {
            anyhow::bail!("Timeout values cannot be 0");
        }

        if let Some(key) = &self.api.api_key {
            if key.contains(char::is_whitespace) {
                anyhow::bail!("Exa API key cannot contain whitespace characters");
            }
        }

        // Validate log format
        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }

    /// API key, or the missing-credential error
    pub fn require_api_key(&self) -> AppResult<&str> {
        self.api
            .api_key
            .as_deref()
            .ok_or(AppError::MissingCredential)
    }
}

/// Get environment variable or default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
