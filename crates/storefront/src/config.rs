//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MERCADITO_API_URL` - Base URL of the backend (default: `http://localhost:5000`)
//! - `MERCADITO_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API.
    pub api_url: Url,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_env_or_default("MERCADITO_API_URL", DEFAULT_API_URL);
        let api_url = Url::parse(api_url.trim_end_matches('/')).map_err(|e| {
            ConfigError::InvalidEnvVar("MERCADITO_API_URL".to_owned(), e.to_string())
        })?;

        let timeout_secs = match std::env::var("MERCADITO_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("MERCADITO_TIMEOUT_SECS".to_owned(), e.to_string())
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// A configuration pointing at an explicit base URL (used by tests and
    /// the integration harness).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse.
    pub fn with_api_url(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: Url::parse(api_url.trim_end_matches('/')).map_err(|e| {
                ConfigError::InvalidEnvVar("MERCADITO_API_URL".to_owned(), e.to_string())
            })?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
