//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `DOCERIA_API_URL` - Base URL of the backend (default: `http://127.0.0.1:8000`)
//! - `DOCERIA_STORAGE_PATH` - Path of the JSON key-value store file
//!   (default: `$HOME/.doceria/storage.json`, falling back to
//!   `./doceria_storage.json` when no home directory is available)
//! - `DOCERIA_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default backend address, matching the backend's development server.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without a trailing slash.
    pub api_url: String,
    /// Where the persistent key-value store lives on disk.
    pub storage_path: PathBuf,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid (malformed
    /// URL, non-numeric timeout).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let raw_url = get_env_or_default("DOCERIA_API_URL", DEFAULT_API_URL);
        let api_url = normalize_api_url(&raw_url)?;

        let storage_path = get_optional_env("DOCERIA_STORAGE_PATH")
            .map_or_else(default_storage_path, PathBuf::from);

        let http_timeout = match get_optional_env("DOCERIA_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("DOCERIA_HTTP_TIMEOUT_SECS".to_owned(), e.to_string())
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            storage_path,
            http_timeout,
        })
    }
}

/// Validate the base URL and strip any trailing slash so `endpoint()` can
/// concatenate paths verbatim.
fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("DOCERIA_API_URL".to_owned(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "DOCERIA_API_URL".to_owned(),
            format!("unsupported scheme: {}", url.scheme()),
        ));
    }
    Ok(raw.trim_end_matches('/').to_owned())
}

fn default_storage_path() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from("doceria_storage.json"),
        |home| PathBuf::from(home).join(".doceria").join("storage.json"),
    )
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
