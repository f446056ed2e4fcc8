//! Client configuration and local data paths.
//!
//! Everything is read from environment variables with sensible defaults;
//! there is no config file. The data directory only ever holds the stored
//! token pair.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Backend the client talks to when `RECALLFORGE_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
    #[error("No data directory available on this platform")]
    NoDataDir,
}

/// Connection settings for the remote API.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the API server, without a trailing slash
    pub base_url: String,
    /// Overall per-request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the environment.
    ///
    /// `RECALLFORGE_API_URL` sets the base URL and
    /// `RECALLFORGE_TIMEOUT_SECS` the per-request timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("RECALLFORGE_API_URL") {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue("RECALLFORGE_API_URL", url));
            }
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(raw) = std::env::var("RECALLFORGE_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RECALLFORGE_TIMEOUT_SECS", raw.clone()))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Configuration pointing at a specific server, defaults elsewhere.
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            base_url: url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

/// Per-user data directory for client-local state (the token pair).
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join("recallforge"))
        .ok_or(ConfigError::NoDataDir)
}
