//! Configuration loading

use crate::error::CoreResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyConfig {
    /// Backend API configuration
    pub api: ApiConfig,

    /// Authentication behaviour
    pub auth: AuthConfig,

    /// Directory for the persisted session and logs
    pub data_dir: PathBuf,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `https://api.example.com`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Authentication behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Seconds before token expiry at which a refresh is triggered
    pub refresh_skew_secs: i64,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            auth: AuthConfig::default(),
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tally"),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            refresh_skew_secs: 60,
        }
    }
}

impl TallyConfig {
    /// Load configuration from a file, with `TALLY_`-prefixed environment
    /// variables layered on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> CoreResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load configuration from defaults and environment variables only.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed
    pub fn from_env() -> CoreResult<Self> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs)?
            .set_default("auth.refresh_skew_secs", defaults.auth.refresh_skew_secs)?
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Path of the persisted session file.
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}
