//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; the API access token is read from
//! the `TRADELANE_ACCESS_TOKEN` environment variable only.
//!
//! # Example
//!
//! ```no_run
//! use tradelane::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::cache::CacheConfig;
use super::logging::LoggingConfig;
use crate::adapter::outbound::esi::settings::ACCESS_TOKEN_ENV;
use crate::adapter::outbound::esi::EsiConfig;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Market API connection and concurrency settings.
    #[serde(default)]
    pub esi: EsiConfig,

    /// Cache lifetimes.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Static universe file (systems and gates).
    #[serde(default = "default_universe_path")]
    pub universe_path: String,
}

fn default_universe_path() -> String {
    "universe.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            esi: EsiConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            universe_path: default_universe_path(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Never read from the config file.
        config.esi.access_token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty());

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.esi.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        if let Err(e) = url::Url::parse(&self.esi.base_url) {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: e.to_string(),
            }
            .into());
        }
        if !self.esi.base_url.ends_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: "must end with '/'".to_string(),
            }
            .into());
        }
        if self.esi.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.esi.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrency",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.esi.batch_workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch_workers",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.esi.progress_interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "progress_interval",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.universe_path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "universe_path",
            }
            .into());
        }
        Ok(())
    }

    /// Initialize the global tracing subscriber from `[logging]`.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
