//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `OPEN_SPACE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use open_space::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod broadcast;
mod error;
mod logging;
mod optimizer;

pub use broadcast::BroadcastConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use optimizer::OptimizerConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Defaults for optimize requests
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-session event channels
    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `OPEN_SPACE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `OPEN_SPACE__OPTIMIZER__RECTIFY_CONFLICTS=false` -> `optimizer.rectify_conflicts = false`
    /// - `OPEN_SPACE__LOGGING__JSON=true` -> `logging.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("OPEN_SPACE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.logging.validate()?;
        self.broadcast.validate()?;
        Ok(())
    }
}
