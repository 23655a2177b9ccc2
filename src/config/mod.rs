//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ODONTIA` prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use odontia::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Store timeout: {:?}", config.entitlements.store_timeout());
//! ```

mod database;
mod entitlements;
mod error;
mod telemetry;

pub use database::DatabaseConfig;
pub use entitlements::EntitlementsConfig;
pub use error::{ConfigError, ValidationError};
pub use telemetry::{Environment, LogFormat, TelemetryConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
/// Without a `database` section the in-memory adapters are used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection (optional)
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Store deadlines, catalog TTL, reference timezone, default plan
    #[serde(default)]
    pub entitlements: EntitlementsConfig,

    /// Log filter and format
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ODONTIA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ODONTIA__DATABASE__URL=...` -> `database.url = ...`
    /// - `ODONTIA__ENTITLEMENTS__STORE_TIMEOUT_MS=2000` -> `entitlements.store_timeout_ms = 2000`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("ODONTIA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.entitlements.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}
