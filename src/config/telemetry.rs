//! Logging configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Application environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Output format of log lines
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub environment: Environment,

    /// `EnvFilter` directive, e.g. `info,odontia=debug`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Overrides the per-environment default format
    #[serde(default)]
    pub format: Option<LogFormat>,
}

impl TelemetryConfig {
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// JSON in production, compact elsewhere, unless set explicitly.
    pub fn effective_format(&self) -> LogFormat {
        self.format.unwrap_or(if self.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Compact
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.log_level.trim().is_empty() {
            return Err(ValidationError::InvalidLogFilter(self.log_level.clone()));
        }
        tracing_subscriber::EnvFilter::try_new(&self.log_level)
            .map_err(|_| ValidationError::InvalidLogFilter(self.log_level.clone()))?;
        Ok(())
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            log_level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
