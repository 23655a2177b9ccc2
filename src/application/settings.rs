//! Runtime settings shared by the application services.

use chrono::{FixedOffset, Offset, Utc};
use std::time::Duration;

use crate::config::{EntitlementsConfig, ValidationError};
use crate::domain::subscription::PlanCode;

#[derive(Debug, Clone)]
pub struct CoreSettings {
    /// Deadline applied to every port call.
    pub store_timeout: Duration,
    /// Age after which the plan catalog is re-read.
    pub catalog_ttl: Duration,
    /// Offset that decides the calendar date of "today".
    pub reference_offset: FixedOffset,
    /// Plan given to tenants on first resolve.
    pub default_plan: PlanCode,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
            catalog_ttl: Duration::from_secs(300),
            reference_offset: Utc.fix(),
            default_plan: PlanCode::free(),
        }
    }
}

impl TryFrom<&EntitlementsConfig> for CoreSettings {
    type Error = ValidationError;

    fn try_from(config: &EntitlementsConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self {
            store_timeout: config.store_timeout(),
            catalog_ttl: config.catalog_ttl(),
            reference_offset: config.reference_offset()?,
            default_plan: config.default_plan()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_from_config() {
        let config = EntitlementsConfig {
            store_timeout_ms: 250,
            reference_utc_offset: "-05:00".to_string(),
            ..Default::default()
        };
        let settings = CoreSettings::try_from(&config).unwrap();
        assert_eq!(settings.store_timeout, Duration::from_millis(250));
        assert_eq!(settings.reference_offset.local_minus_utc(), -5 * 3600);
        assert!(settings.default_plan.is_free());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EntitlementsConfig {
            reference_utc_offset: "nowhere".to_string(),
            ..Default::default()
        };
        assert!(CoreSettings::try_from(&config).is_err());
    }
}
