//! Entitlement and usage settings

use chrono::FixedOffset;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::subscription::PlanCode;

/// Settings shared by the plan catalog, entitlement resolver and usage counter.
#[derive(Debug, Clone, Deserialize)]
pub struct EntitlementsConfig {
    /// Deadline for every store call, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Age after which the plan catalog is re-read, in seconds
    #[serde(default = "default_catalog_ttl_secs")]
    pub catalog_ttl_secs: u64,

    /// Offset used to decide "today" for usage periods and date presets
    #[serde(default = "default_reference_utc_offset")]
    pub reference_utc_offset: String,

    /// Plan assigned to tenants without a subscription
    #[serde(default = "default_plan_code")]
    pub default_plan_code: String,
}

impl EntitlementsConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }

    /// Parsed reference offset.
    pub fn reference_offset(&self) -> Result<FixedOffset, ValidationError> {
        parse_utc_offset(&self.reference_utc_offset)
    }

    pub fn default_plan(&self) -> Result<PlanCode, ValidationError> {
        PlanCode::new(self.default_plan_code.as_str())
            .map_err(|_| ValidationError::InvalidPlanCode(self.default_plan_code.clone()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.store_timeout_ms == 0 || self.store_timeout_ms > 60_000 {
            return Err(ValidationError::InvalidTimeout("entitlements.store_timeout_ms"));
        }
        self.reference_offset()?;
        self.default_plan()?;
        Ok(())
    }
}

impl Default for EntitlementsConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: default_store_timeout_ms(),
            catalog_ttl_secs: default_catalog_ttl_secs(),
            reference_utc_offset: default_reference_utc_offset(),
            default_plan_code: default_plan_code(),
        }
    }
}

/// Parses `Z`, `+HH:MM`, `-HH:MM` or `+HHMM`.
fn parse_utc_offset(raw: &str) -> Result<FixedOffset, ValidationError> {
    let invalid = || ValidationError::InvalidUtcOffset(raw.to_string());
    let value = raw.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match value.chars().next() {
        Some('+') => (1, &value[1..]),
        Some('-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if hours > 14 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn default_store_timeout_ms() -> u64 {
    5_000
}

fn default_catalog_ttl_secs() -> u64 {
    300
}

fn default_reference_utc_offset() -> String {
    "+00:00".to_string()
}

fn default_plan_code() -> String {
    PlanCode::FREE.to_string()
}
