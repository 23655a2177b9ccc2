//! Plan definitions.
//!
//! A plan is a subscription tier offering with its numeric limits. Plans are
//! read from the plan catalog store; codes are immutable once referenced.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{PlanId, ValidationError};

use super::PlanTier;

/// Unique short identifier of a plan ("free", "pro", "enterprise", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlanCode(String);

impl PlanCode {
    /// Code of the fallback plan every tenant without a subscription gets.
    pub const FREE: &'static str = "free";

    /// Creates a plan code. Codes are trimmed and lowercased; they may only
    /// contain ASCII letters, digits, `-` and `_`.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into().trim().to_lowercase();
        if code.is_empty() {
            return Err(ValidationError::empty_field("plan_code"));
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::invalid_format(
                "plan_code",
                format!("'{}' contains unsupported characters", code),
            ));
        }
        Ok(Self(code))
    }

    pub const PRO: &'static str = "pro";
    pub const ENTERPRISE: &'static str = "enterprise";

    pub fn free() -> Self {
        Self(Self::FREE.to_string())
    }

    pub fn pro() -> Self {
        Self(Self::PRO.to_string())
    }

    pub fn enterprise() -> Self {
        Self(Self::ENTERPRISE.to_string())
    }

    pub fn is_free(&self) -> bool {
        self.0 == Self::FREE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlanCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PlanCode::new(value)
    }
}

impl From<PlanCode> for String {
    fn from(code: PlanCode) -> Self {
        code.0
    }
}

impl fmt::Display for PlanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-plan entitlements and numeric limits.
///
/// Serialized with the backend's column names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanCapabilities {
    #[serde(rename = "exportar", default)]
    pub export: bool,

    #[serde(default)]
    pub backups: bool,

    #[serde(rename = "mensajes_ilimitados", default)]
    pub unlimited_messages: bool,

    #[serde(rename = "multiples_usuarios", default)]
    pub multiple_users: bool,

    /// Maximum team profiles including the owner. None = unlimited.
    #[serde(rename = "max_perfiles", default)]
    pub max_profiles: Option<u32>,

    /// Messages per calendar month. None = unlimited.
    #[serde(rename = "limite_mensajes_mes", default)]
    pub monthly_message_limit: Option<u32>,
}

impl PlanCapabilities {
    /// Effective monthly message limit; `None` means unlimited.
    pub fn message_limit(&self) -> Option<u32> {
        if self.unlimited_messages {
            None
        } else {
            self.monthly_message_limit
        }
    }

    /// Check if the profile limit has been reached.
    ///
    /// Returns false if unlimited or under limit.
    pub fn profile_limit_reached(&self, current_profiles: u32) -> bool {
        self.max_profiles
            .map(|max| current_profiles >= max)
            .unwrap_or(false)
    }
}

/// A subscription plan definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub code: PlanCode,
    pub name: String,
    pub tier: PlanTier,
    pub capabilities: PlanCapabilities,
    pub is_active: bool,
}

impl Plan {
    pub fn new(
        id: PlanId,
        code: PlanCode,
        name: impl Into<String>,
        tier: PlanTier,
        capabilities: PlanCapabilities,
    ) -> Self {
        Self {
            id,
            code,
            name: name.into(),
            tier,
            capabilities,
            is_active: true,
        }
    }

    pub fn is_free(&self) -> bool {
        self.code.is_free()
    }
}
