//! Roster members and their per-period metrics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Amount, MemberId};

/// Role of a clinic team member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Dentist,
    Assistant,
    Receptionist,
    #[default]
    #[serde(other)]
    Other,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "owner",
            MemberRole::Dentist => "dentist",
            MemberRole::Assistant => "assistant",
            MemberRole::Receptionist => "receptionist",
            MemberRole::Other => "other",
        }
    }

    /// Parses a stored role; unrecognized values become `Other`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "owner" => MemberRole::Owner,
            "dentist" => MemberRole::Dentist,
            "assistant" => MemberRole::Assistant,
            "receptionist" => MemberRole::Receptionist,
            _ => MemberRole::Other,
        }
    }
}

/// A profile on the clinic roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub member_id: MemberId,
    pub display_name: String,
    pub role: MemberRole,
}

impl MemberProfile {
    pub fn new(member_id: MemberId, display_name: impl Into<String>, role: MemberRole) -> Self {
        Self {
            member_id,
            display_name: display_name.into(),
            role,
        }
    }
}

/// Per-member snapshot for the current period.
///
/// There is no stored balance: `balance_this_period()` is always derived,
/// and a `balance` key in deserialized input is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberMetric {
    pub member_id: MemberId,
    pub display_name: String,
    pub role: MemberRole,
    #[serde(default)]
    pub total_patients: u32,
    #[serde(default)]
    pub income_this_period: Amount,
    #[serde(default)]
    pub expenses_this_period: Amount,
    #[serde(default)]
    pub appointments_this_period: u32,
    #[serde(default)]
    pub procedures_this_period: u32,
}

impl TeamMemberMetric {
    /// Zero-valued metric for a member whose snapshot could not be loaded.
    pub fn zero(profile: &MemberProfile) -> Self {
        Self {
            member_id: profile.member_id,
            display_name: profile.display_name.clone(),
            role: profile.role,
            total_patients: 0,
            income_this_period: Amount::ZERO,
            expenses_this_period: Amount::ZERO,
            appointments_this_period: 0,
            procedures_this_period: 0,
        }
    }

    pub fn balance_this_period(&self) -> Decimal {
        self.income_this_period.value() - self.expenses_this_period.value()
    }
}
