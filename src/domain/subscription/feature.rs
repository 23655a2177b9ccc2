//! Hard-coded capability table.
//!
//! | Feature | Minimum tier |
//! |---------|--------------|
//! | odontograma, pacientes, citas, presupuestos, pagos | Free |
//! | exportar, backups, recordatorios_whatsapp, reportes_avanzados, mensajes_ilimitados | Pro |
//! | multiples_usuarios, metricas_equipo, api_access, soporte_prioritario | Enterprise |
//!
//! Gating is advisory UI behaviour; row-level enforcement lives in the
//! backing store. Unknown feature names are denied.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PlanTier;

/// A named, tier-gated capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    #[serde(rename = "odontograma")]
    Odontogram,
    #[serde(rename = "pacientes")]
    Patients,
    #[serde(rename = "citas")]
    Appointments,
    #[serde(rename = "presupuestos")]
    Budgets,
    #[serde(rename = "pagos")]
    Payments,
    #[serde(rename = "exportar")]
    Export,
    #[serde(rename = "backups")]
    Backups,
    #[serde(rename = "recordatorios_whatsapp")]
    WhatsappReminders,
    #[serde(rename = "reportes_avanzados")]
    AdvancedReports,
    #[serde(rename = "mensajes_ilimitados")]
    UnlimitedMessages,
    #[serde(rename = "multiples_usuarios")]
    MultipleUsers,
    #[serde(rename = "metricas_equipo")]
    TeamMetrics,
    #[serde(rename = "api_access")]
    ApiAccess,
    #[serde(rename = "soporte_prioritario")]
    PrioritySupport,
}

impl Feature {
    pub const ALL: [Feature; 14] = [
        Feature::Odontogram,
        Feature::Patients,
        Feature::Appointments,
        Feature::Budgets,
        Feature::Payments,
        Feature::Export,
        Feature::Backups,
        Feature::WhatsappReminders,
        Feature::AdvancedReports,
        Feature::UnlimitedMessages,
        Feature::MultipleUsers,
        Feature::TeamMetrics,
        Feature::ApiAccess,
        Feature::PrioritySupport,
    ];

    /// The name used by callers and the backend.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Odontogram => "odontograma",
            Feature::Patients => "pacientes",
            Feature::Appointments => "citas",
            Feature::Budgets => "presupuestos",
            Feature::Payments => "pagos",
            Feature::Export => "exportar",
            Feature::Backups => "backups",
            Feature::WhatsappReminders => "recordatorios_whatsapp",
            Feature::AdvancedReports => "reportes_avanzados",
            Feature::UnlimitedMessages => "mensajes_ilimitados",
            Feature::MultipleUsers => "multiples_usuarios",
            Feature::TeamMetrics => "metricas_equipo",
            Feature::ApiAccess => "api_access",
            Feature::PrioritySupport => "soporte_prioritario",
        }
    }

    /// Looks up a feature by name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Lowest tier that grants this feature.
    pub fn minimum_tier(&self) -> PlanTier {
        match self {
            Feature::Odontogram
            | Feature::Patients
            | Feature::Appointments
            | Feature::Budgets
            | Feature::Payments => PlanTier::Free,
            Feature::Export
            | Feature::Backups
            | Feature::WhatsappReminders
            | Feature::AdvancedReports
            | Feature::UnlimitedMessages => PlanTier::Pro,
            Feature::MultipleUsers
            | Feature::TeamMetrics
            | Feature::ApiAccess
            | Feature::PrioritySupport => PlanTier::Enterprise,
        }
    }

    pub fn is_granted_to(&self, tier: PlanTier) -> bool {
        tier.includes(self.minimum_tier())
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Name-based capability check; unknown names are denied.
pub fn tier_grants(tier: PlanTier, feature_name: &str) -> bool {
    Feature::from_name(feature_name)
        .map(|feature| feature.is_granted_to(tier))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIERS: [PlanTier; 3] = [PlanTier::Free, PlanTier::Pro, PlanTier::Enterprise];

    #[test]
    fn odontogram_is_available_on_every_tier() {
        for tier in TIERS {
            assert!(tier_grants(tier, "odontograma"), "{tier} should have odontograma");
        }
    }

    #[test]
    fn api_access_is_enterprise_only() {
        assert!(!tier_grants(PlanTier::Free, "api_access"));
        assert!(!tier_grants(PlanTier::Pro, "api_access"));
        assert!(tier_grants(PlanTier::Enterprise, "api_access"));
    }

    #[test]
    fn export_requires_pro() {
        assert!(!tier_grants(PlanTier::Free, "exportar"));
        assert!(tier_grants(PlanTier::Pro, "exportar"));
        assert!(tier_grants(PlanTier::Enterprise, "exportar"));
    }

    #[test]
    fn unknown_feature_is_denied_everywhere() {
        for tier in TIERS {
            assert!(!tier_grants(tier, "unknown_feature"));
            assert!(!tier_grants(tier, ""));
        }
    }

    #[test]
    fn names_roundtrip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_name(feature.name()), Some(feature));
        }
    }

    #[test]
    fn serde_uses_backend_names() {
        let json = serde_json::to_string(&Feature::TeamMetrics).unwrap();
        assert_eq!(json, "\"metricas_equipo\"");
    }
}
