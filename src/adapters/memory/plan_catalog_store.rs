//! In-memory plan catalog store seeded with the standard plans.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::subscription::{Plan, PlanCapabilities, PlanCode, PlanTier};
use crate::ports::PlanCatalogStore;

use super::faults::{lock, Faults};

/// The free, pro and enterprise plans offered by default.
pub fn default_plans() -> Vec<Plan> {
    vec![
        Plan::new(
            PlanId::new(),
            PlanCode::free(),
            "Gratis",
            PlanTier::Free,
            PlanCapabilities {
                max_profiles: Some(1),
                monthly_message_limit: Some(50),
                ..Default::default()
            },
        ),
        Plan::new(
            PlanId::new(),
            PlanCode::pro(),
            "Profesional",
            PlanTier::Pro,
            PlanCapabilities {
                export: true,
                backups: true,
                unlimited_messages: true,
                multiple_users: false,
                max_profiles: Some(1),
                monthly_message_limit: None,
            },
        ),
        Plan::new(
            PlanId::new(),
            PlanCode::enterprise(),
            "Clínica",
            PlanTier::Enterprise,
            PlanCapabilities {
                export: true,
                backups: true,
                unlimited_messages: true,
                multiple_users: true,
                max_profiles: Some(10),
                monthly_message_limit: None,
            },
        ),
    ]
}

#[derive(Debug, Default)]
pub struct InMemoryPlanCatalogStore {
    plans: Mutex<Vec<Plan>>,
    faults: Faults,
    list_calls: AtomicUsize,
}

impl InMemoryPlanCatalogStore {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self {
            plans: Mutex::new(plans),
            ..Default::default()
        }
    }

    pub fn with_default_plans() -> Self {
        Self::new(default_plans())
    }

    pub fn faults(&self) -> &Faults {
        &self.faults
    }

    /// Replace the stored plans.
    pub fn set_plans(&self, plans: Vec<Plan>) {
        *lock(&self.plans) = plans;
    }

    /// Number of `list_active` calls served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlanCatalogStore for InMemoryPlanCatalogStore {
    async fn list_active(&self) -> Result<Vec<Plan>, DomainError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.faults.apply().await?;
        Ok(lock(&self.plans)
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect())
    }

    async fn get_by_code(&self, code: &PlanCode) -> Result<Option<Plan>, DomainError> {
        self.faults.apply().await?;
        Ok(lock(&self.plans).iter().find(|p| p.code == *code).cloned())
    }
}
