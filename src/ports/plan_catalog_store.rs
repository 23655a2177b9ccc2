//! Plan catalog store port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::subscription::{Plan, PlanCode};

/// Read access to plan definitions.
#[async_trait]
pub trait PlanCatalogStore: Send + Sync {
    /// All plans currently offered.
    async fn list_active(&self) -> Result<Vec<Plan>, DomainError>;

    /// Looks up one plan. Returns `None` if no plan has this code.
    async fn get_by_code(&self, code: &PlanCode) -> Result<Option<Plan>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_catalog_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn PlanCatalogStore) {}
    }
}
