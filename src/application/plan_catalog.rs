//! Cached plan catalog.
//!
//! Plans are re-read lazily: the first access after the TTL expires reloads
//! the listing from the store. There is no background refresh task.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::foundation::{Clock, DomainError, ErrorCode, Timestamp};
use crate::domain::subscription::{Plan, PlanCode};
use crate::ports::PlanCatalogStore;

use super::deadline::bounded;

struct CachedPlans {
    plans: Vec<Plan>,
    loaded_at: Timestamp,
}

pub struct PlanCatalog {
    store: Arc<dyn PlanCatalogStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    store_timeout: Duration,
    cache: RwLock<Option<CachedPlans>>,
}

impl PlanCatalog {
    pub fn new(
        store: Arc<dyn PlanCatalogStore>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            ttl,
            store_timeout,
            cache: RwLock::new(None),
        }
    }

    /// Active plans, reloading first if the cache is empty or stale.
    pub async fn list_plans(&self) -> Result<Vec<Plan>, DomainError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if self.is_fresh(cached) {
                    return Ok(cached.plans.clone());
                }
            }
        }
        self.refresh().await
    }

    /// Looks up an active plan by code. `None` if the catalog has no such plan.
    pub async fn get(&self, code: &PlanCode) -> Result<Option<Plan>, DomainError> {
        Ok(self
            .list_plans()
            .await?
            .into_iter()
            .find(|plan| plan.code == *code))
    }

    /// Reload from the store regardless of age.
    ///
    /// A failed or invalid load leaves the previous cache in place and
    /// returns the error.
    pub async fn refresh(&self) -> Result<Vec<Plan>, DomainError> {
        let plans = bounded(
            "plan_catalog.list_active",
            self.store_timeout,
            self.store.list_active(),
        )
        .await?;
        validate_listing(&plans)?;

        tracing::debug!(plans = plans.len(), "plan catalog refreshed");
        let mut cache = self.cache.write().await;
        *cache = Some(CachedPlans {
            plans: plans.clone(),
            loaded_at: self.clock.now(),
        });
        Ok(plans)
    }

    fn is_fresh(&self, cached: &CachedPlans) -> bool {
        let age = self
            .clock
            .now()
            .as_datetime()
            .signed_duration_since(*cached.loaded_at.as_datetime());
        // A clock that moved backwards counts as fresh.
        age.to_std().map_or(true, |age| age < self.ttl)
    }
}

/// Exactly one plan coded "free" and no duplicate codes.
pub fn validate_listing(plans: &[Plan]) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for plan in plans {
        if !seen.insert(plan.code.as_str()) {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Plan catalog lists code '{}' more than once", plan.code),
            )
            .with_detail("plan_code", plan.code.as_str()));
        }
    }
    if !seen.contains(PlanCode::FREE) {
        return Err(DomainError::new(
            ErrorCode::PlanNotFound,
            "Plan catalog has no 'free' plan",
        )
        .with_detail("plan_code", PlanCode::FREE));
    }
    Ok(())
}
