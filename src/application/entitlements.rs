//! EntitlementResolver - subscription resolution and capability checks.
//!
//! # Self-healing
//!
//! A tenant without an active subscription gets one on the default plan the
//! first time it is resolved. The write is an atomic insert-if-absent, so
//! concurrent first calls converge on one row. A store failure or timeout is
//! returned as such and never triggers the fallback.

use std::sync::Arc;

use crate::domain::foundation::{Clock, ErrorCode, TenantId};
use crate::domain::subscription::{
    tier_grants, AccessDeniedReason, AccessResult, Feature, Plan, PlanCode, Subscription,
    SubscriptionError,
};
use crate::ports::SubscriptionStore;

use super::deadline::bounded;
use super::{CoreSettings, PlanCatalog};

pub struct EntitlementResolver {
    subscriptions: Arc<dyn SubscriptionStore>,
    catalog: Arc<PlanCatalog>,
    clock: Arc<dyn Clock>,
    settings: CoreSettings,
}

impl EntitlementResolver {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionStore>,
        catalog: Arc<PlanCatalog>,
        clock: Arc<dyn Clock>,
        settings: CoreSettings,
    ) -> Self {
        Self {
            subscriptions,
            catalog,
            clock,
            settings,
        }
    }

    /// The tenant's active subscription, created on the default plan if
    /// confirmed absent.
    pub async fn resolve_active_subscription(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Subscription, SubscriptionError> {
        if let Some(existing) = self.get_active(tenant_id).await? {
            return Ok(existing);
        }

        let plan = self
            .catalog
            .get(&self.settings.default_plan)
            .await?
            .ok_or_else(|| SubscriptionError::PlanNotFound(self.settings.default_plan.to_string()))?;
        let today = self.clock.today_in(self.settings.reference_offset);
        let candidate = Subscription::new(*tenant_id, plan, today, self.clock.now());

        let created = bounded(
            "subscriptions.create_if_absent",
            self.settings.store_timeout,
            self.subscriptions.create_if_absent(&candidate),
        )
        .await;

        match created {
            Ok(subscription) => {
                if subscription.id == candidate.id {
                    tracing::info!(
                        tenant_id = %tenant_id,
                        subscription_id = %subscription.id,
                        plan = %subscription.plan.code,
                        "created default subscription"
                    );
                } else {
                    tracing::debug!(tenant_id = %tenant_id, "lost creation race, using existing subscription");
                }
                Ok(subscription)
            }
            Err(err) if err.code == ErrorCode::ConcurrencyConflict => {
                tracing::debug!(tenant_id = %tenant_id, "creation conflict, re-reading once");
                self.get_active(tenant_id)
                    .await?
                    .ok_or(SubscriptionError::ConcurrencyConflict(*tenant_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Whether the tenant's plan tier grants `feature_name`. Unknown names
    /// are denied.
    pub async fn has_capability(
        &self,
        tenant_id: &TenantId,
        feature_name: &str,
    ) -> Result<bool, SubscriptionError> {
        let subscription = self.resolve_active_subscription(tenant_id).await?;
        Ok(tier_grants(subscription.plan.tier, feature_name))
    }

    /// Like `has_capability`, with the reason when denied.
    pub async fn check_feature(
        &self,
        tenant_id: &TenantId,
        feature_name: &str,
    ) -> Result<AccessResult, SubscriptionError> {
        let subscription = self.resolve_active_subscription(tenant_id).await?;
        if tier_grants(subscription.plan.tier, feature_name) {
            return Ok(AccessResult::Allowed);
        }
        Ok(AccessResult::Denied(AccessDeniedReason::FeatureNotIncluded {
            feature: feature_name.to_string(),
            required_tier: Feature::from_name(feature_name).map(|f| f.minimum_tier()),
        }))
    }

    /// Whether one more profile fits the plan's `max_perfiles`.
    pub async fn can_add_profile(
        &self,
        tenant_id: &TenantId,
        current_profiles: u32,
    ) -> Result<AccessResult, SubscriptionError> {
        let subscription = self.resolve_active_subscription(tenant_id).await?;
        let capabilities = &subscription.plan.capabilities;
        match capabilities.max_profiles {
            Some(max) if capabilities.profile_limit_reached(current_profiles) => {
                tracing::debug!(tenant_id = %tenant_id, current_profiles, max, "profile limit reached");
                Ok(AccessResult::Denied(AccessDeniedReason::ProfileLimitReached {
                    current: current_profiles,
                    max,
                }))
            }
            _ => Ok(AccessResult::Allowed),
        }
    }

    /// Move the tenant to another plan. No proration.
    ///
    /// # Errors
    ///
    /// - `InvalidPlanCode` if the code is malformed or not in the catalog
    /// - `BackendUnavailable` / `Timeout` on store failure
    pub async fn change_plan(
        &self,
        tenant_id: &TenantId,
        new_plan_code: &str,
    ) -> Result<Subscription, SubscriptionError> {
        let code = PlanCode::new(new_plan_code)
            .map_err(|e| SubscriptionError::invalid_plan_code(new_plan_code, e.to_string()))?;
        let plan = self
            .catalog
            .get(&code)
            .await?
            .ok_or_else(|| SubscriptionError::invalid_plan_code(code.as_str(), "unknown plan"))?;

        let current = self.resolve_active_subscription(tenant_id).await?;
        let updated = bounded(
            "subscriptions.update_plan",
            self.settings.store_timeout,
            self.subscriptions.update_plan(tenant_id, &plan),
        )
        .await?;

        tracing::info!(
            tenant_id = %tenant_id,
            from = %current.plan.code,
            to = %updated.plan.code,
            "subscription plan changed"
        );
        Ok(updated)
    }

    /// Active plans from the catalog.
    pub async fn list_plans(&self) -> Result<Vec<Plan>, SubscriptionError> {
        Ok(self.catalog.list_plans().await?)
    }

    async fn get_active(&self, tenant_id: &TenantId) -> Result<Option<Subscription>, SubscriptionError> {
        bounded(
            "subscriptions.get_active",
            self.settings.store_timeout,
            self.subscriptions.get_active(tenant_id),
        )
        .await
        .map_err(|err| {
            tracing::error!(tenant_id = %tenant_id, error = %err, "subscription lookup failed");
            SubscriptionError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryPlanCatalogStore, InMemorySubscriptionStore};
    use crate::domain::foundation::{DomainError, FixedClock};
    use crate::domain::subscription::PlanTier;
    use chrono::NaiveDate;
    use std::time::Duration;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    struct Fixture {
        store: Arc<InMemorySubscriptionStore>,
        plans: Arc<InMemoryPlanCatalogStore>,
        resolver: EntitlementResolver,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let plans = Arc::new(InMemoryPlanCatalogStore::with_default_plans());
        let clock: Arc<dyn Clock> =
            Arc::new(FixedClock::on_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
        let settings = CoreSettings {
            store_timeout: Duration::from_millis(100),
            ..Default::default()
        };
        let catalog = Arc::new(PlanCatalog::new(
            plans.clone(),
            clock.clone(),
            settings.catalog_ttl,
            settings.store_timeout,
        ));
        let resolver = EntitlementResolver::new(store.clone(), catalog, clock, settings);
        Fixture {
            store,
            plans,
            resolver,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Resolution
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn first_resolve_creates_free_subscription() {
        let f = fixture();
        let tenant = TenantId::new();

        let sub = f.resolver.resolve_active_subscription(&tenant).await.unwrap();
        assert!(sub.plan.is_free());
        assert_eq!(sub.messages_used_this_period, 0);
        assert_eq!(
            sub.last_counter_reset_date,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[tokio::test]
    async fn second_resolve_returns_same_subscription() {
        let f = fixture();
        let tenant = TenantId::new();

        let first = f.resolver.resolve_active_subscription(&tenant).await.unwrap();
        let second = f.resolver.resolve_active_subscription(&tenant).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(f.store.count_active(&tenant).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn conflict_is_retried_with_one_read() {
        let f = fixture();
        let tenant = TenantId::new();
        f.store.conflict_on_next_create();

        let sub = f.resolver.resolve_active_subscription(&tenant).await.unwrap();
        assert_eq!(sub.tenant_id, tenant);
        assert_eq!(f.store.count_active(&tenant).await.unwrap(), 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn backend_failure_does_not_create_default() {
        let f = fixture();
        let tenant = TenantId::new();
        f.store
            .faults()
            .fail_with(DomainError::backend_unavailable("connection refused"));

        let err = f.resolver.resolve_active_subscription(&tenant).await.unwrap_err();
        assert!(matches!(err, SubscriptionError::BackendUnavailable(_)));

        f.store.faults().clear();
        assert_eq!(f.store.count_active(&tenant).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn slow_store_times_out_instead_of_not_found() {
        let f = fixture();
        let tenant = TenantId::new();
        f.store.faults().delay(Duration::from_millis(500));

        let err = f.resolver.resolve_active_subscription(&tenant).await.unwrap_err();
        assert!(matches!(err, SubscriptionError::Timeout(_)));
        assert!(err.is_retryable());
        assert!(f.store.rows().is_empty());
    }

    #[tokio::test]
    async fn missing_default_plan_is_plan_not_found() {
        let f = fixture();
        let retired = crate::adapters::memory::default_plans()
            .into_iter()
            .filter(|p| !p.is_free())
            .collect();
        f.plans.set_plans(retired);

        let err = f
            .resolver
            .resolve_active_subscription(&TenantId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::PlanNotFound(_)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Capabilities
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn capabilities_follow_tier() {
        let f = fixture();
        let tenant = TenantId::new();

        assert!(f.resolver.has_capability(&tenant, "odontograma").await.unwrap());
        assert!(!f.resolver.has_capability(&tenant, "api_access").await.unwrap());
        assert!(!f.resolver.has_capability(&tenant, "unknown_feature").await.unwrap());

        f.resolver.change_plan(&tenant, "enterprise").await.unwrap();
        assert!(f.resolver.has_capability(&tenant, "api_access").await.unwrap());
    }

    #[tokio::test]
    async fn check_feature_names_required_tier() {
        let f = fixture();
        let result = f
            .resolver
            .check_feature(&TenantId::new(), "metricas_equipo")
            .await
            .unwrap();
        assert_eq!(
            result,
            AccessResult::Denied(AccessDeniedReason::FeatureNotIncluded {
                feature: "metricas_equipo".to_string(),
                required_tier: Some(PlanTier::Enterprise),
            })
        );
    }

    #[tokio::test]
    async fn profile_limit_uses_plan_maximum() {
        let f = fixture();
        let tenant = TenantId::new();

        assert!(f.resolver.can_add_profile(&tenant, 0).await.unwrap().is_allowed());
        assert!(f.resolver.can_add_profile(&tenant, 1).await.unwrap().is_denied());

        f.resolver.change_plan(&tenant, "enterprise").await.unwrap();
        assert!(f.resolver.can_add_profile(&tenant, 5).await.unwrap().is_allowed());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Plan change
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn change_plan_keeps_subscription_identity() {
        let f = fixture();
        let tenant = TenantId::new();
        let original = f.resolver.resolve_active_subscription(&tenant).await.unwrap();

        let updated = f.resolver.change_plan(&tenant, "PRO").await.unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.plan.tier, PlanTier::Pro);
    }

    #[tokio::test]
    async fn change_plan_self_heals_missing_subscription() {
        let f = fixture();
        let tenant = TenantId::new();

        let updated = f.resolver.change_plan(&tenant, "pro").await.unwrap();
        assert_eq!(updated.plan.code, PlanCode::pro());
        assert_eq!(f.store.count_active(&tenant).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_plan_code_is_validation_error() {
        let f = fixture();
        let tenant = TenantId::new();

        let err = f.resolver.change_plan(&tenant, "gold").await.unwrap_err();
        assert!(matches!(err, SubscriptionError::InvalidPlanCode { .. }));
        let err = f.resolver.change_plan(&tenant, "pro plan").await.unwrap_err();
        assert!(matches!(err, SubscriptionError::InvalidPlanCode { .. }));
        assert!(f.store.rows().is_empty());
    }

    #[tokio::test]
    async fn list_plans_returns_catalog() {
        let f = fixture();
        let plans = f.resolver.list_plans().await.unwrap();
        assert_eq!(plans.len(), 3);
    }
}
