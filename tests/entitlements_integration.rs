//! Integration tests for subscription resolution and capability gating.
//!
//! These tests verify, over the in-memory adapters:
//! 1. First resolve creates exactly one free subscription, even under races
//! 2. Store failures and timeouts surface as errors, never as a default plan
//! 3. Capabilities follow the plan tier
//! 4. Plan changes and profile seat limits

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use odontia::adapters::memory::{InMemoryPlanCatalogStore, InMemorySubscriptionStore};
use odontia::application::{CoreSettings, EntitlementResolver, PlanCatalog};
use odontia::domain::foundation::{DomainError, FixedClock, TenantId};
use odontia::domain::subscription::{AccessDeniedReason, AccessResult, PlanTier, SubscriptionError};
use odontia::ports::SubscriptionStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    store: Arc<InMemorySubscriptionStore>,
    resolver: Arc<EntitlementResolver>,
}

fn harness_with(settings: CoreSettings) -> Harness {
    let clock = Arc::new(FixedClock::on_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
    let store = Arc::new(InMemorySubscriptionStore::new());
    let catalog = Arc::new(PlanCatalog::new(
        Arc::new(InMemoryPlanCatalogStore::with_default_plans()),
        clock.clone(),
        settings.catalog_ttl,
        settings.store_timeout,
    ));
    let resolver = Arc::new(EntitlementResolver::new(store.clone(), catalog, clock, settings));
    Harness { store, resolver }
}

fn harness() -> Harness {
    harness_with(CoreSettings::default())
}

// =============================================================================
// Self-healing resolution
// =============================================================================

#[tokio::test]
async fn first_resolve_creates_free_subscription_and_is_idempotent() {
    let h = harness();
    let tenant = TenantId::new();

    let first = h.resolver.resolve_active_subscription(&tenant).await.unwrap();
    let second = h.resolver.resolve_active_subscription(&tenant).await.unwrap();

    assert!(first.plan.is_free());
    assert_eq!(first.id, second.id);
    assert_eq!(h.store.count_active(&tenant).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_resolves_leave_one_row() {
    let h = harness();
    let tenant = TenantId::new();
    // Every caller sees "absent" before any insert lands.
    h.store.faults().delay(Duration::from_millis(20));

    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let resolver = h.resolver.clone();
            tokio::spawn(async move { resolver.resolve_active_subscription(&tenant).await })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap().unwrap().id);
    }

    h.store.faults().clear();
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(h.store.count_active(&tenant).await.unwrap(), 1);
    assert_eq!(h.store.rows().len(), 1);
}

#[tokio::test]
async fn lost_insert_race_rereads_the_winner() {
    let h = harness();
    let tenant = TenantId::new();
    h.store.conflict_on_next_create();

    let subscription = h.resolver.resolve_active_subscription(&tenant).await.unwrap();

    assert_eq!(subscription.tenant_id, tenant);
    assert_eq!(h.store.rows().len(), 1);
}

// =============================================================================
// Failures are not absence
// =============================================================================

#[tokio::test]
async fn backend_failure_does_not_create_default_subscription() {
    let h = harness();
    let tenant = TenantId::new();
    h.store
        .faults()
        .fail_with(DomainError::backend_unavailable("connection refused"));

    let err = h.resolver.resolve_active_subscription(&tenant).await.unwrap_err();

    assert!(matches!(err, SubscriptionError::BackendUnavailable(_)));
    assert!(err.is_retryable());
    assert!(h.store.rows().is_empty());
}

#[tokio::test]
async fn slow_store_times_out_instead_of_reporting_not_found() {
    let h = harness_with(CoreSettings {
        store_timeout: Duration::from_millis(30),
        ..Default::default()
    });
    h.store.faults().delay(Duration::from_millis(300));

    let err = h
        .resolver
        .resolve_active_subscription(&TenantId::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SubscriptionError::Timeout(_)));
    assert!(!matches!(err, SubscriptionError::SubscriptionNotFound(_)));
    assert!(h.store.rows().is_empty());
}

// =============================================================================
// Capabilities
// =============================================================================

#[tokio::test]
async fn capability_matrix_follows_tier() {
    let h = harness();
    for (code, tier) in [
        ("free", PlanTier::Free),
        ("pro", PlanTier::Pro),
        ("enterprise", PlanTier::Enterprise),
    ] {
        let tenant = TenantId::new();
        if code != "free" {
            h.resolver.change_plan(&tenant, code).await.unwrap();
        }

        assert!(h.resolver.has_capability(&tenant, "odontograma").await.unwrap());
        assert_eq!(
            h.resolver.has_capability(&tenant, "api_access").await.unwrap(),
            tier == PlanTier::Enterprise,
            "api_access on {}",
            code
        );
        assert!(!h.resolver.has_capability(&tenant, "unknown_feature").await.unwrap());
    }
}

#[tokio::test]
async fn denied_feature_names_required_tier() {
    let h = harness();
    let result = h
        .resolver
        .check_feature(&TenantId::new(), "metricas_equipo")
        .await
        .unwrap();

    match result {
        AccessResult::Denied(AccessDeniedReason::FeatureNotIncluded { feature, required_tier }) => {
            assert_eq!(feature, "metricas_equipo");
            assert_eq!(required_tier, Some(PlanTier::Enterprise));
        }
        other => panic!("expected FeatureNotIncluded, got {:?}", other),
    }
}

// =============================================================================
// Plan changes and seats
// =============================================================================

#[tokio::test]
async fn change_plan_keeps_subscription_and_counter() {
    let h = harness();
    let tenant = TenantId::new();
    let original = h.resolver.resolve_active_subscription(&tenant).await.unwrap();

    let upgraded = h.resolver.change_plan(&tenant, "Enterprise").await.unwrap();

    assert_eq!(upgraded.id, original.id);
    assert_eq!(upgraded.plan.tier, PlanTier::Enterprise);
    assert_eq!(upgraded.messages_used_this_period, original.messages_used_this_period);
}

#[tokio::test]
async fn unknown_plan_code_is_rejected() {
    let h = harness();
    let err = h.resolver.change_plan(&TenantId::new(), "gold").await.unwrap_err();
    assert!(matches!(err, SubscriptionError::InvalidPlanCode { .. }));
}

#[tokio::test]
async fn profile_seats_follow_plan_limit() {
    let h = harness();
    let tenant = TenantId::new();

    assert_eq!(
        h.resolver.can_add_profile(&tenant, 1).await.unwrap(),
        AccessResult::Denied(AccessDeniedReason::ProfileLimitReached { current: 1, max: 1 })
    );

    h.resolver.change_plan(&tenant, "enterprise").await.unwrap();
    assert_eq!(
        h.resolver.can_add_profile(&tenant, 9).await.unwrap(),
        AccessResult::Allowed
    );
}
