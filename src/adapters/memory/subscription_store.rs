//! In-memory subscription store.
//!
//! Both invariant-bearing writes run entirely under one lock, which gives
//! them the same all-or-nothing behaviour as the PostgreSQL statements.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, TenantId, Timestamp};
use crate::domain::subscription::{Plan, Subscription};
use crate::ports::SubscriptionStore;

use super::faults::{lock, Faults};

/// Thread-safe via internal `Mutex`. Does not persist across restarts.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    rows: Mutex<Vec<Subscription>>,
    faults: Faults,
    conflict_next_create: AtomicBool,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Injected failures and latency.
    pub fn faults(&self) -> &Faults {
        &self.faults
    }

    /// Seed a row as-is, bypassing the single-active check.
    pub fn insert(&self, subscription: Subscription) {
        lock(&self.rows).push(subscription);
    }

    /// Every stored row, any status.
    pub fn rows(&self) -> Vec<Subscription> {
        lock(&self.rows).clone()
    }

    /// The next `create_if_absent` stores its candidate but reports
    /// `ConcurrencyConflict`, as if the winning row could not be read back.
    pub fn conflict_on_next_create(&self) {
        self.conflict_next_create.store(true, Ordering::SeqCst);
    }
}

fn not_found(tenant_id: &TenantId) -> DomainError {
    DomainError::new(
        ErrorCode::SubscriptionNotFound,
        format!("No active subscription for tenant {}", tenant_id),
    )
    .with_detail("tenant_id", tenant_id.to_string())
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn get_active(&self, tenant_id: &TenantId) -> Result<Option<Subscription>, DomainError> {
        self.faults.apply().await?;
        Ok(lock(&self.rows)
            .iter()
            .find(|s| s.tenant_id == *tenant_id && s.is_active())
            .cloned())
    }

    async fn create_if_absent(&self, candidate: &Subscription) -> Result<Subscription, DomainError> {
        self.faults.apply().await?;
        if !candidate.is_active() {
            return Err(DomainError::validation(
                "status",
                "Only active subscriptions can be created",
            ));
        }

        let mut rows = lock(&self.rows);
        if let Some(existing) = rows
            .iter()
            .find(|s| s.tenant_id == candidate.tenant_id && s.is_active())
        {
            return Ok(existing.clone());
        }
        rows.push(candidate.clone());

        if self.conflict_next_create.swap(false, Ordering::SeqCst) {
            return Err(DomainError::conflict("Insert raced with another writer")
                .with_detail("tenant_id", candidate.tenant_id.to_string()));
        }
        Ok(candidate.clone())
    }

    async fn update_plan(&self, tenant_id: &TenantId, plan: &Plan) -> Result<Subscription, DomainError> {
        self.faults.apply().await?;
        let mut rows = lock(&self.rows);
        let subscription = rows
            .iter_mut()
            .find(|s| s.tenant_id == *tenant_id && s.is_active())
            .ok_or_else(|| not_found(tenant_id))?;
        subscription.change_plan(plan.clone(), Timestamp::now())?;
        Ok(subscription.clone())
    }

    async fn increment_message_counter(
        &self,
        tenant_id: &TenantId,
        today: NaiveDate,
    ) -> Result<Subscription, DomainError> {
        self.faults.apply().await?;
        let mut rows = lock(&self.rows);
        let subscription = rows
            .iter_mut()
            .find(|s| s.tenant_id == *tenant_id && s.is_active())
            .ok_or_else(|| not_found(tenant_id))?;
        subscription.record_message(today, Timestamp::now());
        Ok(subscription.clone())
    }

    async fn count_active(&self, tenant_id: &TenantId) -> Result<u64, DomainError> {
        self.faults.apply().await?;
        Ok(lock(&self.rows)
            .iter()
            .filter(|s| s.tenant_id == *tenant_id && s.is_active())
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::default_plans;
    use crate::domain::subscription::SubscriptionStatus;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn free_plan() -> Plan {
        default_plans().into_iter().find(Plan::is_free).unwrap()
    }

    fn candidate(tenant: TenantId) -> Subscription {
        Subscription::new(tenant, free_plan(), date(2024, 5, 1), Timestamp::now())
    }

    #[tokio::test]
    async fn create_if_absent_returns_existing_row() {
        let store = InMemorySubscriptionStore::new();
        let tenant = TenantId::new();

        let first = store.create_if_absent(&candidate(tenant)).await.unwrap();
        let second = store.create_if_absent(&candidate(tenant)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.count_active(&tenant).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn cancelled_rows_do_not_block_a_new_active_one() {
        let store = InMemorySubscriptionStore::new();
        let tenant = TenantId::new();
        let mut old = candidate(tenant);
        old.status = SubscriptionStatus::Cancelled;
        store.insert(old.clone());

        let created = store.create_if_absent(&candidate(tenant)).await.unwrap();

        assert_ne!(created.id, old.id);
        assert_eq!(store.count_active(&tenant).await.unwrap(), 1);
        assert!(store.create_if_absent(&old).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_leave_one_active_row() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let tenant = TenantId::new();

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create_if_absent(&candidate(tenant)).await })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap().unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.count_active(&tenant).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn increment_resets_stale_counter() {
        let store = InMemorySubscriptionStore::new();
        let tenant = TenantId::new();
        let mut stale = candidate(tenant);
        stale.messages_used_this_period = 500;
        stale.last_counter_reset_date = date(2024, 4, 15);
        store.insert(stale);

        let updated = store
            .increment_message_counter(&tenant, date(2024, 5, 2))
            .await
            .unwrap();
        assert_eq!(updated.messages_used_this_period, 1);
        assert_eq!(updated.last_counter_reset_date, date(2024, 5, 2));
    }

    #[tokio::test]
    async fn increment_without_subscription_is_not_found() {
        let store = InMemorySubscriptionStore::new();
        let err = store
            .increment_message_counter(&TenantId::new(), date(2024, 5, 2))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SubscriptionNotFound);
        assert!(err.details.contains_key("tenant_id"));
    }

    #[tokio::test]
    async fn injected_failure_surfaces_as_error() {
        let store = InMemorySubscriptionStore::new();
        store
            .faults()
            .fail_with(DomainError::backend_unavailable("connection refused"));
        let err = store.get_active(&TenantId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BackendUnavailable);
    }
}
