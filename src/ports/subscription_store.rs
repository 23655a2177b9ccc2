//! Subscription store port.
//!
//! # Design
//!
//! - **Absent is not an error**: a successful lookup that finds nothing is
//!   `Ok(None)`; any failed lookup is `BackendUnavailable`
//! - **Atomic writes only**: the two invariant-bearing mutations (first
//!   subscription, counter increment) are single conditional operations, never
//!   read-then-write sequences in the caller
//!
//! # Example
//!
//! ```ignore
//! let candidate = Subscription::new(tenant_id, free_plan, today, clock.now());
//! // Every concurrent caller gets the same winning row back.
//! let subscription = store.create_if_absent(&candidate).await?;
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{DomainError, TenantId};
use crate::domain::subscription::{Plan, Subscription};

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// The tenant's active subscription, if any.
    async fn get_active(&self, tenant_id: &TenantId) -> Result<Option<Subscription>, DomainError>;

    /// Insert `candidate` unless the tenant already has an active
    /// subscription, and return whichever row is active afterwards.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if the insert lost a race and the winning row
    ///   could not be read back
    /// - `BackendUnavailable` on store failure
    async fn create_if_absent(&self, candidate: &Subscription) -> Result<Subscription, DomainError>;

    /// Point the tenant's active subscription at `plan`.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the tenant has no active subscription
    /// - `BackendUnavailable` on store failure
    async fn update_plan(&self, tenant_id: &TenantId, plan: &Plan) -> Result<Subscription, DomainError>;

    /// Count one sent message in a single conditional write: reset to 1 and
    /// stamp `today` when the stored reset date is in another month, add 1
    /// otherwise.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the tenant has no active subscription
    /// - `BackendUnavailable` on store failure
    async fn increment_message_counter(
        &self,
        tenant_id: &TenantId,
        today: NaiveDate,
    ) -> Result<Subscription, DomainError>;

    /// Number of active subscriptions for the tenant (0 or 1 when healthy).
    async fn count_active(&self, tenant_id: &TenantId) -> Result<u64, DomainError>;
}
