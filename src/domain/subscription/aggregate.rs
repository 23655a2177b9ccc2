//! Subscription aggregate.
//!
//! A tenant's subscription binds it to one plan and carries the monthly
//! message counter.
//!
//! # Design Decisions
//!
//! - **One active per tenant**: enforced by the store's atomic insert-if-absent
//! - **Self-healing**: a tenant with no subscription gets a free one on first resolve
//! - **Never deleted**: rows end as `cancelled` or `expired` outside this crate
//! - **Counter on the row**: rollover is decided by comparing month/year of
//!   `last_counter_reset_date` with today

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, TenantId, Timestamp};

use super::usage::{next_message_count, used_in_month, Allowance};
use super::{Plan, SubscriptionStatus};

/// Subscription aggregate.
///
/// # Invariants
///
/// - `tenant_id` has at most one `Active` subscription
/// - `messages_used_this_period` counts messages in the month of
///   `last_counter_reset_date`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub tenant_id: TenantId,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub messages_used_this_period: u32,
    pub last_counter_reset_date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Create a fresh active subscription on `plan` with a zeroed counter.
    pub fn new(tenant_id: TenantId, plan: Plan, today: NaiveDate, now: Timestamp) -> Self {
        Self {
            id: SubscriptionId::new(),
            tenant_id,
            plan,
            status: SubscriptionStatus::Active,
            messages_used_this_period: 0,
            last_counter_reset_date: today,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Move the subscription to another plan. No proration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` unless the subscription is active.
    pub fn change_plan(&mut self, plan: Plan, now: Timestamp) -> Result<(), DomainError> {
        if !self.is_active() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "change plan",
            )
            .with_detail("current", self.status.as_str()));
        }
        self.plan = plan;
        self.updated_at = now;
        Ok(())
    }

    /// Messages counted in the month containing `today` (0 when stale).
    pub fn messages_used_in(&self, today: NaiveDate) -> u32 {
        used_in_month(
            self.messages_used_this_period,
            self.last_counter_reset_date,
            today,
        )
    }

    /// Apply one sent message to the counter, resetting it first if the
    /// stored period is not the month of `today`.
    ///
    /// Stores call this while holding whatever makes the write atomic.
    pub fn record_message(&mut self, today: NaiveDate, now: Timestamp) {
        let (used, reset) = next_message_count(
            self.messages_used_this_period,
            self.last_counter_reset_date,
            today,
        );
        self.messages_used_this_period = used;
        self.last_counter_reset_date = reset;
        self.updated_at = now;
    }

    /// Allowance for another message today under the current plan.
    pub fn allowance(&self, today: NaiveDate) -> Allowance {
        Allowance::evaluate(
            self.messages_used_in(today),
            self.plan.capabilities.message_limit(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PlanId;
    use crate::domain::subscription::{PlanCapabilities, PlanCode, PlanTier};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plan(code: &str, tier: PlanTier, limit: Option<u32>) -> Plan {
        Plan::new(
            PlanId::new(),
            PlanCode::new(code).unwrap(),
            code,
            tier,
            PlanCapabilities {
                monthly_message_limit: limit,
                ..Default::default()
            },
        )
    }

    fn free_subscription(today: NaiveDate) -> Subscription {
        Subscription::new(
            TenantId::new(),
            plan("free", PlanTier::Free, Some(10)),
            today,
            Timestamp::now(),
        )
    }

    // ═══════════════════════════════════════════════════════════════
    // Construction
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn new_subscription_is_active_with_zero_usage() {
        let sub = free_subscription(date(2024, 3, 10));
        assert!(sub.is_active());
        assert_eq!(sub.messages_used_this_period, 0);
        assert_eq!(sub.last_counter_reset_date, date(2024, 3, 10));
    }

    // ═══════════════════════════════════════════════════════════════
    // Counter
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn record_message_increments_within_month() {
        let mut sub = free_subscription(date(2024, 3, 1));
        sub.record_message(date(2024, 3, 5), Timestamp::now());
        sub.record_message(date(2024, 3, 6), Timestamp::now());
        assert_eq!(sub.messages_used_this_period, 2);
        assert_eq!(sub.last_counter_reset_date, date(2024, 3, 1));
    }

    #[test]
    fn record_message_resets_on_new_month() {
        let mut sub = free_subscription(date(2024, 3, 1));
        sub.messages_used_this_period = 9;
        sub.record_message(date(2024, 4, 2), Timestamp::now());
        assert_eq!(sub.messages_used_this_period, 1);
        assert_eq!(sub.last_counter_reset_date, date(2024, 4, 2));
    }

    #[test]
    fn allowance_reflects_plan_limit() {
        let mut sub = free_subscription(date(2024, 3, 1));
        sub.messages_used_this_period = 10;
        let allowance = sub.allowance(date(2024, 3, 20));
        assert!(!allowance.allowed);
        assert_eq!(allowance.remaining, Some(0));

        let next_month = sub.allowance(date(2024, 4, 1));
        assert!(next_month.allowed);
        assert_eq!(next_month.used, 0);
    }

    // ═══════════════════════════════════════════════════════════════
    // Plan change and lifecycle
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn change_plan_keeps_identity_and_counter() {
        let mut sub = free_subscription(date(2024, 3, 1));
        sub.messages_used_this_period = 4;
        let id = sub.id;
        sub.change_plan(plan("pro", PlanTier::Pro, None), Timestamp::now())
            .unwrap();
        assert_eq!(sub.id, id);
        assert_eq!(sub.plan.tier, PlanTier::Pro);
        assert_eq!(sub.messages_used_this_period, 4);
        assert!(sub.allowance(date(2024, 3, 2)).is_unlimited());
    }

    #[test]
    fn change_plan_requires_active() {
        let mut sub = free_subscription(date(2024, 3, 1));
        for status in [SubscriptionStatus::Cancelled, SubscriptionStatus::Expired] {
            sub.status = status;
            let err = sub
                .change_plan(plan("pro", PlanTier::Pro, None), Timestamp::now())
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidStateTransition);
            assert_eq!(sub.plan.code.as_str(), "free");
        }
    }
}
