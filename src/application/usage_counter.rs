//! UsageCounter - monthly metered message allowance.

use std::sync::Arc;

use crate::domain::foundation::{Clock, TenantId};
use crate::domain::subscription::{Allowance, Subscription, SubscriptionError};
use crate::ports::SubscriptionStore;

use super::deadline::bounded;
use super::{CoreSettings, EntitlementResolver};

pub struct UsageCounter {
    resolver: Arc<EntitlementResolver>,
    subscriptions: Arc<dyn SubscriptionStore>,
    clock: Arc<dyn Clock>,
    settings: CoreSettings,
}

impl UsageCounter {
    pub fn new(
        resolver: Arc<EntitlementResolver>,
        subscriptions: Arc<dyn SubscriptionStore>,
        clock: Arc<dyn Clock>,
        settings: CoreSettings,
    ) -> Self {
        Self {
            resolver,
            subscriptions,
            clock,
            settings,
        }
    }

    /// Messages left this month. A counter last reset in an earlier month
    /// reports zero usage.
    pub async fn check_allowance(&self, tenant_id: &TenantId) -> Result<Allowance, SubscriptionError> {
        let subscription = self.resolver.resolve_active_subscription(tenant_id).await?;
        let allowance = subscription.allowance(self.today());
        tracing::debug!(
            tenant_id = %tenant_id,
            used = allowance.used,
            limit = ?allowance.limit,
            allowed = allowance.allowed,
            "checked message allowance"
        );
        Ok(allowance)
    }

    /// Count one sent message. Does not enforce the limit; callers check
    /// the allowance first.
    pub async fn increment(&self, tenant_id: &TenantId) -> Result<Subscription, SubscriptionError> {
        self.resolver.resolve_active_subscription(tenant_id).await?;
        let updated = bounded(
            "subscriptions.increment_message_counter",
            self.settings.store_timeout,
            self.subscriptions
                .increment_message_counter(tenant_id, self.today()),
        )
        .await?;
        tracing::debug!(
            tenant_id = %tenant_id,
            used = updated.messages_used_this_period,
            "message counted"
        );
        Ok(updated)
    }

    fn today(&self) -> chrono::NaiveDate {
        self.clock.today_in(self.settings.reference_offset)
    }
}
