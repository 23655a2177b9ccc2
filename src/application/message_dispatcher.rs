//! MessageDispatcher - metered outbound messaging.
//!
//! Checks the monthly allowance, hands the message to the gateway, and counts
//! it only once the gateway has accepted it.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{DomainError, TenantId};
use crate::domain::subscription::{Allowance, SubscriptionError};
use crate::ports::{DeliveryReceipt, MessageGateway, OutboundMessage};

use super::deadline::bounded;
use super::{CoreSettings, UsageCounter};

/// What happened to a send request that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Delivered and counted.
    Sent {
        receipt: DeliveryReceipt,
        messages_used: u32,
    },
    /// Monthly allowance used up; nothing was sent.
    QuotaExceeded(Allowance),
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("delivery failed: {0}")]
    Delivery(#[source] DomainError),

    #[error(transparent)]
    Subscription(#[from] SubscriptionError),
}

impl DispatchError {
    pub fn is_retryable(&self) -> bool {
        match self {
            DispatchError::InvalidMessage(_) => false,
            DispatchError::Delivery(err) => err.is_retryable(),
            DispatchError::Subscription(err) => err.is_retryable(),
        }
    }
}

pub struct MessageDispatcher {
    usage: Arc<UsageCounter>,
    gateway: Arc<dyn MessageGateway>,
    settings: CoreSettings,
}

impl MessageDispatcher {
    pub fn new(usage: Arc<UsageCounter>, gateway: Arc<dyn MessageGateway>, settings: CoreSettings) -> Self {
        Self {
            usage,
            gateway,
            settings,
        }
    }

    /// Send one message on behalf of `tenant_id`.
    ///
    /// A denied allowance is an outcome, not an error. A failed delivery
    /// leaves the counter untouched.
    pub async fn send(
        &self,
        tenant_id: &TenantId,
        message: OutboundMessage,
    ) -> Result<DispatchOutcome, DispatchError> {
        validate(&message)?;

        let allowance = self.usage.check_allowance(tenant_id).await?;
        if !allowance.allowed {
            tracing::warn!(
                tenant_id = %tenant_id,
                used = allowance.used,
                limit = ?allowance.limit,
                "message quota exceeded"
            );
            return Ok(DispatchOutcome::QuotaExceeded(allowance));
        }

        let receipt = bounded(
            "gateway.deliver",
            self.settings.store_timeout,
            self.gateway.deliver(tenant_id, &message),
        )
        .await
        .map_err(|err| {
            tracing::warn!(
                tenant_id = %tenant_id,
                channel = ?message.channel,
                error = %err,
                "message delivery failed"
            );
            DispatchError::Delivery(err)
        })?;

        let subscription = self.usage.increment(tenant_id).await.map_err(|err| {
            tracing::error!(
                tenant_id = %tenant_id,
                error = %err,
                "message delivered but not counted"
            );
            err
        })?;

        tracing::info!(
            tenant_id = %tenant_id,
            channel = ?message.channel,
            messages_used = subscription.messages_used_this_period,
            "message sent"
        );
        Ok(DispatchOutcome::Sent {
            receipt,
            messages_used: subscription.messages_used_this_period,
        })
    }
}

fn validate(message: &OutboundMessage) -> Result<(), DispatchError> {
    if message.recipient.trim().is_empty() {
        return Err(DispatchError::InvalidMessage("recipient is empty".to_string()));
    }
    if message.body.trim().is_empty() {
        return Err(DispatchError::InvalidMessage("body is empty".to_string()));
    }
    Ok(())
}
