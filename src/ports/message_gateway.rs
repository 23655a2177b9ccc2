//! Outbound messaging port.
//!
//! Delivery itself (email provider, WhatsApp API) lives outside this crate;
//! the gateway is the seam it plugs into.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, TenantId};

/// Delivery channel for an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageChannel {
    Email,
    Whatsapp,
}

/// A receipt, reminder or notification to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub channel: MessageChannel,
    pub recipient: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub body: String,
}

impl OutboundMessage {
    pub fn whatsapp(recipient: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            channel: MessageChannel::Whatsapp,
            recipient: recipient.into(),
            subject: None,
            body: body.into(),
        }
    }

    pub fn email(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            channel: MessageChannel::Email,
            recipient: recipient.into(),
            subject: Some(subject.into()),
            body: body.into(),
        }
    }
}

/// Provider acknowledgement of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    #[serde(default)]
    pub provider_message_id: Option<String>,
}

#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Hand the message to the provider.
    ///
    /// # Errors
    ///
    /// - `BackendUnavailable` if the provider rejected or never acknowledged it
    async fn deliver(
        &self,
        tenant_id: &TenantId,
        message: &OutboundMessage,
    ) -> Result<DeliveryReceipt, DomainError>;
}
