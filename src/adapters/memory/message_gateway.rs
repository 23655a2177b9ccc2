//! Message gateway that records instead of delivering.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, TenantId};
use crate::ports::{DeliveryReceipt, MessageGateway, OutboundMessage};

use super::faults::{lock, Faults};

#[derive(Debug, Default)]
pub struct RecordingMessageGateway {
    delivered: Mutex<Vec<(TenantId, OutboundMessage)>>,
    faults: Faults,
}

impl RecordingMessageGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faults(&self) -> &Faults {
        &self.faults
    }

    /// Messages accepted so far, in delivery order.
    pub fn delivered(&self) -> Vec<(TenantId, OutboundMessage)> {
        lock(&self.delivered).clone()
    }
}

#[async_trait]
impl MessageGateway for RecordingMessageGateway {
    async fn deliver(
        &self,
        tenant_id: &TenantId,
        message: &OutboundMessage,
    ) -> Result<DeliveryReceipt, DomainError> {
        self.faults.apply().await?;
        let mut delivered = lock(&self.delivered);
        delivered.push((*tenant_id, message.clone()));
        Ok(DeliveryReceipt {
            provider_message_id: Some(format!("mem-{}", delivered.len())),
        })
    }
}
