//! Payment and expense source ports.
//!
//! Each source is tenant-scoped. Adapters reject rows with negative amounts
//! as `ValidationFailed` instead of passing them through.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TenantId};
use crate::domain::ledger::{ExpenseRecord, PaymentRecord};

#[async_trait]
pub trait PaymentSource: Send + Sync {
    async fn list_payments(&self, tenant_id: &TenantId) -> Result<Vec<PaymentRecord>, DomainError>;
}

#[async_trait]
pub trait ExpenseSource: Send + Sync {
    async fn list_expenses(&self, tenant_id: &TenantId) -> Result<Vec<ExpenseRecord>, DomainError>;
}
