//! In-memory payment and expense sources.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, TenantId};
use crate::domain::ledger::{ExpenseRecord, PaymentRecord};
use crate::ports::{ExpenseSource, PaymentSource};

use super::faults::{lock, Faults};

/// Serves both ledger ports from two vectors.
#[derive(Debug, Default)]
pub struct InMemoryLedgerSource {
    payments: Mutex<Vec<PaymentRecord>>,
    expenses: Mutex<Vec<ExpenseRecord>>,
    payment_faults: Faults,
    expense_faults: Faults,
}

impl InMemoryLedgerSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_payment(&self, payment: PaymentRecord) {
        lock(&self.payments).push(payment);
    }

    pub fn add_expense(&self, expense: ExpenseRecord) {
        lock(&self.expenses).push(expense);
    }

    pub fn payment_faults(&self) -> &Faults {
        &self.payment_faults
    }

    pub fn expense_faults(&self) -> &Faults {
        &self.expense_faults
    }
}

#[async_trait]
impl PaymentSource for InMemoryLedgerSource {
    async fn list_payments(&self, tenant_id: &TenantId) -> Result<Vec<PaymentRecord>, DomainError> {
        self.payment_faults.apply().await?;
        Ok(lock(&self.payments)
            .iter()
            .filter(|p| p.tenant_id == *tenant_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ExpenseSource for InMemoryLedgerSource {
    async fn list_expenses(&self, tenant_id: &TenantId) -> Result<Vec<ExpenseRecord>, DomainError> {
        self.expense_faults.apply().await?;
        Ok(lock(&self.expenses)
            .iter()
            .filter(|e| e.tenant_id == *tenant_id)
            .cloned()
            .collect())
    }
}
