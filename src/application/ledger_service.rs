//! LedgerService - loads both ledger sources and builds reports.

use std::sync::Arc;

use crate::domain::foundation::{Clock, DomainError, TenantId};
use crate::domain::ledger::{
    CounterpartyTotal, LedgerFilter, LedgerReport, TransactionAggregator, TransactionRecord,
};
use crate::ports::{ExpenseSource, PaymentSource};

use super::deadline::bounded;
use super::CoreSettings;

pub struct LedgerService {
    payments: Arc<dyn PaymentSource>,
    expenses: Arc<dyn ExpenseSource>,
    clock: Arc<dyn Clock>,
    settings: CoreSettings,
}

impl LedgerService {
    pub fn new(
        payments: Arc<dyn PaymentSource>,
        expenses: Arc<dyn ExpenseSource>,
        clock: Arc<dyn Clock>,
        settings: CoreSettings,
    ) -> Self {
        Self {
            payments,
            expenses,
            clock,
            settings,
        }
    }

    /// Payments and expenses fetched concurrently and merged, newest first.
    ///
    /// Either source failing fails the whole load; a partial ledger would
    /// show wrong balances.
    pub async fn load_ledger(&self, tenant_id: &TenantId) -> Result<Vec<TransactionRecord>, DomainError> {
        let (payments, expenses) = tokio::join!(
            bounded(
                "ledger.list_payments",
                self.settings.store_timeout,
                self.payments.list_payments(tenant_id),
            ),
            bounded(
                "ledger.list_expenses",
                self.settings.store_timeout,
                self.expenses.list_expenses(tenant_id),
            ),
        );
        let payments = payments.map_err(|err| log_source_failure(tenant_id, "payments", err))?;
        let expenses = expenses.map_err(|err| log_source_failure(tenant_id, "expenses", err))?;

        tracing::debug!(
            tenant_id = %tenant_id,
            payments = payments.len(),
            expenses = expenses.len(),
            "ledger loaded"
        );
        Ok(TransactionAggregator::merge(payments, expenses))
    }

    /// Filtered records with summary and day groups; presets resolve
    /// against today in the reference offset.
    pub async fn load_filtered_report(
        &self,
        tenant_id: &TenantId,
        filter: &LedgerFilter,
    ) -> Result<LedgerReport, DomainError> {
        let ledger = self.load_ledger(tenant_id).await?;
        Ok(TransactionAggregator::report(&ledger, filter, self.today()))
    }

    /// Top `n` patients by income within the filter.
    pub async fn top_patients(
        &self,
        tenant_id: &TenantId,
        filter: &LedgerFilter,
        n: usize,
    ) -> Result<Vec<CounterpartyTotal>, DomainError> {
        let ledger = self.load_ledger(tenant_id).await?;
        let filtered = TransactionAggregator::filter(&ledger, filter, self.today());
        Ok(TransactionAggregator::top_counterparties(&filtered, n))
    }

    fn today(&self) -> chrono::NaiveDate {
        self.clock.today_in(self.settings.reference_offset)
    }
}

fn log_source_failure(tenant_id: &TenantId, source: &'static str, err: DomainError) -> DomainError {
    tracing::error!(tenant_id = %tenant_id, source, error = %err, "ledger source failed");
    err
}
