//! PostgreSQL payment and expense sources.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, RecordId, TenantId};
use crate::domain::ledger::{ExpenseRecord, PaymentRecord};
use crate::ports::{ExpenseSource, PaymentSource};

use super::rows::{query_failed, to_amount};

/// Reads both ledger tables; implements both source ports.
pub struct PostgresLedgerSource {
    pool: PgPool,
}

impl PostgresLedgerSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    tenant_id: Uuid,
    paid_on: NaiveDate,
    concept: String,
    amount: Decimal,
    patient_name: Option<String>,
    payment_method: Option<String>,
    reference_number: Option<String>,
    notes: Option<String>,
    category: Option<String>,
}

impl TryFrom<PaymentRow> for PaymentRecord {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(PaymentRecord {
            id: RecordId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            paid_on: row.paid_on,
            concept: row.concept,
            amount: to_amount(row.amount).map_err(|e| e.with_detail("record_id", row.id.to_string()))?,
            patient_name: row.patient_name,
            payment_method: row.payment_method,
            reference_number: row.reference_number,
            notes: row.notes,
            category: row.category,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: Uuid,
    tenant_id: Uuid,
    spent_on: NaiveDate,
    concept: String,
    amount: Decimal,
    category: String,
    vendor: Option<String>,
    payment_method: Option<String>,
    reference_number: Option<String>,
    notes: Option<String>,
}

impl TryFrom<ExpenseRow> for ExpenseRecord {
    type Error = DomainError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        Ok(ExpenseRecord {
            id: RecordId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            spent_on: row.spent_on,
            concept: row.concept,
            amount: to_amount(row.amount).map_err(|e| e.with_detail("record_id", row.id.to_string()))?,
            category: row.category,
            vendor: row.vendor,
            payment_method: row.payment_method,
            reference_number: row.reference_number,
            notes: row.notes,
        })
    }
}

#[async_trait]
impl PaymentSource for PostgresLedgerSource {
    async fn list_payments(&self, tenant_id: &TenantId) -> Result<Vec<PaymentRecord>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, paid_on, concept, amount, patient_name,
                   payment_method, reference_number, notes, category
            FROM payments
            WHERE tenant_id = $1
            ORDER BY paid_on DESC, id
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_failed("list payments", e))?;

        rows.into_iter().map(PaymentRecord::try_from).collect()
    }
}

#[async_trait]
impl ExpenseSource for PostgresLedgerSource {
    async fn list_expenses(&self, tenant_id: &TenantId) -> Result<Vec<ExpenseRecord>, DomainError> {
        let rows: Vec<ExpenseRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, spent_on, concept, amount, category,
                   vendor, payment_method, reference_number, notes
            FROM expenses
            WHERE tenant_id = $1
            ORDER BY spent_on DESC, id
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_failed("list expenses", e))?;

        rows.into_iter().map(ExpenseRecord::try_from).collect()
    }
}
