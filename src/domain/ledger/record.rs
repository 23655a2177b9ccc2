//! Source records and the unified ledger entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Amount, RecordId, TenantId};

/// Category applied to payments that do not carry one.
pub const DEFAULT_PAYMENT_CATEGORY: &str = "Pago de paciente";

/// A payment received from a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: RecordId,
    pub tenant_id: TenantId,
    pub paid_on: NaiveDate,
    pub concept: String,
    pub amount: Amount,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl PaymentRecord {
    pub fn new(
        tenant_id: TenantId,
        paid_on: NaiveDate,
        concept: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            id: RecordId::new(),
            tenant_id,
            paid_on,
            concept: concept.into(),
            amount,
            patient_name: None,
            payment_method: None,
            reference_number: None,
            notes: None,
            category: None,
        }
    }

    pub fn with_patient(mut self, patient_name: impl Into<String>) -> Self {
        self.patient_name = Some(patient_name.into());
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// An expense paid by the clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: RecordId,
    pub tenant_id: TenantId,
    pub spent_on: NaiveDate,
    pub concept: String,
    pub amount: Amount,
    pub category: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ExpenseRecord {
    pub fn new(
        tenant_id: TenantId,
        spent_on: NaiveDate,
        concept: impl Into<String>,
        amount: Amount,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            tenant_id,
            spent_on,
            concept: concept.into(),
            amount,
            category: category.into(),
            vendor: None,
            payment_method: None,
            reference_number: None,
            notes: None,
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }
}

/// Direction of a ledger movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

/// Unified ledger entry.
///
/// A read-time projection over payments and expenses; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: RecordId,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub concept: String,
    pub amount: Amount,
    pub category: String,
    pub counterparty: Option<String>,
    pub payment_method: Option<String>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

impl TransactionRecord {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }
}

impl From<PaymentRecord> for TransactionRecord {
    fn from(payment: PaymentRecord) -> Self {
        Self {
            id: payment.id,
            date: payment.paid_on,
            kind: TransactionKind::Income,
            concept: payment.concept,
            amount: payment.amount,
            category: payment
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PAYMENT_CATEGORY.to_string()),
            counterparty: payment.patient_name,
            payment_method: payment.payment_method,
            reference_number: payment.reference_number,
            notes: payment.notes,
        }
    }
}

impl From<ExpenseRecord> for TransactionRecord {
    fn from(expense: ExpenseRecord) -> Self {
        Self {
            id: expense.id,
            date: expense.spent_on,
            kind: TransactionKind::Expense,
            concept: expense.concept,
            amount: expense.amount,
            category: expense.category,
            counterparty: expense.vendor,
            payment_method: expense.payment_method,
            reference_number: expense.reference_number,
            notes: expense.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn payment_maps_to_income_with_patient_as_counterparty() {
        let payment = PaymentRecord::new(
            TenantId::new(),
            date(2024, 1, 5),
            "Limpieza",
            Amount::parse("100").unwrap(),
        )
        .with_patient("Ana Pérez")
        .with_payment_method("efectivo");
        let id = payment.id;

        let record = TransactionRecord::from(payment);
        assert_eq!(record.id, id);
        assert_eq!(record.kind, TransactionKind::Income);
        assert_eq!(record.counterparty.as_deref(), Some("Ana Pérez"));
        assert_eq!(record.category, DEFAULT_PAYMENT_CATEGORY);
        assert_eq!(record.payment_method.as_deref(), Some("efectivo"));
    }

    #[test]
    fn payment_keeps_explicit_category() {
        let payment = PaymentRecord::new(
            TenantId::new(),
            date(2024, 1, 5),
            "Ortodoncia",
            Amount::parse("300").unwrap(),
        )
        .with_category("Tratamiento");
        assert_eq!(TransactionRecord::from(payment).category, "Tratamiento");
    }

    #[test]
    fn expense_maps_to_expense_with_vendor_as_counterparty() {
        let expense = ExpenseRecord::new(
            TenantId::new(),
            date(2024, 1, 4),
            "Guantes",
            Amount::parse("30").unwrap(),
            "Insumos",
        )
        .with_vendor("Dental Depot");

        let record = TransactionRecord::from(expense);
        assert_eq!(record.kind, TransactionKind::Expense);
        assert_eq!(record.date, date(2024, 1, 4));
        assert_eq!(record.counterparty.as_deref(), Some("Dental Depot"));
        assert_eq!(record.category, "Insumos");
    }

    #[test]
    fn negative_amounts_are_rejected_on_deserialize() {
        let json = r#"{
            "id": "6f1c3e52-6a4f-4c1e-9f0e-2b7f0d6f2a11",
            "tenant_id": "0b0f3c2e-1d4e-4f6a-8c9b-7e5d4c3b2a10",
            "paid_on": "2024-01-05",
            "concept": "Limpieza",
            "amount": "-5"
        }"#;
        assert!(serde_json::from_str::<PaymentRecord>(json).is_err());
    }
}
