//! Ledger read models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Amount;

use super::TransactionRecord;

/// Period totals over a set of ledger records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total_income: Amount,
    pub total_expense: Amount,
    /// `total_income - total_expense`; may be negative.
    pub balance: Decimal,
    pub count_income: usize,
    pub count_expense: usize,
}

/// Records of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGroup {
    pub date: NaiveDate,
    pub records: Vec<TransactionRecord>,
    pub day_balance: Decimal,
}

/// Income attributed to one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyTotal {
    pub name: String,
    pub total: Amount,
    pub payments: usize,
}

/// Filtered ledger with its summary and day grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReport {
    pub records: Vec<TransactionRecord>,
    pub summary: LedgerSummary,
    pub days: Vec<DayGroup>,
}
