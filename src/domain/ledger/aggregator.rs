//! Pure ledger transformations.
//!
//! Nothing here fails: inputs are already validated records and every
//! reduction is exact decimal arithmetic.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::domain::foundation::Amount;

use super::{
    CounterpartyTotal, DayGroup, ExpenseRecord, LedgerFilter, LedgerReport, LedgerSummary,
    PaymentRecord, TransactionKind, TransactionRecord,
};

/// Merges, filters, summarizes and groups ledger records.
pub struct TransactionAggregator;

impl TransactionAggregator {
    /// Unified ledger, newest first.
    ///
    /// Same-day records are ordered by id ascending; the sort is stable, so
    /// records sharing an id keep source order (payments before expenses).
    pub fn merge(payments: Vec<PaymentRecord>, expenses: Vec<ExpenseRecord>) -> Vec<TransactionRecord> {
        let mut records: Vec<TransactionRecord> = payments
            .into_iter()
            .map(TransactionRecord::from)
            .chain(expenses.into_iter().map(TransactionRecord::from))
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        records
    }

    /// Records matching `filter`, in input order.
    pub fn filter(
        records: &[TransactionRecord],
        filter: &LedgerFilter,
        today: NaiveDate,
    ) -> Vec<TransactionRecord> {
        let matches = filter.matcher(today);
        records.iter().filter(|r| matches(r)).cloned().collect()
    }

    pub fn summarize(records: &[TransactionRecord]) -> LedgerSummary {
        let mut summary = LedgerSummary::default();
        for record in records {
            match record.kind {
                TransactionKind::Income => {
                    summary.total_income = summary.total_income + record.amount;
                    summary.count_income += 1;
                }
                TransactionKind::Expense => {
                    summary.total_expense = summary.total_expense + record.amount;
                    summary.count_expense += 1;
                }
            }
        }
        summary.balance = summary.total_income.value() - summary.total_expense.value();
        summary
    }

    /// Groups records by calendar day.
    ///
    /// Days appear in the order their first record appears in the input;
    /// records keep input order within a day. Fed with `merge` output this
    /// yields newest day first.
    pub fn group_by_day(records: &[TransactionRecord]) -> Vec<DayGroup> {
        let mut index: HashMap<NaiveDate, usize> = HashMap::new();
        let mut groups: Vec<DayGroup> = Vec::new();

        for record in records {
            let slot = *index.entry(record.date).or_insert_with(|| {
                groups.push(DayGroup {
                    date: record.date,
                    records: Vec::new(),
                    day_balance: Decimal::ZERO,
                });
                groups.len() - 1
            });
            groups[slot].records.push(record.clone());
        }

        for group in &mut groups {
            group.day_balance = Self::summarize(&group.records).balance;
        }
        groups
    }

    /// Income per patient, highest first, truncated to `n`.
    ///
    /// Income without a patient name is not attributed. Ties keep the order
    /// in which each patient first appears.
    pub fn top_counterparties(records: &[TransactionRecord], n: usize) -> Vec<CounterpartyTotal> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut totals: Vec<CounterpartyTotal> = Vec::new();

        for record in records.iter().filter(|r| r.is_income()) {
            let name = match record.counterparty.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => name,
                _ => continue,
            };
            let slot = *index.entry(name).or_insert_with(|| {
                totals.push(CounterpartyTotal {
                    name: name.to_string(),
                    total: Amount::ZERO,
                    payments: 0,
                });
                totals.len() - 1
            });
            totals[slot].total = totals[slot].total + record.amount;
            totals[slot].payments += 1;
        }

        totals.sort_by(|a, b| b.total.cmp(&a.total));
        totals.truncate(n);
        totals
    }

    /// Filter, then summarize and group the result.
    pub fn report(records: &[TransactionRecord], filter: &LedgerFilter, today: NaiveDate) -> LedgerReport {
        let records = Self::filter(records, filter, today);
        let summary = Self::summarize(&records);
        let days = Self::group_by_day(&records);
        LedgerReport {
            records,
            summary,
            days,
        }
    }
}
