//! Clinic ledger: payments and expenses merged into one filterable view.
//!
//! # Module Structure
//!
//! - `record` - Source records and the unified `TransactionRecord`
//! - `filter` - Kind and date-range filters
//! - `summary` - Totals, day groups and per-patient income
//! - `aggregator` - Pure merge/filter/summarize/group operations

mod aggregator;
mod filter;
mod record;
mod summary;

pub use aggregator::TransactionAggregator;
pub use filter::{DateBounds, DateRange, KindFilter, LedgerFilter};
pub use record::{
    ExpenseRecord, PaymentRecord, TransactionKind, TransactionRecord, DEFAULT_PAYMENT_CATEGORY,
};
pub use summary::{CounterpartyTotal, DayGroup, LedgerReport, LedgerSummary};
