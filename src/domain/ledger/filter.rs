//! Ledger filters.
//!
//! Date presets are relative to a `today` supplied by the caller, who reads
//! it from a `Clock` in the clinic's reference timezone.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{TransactionKind, TransactionRecord};

/// Which movements to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    Income,
    Expense,
    #[default]
    Both,
}

impl KindFilter {
    pub fn matches(&self, kind: TransactionKind) -> bool {
        match self {
            KindFilter::Income => kind == TransactionKind::Income,
            KindFilter::Expense => kind == TransactionKind::Expense,
            KindFilter::Both => true,
        }
    }
}

/// Named or explicit date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "snake_case")]
pub enum DateRange {
    Today,
    /// Today and the six preceding days.
    #[serde(rename = "last_7_days")]
    Last7Days,
    ThisMonth,
    ThisYear,
    /// Inclusive on both ends. An inverted range matches nothing.
    Custom { start: NaiveDate, end: NaiveDate },
}

/// Inclusive `[start, end]` window resolved from a `DateRange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateBounds {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl DateRange {
    pub fn resolve(&self, today: NaiveDate) -> DateBounds {
        match *self {
            DateRange::Today => DateBounds {
                start: today,
                end: today,
            },
            DateRange::Last7Days => DateBounds {
                start: today.checked_sub_days(Days::new(6)).unwrap_or(NaiveDate::MIN),
                end: today,
            },
            DateRange::ThisMonth => {
                let start = today
                    .checked_sub_days(Days::new(u64::from(today.day0())))
                    .unwrap_or(NaiveDate::MIN);
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(NaiveDate::MAX);
                DateBounds { start, end }
            }
            DateRange::ThisYear => {
                let start = today
                    .checked_sub_days(Days::new(u64::from(today.ordinal0())))
                    .unwrap_or(NaiveDate::MIN);
                let end = start
                    .checked_add_months(Months::new(12))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(NaiveDate::MAX);
                DateBounds { start, end }
            }
            DateRange::Custom { start, end } => DateBounds { start, end },
        }
    }
}

/// Filter applied to a merged ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerFilter {
    #[serde(default)]
    pub kind: KindFilter,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

impl LedgerFilter {
    pub fn kind(kind: KindFilter) -> Self {
        Self {
            kind,
            date_range: None,
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Predicate for one record, with date presets fixed at `today`.
    pub fn matcher(&self, today: NaiveDate) -> impl Fn(&TransactionRecord) -> bool {
        let kind = self.kind;
        let bounds = self.date_range.map(|range| range.resolve(today));
        move |record| {
            kind.matches(record.kind) && bounds.map_or(true, |b| b.contains(record.date))
        }
    }
}
