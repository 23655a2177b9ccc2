//! Monthly metered usage rules.
//!
//! The counter lives on the subscription (`messages_used_this_period`,
//! `last_counter_reset_date`). A counter whose reset date falls in a
//! different calendar month than "today" is stale: the next increment
//! resets it to 1 instead of adding to the old count.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// True when both dates fall in the same calendar month of the same year.
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Messages counted for the month containing `today`.
pub fn used_in_month(used: u32, last_reset: NaiveDate, today: NaiveDate) -> u32 {
    if same_month(last_reset, today) {
        used
    } else {
        0
    }
}

/// Reset-or-increment rule applied by every store as one atomic step.
///
/// Returns the new `(messages_used, last_counter_reset_date)` pair.
pub fn next_message_count(used: u32, last_reset: NaiveDate, today: NaiveDate) -> (u32, NaiveDate) {
    if same_month(last_reset, today) {
        (used.saturating_add(1), last_reset)
    } else {
        (1, today)
    }
}

/// Result of an allowance check.
///
/// `limit` and `remaining` are `None` when the plan is unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    pub allowed: bool,
    pub used: u32,
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
}

impl Allowance {
    pub fn evaluate(used: u32, limit: Option<u32>) -> Self {
        match limit {
            None => Self {
                allowed: true,
                used,
                limit: None,
                remaining: None,
            },
            Some(max) => Self {
                allowed: used < max,
                used,
                limit: Some(max),
                remaining: Some(max.saturating_sub(used)),
            },
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.limit.is_none()
    }
}
