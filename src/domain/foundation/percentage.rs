//! Percentage value object (0-100 scale, two decimal places).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A share between 0 and 100 inclusive, rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(Decimal);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// `part / whole * 100`, or zero when `whole` is zero.
    ///
    /// The result is clamped to 0-100 and rounded half away from zero.
    pub fn of(part: Decimal, whole: Decimal) -> Self {
        if whole.is_zero() {
            return Self::ZERO;
        }
        // Overflow only happens far outside 0-100, so it clamps like any other outlier.
        let raw = part
            .checked_div(whole)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or_else(|| {
                if part.is_sign_negative() == whole.is_sign_negative() {
                    Decimal::ONE_HUNDRED
                } else {
                    Decimal::ZERO
                }
            });
        let clamped = raw.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED);
        Self(clamped.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Returns the value on the 0-100 scale.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}
