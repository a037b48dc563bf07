//! Integer minor-unit money.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are whole numbers of the smallest currency unit (e.g., cents).
//! Aggregation happens at `i128` width and is narrowed exactly once with an
//! explicit overflow check, never implicitly inside an arithmetic expression.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A monetary amount in integer minor-currency units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MinorUnits(pub i64);

impl MinorUnits {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a raw minor-unit count.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Returns the raw minor-unit count.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Narrows an `i128` accumulator into the safe 64-bit range.
    ///
    /// This is the single narrowing point for all store-side aggregation.
    /// A value that would lose precision is a fatal overflow, never a
    /// silent truncation.
    pub fn from_accumulated(value: i128) -> CoreResult<Self> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| CoreError::Overflow { value })
    }

    /// Widens to the aggregation accumulator width.
    #[must_use]
    pub const fn widen(self) -> i128 {
        self.0 as i128
    }

    /// Checked addition; overflow is a data-integrity error.
    pub fn checked_add(self, other: Self) -> CoreResult<Self> {
        Self::from_accumulated(self.widen() + other.widen())
    }

    /// Checked subtraction; overflow is a data-integrity error.
    pub fn checked_sub(self, other: Self) -> CoreResult<Self> {
        Self::from_accumulated(self.widen() - other.widen())
    }

    /// Sums amounts at accumulator width, narrowing exactly once.
    pub fn total(amounts: impl IntoIterator<Item = Self>) -> CoreResult<Self> {
        let wide: i128 = amounts.into_iter().map(Self::widen).sum();
        Self::from_accumulated(wide)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Formats as fixed-point major units with two decimals (e.g., `-12.05`).
    ///
    /// Downstream export formatters consume this representation.
    #[must_use]
    pub fn to_major_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl std::fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MinorUnits {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
