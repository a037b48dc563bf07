//! Ledger domain types for aggregation and balance calculation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_shared::error::{CoreError, CoreResult};
use tally_shared::types::{EntityId, GlAccountId, MinorUnits};

/// GL account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (debit-normal).
    Asset,
    /// Obligations owed (credit-normal).
    Liability,
    /// Owner residual (credit-normal).
    Equity,
    /// Income earned (credit-normal).
    Revenue,
    /// Costs incurred (debit-normal).
    Expense,
}

impl AccountType {
    /// The account's normal balance side.
    ///
    /// Asset/Expense are debit-normal; Liability/Equity/Revenue are
    /// credit-normal. Deriving the side from the type makes the pairing an
    /// invariant by construction.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true for accounts that appear on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }
}

/// Normal balance side of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl NormalBalance {
    /// Signed balance at accumulator width.
    ///
    /// Debit-normal: `debit - credit`; credit-normal: `credit - debit`.
    #[must_use]
    pub const fn signed_balance_wide(self, debit: i128, credit: i128) -> i128 {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }

    /// Signed balance narrowed to minor units.
    pub fn signed_balance(self, debit: MinorUnits, credit: MinorUnits) -> CoreResult<MinorUnits> {
        MinorUnits::from_accumulated(self.signed_balance_wide(debit.widen(), credit.widen()))
    }
}

/// A general-ledger account as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlAccountRecord {
    /// Unique identifier.
    pub id: GlAccountId,
    /// Entity the account belongs to.
    pub entity_id: EntityId,
    /// Account code (e.g., "1000").
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Whether the account is cash-designated for cash-flow purposes.
    pub is_cash_account: bool,
}

/// Date boundary for an aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFilter {
    /// All activity on or before the date (as-of reports).
    Through(NaiveDate),
    /// All activity strictly before the date (opening balances).
    Before(NaiveDate),
    /// Activity within the inclusive date range (period reports).
    Period {
        /// First day of the period.
        start: NaiveDate,
        /// Last day of the period.
        end: NaiveDate,
    },
}

impl DateFilter {
    /// Returns true if the date falls inside the filter.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Through(through) => date <= through,
            Self::Before(before) => date < before,
            Self::Period { start, end } => start <= date && date <= end,
        }
    }

    /// Rejects inverted period bounds.
    pub fn validate(&self) -> CoreResult<()> {
        if let Self::Period { start, end } = self
            && start > end
        {
            return Err(CoreError::validation(format!(
                "period start {start} is after end {end}"
            )));
        }
        Ok(())
    }
}

/// Aggregation request against the journal store.
#[derive(Debug, Clone)]
pub struct AggregateQuery {
    /// Entities to aggregate over (already tenant-validated).
    pub entity_ids: Vec<EntityId>,
    /// Restrict to these account types; `None` means all.
    pub account_types: Option<Vec<AccountType>>,
    /// Date boundary.
    pub date: DateFilter,
}

/// Raw per-account sums from one aggregation pass.
///
/// Sums are at accumulator width; [`crate::ledger::AggregationService`]
/// narrows them exactly once.
#[derive(Debug, Clone)]
pub struct AccountAggregate {
    /// The account.
    pub account_id: GlAccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Whether the account is cash-designated.
    pub is_cash_account: bool,
    /// Total debits at accumulator width.
    pub total_debit: i128,
    /// Total credits at accumulator width.
    pub total_credit: i128,
}

/// Balance-sheet aggregation request: cumulative sums through the as-of
/// date plus fiscal-year-scoped revenue/expense sums in the same pass.
#[derive(Debug, Clone)]
pub struct FiscalYearQuery {
    /// As-of date (cumulative boundary).
    pub as_of: NaiveDate,
    /// Per-entity fiscal-year start dates; the keys define the entity set.
    pub fiscal_starts: Vec<(EntityId, NaiveDate)>,
}

/// Raw per-account sums with fiscal-year columns.
///
/// A distinct type from [`AccountAggregate`] so the presence of the
/// current-year columns is a compile-time distinction, not a runtime guess.
#[derive(Debug, Clone)]
pub struct FiscalYearAggregate {
    /// The account.
    pub account_id: GlAccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Whether the account is cash-designated.
    pub is_cash_account: bool,
    /// Cumulative debits through the as-of date.
    pub total_debit: i128,
    /// Cumulative credits through the as-of date.
    pub total_credit: i128,
    /// Debits within the current fiscal year through the as-of date.
    pub current_year_debit: i128,
    /// Credits within the current fiscal year through the as-of date.
    pub current_year_credit: i128,
}

/// A narrowed, signed per-account balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account.
    pub account_id: GlAccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Whether the account is cash-designated.
    pub is_cash_account: bool,
    /// Total debits.
    pub total_debit: MinorUnits,
    /// Total credits.
    pub total_credit: MinorUnits,
    /// Signed balance per the account's normal side.
    pub balance: MinorUnits,
}

/// A narrowed balance with the fiscal-year-scoped component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalYearBalance {
    /// The cumulative balance.
    pub cumulative: AccountBalance,
    /// Signed balance of current-fiscal-year activity only.
    pub current_year_balance: MinorUnits,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AccountType::Asset, NormalBalance::Debit)]
    #[case(AccountType::Expense, NormalBalance::Debit)]
    #[case(AccountType::Liability, NormalBalance::Credit)]
    #[case(AccountType::Equity, NormalBalance::Credit)]
    #[case(AccountType::Revenue, NormalBalance::Credit)]
    fn test_normal_balance_pairing(#[case] account_type: AccountType, #[case] side: NormalBalance) {
        assert_eq!(account_type.normal_balance(), side);
    }

    #[test]
    fn test_signed_balance_sides() {
        let debit = MinorUnits::new(100_000);
        let credit = MinorUnits::new(40_000);
        assert_eq!(
            NormalBalance::Debit.signed_balance(debit, credit).unwrap(),
            MinorUnits::new(60_000)
        );
        assert_eq!(
            NormalBalance::Credit.signed_balance(debit, credit).unwrap(),
            MinorUnits::new(-60_000)
        );
    }

    #[test]
    fn test_date_filter_contains() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 6, day).unwrap();
        assert!(DateFilter::Through(d(15)).contains(d(15)));
        assert!(!DateFilter::Through(d(15)).contains(d(16)));
        assert!(DateFilter::Before(d(15)).contains(d(14)));
        assert!(!DateFilter::Before(d(15)).contains(d(15)));
        let period = DateFilter::Period {
            start: d(10),
            end: d(20),
        };
        assert!(period.contains(d(10)));
        assert!(period.contains(d(20)));
        assert!(!period.contains(d(9)));
        assert!(!period.contains(d(21)));
    }

    #[test]
    fn test_inverted_period_rejected() {
        let filter = DateFilter::Period {
            start: NaiveDate::from_ymd_opt(2026, 6, 20).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 6, 10).unwrap(),
        };
        assert!(filter.validate().is_err());
    }

    #[test]
    fn test_balance_sheet_types() {
        assert!(AccountType::Asset.is_balance_sheet());
        assert!(AccountType::Liability.is_balance_sheet());
        assert!(AccountType::Equity.is_balance_sheet());
        assert!(!AccountType::Revenue.is_balance_sheet());
        assert!(!AccountType::Expense.is_balance_sheet());
    }
}
