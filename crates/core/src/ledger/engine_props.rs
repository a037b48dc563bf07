//! Property tests for balance narrowing.

use proptest::prelude::*;
use tally_shared::types::{GlAccountId, MinorUnits};

use super::engine::AggregationService;
use super::types::{AccountAggregate, AccountType, NormalBalance};

fn aggregate(account_type: AccountType, debit: i128, credit: i128) -> AccountAggregate {
    AccountAggregate {
        account_id: GlAccountId::new(),
        code: "1000".into(),
        name: "Account".into(),
        account_type,
        is_cash_account: false,
        total_debit: debit,
        total_credit: credit,
    }
}

proptest! {
    /// The two normal sides compute opposite signs of the same difference.
    #[test]
    fn prop_sides_are_opposite(debit in any::<i64>(), credit in any::<i64>()) {
        let d = i128::from(debit);
        let c = i128::from(credit);
        prop_assert_eq!(
            NormalBalance::Debit.signed_balance_wide(d, c),
            -NormalBalance::Credit.signed_balance_wide(d, c)
        );
    }

    /// In-range sums narrow to plain i64 arithmetic.
    #[test]
    fn prop_in_range_narrowing_is_exact(
        debit in 0i64..=i64::MAX / 2,
        credit in 0i64..=i64::MAX / 2,
    ) {
        let rows = vec![aggregate(AccountType::Asset, i128::from(debit), i128::from(credit))];
        let balances = AggregationService::signed_balances(rows).unwrap();
        prop_assert_eq!(balances[0].balance, MinorUnits::new(debit - credit));
    }

    /// Sums past the safe-integer range always fail, never truncate.
    #[test]
    fn prop_out_of_range_is_overflow(excess in 1i128..1_000_000) {
        let rows = vec![aggregate(AccountType::Asset, i128::from(i64::MAX) + excess, 0)];
        let err = AggregationService::signed_balances(rows).unwrap_err();
        prop_assert_eq!(err.error_code(), "OVERFLOW");
    }
}
