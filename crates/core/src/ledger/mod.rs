//! Journal aggregation engine.
//!
//! Converts raw per-account debit/credit sums from the journal store into
//! signed balances per each account's normal side, resolves fiscal-year
//! windows, and enforces consolidation rules.

pub mod engine;
pub mod fiscal;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::{AggregationService, ReportScope};
pub use fiscal::{FiscalYearWindow, fiscal_year_window};
pub use types::{
    AccountAggregate, AccountBalance, AccountType, AggregateQuery, DateFilter, FiscalYearAggregate,
    FiscalYearBalance, FiscalYearQuery, GlAccountRecord, NormalBalance,
};
