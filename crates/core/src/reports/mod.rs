//! Financial statement generators.
//!
//! Each statement is a pure function of aggregated journal state, built in
//! [`builder`]; [`service`] wires the builders to the stores and the
//! per-tenant report cache.

pub mod builder;
pub mod service;
pub mod types;


pub use service::ReportService;
pub use types::{
    BalanceSheet, CashFlow, CashFlowBucket, GlLedger, GlLedgerRow, ProfitAndLoss, Report,
    ReportRow, RetainedEarnings, Section, Severity, TrialBalance, TrialBalanceRow,
};
