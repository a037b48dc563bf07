//! Core bookkeeping logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. The journal store and report cache are consumed through
//! traits so the engine is testable with fakes.
//!
//! # Modules
//!
//! - `ledger` - Journal aggregation engine and signed balances
//! - `reports` - Financial statement generators
//! - `documents` - Invoice/bill lifecycle state machine
//! - `payments` - Payment allocation and reversal protocol
//! - `journal` - Journal entry void/reversal protocol
//! - `store` - Collaborator traits (journal store, report cache)

pub mod documents;
pub mod journal;
pub mod ledger;
pub mod payments;
pub mod reports;
pub mod store;
