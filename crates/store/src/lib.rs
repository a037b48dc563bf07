//! Storage backends for the bookkeeping core.
//!
//! [`MemoryStore`] implements every store trait behind one mutex, which
//! makes the compound mutations (reversals, voids, allocation commits)
//! naturally all-or-nothing. [`MokaReportCache`] is the per-tenant report
//! memo.

pub mod cache;
pub mod memory;

pub use cache::MokaReportCache;
pub use memory::MemoryStore;
