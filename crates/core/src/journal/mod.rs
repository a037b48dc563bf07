//! Journal void/reversal protocol.
//!
//! Voiding never edits history: the original entry keeps its lines, its
//! status flips to voided, and a new posted entry with swapped debit/credit
//! amounts is appended and linked back to the original.

pub mod reversal;
pub mod service;

pub use reversal::prepare_reversal;
pub use service::JournalService;
