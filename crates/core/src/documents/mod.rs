//! Invoice and bill lifecycle.
//!
//! The state machine and payment-application rules live in [`lifecycle`] as
//! pure functions; [`service`] orchestrates them against the stores.

pub mod lifecycle;
pub mod service;
pub mod types;

#[cfg(test)]
mod lifecycle_props;

pub use service::{DocumentService, DocumentUpdate, FinancialUpdate};
pub use types::{Document, DocumentId, DocumentKind, DocumentLine, DocumentStatus, NewDocument};
