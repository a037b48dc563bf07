//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Integer minor-unit money types
//! - Typed IDs for type-safe entity references
//! - Cursor pagination types for ledger drill-downs
//! - The core error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
