//! The core error taxonomy.
//!
//! Every fallible operation in the engine surfaces one of these variants.
//! Errors propagate unchanged; the core never retries, because validation
//! and conflict errors are never transient.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors surfaced by the bookkeeping core.
///
/// Cross-tenant references are reported as `NotFound`, identically to a
/// genuinely absent record, to avoid existence leakage.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity, document, allocation, or account absent (or cross-tenant).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed totals, non-positive amounts, wrong target kind.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Exceeds a balance, already voided, illegal status transition.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An aggregate exceeded the safe integer range. A data-integrity alarm,
    /// never a silent truncation.
    #[error("Aggregate overflow: {value} does not fit in 64-bit minor units")]
    Overflow {
        /// The accumulated value that failed to narrow.
        value: i128,
    },

    /// Consolidation requested across entities with differing functional
    /// currencies.
    #[error("Consolidation currency mismatch: found both {first} and {second}")]
    ConsolidationCurrencyMismatch {
        /// First functional currency encountered.
        first: String,
        /// The conflicting functional currency.
        second: String,
    },

    /// Consolidation requested for a tenant with no entities.
    #[error("No entities found for tenant")]
    NoEntitiesFound,

    /// Journal store or report cache failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl CoreError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Overflow { .. } => "OVERFLOW",
            Self::ConsolidationCurrencyMismatch { .. } => "CONSOLIDATION_CURRENCY_MISMATCH",
            Self::NoEntitiesFound => "NO_ENTITIES_FOUND",
            Self::Store(_) => "STORE",
        }
    }

    /// Returns the HTTP status code equivalent for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::NoEntitiesFound => 404,
            Self::Validation(_) | Self::ConsolidationCurrencyMismatch { .. } => 400,
            Self::Conflict(_) => 409,
            Self::Overflow { .. } | Self::Store(_) => 500,
        }
    }

    /// Convenience constructor for not-found errors.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Convenience constructor for validation errors.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Convenience constructor for conflict errors.
    #[must_use]
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
