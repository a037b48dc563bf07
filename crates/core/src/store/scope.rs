//! Structural tenant isolation.

use serde::{Deserialize, Serialize};
use tally_shared::types::TenantId;

/// Proof that a store call is scoped to one tenant.
///
/// Every store and cache trait method takes a `&TenantScope`; the tenant
/// predicate is conjuncted by construction rather than checked by scanning
/// query text after the fact. The inner id is private so a scope cannot be
/// fabricated from unrelated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantScope {
    tenant_id: TenantId,
}

impl TenantScope {
    /// Creates a scope for the given tenant.
    #[must_use]
    pub const fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    /// Returns the tenant this scope filters by.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
