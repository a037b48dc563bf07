//! Moka-backed report cache.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tally_core::reports::types::Report;
use tally_core::store::scope::TenantScope;
use tally_core::store::traits::ReportCache;
use tally_shared::config::ReportCacheConfig;
use tally_shared::types::TenantId;
use tracing::warn;

/// Report memo keyed by tenant plus the full parameter tuple, so differing
/// parameters never collide. Invalidation drops a whole tenant at once.
pub struct MokaReportCache {
    cache: Cache<(TenantId, String), Arc<Report>>,
}

impl MokaReportCache {
    /// Creates the cache from its configuration.
    #[must_use]
    pub fn new(config: &ReportCacheConfig) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(config.max_capacity)
                .time_to_live(Duration::from_secs(config.ttl_secs))
                .support_invalidation_closures()
                .build(),
        }
    }

    /// Number of cached reports (for tests; runs pending cache tasks first).
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl ReportCache for MokaReportCache {
    fn get(&self, scope: &TenantScope, key: &str) -> Option<Arc<Report>> {
        self.cache.get(&(scope.tenant_id(), key.to_string()))
    }

    fn set(&self, scope: &TenantScope, key: String, report: Arc<Report>) {
        self.cache.insert((scope.tenant_id(), key), report);
    }

    fn invalidate(&self, scope: &TenantScope) {
        let tenant = scope.tenant_id();
        if let Err(err) = self
            .cache
            .invalidate_entries_if(move |(key_tenant, _), _| *key_tenant == tenant)
        {
            warn!(%tenant, error = %err, "report cache invalidation failed");
        }
        self.cache.run_pending_tasks();
    }
}
