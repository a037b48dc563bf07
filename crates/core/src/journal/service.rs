//! Void orchestration against the journal store.

use std::sync::Arc;

use tally_shared::error::{CoreError, CoreResult};
use tally_shared::types::{JournalEntryId, UserId};
use tracing::info;

use super::reversal::prepare_reversal;
use crate::store::records::{AuditRecord, JournalEntryRecord};
use crate::store::scope::TenantScope;
use crate::store::traits::{JournalStore, ReportCache};

/// Voids posted journal entries.
pub struct JournalService {
    journal: Arc<dyn JournalStore>,
    cache: Arc<dyn ReportCache>,
}

impl JournalService {
    /// Creates the service over a journal store and report cache.
    pub fn new(journal: Arc<dyn JournalStore>, cache: Arc<dyn ReportCache>) -> Self {
        Self { journal, cache }
    }

    /// Voids a posted entry: appends the reversing entry, flips the original
    /// to voided, and writes the audit trail, atomically.
    ///
    /// Returns the reversing entry. Cached reports for the tenant are
    /// invalidated since journal state changed.
    pub async fn void_entry(
        &self,
        scope: &TenantScope,
        entry_id: JournalEntryId,
        actor: UserId,
        reason: impl Into<String>,
    ) -> CoreResult<JournalEntryRecord> {
        let entry = self
            .journal
            .find_entry(scope, entry_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("journal entry {entry_id}")))?;

        let prepared = prepare_reversal(&entry)?;
        let audit = AuditRecord::now(actor, reason);
        let reversing = self.journal.commit_reversal(scope, prepared, audit).await?;

        self.cache.invalidate(scope);
        info!(
            entry = %entry_id,
            reversal = %reversing.id,
            "voided journal entry"
        );
        Ok(reversing)
    }
}
