//! Document orchestration against the stores.

use std::sync::Arc;

use chrono::NaiveDate;
use tally_shared::error::{CoreError, CoreResult};
use tally_shared::types::{MinorUnits, UserId};
use tracing::info;

use super::lifecycle;
use super::types::{Document, DocumentId, DocumentKind, DocumentLine, NewDocument};
use crate::store::records::{AuditRecord, JournalEntryStatus, PartyKind, SourceRef};
use crate::store::scope::TenantScope;
use crate::store::traits::{DocumentStore, EntityStore, JournalStore, ReportCache};

/// Metadata and (draft-only) financial edits to a document.
#[derive(Debug, Clone, Default)]
pub struct DocumentUpdate {
    /// Replace the memo.
    pub memo: Option<String>,
    /// Replace the due date.
    pub due_date: Option<NaiveDate>,
    /// Replace the financial fields; legal only for drafts.
    pub financial: Option<FinancialUpdate>,
}

/// Replacement lines and tax; subtotal and total are recomputed.
#[derive(Debug, Clone)]
pub struct FinancialUpdate {
    /// New document lines (at least one).
    pub lines: Vec<DocumentLine>,
    /// New tax amount.
    pub tax_amount: MinorUnits,
}

/// Creates, transitions, and voids invoices and bills.
pub struct DocumentService {
    documents: Arc<dyn DocumentStore>,
    journal: Arc<dyn JournalStore>,
    entities: Arc<dyn EntityStore>,
    cache: Arc<dyn ReportCache>,
}

impl DocumentService {
    /// Creates the service over the document, journal, and entity stores.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        journal: Arc<dyn JournalStore>,
        entities: Arc<dyn EntityStore>,
        cache: Arc<dyn ReportCache>,
    ) -> Self {
        Self {
            documents,
            journal,
            entities,
            cache,
        }
    }

    /// Validates and inserts a new draft document.
    ///
    /// The referenced party must exist within the tenant and belong to the
    /// same entity; a cross-tenant party reads identically to an absent one.
    pub async fn create(&self, scope: &TenantScope, doc: NewDocument) -> CoreResult<Document> {
        lifecycle::validate_new(&doc)?;

        let party = self
            .entities
            .find_party(scope, doc.party_id)
            .await?
            .filter(|p| p.entity_id == doc.entity_id)
            .ok_or_else(|| CoreError::not_found(format!("party {}", doc.party_id)))?;
        let expected = match doc.kind {
            DocumentKind::Invoice => PartyKind::Client,
            DocumentKind::Bill => PartyKind::Vendor,
        };
        if party.kind != expected {
            return Err(CoreError::validation(format!(
                "party {} is not a {expected:?}",
                doc.party_id
            )));
        }

        self.documents.insert_document(scope, doc).await
    }

    /// Issues a draft document to its counterparty.
    pub async fn send(&self, scope: &TenantScope, id: DocumentId) -> CoreResult<Document> {
        let mut doc = self.find(scope, id).await?;
        doc.status = lifecycle::mark_sent(&doc)?;
        self.documents.update_document(scope, doc).await
    }

    /// Cancels a draft or sent document.
    pub async fn cancel(&self, scope: &TenantScope, id: DocumentId) -> CoreResult<Document> {
        let mut doc = self.find(scope, id).await?;
        doc.status = lifecycle::cancel(&doc)?;
        self.documents.update_document(scope, doc).await
    }

    /// Applies a metadata update; financial fields only change for drafts.
    pub async fn update(
        &self,
        scope: &TenantScope,
        id: DocumentId,
        update: DocumentUpdate,
    ) -> CoreResult<Document> {
        let mut doc = self.find(scope, id).await?;
        if let Some(memo) = update.memo {
            doc.memo = Some(memo);
        }
        if let Some(due_date) = update.due_date {
            doc.due_date = Some(due_date);
        }
        if let Some(financial) = update.financial {
            lifecycle::ensure_financial_edit_allowed(&doc)?;
            doc.lines = financial.lines;
            doc.tax_amount = financial.tax_amount;
            doc.subtotal = MinorUnits::total(doc.lines.iter().map(|l| l.amount))?;
            doc.total = doc.subtotal.checked_add(doc.tax_amount)?;
            let check = NewDocument {
                kind: doc.id.kind(),
                entity_id: doc.entity_id,
                party_id: doc.party_id,
                number: doc.number.clone(),
                issue_date: doc.issue_date,
                due_date: doc.due_date,
                subtotal: doc.subtotal,
                tax_amount: doc.tax_amount,
                total: doc.total,
                memo: doc.memo.clone(),
                lines: doc.lines.clone(),
            };
            lifecycle::validate_new(&check)?;
        }
        self.documents.update_document(scope, doc).await
    }

    /// Soft-deletes a draft or cancelled document.
    pub async fn delete(&self, scope: &TenantScope, id: DocumentId) -> CoreResult<()> {
        let doc = self.find(scope, id).await?;
        lifecycle::ensure_deletable(&doc)?;
        self.documents.delete_document(scope, id).await
    }

    /// Voids a document: reverses every posted journal entry it generated
    /// and marks it voided, atomically. The paid amount stays as history.
    pub async fn void_document(
        &self,
        scope: &TenantScope,
        id: DocumentId,
        actor: UserId,
        reason: impl Into<String>,
    ) -> CoreResult<Document> {
        let doc = self.find(scope, id).await?;
        lifecycle::ensure_voidable(&doc)?;

        let source = match id {
            DocumentId::Invoice(invoice_id) => SourceRef::Invoice(invoice_id),
            DocumentId::Bill(bill_id) => SourceRef::Bill(bill_id),
        };
        let entries = self.journal.entries_for_source(scope, source).await?;
        let reversals = entries
            .iter()
            .filter(|e| e.status == JournalEntryStatus::Posted)
            .map(crate::journal::prepare_reversal)
            .collect::<CoreResult<Vec<_>>>()?;

        let audit = AuditRecord::now(actor, reason);
        let voided = self
            .documents
            .void_document(scope, id, reversals, audit)
            .await?;

        self.cache.invalidate(scope);
        info!(document = %id, entries = entries.len(), "voided document");
        Ok(voided)
    }

    async fn find(&self, scope: &TenantScope, id: DocumentId) -> CoreResult<Document> {
        self.documents
            .find_document(scope, id)
            .await?
            .filter(|d| d.deleted_at.is_none())
            .ok_or_else(|| CoreError::not_found(format!("{id}")))
    }
}
