//! Storage traits the core services are written against.
//!
//! Every method takes a [`TenantScope`], so a caller cannot reach another
//! tenant's rows by construction. Compound mutations (reversals, voids,
//! allocations) are single trait methods so a backend can commit them
//! atomically.

use std::sync::Arc;

use async_trait::async_trait;
use tally_shared::error::CoreResult;
use tally_shared::types::{
    AllocationId, EntityId, GlAccountId, JournalEntryId, JournalLineId, MinorUnits, PartyId,
    PaymentId,
};

use super::records::{
    AuditRecord, EntityRecord, FiscalCalendarRecord, JournalEntryRecord, LedgerWindowPage,
    PartyRecord, PreparedReversal, SourceRef,
};
use super::scope::TenantScope;
use crate::documents::types::{Document, DocumentId, DocumentStatus, NewDocument};
use crate::ledger::types::{
    AccountAggregate, AggregateQuery, DateFilter, FiscalYearAggregate, FiscalYearQuery,
    GlAccountRecord,
};
use crate::payments::types::{NewPayment, Payment, PaymentAllocation};
use crate::reports::types::Report;

/// Journal and GL account access.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Per-account debit/credit sums over posted entries and live lines.
    async fn aggregate(
        &self,
        scope: &TenantScope,
        query: AggregateQuery,
    ) -> CoreResult<Vec<AccountAggregate>>;

    /// Cumulative sums plus fiscal-year-scoped sums in one pass.
    async fn aggregate_with_fiscal_year(
        &self,
        scope: &TenantScope,
        query: FiscalYearQuery,
    ) -> CoreResult<Vec<FiscalYearAggregate>>;

    /// One page of a single account's lines, ordered by (date, line id).
    ///
    /// `after` is an exclusive cursor; `limit` is the page size. Returns at
    /// most `limit` rows, plus the sums of window lines before the page.
    async fn windowed_lines(
        &self,
        scope: &TenantScope,
        account_id: GlAccountId,
        date: DateFilter,
        after: Option<JournalLineId>,
        limit: u32,
    ) -> CoreResult<LedgerWindowPage>;

    /// Looks up a journal entry with its lines.
    async fn find_entry(
        &self,
        scope: &TenantScope,
        id: JournalEntryId,
    ) -> CoreResult<Option<JournalEntryRecord>>;

    /// All posted entries generated from the given source document.
    async fn entries_for_source(
        &self,
        scope: &TenantScope,
        source: SourceRef,
    ) -> CoreResult<Vec<JournalEntryRecord>>;

    /// Atomically marks the original entry voided, inserts the reversing
    /// entry, links the two, and writes the audit trail.
    async fn commit_reversal(
        &self,
        scope: &TenantScope,
        reversal: PreparedReversal,
        audit: AuditRecord,
    ) -> CoreResult<JournalEntryRecord>;

    /// Looks up a GL account.
    async fn find_account(
        &self,
        scope: &TenantScope,
        id: GlAccountId,
    ) -> CoreResult<Option<GlAccountRecord>>;
}

/// Entity, fiscal-calendar, and party access.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Looks up an entity within the tenant.
    async fn find_entity(
        &self,
        scope: &TenantScope,
        id: EntityId,
    ) -> CoreResult<Option<EntityRecord>>;

    /// All entities belonging to the tenant.
    async fn entities_for_tenant(&self, scope: &TenantScope) -> CoreResult<Vec<EntityRecord>>;

    /// The explicit fiscal calendar covering a calendar year, if any.
    async fn find_fiscal_calendar(
        &self,
        scope: &TenantScope,
        entity_id: EntityId,
        calendar_year: i32,
    ) -> CoreResult<Option<FiscalCalendarRecord>>;

    /// Looks up a client or vendor.
    async fn find_party(
        &self,
        scope: &TenantScope,
        id: PartyId,
    ) -> CoreResult<Option<PartyRecord>>;
}

/// Status and paid-amount changes to apply to one document.
///
/// Computed by the lifecycle functions; the store applies it verbatim inside
/// the same transaction as the triggering mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentPatch {
    /// The document to patch.
    pub document_id: DocumentId,
    /// New lifecycle status.
    pub status: DocumentStatus,
    /// New cumulative paid amount.
    pub amount_paid: MinorUnits,
}

/// Invoice, bill, payment, and allocation access.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Looks up an invoice or bill.
    async fn find_document(
        &self,
        scope: &TenantScope,
        id: DocumentId,
    ) -> CoreResult<Option<Document>>;

    /// Inserts a new document.
    async fn insert_document(&self, scope: &TenantScope, doc: NewDocument)
    -> CoreResult<Document>;

    /// Replaces a document's mutable fields.
    async fn update_document(&self, scope: &TenantScope, doc: Document) -> CoreResult<Document>;

    /// Soft-deletes a document.
    async fn delete_document(&self, scope: &TenantScope, id: DocumentId) -> CoreResult<()>;

    /// Looks up a payment with its allocations.
    async fn find_payment(&self, scope: &TenantScope, id: PaymentId)
    -> CoreResult<Option<Payment>>;

    /// Inserts a new payment.
    async fn insert_payment(&self, scope: &TenantScope, payment: NewPayment)
    -> CoreResult<Payment>;

    /// Atomically inserts the allocation and applies the document patch.
    async fn commit_allocation(
        &self,
        scope: &TenantScope,
        allocation: PaymentAllocation,
        patch: DocumentPatch,
    ) -> CoreResult<()>;

    /// Atomically removes the allocation and applies the document patch.
    async fn remove_allocation(
        &self,
        scope: &TenantScope,
        allocation_id: AllocationId,
        patch: DocumentPatch,
    ) -> CoreResult<()>;

    /// Atomically marks the document voided, commits every reversal, and
    /// writes the audit trail.
    async fn void_document(
        &self,
        scope: &TenantScope,
        id: DocumentId,
        reversals: Vec<PreparedReversal>,
        audit: AuditRecord,
    ) -> CoreResult<Document>;

    /// Atomically deletes the payment, its allocations, and applies the
    /// rollback patches to every affected document.
    async fn delete_payment(
        &self,
        scope: &TenantScope,
        id: PaymentId,
        patches: Vec<DocumentPatch>,
    ) -> CoreResult<()>;
}

/// Per-tenant report cache.
pub trait ReportCache: Send + Sync {
    /// Fetches a cached report by key.
    fn get(&self, scope: &TenantScope, key: &str) -> Option<Arc<Report>>;

    /// Stores a report under the key.
    fn set(&self, scope: &TenantScope, key: String, report: Arc<Report>);

    /// Drops every cached report for the tenant.
    fn invalidate(&self, scope: &TenantScope);
}
