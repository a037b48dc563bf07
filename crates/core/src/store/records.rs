//! Records exchanged with the journal store.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{
    BillId, EntityId, GlAccountId, InvoiceId, JournalEntryId, JournalLineId, MinorUnits,
    PartyId, PaymentId, UserId,
};

/// A business entity owned by a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Unique identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Functional currency (ISO 4217).
    pub functional_currency: String,
    /// Month the fiscal year starts (1-12).
    pub fiscal_year_start_month: u32,
}

/// An explicit fiscal calendar record for one calendar year.
///
/// When present, it overrides the fiscal window derived from the entity's
/// fiscal-year start month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalCalendarRecord {
    /// Entity this calendar belongs to.
    pub entity_id: EntityId,
    /// Calendar year the record covers (keyed by the as-of date's year).
    pub calendar_year: i32,
    /// First day of the fiscal year.
    pub start_date: NaiveDate,
    /// Last day of the fiscal year.
    pub end_date: NaiveDate,
}

/// Kind of counterparty a document references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    /// A client (accounts receivable).
    Client,
    /// A vendor (accounts payable).
    Vendor,
}

/// A client or vendor record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyRecord {
    /// Unique identifier.
    pub id: PartyId,
    /// Entity the party belongs to.
    pub entity_id: EntityId,
    /// Client or vendor.
    pub kind: PartyKind,
    /// Display name.
    pub name: String,
}

/// Journal entry status.
///
/// Only `Posted` entries participate in aggregation; voiding never deletes
/// history, it flips this status and appends a reversing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalEntryStatus {
    /// Posted to the ledger (immutable).
    Posted,
    /// Voided; excluded from aggregation.
    Voided,
}

/// The document or payment a journal entry was posted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum SourceRef {
    /// Posted from an invoice.
    Invoice(InvoiceId),
    /// Posted from a bill.
    Bill(BillId),
    /// Posted from a payment.
    Payment(PaymentId),
}

/// A journal line as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLineRecord {
    /// Unique identifier.
    pub id: JournalLineId,
    /// The GL account posted to.
    pub account_id: GlAccountId,
    /// Debit amount in functional-currency minor units (0 if credit).
    pub debit: MinorUnits,
    /// Credit amount in functional-currency minor units (0 if debit).
    pub credit: MinorUnits,
    /// Exchange rate from the source currency (1 for same-currency lines).
    pub exchange_rate: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
    /// Soft-deletion timestamp; deleted lines never aggregate.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A journal entry with its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntryRecord {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Entity the entry belongs to.
    pub entity_id: EntityId,
    /// Posting date.
    pub date: NaiveDate,
    /// Human-readable entry number.
    pub entry_number: String,
    /// Optional memo.
    pub memo: Option<String>,
    /// Posted or voided.
    pub status: JournalEntryStatus,
    /// Source document, if any.
    pub source: Option<SourceRef>,
    /// The entry this one reverses, if it is a reversal.
    pub reverses: Option<JournalEntryId>,
    /// The reversal that voided this entry, if any.
    pub reversed_by: Option<JournalEntryId>,
    /// The entry's lines.
    pub lines: Vec<JournalLineRecord>,
}

impl JournalEntryRecord {
    /// Lines that participate in aggregation (non-deleted).
    pub fn live_lines(&self) -> impl Iterator<Item = &JournalLineRecord> {
        self.lines.iter().filter(|l| l.deleted_at.is_none())
    }
}

/// Input line for a new journal entry.
#[derive(Debug, Clone)]
pub struct NewJournalLine {
    /// The GL account to post to.
    pub account_id: GlAccountId,
    /// Debit amount (0 if credit).
    pub debit: MinorUnits,
    /// Credit amount (0 if debit).
    pub credit: MinorUnits,
    /// Exchange rate carried from the original line.
    pub exchange_rate: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
}

/// Input for creating a journal entry.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    /// Entity the entry belongs to.
    pub entity_id: EntityId,
    /// Posting date.
    pub date: NaiveDate,
    /// Entry memo.
    pub memo: Option<String>,
    /// Source document, if any.
    pub source: Option<SourceRef>,
    /// The entry this one reverses, if it is a reversal.
    pub reverses: Option<JournalEntryId>,
    /// The entry's lines (at least one).
    pub lines: Vec<NewJournalLine>,
}

/// A reversal prepared by the core, ready for an atomic commit.
#[derive(Debug, Clone)]
pub struct PreparedReversal {
    /// The posted entry being voided.
    pub original_id: JournalEntryId,
    /// The reversing entry to append.
    pub reversing: NewJournalEntry,
}

/// Who/when/why trail written alongside every void.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// The acting user.
    pub actor: UserId,
    /// When the action happened.
    pub at: DateTime<Utc>,
    /// The stated reason.
    pub reason: String,
}

impl AuditRecord {
    /// Creates an audit record stamped with the current time.
    #[must_use]
    pub fn now(actor: UserId, reason: impl Into<String>) -> Self {
        Self {
            actor,
            at: Utc::now(),
            reason: reason.into(),
        }
    }
}

/// One page of a single account's window lines.
///
/// Carries the debit/credit sums of the window lines that precede the page
/// (accumulator width), so a later page can seed its running balance
/// without refetching earlier pages.
#[derive(Debug, Clone, Default)]
pub struct LedgerWindowPage {
    /// The page rows, ordered by (date, line id).
    pub rows: Vec<LedgerLineRow>,
    /// Sum of window debits strictly before the first row.
    pub prior_debit: i128,
    /// Sum of window credits strictly before the first row.
    pub prior_credit: i128,
}

/// One row of the paginated GL drill-down, as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLineRow {
    /// Line id; doubles as the pagination cursor.
    pub id: JournalLineId,
    /// Posting date.
    pub date: NaiveDate,
    /// Entry number of the parent entry.
    pub entry_number: String,
    /// Line or entry memo.
    pub memo: Option<String>,
    /// Debit amount.
    pub debit: MinorUnits,
    /// Credit amount.
    pub credit: MinorUnits,
}
