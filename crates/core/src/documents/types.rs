//! Invoice and bill types.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::types::{BillId, EntityId, InvoiceId, MinorUnits, PartyId};

/// Whether a document is an invoice (receivable) or a bill (payable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Revenue document issued to a client.
    Invoice,
    /// Payable document received from a vendor.
    Bill,
}

/// Identifier of either document kind.
///
/// Invoices and bills share one lifecycle, so the services take this enum
/// rather than two parallel method sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum DocumentId {
    /// An invoice.
    Invoice(InvoiceId),
    /// A bill.
    Bill(BillId),
}

impl DocumentId {
    /// The document kind this id refers to.
    #[must_use]
    pub const fn kind(self) -> DocumentKind {
        match self {
            Self::Invoice(_) => DocumentKind::Invoice,
            Self::Bill(_) => DocumentKind::Bill,
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoice(id) => write!(f, "invoice {id}"),
            Self::Bill(id) => write!(f, "bill {id}"),
        }
    }
}

/// Document lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Editable; not yet posted or sent.
    Draft,
    /// Issued to the counterparty; financial fields frozen.
    Sent,
    /// Some, but not all, of the total has been paid.
    PartiallyPaid,
    /// Fully paid.
    Paid,
    /// Cancelled before any payment.
    Cancelled,
    /// Voided; all generated journal entries reversed.
    Voided,
}

/// One line of an invoice or bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLine {
    /// Line description.
    pub description: String,
    /// Line amount in minor units (must be positive).
    pub amount: MinorUnits,
}

/// An invoice or bill as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier (carries the kind).
    pub id: DocumentId,
    /// Entity the document belongs to.
    pub entity_id: EntityId,
    /// The client (invoice) or vendor (bill).
    pub party_id: PartyId,
    /// Human-readable document number.
    pub number: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Sum of line amounts.
    pub subtotal: MinorUnits,
    /// Tax on top of the subtotal.
    pub tax_amount: MinorUnits,
    /// Subtotal plus tax.
    pub total: MinorUnits,
    /// Cumulative amount applied from payments.
    pub paid_amount: MinorUnits,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Optional memo.
    pub memo: Option<String>,
    /// The document's lines.
    pub lines: Vec<DocumentLine>,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Amount still owed.
    pub fn outstanding(&self) -> tally_shared::error::CoreResult<MinorUnits> {
        self.total.checked_sub(self.paid_amount)
    }
}

/// Input for creating a document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Invoice or bill.
    pub kind: DocumentKind,
    /// Entity the document belongs to.
    pub entity_id: EntityId,
    /// The client (invoice) or vendor (bill).
    pub party_id: PartyId,
    /// Human-readable document number.
    pub number: String,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Sum of line amounts (validated against the lines).
    pub subtotal: MinorUnits,
    /// Tax on top of the subtotal.
    pub tax_amount: MinorUnits,
    /// Subtotal plus tax (validated).
    pub total: MinorUnits,
    /// Optional memo.
    pub memo: Option<String>,
    /// The document's lines (at least one).
    pub lines: Vec<DocumentLine>,
}
