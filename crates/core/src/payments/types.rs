//! Payment and allocation types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::error::CoreResult;
use tally_shared::types::{AllocationId, EntityId, MinorUnits, PartyId, PaymentId};

use crate::documents::types::{DocumentId, DocumentKind};

/// Which side of the books a payment settles.
///
/// A payment targets exactly one of a client (receivable) or a vendor
/// (payable), never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentDirection {
    /// Money received from a client; allocates to invoices.
    Receivable,
    /// Money paid to a vendor; allocates to bills.
    Payable,
}

impl PaymentDirection {
    /// The document kind this direction may allocate to.
    #[must_use]
    pub const fn target_kind(self) -> DocumentKind {
        match self {
            Self::Receivable => DocumentKind::Invoice,
            Self::Payable => DocumentKind::Bill,
        }
    }
}

/// One slice of a payment applied to one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAllocation {
    /// Unique identifier.
    pub id: AllocationId,
    /// The owning payment.
    pub payment_id: PaymentId,
    /// The invoice or bill the slice applies to.
    pub document_id: DocumentId,
    /// Allocated amount in minor units.
    pub amount: MinorUnits,
}

/// A payment as stored, with its allocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// Entity the payment belongs to.
    pub entity_id: EntityId,
    /// The client or vendor paid.
    pub party_id: PartyId,
    /// Receivable or payable.
    pub direction: PaymentDirection,
    /// Payment date.
    pub date: NaiveDate,
    /// Payment amount in minor units.
    pub amount: MinorUnits,
    /// Optional memo.
    pub memo: Option<String>,
    /// The payment's allocations.
    pub allocations: Vec<PaymentAllocation>,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Sum of existing allocations.
    pub fn allocated_total(&self) -> CoreResult<MinorUnits> {
        MinorUnits::total(self.allocations.iter().map(|a| a.amount))
    }

    /// Amount not yet allocated to any document.
    pub fn unallocated(&self) -> CoreResult<MinorUnits> {
        self.amount.checked_sub(self.allocated_total()?)
    }
}

/// Input for creating a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Entity the payment belongs to.
    pub entity_id: EntityId,
    /// The client or vendor paid.
    pub party_id: PartyId,
    /// Receivable or payable.
    pub direction: PaymentDirection,
    /// Payment date.
    pub date: NaiveDate,
    /// Payment amount in minor units (must be positive).
    pub amount: MinorUnits,
    /// Optional memo.
    pub memo: Option<String>,
}
