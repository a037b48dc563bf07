//! Document state machine and payment-application rules, as pure functions.
//!
//! Transitions: `Draft -> Sent -> {PartiallyPaid, Paid} -> Voided`, with
//! `Draft/Sent -> Cancelled`. Draft and Cancelled documents are never
//! voidable. Only Draft accepts financial-field edits.

use tally_shared::error::{CoreError, CoreResult};
use tally_shared::types::MinorUnits;

use super::types::{Document, DocumentStatus, NewDocument};
use crate::store::traits::DocumentPatch;

/// Validates a document before insertion.
///
/// Requires at least one line, positive line amounts, `subtotal` equal to
/// the line sum, and `total == subtotal + tax_amount`.
pub fn validate_new(doc: &NewDocument) -> CoreResult<()> {
    if doc.lines.is_empty() {
        return Err(CoreError::validation("document has no lines"));
    }
    for line in &doc.lines {
        if !line.amount.is_positive() {
            return Err(CoreError::validation(format!(
                "line amount {} is not positive",
                line.amount
            )));
        }
    }
    if doc.tax_amount.is_negative() {
        return Err(CoreError::validation("tax amount is negative"));
    }
    let line_sum = MinorUnits::total(doc.lines.iter().map(|l| l.amount))?;
    if line_sum != doc.subtotal {
        return Err(CoreError::validation(format!(
            "subtotal {} does not match line sum {line_sum}",
            doc.subtotal
        )));
    }
    let expected_total = doc.subtotal.checked_add(doc.tax_amount)?;
    if expected_total != doc.total {
        return Err(CoreError::validation(format!(
            "total {} does not match subtotal plus tax {expected_total}",
            doc.total
        )));
    }
    Ok(())
}

/// Applies a payment amount, returning the resulting patch.
///
/// The amount must be positive and must not exceed the outstanding balance.
/// Full payment moves the document to `Paid`, anything less to
/// `PartiallyPaid`.
pub fn apply_payment(doc: &Document, amount: MinorUnits) -> CoreResult<DocumentPatch> {
    if !amount.is_positive() {
        return Err(CoreError::validation(format!(
            "payment amount {amount} is not positive"
        )));
    }
    match doc.status {
        DocumentStatus::Sent | DocumentStatus::PartiallyPaid | DocumentStatus::Paid => {}
        status => {
            return Err(CoreError::conflict(format!(
                "cannot apply payment to a {status:?} document"
            )));
        }
    }
    let outstanding = doc.outstanding()?;
    if amount > outstanding {
        return Err(CoreError::conflict(format!(
            "amount {amount} exceeds outstanding balance {outstanding}"
        )));
    }
    let paid_amount = doc.paid_amount.checked_add(amount)?;
    let status = if paid_amount == doc.total {
        DocumentStatus::Paid
    } else {
        DocumentStatus::PartiallyPaid
    };
    Ok(DocumentPatch {
        document_id: doc.id,
        status,
        amount_paid: paid_amount,
    })
}

/// Reverses a previously applied payment amount.
///
/// A zero remaining paid amount returns the document to `Sent`; otherwise it
/// is `PartiallyPaid`. `Voided` is terminal: the paid amount still rolls
/// back (so allocations can be unwound), but the status never leaves
/// `Voided`.
pub fn reverse_payment(doc: &Document, amount: MinorUnits) -> CoreResult<DocumentPatch> {
    if amount > doc.paid_amount {
        return Err(CoreError::conflict(format!(
            "amount {amount} exceeds paid amount {}",
            doc.paid_amount
        )));
    }
    let paid_amount = doc.paid_amount.checked_sub(amount)?;
    let status = if doc.status == DocumentStatus::Voided {
        DocumentStatus::Voided
    } else if paid_amount.is_zero() {
        DocumentStatus::Sent
    } else {
        DocumentStatus::PartiallyPaid
    };
    Ok(DocumentPatch {
        document_id: doc.id,
        status,
        amount_paid: paid_amount,
    })
}

/// The `Draft -> Sent` transition.
pub fn mark_sent(doc: &Document) -> CoreResult<DocumentStatus> {
    match doc.status {
        DocumentStatus::Draft => Ok(DocumentStatus::Sent),
        status => Err(CoreError::conflict(format!(
            "cannot send a {status:?} document"
        ))),
    }
}

/// The `Draft/Sent -> Cancelled` transition.
pub fn cancel(doc: &Document) -> CoreResult<DocumentStatus> {
    match doc.status {
        DocumentStatus::Draft | DocumentStatus::Sent => Ok(DocumentStatus::Cancelled),
        status => Err(CoreError::conflict(format!(
            "cannot cancel a {status:?} document"
        ))),
    }
}

/// Rejects voiding outside `{Sent, PartiallyPaid, Paid}`.
pub fn ensure_voidable(doc: &Document) -> CoreResult<()> {
    match doc.status {
        DocumentStatus::Sent | DocumentStatus::PartiallyPaid | DocumentStatus::Paid => Ok(()),
        DocumentStatus::Voided => Err(CoreError::conflict("document is already voided")),
        status => Err(CoreError::conflict(format!(
            "cannot void a {status:?} document"
        ))),
    }
}

/// Rejects financial-field edits outside `Draft`.
pub fn ensure_financial_edit_allowed(doc: &Document) -> CoreResult<()> {
    match doc.status {
        DocumentStatus::Draft => Ok(()),
        status => Err(CoreError::conflict(format!(
            "financial fields of a {status:?} document are frozen"
        ))),
    }
}

/// Rejects soft deletion outside `{Draft, Cancelled}`.
pub fn ensure_deletable(doc: &Document) -> CoreResult<()> {
    match doc.status {
        DocumentStatus::Draft | DocumentStatus::Cancelled => Ok(()),
        status => Err(CoreError::conflict(format!(
            "cannot delete a {status:?} document"
        ))),
    }
}
