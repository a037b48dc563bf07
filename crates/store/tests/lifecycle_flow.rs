//! End-to-end document, payment, and void flows over the in-memory store.

mod common;

use common::{d, fixture};
use tally_core::documents::types::{DocumentId, DocumentStatus};
use tally_core::payments::types::PaymentDirection;
use tally_core::store::records::{JournalEntryStatus, SourceRef};
use tally_core::store::scope::TenantScope;
use tally_core::store::traits::DocumentStore;
use tally_shared::types::{MinorUnits, TenantId, UserId};

#[tokio::test]
async fn test_invoice_paid_in_two_installments() {
    // Subtotal 100000, tax 13000, total 113000; pay 50000 then 63000.
    let f = fixture();
    let docs = f.document_service();
    let pays = f.payment_service();

    let doc = docs.create(&f.scope, f.invoice(100_000, 13_000)).await.unwrap();
    assert_eq!(doc.status, DocumentStatus::Draft);
    let doc = docs.send(&f.scope, doc.id).await.unwrap();

    let payment = pays
        .create(&f.scope, f.payment(113_000, PaymentDirection::Receivable))
        .await
        .unwrap();

    pays.allocate(&f.scope, payment.id, doc.id, MinorUnits::new(50_000))
        .await
        .unwrap();
    let after_first = f.documents().find_document(&f.scope, doc.id).await.unwrap().unwrap();
    assert_eq!(after_first.status, DocumentStatus::PartiallyPaid);
    assert_eq!(after_first.paid_amount, MinorUnits::new(50_000));

    pays.allocate(&f.scope, payment.id, doc.id, MinorUnits::new(63_000))
        .await
        .unwrap();
    let after_second = f.documents().find_document(&f.scope, doc.id).await.unwrap().unwrap();
    assert_eq!(after_second.status, DocumentStatus::Paid);
    assert_eq!(after_second.paid_amount, MinorUnits::new(113_000));
}

#[tokio::test]
async fn test_over_allocation_rejected_and_creates_no_row() {
    // Payment 50000 with 40000 allocated; 20000 more must be rejected.
    let f = fixture();
    let docs = f.document_service();
    let pays = f.payment_service();

    let doc = docs.create(&f.scope, f.invoice(100_000, 0)).await.unwrap();
    let doc = docs.send(&f.scope, doc.id).await.unwrap();
    let payment = pays
        .create(&f.scope, f.payment(50_000, PaymentDirection::Receivable))
        .await
        .unwrap();

    pays.allocate(&f.scope, payment.id, doc.id, MinorUnits::new(40_000))
        .await
        .unwrap();
    let err = pays
        .allocate(&f.scope, payment.id, doc.id, MinorUnits::new(20_000))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "CONFLICT");

    let payment = f.documents().find_payment(&f.scope, payment.id).await.unwrap().unwrap();
    assert_eq!(payment.allocations.len(), 1);
    assert_eq!(payment.allocated_total().unwrap(), MinorUnits::new(40_000));
}

#[tokio::test]
async fn test_wrong_direction_rejected() {
    let f = fixture();
    let docs = f.document_service();
    let pays = f.payment_service();

    let doc = docs.create(&f.scope, f.invoice(100_000, 0)).await.unwrap();
    let doc = docs.send(&f.scope, doc.id).await.unwrap();
    let payment = pays
        .create(&f.scope, f.payment(100_000, PaymentDirection::Payable))
        .await
        .unwrap();

    let err = pays
        .allocate(&f.scope, payment.id, doc.id, MinorUnits::new(10_000))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION");
}

#[tokio::test]
async fn test_deallocate_restores_document() {
    let f = fixture();
    let docs = f.document_service();
    let pays = f.payment_service();

    let doc = docs.create(&f.scope, f.invoice(100_000, 0)).await.unwrap();
    let doc = docs.send(&f.scope, doc.id).await.unwrap();
    let payment = pays
        .create(&f.scope, f.payment(100_000, PaymentDirection::Receivable))
        .await
        .unwrap();
    let allocation = pays
        .allocate(&f.scope, payment.id, doc.id, MinorUnits::new(30_000))
        .await
        .unwrap();

    pays.deallocate(&f.scope, payment.id, allocation.id).await.unwrap();

    let restored = f.documents().find_document(&f.scope, doc.id).await.unwrap().unwrap();
    assert_eq!(restored.status, DocumentStatus::Sent);
    assert_eq!(restored.paid_amount, MinorUnits::ZERO);
    let payment = f.documents().find_payment(&f.scope, payment.id).await.unwrap().unwrap();
    assert!(payment.allocations.is_empty());
}

#[tokio::test]
async fn test_delete_payment_reverses_every_allocation() {
    let f = fixture();
    let docs = f.document_service();
    let pays = f.payment_service();

    let first = docs.create(&f.scope, f.invoice(60_000, 0)).await.unwrap();
    let first = docs.send(&f.scope, first.id).await.unwrap();
    let second = docs.create(&f.scope, f.invoice(40_000, 0)).await.unwrap();
    let second = docs.send(&f.scope, second.id).await.unwrap();

    let payment = pays
        .create(&f.scope, f.payment(100_000, PaymentDirection::Receivable))
        .await
        .unwrap();
    pays.allocate(&f.scope, payment.id, first.id, MinorUnits::new(60_000))
        .await
        .unwrap();
    pays.allocate(&f.scope, payment.id, second.id, MinorUnits::new(15_000))
        .await
        .unwrap();

    pays.delete(&f.scope, payment.id).await.unwrap();

    let first = f.documents().find_document(&f.scope, first.id).await.unwrap().unwrap();
    assert_eq!(first.status, DocumentStatus::Sent);
    assert_eq!(first.paid_amount, MinorUnits::ZERO);
    let second = f.documents().find_document(&f.scope, second.id).await.unwrap().unwrap();
    assert_eq!(second.status, DocumentStatus::Sent);

    let deleted = f.documents().find_payment(&f.scope, payment.id).await.unwrap().unwrap();
    assert!(deleted.deleted_at.is_some());
    assert!(deleted.allocations.is_empty());
    // A deleted payment no longer accepts allocations.
    let err = pays
        .allocate(&f.scope, payment.id, first.id, MinorUnits::new(1))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_void_paid_invoice_reverses_posted_entry() {
    // AR 113000 / Revenue 100000 / Tax 13000, then void.
    let f = fixture();
    let docs = f.document_service();
    let pays = f.payment_service();

    let doc = docs.create(&f.scope, f.invoice(100_000, 13_000)).await.unwrap();
    let doc = docs.send(&f.scope, doc.id).await.unwrap();
    let DocumentId::Invoice(invoice_id) = doc.id else {
        panic!("expected an invoice id");
    };
    let entry = f.post(
        d(2026, 3, 1),
        Some(SourceRef::Invoice(invoice_id)),
        &[
            (f.accounts.ar, 113_000, 0),
            (f.accounts.sales, 0, 100_000),
            (f.accounts.tax_payable, 0, 13_000),
        ],
    );

    let payment = pays
        .create(&f.scope, f.payment(113_000, PaymentDirection::Receivable))
        .await
        .unwrap();
    pays.allocate(&f.scope, payment.id, doc.id, MinorUnits::new(113_000))
        .await
        .unwrap();

    let voided = docs
        .void_document(&f.scope, doc.id, UserId::new(), "duplicate billing")
        .await
        .unwrap();
    assert_eq!(voided.status, DocumentStatus::Voided);
    // Paid amount is preserved as history.
    assert_eq!(voided.paid_amount, MinorUnits::new(113_000));

    let original = f
        .journal()
        .find_entry(&f.scope, entry.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(original.status, JournalEntryStatus::Voided);
    let reversal_id = original.reversed_by.expect("reversal link");
    let reversal = f
        .journal()
        .find_entry(&f.scope, reversal_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reversal.reverses, Some(entry.id));
    assert_eq!(reversal.lines[0].credit, MinorUnits::new(113_000));
    assert_eq!(reversal.lines[1].debit, MinorUnits::new(100_000));
    assert_eq!(reversal.lines[2].debit, MinorUnits::new(13_000));
    assert_eq!(f.store.audit_count(&f.scope).unwrap(), 1);
}

#[tokio::test]
async fn test_deleting_payment_leaves_voided_invoice_voided() {
    // Void keeps allocations in place, so the payment can still be deleted
    // afterwards; the rollback must not pull the document out of Voided.
    let f = fixture();
    let docs = f.document_service();
    let pays = f.payment_service();

    let doc = docs.create(&f.scope, f.invoice(100_000, 13_000)).await.unwrap();
    let doc = docs.send(&f.scope, doc.id).await.unwrap();
    let payment = pays
        .create(&f.scope, f.payment(113_000, PaymentDirection::Receivable))
        .await
        .unwrap();
    pays.allocate(&f.scope, payment.id, doc.id, MinorUnits::new(113_000))
        .await
        .unwrap();
    docs.void_document(&f.scope, doc.id, UserId::new(), "duplicate billing")
        .await
        .unwrap();

    pays.delete(&f.scope, payment.id).await.unwrap();

    let after = f.documents().find_document(&f.scope, doc.id).await.unwrap().unwrap();
    assert_eq!(after.status, DocumentStatus::Voided);
    assert_eq!(after.paid_amount, MinorUnits::ZERO);
    let deleted = f.documents().find_payment(&f.scope, payment.id).await.unwrap().unwrap();
    assert!(deleted.deleted_at.is_some());
    assert!(deleted.allocations.is_empty());
}

#[tokio::test]
async fn test_revoid_fails_and_creates_no_second_reversal() {
    let f = fixture();
    let journal = f.journal_service();

    let entry = f.post(
        d(2026, 3, 1),
        None,
        &[(f.accounts.cash, 100_000, 0), (f.accounts.sales, 0, 100_000)],
    );
    journal
        .void_entry(&f.scope, entry.id, UserId::new(), "posted twice")
        .await
        .unwrap();
    let count_after_first = f.store.entry_count(&f.scope).unwrap();

    let err = journal
        .void_entry(&f.scope, entry.id, UserId::new(), "posted twice")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "CONFLICT");
    assert_eq!(f.store.entry_count(&f.scope).unwrap(), count_after_first);
}

#[tokio::test]
async fn test_draft_and_cancelled_documents_are_not_voidable() {
    let f = fixture();
    let docs = f.document_service();

    let draft = docs.create(&f.scope, f.invoice(100_000, 0)).await.unwrap();
    let err = docs
        .void_document(&f.scope, draft.id, UserId::new(), "oops")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "CONFLICT");

    let cancelled = docs.cancel(&f.scope, draft.id).await.unwrap();
    assert_eq!(cancelled.status, DocumentStatus::Cancelled);
    let err = docs
        .void_document(&f.scope, cancelled.id, UserId::new(), "oops")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "CONFLICT");
}

#[tokio::test]
async fn test_cross_tenant_document_reads_as_not_found() {
    let f = fixture();
    let docs = f.document_service();
    let doc = docs.create(&f.scope, f.invoice(100_000, 0)).await.unwrap();

    let other = TenantScope::new(TenantId::new());
    let err = docs.send(&other, doc.id).await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_cross_tenant_party_reads_as_not_found() {
    let f = fixture();
    let other_fixture = fixture();
    let docs = f.document_service();

    // Party from another tenant: reported identically to an absent one.
    let mut doc = f.invoice(100_000, 0);
    doc.party_id = other_fixture.client_id;
    let err = docs.create(&f.scope, doc).await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_financial_edits_frozen_after_send() {
    let f = fixture();
    let docs = f.document_service();

    let doc = docs.create(&f.scope, f.invoice(100_000, 0)).await.unwrap();
    let doc = docs.send(&f.scope, doc.id).await.unwrap();

    let err = docs
        .update(
            &f.scope,
            doc.id,
            tally_core::documents::DocumentUpdate {
                memo: None,
                due_date: None,
                financial: Some(tally_core::documents::FinancialUpdate {
                    lines: doc.lines.clone(),
                    tax_amount: MinorUnits::new(5_000),
                }),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "CONFLICT");

    // Metadata edits stay legal after sending.
    let updated = docs
        .update(
            &f.scope,
            doc.id,
            tally_core::documents::DocumentUpdate {
                memo: Some("net 30".into()),
                due_date: None,
                financial: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.memo.as_deref(), Some("net 30"));
}
