//! Property tests for the payment-application rules.

use chrono::NaiveDate;
use proptest::prelude::*;
use tally_shared::types::{EntityId, InvoiceId, MinorUnits, PartyId};

use super::lifecycle::{apply_payment, reverse_payment};
use super::types::{Document, DocumentId, DocumentLine, DocumentStatus};

fn document(total: i64, paid: i64) -> Document {
    let status = if paid == 0 {
        DocumentStatus::Sent
    } else if paid == total {
        DocumentStatus::Paid
    } else {
        DocumentStatus::PartiallyPaid
    };
    Document {
        id: DocumentId::Invoice(InvoiceId::new()),
        entity_id: EntityId::new(),
        party_id: PartyId::new(),
        number: "INV-1".into(),
        issue_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        due_date: None,
        subtotal: MinorUnits::new(total),
        tax_amount: MinorUnits::ZERO,
        total: MinorUnits::new(total),
        paid_amount: MinorUnits::new(paid),
        status,
        memo: None,
        lines: vec![DocumentLine {
            description: "Line".into(),
            amount: MinorUnits::new(total),
        }],
        deleted_at: None,
    }
}

proptest! {
    /// Applying then reversing the same amount restores the paid amount and
    /// status.
    #[test]
    fn prop_apply_then_reverse_round_trips(
        total in 1i64..1_000_000_000,
        paid_ratio in 0u8..=100,
        amount_ratio in 1u8..=100,
    ) {
        let paid = total * i64::from(paid_ratio) / 100;
        let doc = document(total, paid);
        let outstanding = total - paid;
        let amount = (outstanding * i64::from(amount_ratio) / 100).max(1);
        prop_assume!(amount <= outstanding);

        let applied = apply_payment(&doc, MinorUnits::new(amount)).unwrap();
        let mut after = doc.clone();
        after.paid_amount = applied.amount_paid;
        after.status = applied.status;

        let reversed = reverse_payment(&after, MinorUnits::new(amount)).unwrap();
        prop_assert_eq!(reversed.amount_paid, doc.paid_amount);
        let expected_status = if doc.paid_amount.is_zero() {
            DocumentStatus::Sent
        } else {
            DocumentStatus::PartiallyPaid
        };
        prop_assert_eq!(reversed.status, expected_status);
    }

    /// Paid amount never exceeds the total, whatever is applied.
    #[test]
    fn prop_paid_amount_never_exceeds_total(
        total in 1i64..1_000_000_000,
        paid_ratio in 0u8..=100,
        amount in 1i64..2_000_000_000,
    ) {
        let paid = total * i64::from(paid_ratio) / 100;
        let doc = document(total, paid);
        if let Ok(patch) = apply_payment(&doc, MinorUnits::new(amount)) {
            prop_assert!(patch.amount_paid <= doc.total);
        }
    }
}
