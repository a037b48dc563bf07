//! Builds reversing entries for posted journal entries.

use tally_shared::error::{CoreError, CoreResult};

use crate::store::records::{
    JournalEntryRecord, JournalEntryStatus, NewJournalEntry, NewJournalLine, PreparedReversal,
};

/// Prepares the reversal of a posted entry.
///
/// Fails `CONFLICT` when the entry is already voided or a reversal already
/// links to it. The reversing entry carries one line per live original line
/// with debit and credit swapped, preserving the exchange rate, and is dated
/// on the original's posting date so period reports net to zero.
pub fn prepare_reversal(entry: &JournalEntryRecord) -> CoreResult<PreparedReversal> {
    if entry.status == JournalEntryStatus::Voided || entry.reversed_by.is_some() {
        return Err(CoreError::conflict(format!(
            "entry {} is already voided",
            entry.id
        )));
    }

    let lines = entry
        .live_lines()
        .map(|line| NewJournalLine {
            account_id: line.account_id,
            debit: line.credit,
            credit: line.debit,
            exchange_rate: line.exchange_rate,
            memo: line.memo.clone(),
        })
        .collect::<Vec<_>>();
    if lines.is_empty() {
        return Err(CoreError::validation(format!(
            "entry {} has no live lines to reverse",
            entry.id
        )));
    }

    Ok(PreparedReversal {
        original_id: entry.id,
        reversing: NewJournalEntry {
            entity_id: entry.entity_id,
            date: entry.date,
            memo: Some(format!("Reversal: {}", entry.entry_number)),
            source: None,
            reverses: Some(entry.id),
            lines,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tally_shared::types::{EntityId, GlAccountId, JournalEntryId, JournalLineId, MinorUnits};

    use crate::store::records::JournalLineRecord;

    fn line(debit: i64, credit: i64, rate: Decimal) -> JournalLineRecord {
        JournalLineRecord {
            id: JournalLineId::new(),
            account_id: GlAccountId::new(),
            debit: MinorUnits::new(debit),
            credit: MinorUnits::new(credit),
            exchange_rate: rate,
            memo: None,
            deleted_at: None,
        }
    }

    fn entry(lines: Vec<JournalLineRecord>) -> JournalEntryRecord {
        JournalEntryRecord {
            id: JournalEntryId::new(),
            entity_id: EntityId::new(),
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            entry_number: "JE-42".into(),
            memo: None,
            status: JournalEntryStatus::Posted,
            source: None,
            reverses: None,
            reversed_by: None,
            lines,
        }
    }

    #[test]
    fn test_lines_swap_and_preserve_rate() {
        // AR 113000 debit / revenue 100000 credit / tax 13000 credit.
        let original = entry(vec![
            line(113_000, 0, dec!(1)),
            line(0, 100_000, dec!(1.25)),
            line(0, 13_000, dec!(1)),
        ]);
        let prepared = prepare_reversal(&original).unwrap();

        assert_eq!(prepared.original_id, original.id);
        assert_eq!(prepared.reversing.reverses, Some(original.id));
        assert_eq!(prepared.reversing.lines.len(), 3);
        assert_eq!(prepared.reversing.lines[0].credit, MinorUnits::new(113_000));
        assert_eq!(prepared.reversing.lines[0].debit, MinorUnits::ZERO);
        assert_eq!(prepared.reversing.lines[1].debit, MinorUnits::new(100_000));
        assert_eq!(prepared.reversing.lines[1].exchange_rate, dec!(1.25));
        assert_eq!(prepared.reversing.lines[2].debit, MinorUnits::new(13_000));
    }

    #[test]
    fn test_reversal_memo_names_the_original() {
        let prepared = prepare_reversal(&entry(vec![line(100, 0, dec!(1))])).unwrap();
        assert_eq!(prepared.reversing.memo.as_deref(), Some("Reversal: JE-42"));
    }

    #[test]
    fn test_voided_entry_rejected() {
        let mut original = entry(vec![line(100, 0, dec!(1))]);
        original.status = JournalEntryStatus::Voided;
        let err = prepare_reversal(&original).unwrap_err();
        assert_eq!(err.error_code(), "CONFLICT");
    }

    #[test]
    fn test_linked_reversal_rejected_even_if_status_lagged() {
        let mut original = entry(vec![line(100, 0, dec!(1))]);
        original.reversed_by = Some(JournalEntryId::new());
        assert!(prepare_reversal(&original).is_err());
    }

    #[test]
    fn test_deleted_lines_are_skipped() {
        let mut deleted = line(0, 50, dec!(1));
        deleted.deleted_at = Some(Utc::now());
        let original = entry(vec![line(100, 0, dec!(1)), deleted]);
        let prepared = prepare_reversal(&original).unwrap();
        assert_eq!(prepared.reversing.lines.len(), 1);
    }

    #[test]
    fn test_all_lines_deleted_is_validation_error() {
        let mut deleted = line(100, 0, dec!(1));
        deleted.deleted_at = Some(Utc::now());
        let err = prepare_reversal(&entry(vec![deleted])).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION");
    }
}
