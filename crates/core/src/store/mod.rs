//! Collaborator traits for the journal store and report cache.
//!
//! The engine never reaches these collaborators through process-wide
//! singletons; they are injected per service. Every call takes a
//! [`TenantScope`], so a query that is not tenant-filtered cannot be
//! expressed at all.

pub mod records;
pub mod scope;
pub mod traits;

pub use records::{
    AuditRecord, EntityRecord, FiscalCalendarRecord, JournalEntryRecord, JournalEntryStatus,
    JournalLineRecord, LedgerLineRow, LedgerWindowPage, NewJournalEntry, NewJournalLine,
    PartyKind, PartyRecord, PreparedReversal, SourceRef,
};
pub use scope::TenantScope;
pub use traits::{DocumentPatch, DocumentStore, EntityStore, JournalStore, ReportCache};
