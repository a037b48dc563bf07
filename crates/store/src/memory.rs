//! In-memory store backend.
//!
//! All state lives behind a single mutex, so every compound trait method
//! (reversal commit, document void, allocation commit, payment deletion)
//! runs all-or-nothing: validation happens before the first mutation, and
//! no other caller can observe an intermediate state.
//!
//! Tenant isolation is structural twice over: the traits require a
//! [`TenantScope`], and every map is keyed by tenant id, so a lookup cannot
//! reach another tenant's rows by construction.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tally_shared::error::{CoreError, CoreResult};
use tally_shared::types::{
    AllocationId, BillId, EntityId, GlAccountId, InvoiceId, JournalEntryId, JournalLineId,
    MinorUnits, PartyId, PaymentId, TenantId,
};

use tally_core::documents::types::{Document, DocumentId, DocumentKind, DocumentStatus, NewDocument};
use tally_core::ledger::types::{
    AccountAggregate, AggregateQuery, DateFilter, FiscalYearAggregate, FiscalYearQuery,
    GlAccountRecord,
};
use tally_core::payments::types::{NewPayment, Payment, PaymentAllocation};
use tally_core::store::records::{
    AuditRecord, EntityRecord, FiscalCalendarRecord, JournalEntryRecord, JournalEntryStatus,
    JournalLineRecord, LedgerLineRow, LedgerWindowPage, NewJournalEntry, PartyRecord,
    PreparedReversal, SourceRef,
};
use tally_core::store::scope::TenantScope;
use tally_core::store::traits::{DocumentPatch, DocumentStore, EntityStore, JournalStore};

#[derive(Default)]
struct State {
    entities: HashMap<(TenantId, EntityId), EntityRecord>,
    calendars: HashMap<(TenantId, EntityId, i32), FiscalCalendarRecord>,
    parties: HashMap<(TenantId, PartyId), PartyRecord>,
    accounts: HashMap<(TenantId, GlAccountId), GlAccountRecord>,
    entries: HashMap<(TenantId, JournalEntryId), JournalEntryRecord>,
    documents: HashMap<(TenantId, DocumentId), Document>,
    payments: HashMap<(TenantId, PaymentId), Payment>,
    audits: Vec<(TenantId, AuditRecord)>,
    entry_seq: u64,
}

/// In-memory backend implementing every store trait.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CoreResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| CoreError::Store("store mutex poisoned".into()))
    }

    /// Seeds an entity.
    pub fn insert_entity(&self, scope: &TenantScope, entity: EntityRecord) -> CoreResult<()> {
        let mut state = self.lock()?;
        state.entities.insert((scope.tenant_id(), entity.id), entity);
        Ok(())
    }

    /// Seeds an explicit fiscal calendar.
    pub fn insert_fiscal_calendar(
        &self,
        scope: &TenantScope,
        calendar: FiscalCalendarRecord,
    ) -> CoreResult<()> {
        let mut state = self.lock()?;
        state.calendars.insert(
            (scope.tenant_id(), calendar.entity_id, calendar.calendar_year),
            calendar,
        );
        Ok(())
    }

    /// Seeds a client or vendor.
    pub fn insert_party(&self, scope: &TenantScope, party: PartyRecord) -> CoreResult<()> {
        let mut state = self.lock()?;
        state.parties.insert((scope.tenant_id(), party.id), party);
        Ok(())
    }

    /// Seeds a GL account.
    pub fn insert_account(&self, scope: &TenantScope, account: GlAccountRecord) -> CoreResult<()> {
        let mut state = self.lock()?;
        state.accounts.insert((scope.tenant_id(), account.id), account);
        Ok(())
    }

    /// Posts a balanced journal entry.
    ///
    /// Document posting proper lives upstream; this exists so tests and
    /// fixtures can put journal state in place. The entry must balance.
    pub fn post_entry(
        &self,
        scope: &TenantScope,
        entry: NewJournalEntry,
    ) -> CoreResult<JournalEntryRecord> {
        let debit: i128 = entry.lines.iter().map(|l| l.debit.widen()).sum();
        let credit: i128 = entry.lines.iter().map(|l| l.credit.widen()).sum();
        if debit != credit {
            return Err(CoreError::validation(format!(
                "entry does not balance: debits {debit}, credits {credit}"
            )));
        }
        let mut state = self.lock()?;
        state.materialize_entry(scope.tenant_id(), entry)
    }

    /// Number of audit records written for the tenant.
    pub fn audit_count(&self, scope: &TenantScope) -> CoreResult<usize> {
        let state = self.lock()?;
        let tenant = scope.tenant_id();
        Ok(state.audits.iter().filter(|(t, _)| *t == tenant).count())
    }

    /// Number of journal entries stored for the tenant.
    pub fn entry_count(&self, scope: &TenantScope) -> CoreResult<usize> {
        let state = self.lock()?;
        let tenant = scope.tenant_id();
        Ok(state.entries.keys().filter(|(t, _)| *t == tenant).count())
    }
}

impl State {
    fn materialize_entry(
        &mut self,
        tenant: TenantId,
        entry: NewJournalEntry,
    ) -> CoreResult<JournalEntryRecord> {
        if entry.lines.is_empty() {
            return Err(CoreError::validation("journal entry has no lines"));
        }
        self.entry_seq += 1;
        let record = JournalEntryRecord {
            id: JournalEntryId::new(),
            entity_id: entry.entity_id,
            date: entry.date,
            entry_number: format!("JE-{}", self.entry_seq),
            memo: entry.memo,
            status: JournalEntryStatus::Posted,
            source: entry.source,
            reverses: entry.reverses,
            reversed_by: None,
            lines: entry
                .lines
                .into_iter()
                .map(|line| JournalLineRecord {
                    id: JournalLineId::new(),
                    account_id: line.account_id,
                    debit: line.debit,
                    credit: line.credit,
                    exchange_rate: line.exchange_rate,
                    memo: line.memo,
                    deleted_at: None,
                })
                .collect(),
        };
        self.entries.insert((tenant, record.id), record.clone());
        Ok(record)
    }

    fn commit_reversal_locked(
        &mut self,
        tenant: TenantId,
        reversal: PreparedReversal,
    ) -> CoreResult<JournalEntryRecord> {
        let original = self
            .entries
            .get(&(tenant, reversal.original_id))
            .ok_or_else(|| {
                CoreError::not_found(format!("journal entry {}", reversal.original_id))
            })?;
        // Re-validated under the lock: the guard in the pure protocol ran
        // against a possibly stale read.
        if original.status == JournalEntryStatus::Voided || original.reversed_by.is_some() {
            return Err(CoreError::conflict(format!(
                "entry {} is already voided",
                reversal.original_id
            )));
        }

        let original_id = reversal.original_id;
        let record = self.materialize_entry(tenant, reversal.reversing)?;
        if let Some(original) = self.entries.get_mut(&(tenant, original_id)) {
            original.status = JournalEntryStatus::Voided;
            original.reversed_by = Some(record.id);
        }
        Ok(record)
    }

    fn apply_patch(&mut self, tenant: TenantId, patch: &DocumentPatch) -> CoreResult<()> {
        let doc = self
            .documents
            .get_mut(&(tenant, patch.document_id))
            .ok_or_else(|| CoreError::not_found(format!("{}", patch.document_id)))?;
        doc.status = patch.status;
        doc.paid_amount = patch.amount_paid;
        Ok(())
    }

    fn account(&self, tenant: TenantId, id: GlAccountId) -> CoreResult<&GlAccountRecord> {
        self.accounts
            .get(&(tenant, id))
            .ok_or_else(|| CoreError::Store(format!("line references unknown account {id}")))
    }
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn aggregate(
        &self,
        scope: &TenantScope,
        query: AggregateQuery,
    ) -> CoreResult<Vec<AccountAggregate>> {
        let state = self.lock()?;
        let tenant = scope.tenant_id();

        let mut sums: BTreeMap<GlAccountId, (i128, i128)> = BTreeMap::new();
        for ((entry_tenant, _), entry) in &state.entries {
            if *entry_tenant != tenant
                || entry.status != JournalEntryStatus::Posted
                || !query.entity_ids.contains(&entry.entity_id)
                || !query.date.contains(entry.date)
            {
                continue;
            }
            for line in entry.live_lines() {
                let account = state.account(tenant, line.account_id)?;
                if let Some(types) = &query.account_types
                    && !types.contains(&account.account_type)
                {
                    continue;
                }
                let slot = sums.entry(line.account_id).or_insert((0, 0));
                slot.0 += line.debit.widen();
                slot.1 += line.credit.widen();
            }
        }

        let mut rows = Vec::with_capacity(sums.len());
        for (account_id, (total_debit, total_credit)) in sums {
            let account = state.account(tenant, account_id)?;
            rows.push(AccountAggregate {
                account_id,
                code: account.code.clone(),
                name: account.name.clone(),
                account_type: account.account_type,
                is_cash_account: account.is_cash_account,
                total_debit,
                total_credit,
            });
        }
        rows.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(rows)
    }

    async fn aggregate_with_fiscal_year(
        &self,
        scope: &TenantScope,
        query: FiscalYearQuery,
    ) -> CoreResult<Vec<FiscalYearAggregate>> {
        let state = self.lock()?;
        let tenant = scope.tenant_id();
        let fiscal_starts: HashMap<EntityId, chrono::NaiveDate> =
            query.fiscal_starts.iter().copied().collect();

        let mut sums: BTreeMap<GlAccountId, (i128, i128, i128, i128)> = BTreeMap::new();
        for ((entry_tenant, _), entry) in &state.entries {
            let Some(fiscal_start) = fiscal_starts.get(&entry.entity_id) else {
                continue;
            };
            if *entry_tenant != tenant
                || entry.status != JournalEntryStatus::Posted
                || entry.date > query.as_of
            {
                continue;
            }
            let in_fiscal_year = entry.date >= *fiscal_start;
            for line in entry.live_lines() {
                let slot = sums.entry(line.account_id).or_insert((0, 0, 0, 0));
                slot.0 += line.debit.widen();
                slot.1 += line.credit.widen();
                if in_fiscal_year {
                    slot.2 += line.debit.widen();
                    slot.3 += line.credit.widen();
                }
            }
        }

        let mut rows = Vec::with_capacity(sums.len());
        for (account_id, (total_debit, total_credit, cy_debit, cy_credit)) in sums {
            let account = state.account(tenant, account_id)?;
            rows.push(FiscalYearAggregate {
                account_id,
                code: account.code.clone(),
                name: account.name.clone(),
                account_type: account.account_type,
                is_cash_account: account.is_cash_account,
                total_debit,
                total_credit,
                current_year_debit: cy_debit,
                current_year_credit: cy_credit,
            });
        }
        rows.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(rows)
    }

    async fn windowed_lines(
        &self,
        scope: &TenantScope,
        account_id: GlAccountId,
        date: DateFilter,
        after: Option<JournalLineId>,
        limit: u32,
    ) -> CoreResult<LedgerWindowPage> {
        let state = self.lock()?;
        let tenant = scope.tenant_id();

        let mut rows = Vec::new();
        for ((entry_tenant, _), entry) in &state.entries {
            if *entry_tenant != tenant
                || entry.status != JournalEntryStatus::Posted
                || !date.contains(entry.date)
            {
                continue;
            }
            for line in entry.live_lines() {
                if line.account_id != account_id {
                    continue;
                }
                rows.push(LedgerLineRow {
                    id: line.id,
                    date: entry.date,
                    entry_number: entry.entry_number.clone(),
                    memo: line.memo.clone().or_else(|| entry.memo.clone()),
                    debit: line.debit,
                    credit: line.credit,
                });
            }
        }
        rows.sort_by(|a, b| (a.date, a.id).cmp(&(b.date, b.id)));

        let mut prior_debit: i128 = 0;
        let mut prior_credit: i128 = 0;
        if let Some(after) = after {
            let pos = rows
                .iter()
                .position(|r| r.id == after)
                .ok_or_else(|| CoreError::validation(format!("unknown cursor {after}")))?;
            for row in rows.drain(..=pos) {
                prior_debit += row.debit.widen();
                prior_credit += row.credit.widen();
            }
        }
        rows.truncate(limit as usize);
        Ok(LedgerWindowPage {
            rows,
            prior_debit,
            prior_credit,
        })
    }

    async fn find_entry(
        &self,
        scope: &TenantScope,
        id: JournalEntryId,
    ) -> CoreResult<Option<JournalEntryRecord>> {
        let state = self.lock()?;
        Ok(state.entries.get(&(scope.tenant_id(), id)).cloned())
    }

    async fn entries_for_source(
        &self,
        scope: &TenantScope,
        source: SourceRef,
    ) -> CoreResult<Vec<JournalEntryRecord>> {
        let state = self.lock()?;
        let tenant = scope.tenant_id();
        let mut entries: Vec<JournalEntryRecord> = state
            .entries
            .iter()
            .filter(|((t, _), entry)| *t == tenant && entry.source == Some(source))
            .map(|(_, entry)| entry.clone())
            .collect();
        entries.sort_by(|a, b| (a.date, a.id).cmp(&(b.date, b.id)));
        Ok(entries)
    }

    async fn commit_reversal(
        &self,
        scope: &TenantScope,
        reversal: PreparedReversal,
        audit: AuditRecord,
    ) -> CoreResult<JournalEntryRecord> {
        let mut state = self.lock()?;
        let tenant = scope.tenant_id();
        let record = state.commit_reversal_locked(tenant, reversal)?;
        state.audits.push((tenant, audit));
        Ok(record)
    }

    async fn find_account(
        &self,
        scope: &TenantScope,
        id: GlAccountId,
    ) -> CoreResult<Option<GlAccountRecord>> {
        let state = self.lock()?;
        Ok(state.accounts.get(&(scope.tenant_id(), id)).cloned())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn find_entity(
        &self,
        scope: &TenantScope,
        id: EntityId,
    ) -> CoreResult<Option<EntityRecord>> {
        let state = self.lock()?;
        Ok(state.entities.get(&(scope.tenant_id(), id)).cloned())
    }

    async fn entities_for_tenant(&self, scope: &TenantScope) -> CoreResult<Vec<EntityRecord>> {
        let state = self.lock()?;
        let tenant = scope.tenant_id();
        let mut entities: Vec<EntityRecord> = state
            .entities
            .iter()
            .filter(|((t, _), _)| *t == tenant)
            .map(|(_, entity)| entity.clone())
            .collect();
        entities.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entities)
    }

    async fn find_fiscal_calendar(
        &self,
        scope: &TenantScope,
        entity_id: EntityId,
        calendar_year: i32,
    ) -> CoreResult<Option<FiscalCalendarRecord>> {
        let state = self.lock()?;
        Ok(state
            .calendars
            .get(&(scope.tenant_id(), entity_id, calendar_year))
            .cloned())
    }

    async fn find_party(
        &self,
        scope: &TenantScope,
        id: PartyId,
    ) -> CoreResult<Option<PartyRecord>> {
        let state = self.lock()?;
        Ok(state.parties.get(&(scope.tenant_id(), id)).cloned())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_document(
        &self,
        scope: &TenantScope,
        id: DocumentId,
    ) -> CoreResult<Option<Document>> {
        let state = self.lock()?;
        Ok(state.documents.get(&(scope.tenant_id(), id)).cloned())
    }

    async fn insert_document(
        &self,
        scope: &TenantScope,
        doc: NewDocument,
    ) -> CoreResult<Document> {
        let mut state = self.lock()?;
        let id = match doc.kind {
            DocumentKind::Invoice => DocumentId::Invoice(InvoiceId::new()),
            DocumentKind::Bill => DocumentId::Bill(BillId::new()),
        };
        let document = Document {
            id,
            entity_id: doc.entity_id,
            party_id: doc.party_id,
            number: doc.number,
            issue_date: doc.issue_date,
            due_date: doc.due_date,
            subtotal: doc.subtotal,
            tax_amount: doc.tax_amount,
            total: doc.total,
            paid_amount: MinorUnits::ZERO,
            status: DocumentStatus::Draft,
            memo: doc.memo,
            lines: doc.lines,
            deleted_at: None,
        };
        state
            .documents
            .insert((scope.tenant_id(), id), document.clone());
        Ok(document)
    }

    async fn update_document(&self, scope: &TenantScope, doc: Document) -> CoreResult<Document> {
        let mut state = self.lock()?;
        let key = (scope.tenant_id(), doc.id);
        if !state.documents.contains_key(&key) {
            return Err(CoreError::not_found(format!("{}", doc.id)));
        }
        state.documents.insert(key, doc.clone());
        Ok(doc)
    }

    async fn delete_document(&self, scope: &TenantScope, id: DocumentId) -> CoreResult<()> {
        let mut state = self.lock()?;
        let doc = state
            .documents
            .get_mut(&(scope.tenant_id(), id))
            .ok_or_else(|| CoreError::not_found(format!("{id}")))?;
        doc.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn find_payment(
        &self,
        scope: &TenantScope,
        id: PaymentId,
    ) -> CoreResult<Option<Payment>> {
        let state = self.lock()?;
        Ok(state.payments.get(&(scope.tenant_id(), id)).cloned())
    }

    async fn insert_payment(
        &self,
        scope: &TenantScope,
        payment: NewPayment,
    ) -> CoreResult<Payment> {
        let mut state = self.lock()?;
        let record = Payment {
            id: PaymentId::new(),
            entity_id: payment.entity_id,
            party_id: payment.party_id,
            direction: payment.direction,
            date: payment.date,
            amount: payment.amount,
            memo: payment.memo,
            allocations: Vec::new(),
            deleted_at: None,
        };
        state
            .payments
            .insert((scope.tenant_id(), record.id), record.clone());
        Ok(record)
    }

    async fn commit_allocation(
        &self,
        scope: &TenantScope,
        allocation: PaymentAllocation,
        patch: DocumentPatch,
    ) -> CoreResult<()> {
        let mut state = self.lock()?;
        let tenant = scope.tenant_id();
        if !state.documents.contains_key(&(tenant, patch.document_id)) {
            return Err(CoreError::not_found(format!("{}", patch.document_id)));
        }
        let payment = state
            .payments
            .get_mut(&(tenant, allocation.payment_id))
            .ok_or_else(|| CoreError::not_found(format!("payment {}", allocation.payment_id)))?;
        payment.allocations.push(allocation);
        state.apply_patch(tenant, &patch)
    }

    async fn remove_allocation(
        &self,
        scope: &TenantScope,
        allocation_id: AllocationId,
        patch: DocumentPatch,
    ) -> CoreResult<()> {
        let mut state = self.lock()?;
        let tenant = scope.tenant_id();
        if !state.documents.contains_key(&(tenant, patch.document_id)) {
            return Err(CoreError::not_found(format!("{}", patch.document_id)));
        }
        let payment = state
            .payments
            .iter_mut()
            .filter(|((t, _), _)| *t == tenant)
            .map(|(_, p)| p)
            .find(|p| p.allocations.iter().any(|a| a.id == allocation_id))
            .ok_or_else(|| CoreError::not_found(format!("allocation {allocation_id}")))?;
        payment.allocations.retain(|a| a.id != allocation_id);
        state.apply_patch(tenant, &patch)
    }

    async fn void_document(
        &self,
        scope: &TenantScope,
        id: DocumentId,
        reversals: Vec<PreparedReversal>,
        audit: AuditRecord,
    ) -> CoreResult<Document> {
        let mut state = self.lock()?;
        let tenant = scope.tenant_id();
        if !state.documents.contains_key(&(tenant, id)) {
            return Err(CoreError::not_found(format!("{id}")));
        }
        // Validate every reversal before the first mutation so a failure
        // leaves nothing half-applied.
        for reversal in &reversals {
            let original = state
                .entries
                .get(&(tenant, reversal.original_id))
                .ok_or_else(|| {
                    CoreError::not_found(format!("journal entry {}", reversal.original_id))
                })?;
            if original.status == JournalEntryStatus::Voided || original.reversed_by.is_some() {
                return Err(CoreError::conflict(format!(
                    "entry {} is already voided",
                    reversal.original_id
                )));
            }
        }

        for reversal in reversals {
            state.commit_reversal_locked(tenant, reversal)?;
        }
        state.audits.push((tenant, audit));

        let doc = state
            .documents
            .get_mut(&(tenant, id))
            .ok_or_else(|| CoreError::not_found(format!("{id}")))?;
        doc.status = DocumentStatus::Voided;
        Ok(doc.clone())
    }

    async fn delete_payment(
        &self,
        scope: &TenantScope,
        id: PaymentId,
        patches: Vec<DocumentPatch>,
    ) -> CoreResult<()> {
        let mut state = self.lock()?;
        let tenant = scope.tenant_id();
        for patch in &patches {
            if !state.documents.contains_key(&(tenant, patch.document_id)) {
                return Err(CoreError::not_found(format!("{}", patch.document_id)));
            }
        }
        {
            let payment = state
                .payments
                .get_mut(&(tenant, id))
                .ok_or_else(|| CoreError::not_found(format!("payment {id}")))?;
            payment.allocations.clear();
            payment.deleted_at = Some(Utc::now());
        }
        for patch in &patches {
            state.apply_patch(tenant, patch)?;
        }
        Ok(())
    }
}
