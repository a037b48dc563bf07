//! Shared fixtures: a seeded tenant with a small chart of accounts.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use tally_core::documents::types::{DocumentKind, DocumentLine, NewDocument};
use tally_core::documents::DocumentService;
use tally_core::journal::JournalService;
use tally_core::ledger::types::{AccountType, GlAccountRecord};
use tally_core::payments::types::{NewPayment, PaymentDirection};
use tally_core::payments::PaymentService;
use tally_core::reports::ReportService;
use tally_core::store::records::{
    EntityRecord, NewJournalEntry, NewJournalLine, PartyKind, PartyRecord, SourceRef,
};
use tally_core::store::scope::TenantScope;
use tally_core::store::traits::{DocumentStore, EntityStore, JournalStore, ReportCache};
use tally_shared::config::{LedgerConfig, ReportCacheConfig};
use tally_shared::types::{EntityId, GlAccountId, MinorUnits, PartyId, TenantId};
use tally_store::{MemoryStore, MokaReportCache};

pub struct Accounts {
    pub cash: GlAccountId,
    pub ar: GlAccountId,
    pub equipment: GlAccountId,
    pub ap: GlAccountId,
    pub tax_payable: GlAccountId,
    pub loan: GlAccountId,
    pub capital: GlAccountId,
    pub retained: GlAccountId,
    pub sales: GlAccountId,
    pub rent: GlAccountId,
}

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MokaReportCache>,
    pub scope: TenantScope,
    pub entity_id: EntityId,
    pub client_id: PartyId,
    pub vendor_id: PartyId,
    pub accounts: Accounts,
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn account(
    entity_id: EntityId,
    code: &str,
    name: &str,
    account_type: AccountType,
    is_cash: bool,
) -> GlAccountRecord {
    GlAccountRecord {
        id: GlAccountId::new(),
        entity_id,
        code: code.into(),
        name: name.into(),
        account_type,
        is_cash_account: is_cash,
    }
}

pub fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(MokaReportCache::new(&ReportCacheConfig::default()));
    let scope = TenantScope::new(TenantId::new());

    let entity_id = EntityId::new();
    store
        .insert_entity(
            &scope,
            EntityRecord {
                id: entity_id,
                name: "Acme".into(),
                functional_currency: "USD".into(),
                fiscal_year_start_month: 1,
            },
        )
        .unwrap();

    let client_id = PartyId::new();
    store
        .insert_party(
            &scope,
            PartyRecord {
                id: client_id,
                entity_id,
                kind: PartyKind::Client,
                name: "Globex".into(),
            },
        )
        .unwrap();
    let vendor_id = PartyId::new();
    store
        .insert_party(
            &scope,
            PartyRecord {
                id: vendor_id,
                entity_id,
                kind: PartyKind::Vendor,
                name: "Initech".into(),
            },
        )
        .unwrap();

    let accounts = Accounts {
        cash: seed(&store, &scope, account(entity_id, "1000", "Cash", AccountType::Asset, true)),
        ar: seed(
            &store,
            &scope,
            account(entity_id, "1100", "Accounts Receivable", AccountType::Asset, false),
        ),
        equipment: seed(
            &store,
            &scope,
            account(entity_id, "1500", "Equipment", AccountType::Asset, false),
        ),
        ap: seed(
            &store,
            &scope,
            account(entity_id, "2000", "Accounts Payable", AccountType::Liability, false),
        ),
        tax_payable: seed(
            &store,
            &scope,
            account(entity_id, "2100", "Tax Payable", AccountType::Liability, false),
        ),
        loan: seed(
            &store,
            &scope,
            account(entity_id, "2500", "Loan Payable", AccountType::Liability, false),
        ),
        capital: seed(
            &store,
            &scope,
            account(entity_id, "3000", "Capital", AccountType::Equity, false),
        ),
        retained: seed(
            &store,
            &scope,
            account(entity_id, "3900", "Retained Earnings", AccountType::Equity, false),
        ),
        sales: seed(
            &store,
            &scope,
            account(entity_id, "4000", "Sales", AccountType::Revenue, false),
        ),
        rent: seed(
            &store,
            &scope,
            account(entity_id, "5000", "Rent", AccountType::Expense, false),
        ),
    };

    Fixture {
        store,
        cache,
        scope,
        entity_id,
        client_id,
        vendor_id,
        accounts,
    }
}

fn seed(store: &MemoryStore, scope: &TenantScope, account: GlAccountRecord) -> GlAccountId {
    let id = account.id;
    store.insert_account(scope, account).unwrap();
    id
}

impl Fixture {
    pub fn journal(&self) -> Arc<dyn JournalStore> {
        self.store.clone()
    }

    pub fn entities(&self) -> Arc<dyn EntityStore> {
        self.store.clone()
    }

    pub fn documents(&self) -> Arc<dyn DocumentStore> {
        self.store.clone()
    }

    pub fn report_cache(&self) -> Arc<dyn ReportCache> {
        self.cache.clone()
    }

    pub fn report_service(&self) -> ReportService {
        ReportService::new(
            self.journal(),
            self.entities(),
            self.report_cache(),
            LedgerConfig::default(),
        )
    }

    pub fn journal_service(&self) -> JournalService {
        JournalService::new(self.journal(), self.report_cache())
    }

    pub fn document_service(&self) -> DocumentService {
        DocumentService::new(
            self.documents(),
            self.journal(),
            self.entities(),
            self.report_cache(),
        )
    }

    pub fn payment_service(&self) -> PaymentService {
        PaymentService::new(self.documents(), self.report_cache())
    }

    /// Posts a balanced entry: `(account, debit, credit)` per line.
    pub fn post(
        &self,
        date: NaiveDate,
        source: Option<SourceRef>,
        lines: &[(GlAccountId, i64, i64)],
    ) -> tally_core::store::records::JournalEntryRecord {
        self.store
            .post_entry(
                &self.scope,
                NewJournalEntry {
                    entity_id: self.entity_id,
                    date,
                    memo: None,
                    source,
                    reverses: None,
                    lines: lines
                        .iter()
                        .map(|&(account_id, debit, credit)| NewJournalLine {
                            account_id,
                            debit: MinorUnits::new(debit),
                            credit: MinorUnits::new(credit),
                            exchange_rate: Decimal::ONE,
                            memo: None,
                        })
                        .collect(),
                },
            )
            .unwrap()
    }

    /// A payment for the fixture client or vendor.
    pub fn payment(&self, amount: i64, direction: PaymentDirection) -> NewPayment {
        NewPayment {
            entity_id: self.entity_id,
            party_id: match direction {
                PaymentDirection::Receivable => self.client_id,
                PaymentDirection::Payable => self.vendor_id,
            },
            direction,
            date: d(2026, 3, 10),
            amount: MinorUnits::new(amount),
            memo: None,
        }
    }

    /// A draft invoice for the fixture client.
    pub fn invoice(&self, subtotal: i64, tax: i64) -> NewDocument {
        NewDocument {
            kind: DocumentKind::Invoice,
            entity_id: self.entity_id,
            party_id: self.client_id,
            number: "INV-1".into(),
            issue_date: d(2026, 3, 1),
            due_date: Some(d(2026, 3, 31)),
            subtotal: MinorUnits::new(subtotal),
            tax_amount: MinorUnits::new(tax),
            total: MinorUnits::new(subtotal + tax),
            memo: None,
            lines: vec![DocumentLine {
                description: "Consulting".into(),
                amount: MinorUnits::new(subtotal),
            }],
        }
    }
}
