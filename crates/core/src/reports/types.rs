//! Report value objects.
//!
//! Reports are never persisted: each is a pure function of journal state at
//! query time, so the whole value is safe to cache and serialize. All
//! monetary fields are integer minor-currency units.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_shared::types::{EntityId, GlAccountId, JournalLineId, MinorUnits};

use crate::ledger::types::AccountType;

/// Whether a report invariant holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The invariant holds.
    Ok,
    /// The invariant is violated; the books are inconsistent.
    Critical,
}

/// One line item of a report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// The account.
    pub account_id: GlAccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Signed amount in minor units.
    pub amount: MinorUnits,
}

/// A titled group of rows with its total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Line items, ordered by account code.
    pub rows: Vec<ReportRow>,
    /// Sum of row amounts.
    pub total: MinorUnits,
}

impl Section {
    /// An empty section with a zero total.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total: MinorUnits::ZERO,
        }
    }
}

/// One row of a trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// The account.
    pub account_id: GlAccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Cumulative debits.
    pub debit: MinorUnits,
    /// Cumulative credits.
    pub credit: MinorUnits,
}

/// Per-account cumulative debits and credits as of a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// The entity reported on.
    pub entity_id: EntityId,
    /// Entity display name.
    pub entity_name: String,
    /// Reporting currency (ISO 4217).
    pub currency: String,
    /// As-of date.
    pub as_of: NaiveDate,
    /// Rows ordered by account code.
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of all debits.
    pub total_debits: MinorUnits,
    /// Sum of all credits.
    pub total_credits: MinorUnits,
    /// Exact equality of the two totals; a 1-cent mismatch is unbalanced.
    pub is_balanced: bool,
    /// `Ok` when balanced, `Critical` otherwise.
    pub severity: Severity,
}

/// Revenue and expenses over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitAndLoss {
    /// The entity, or `None` for consolidation.
    pub entity_id: Option<EntityId>,
    /// Entity display name ("Consolidated" for multi-entity scopes).
    pub entity_name: String,
    /// Reporting currency (ISO 4217).
    pub currency: String,
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period.
    pub end: NaiveDate,
    /// Revenue accounts.
    pub revenue: Section,
    /// Expense accounts.
    pub expenses: Section,
    /// `revenue.total - expenses.total`; negative for a net loss.
    pub net_income: MinorUnits,
}

/// Retained-earnings breakdown on the balance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetainedEarnings {
    /// Balance of the reserved prior-years equity account (0 if absent).
    pub prior_years: MinorUnits,
    /// Fiscal-year-scoped revenue minus expenses through the as-of date.
    pub current_year: MinorUnits,
    /// `prior_years + current_year`.
    pub total: MinorUnits,
}

/// Assets, liabilities, and equity as of a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// The entity, or `None` for consolidation.
    pub entity_id: Option<EntityId>,
    /// Entity display name.
    pub entity_name: String,
    /// Reporting currency (ISO 4217).
    pub currency: String,
    /// As-of date.
    pub as_of: NaiveDate,
    /// Asset accounts.
    pub assets: Section,
    /// Liability accounts.
    pub liabilities: Section,
    /// Equity accounts (includes the prior-years retained-earnings account).
    pub equity: Section,
    /// Retained-earnings breakdown.
    pub retained_earnings: RetainedEarnings,
    /// Sum of asset balances.
    pub total_assets: MinorUnits,
    /// Liabilities plus equity plus current-year income (added once; it is
    /// excluded from equity sums until a year-end close).
    pub total_liabilities_and_equity: MinorUnits,
    /// Exact accounting-equation check.
    pub is_balanced: bool,
    /// `Ok` when balanced, `Critical` otherwise.
    pub severity: Severity,
}

/// Cash-flow activity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashFlowBucket {
    /// Day-to-day activity; also receives unclassifiable accounts.
    Operating,
    /// Long-term asset movements.
    Investing,
    /// Debt and equity movements.
    Financing,
}

/// Indirect-method cash-flow statement over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlow {
    /// The entity, or `None` for consolidation.
    pub entity_id: Option<EntityId>,
    /// Entity display name.
    pub entity_name: String,
    /// Reporting currency (ISO 4217).
    pub currency: String,
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period.
    pub end: NaiveDate,
    /// Net income from the profit-and-loss generator.
    pub net_income: MinorUnits,
    /// Cash balance strictly before the period start.
    pub opening_cash: MinorUnits,
    /// Cash balance through the period end.
    pub closing_cash: MinorUnits,
    /// Net income plus operating impacts.
    pub operating: Section,
    /// Investing impacts.
    pub investing: Section,
    /// Financing impacts.
    pub financing: Section,
    /// Sum of the three bucket totals.
    pub net_cash_change: MinorUnits,
    /// Advisory: `opening_cash + net_cash_change == closing_cash`. A false
    /// value is reported, never enforced; non-cash adjustments outside this
    /// model can legitimately cause divergence.
    pub is_reconciled: bool,
}

/// One row of the paginated general-ledger drill-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlLedgerRow {
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
    /// Running balance after this line, seeded by the opening balance.
    pub running_balance: MinorUnits,
}

/// Paginated single-account ledger with running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlLedger {
    /// The entity reported on.
    pub entity_id: EntityId,
    /// Entity display name.
    pub entity_name: String,
    /// Reporting currency (ISO 4217).
    pub currency: String,
    /// The account.
    pub account_id: GlAccountId,
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
    /// Signed cumulative balance strictly before the window start.
    pub opening_balance: MinorUnits,
    /// Window rows ordered by (date, line id).
    pub rows: Vec<GlLedgerRow>,
    /// Cursor for the next page; `None` on a partial (final) page.
    pub next_cursor: Option<JournalLineId>,
}

/// Any financial statement, as cached and returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Report {
    /// Per-account cumulative debit/credit as of a date.
    TrialBalance(TrialBalance),
    /// Revenue and expenses over a period.
    ProfitAndLoss(ProfitAndLoss),
    /// Assets, liabilities, and equity as of a date.
    BalanceSheet(BalanceSheet),
    /// Indirect-method cash movements over a period.
    CashFlow(CashFlow),
    /// Paginated single-account drill-down.
    GlLedger(GlLedger),
}

impl Report {
    /// Stable kind tag, used in cache keys.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TrialBalance(_) => "trial_balance",
            Self::ProfitAndLoss(_) => "profit_and_loss",
            Self::BalanceSheet(_) => "balance_sheet",
            Self::CashFlow(_) => "cash_flow",
            Self::GlLedger(_) => "gl_ledger",
        }
    }
}
