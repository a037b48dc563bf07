//! Statement construction from aggregated balances.
//!
//! Every function here is pure: given the same balances it produces the
//! same report, which is what makes the results safe to memoize.

use chrono::NaiveDate;
use tally_shared::error::{CoreError, CoreResult};
use tally_shared::types::{CursorPage, MinorUnits};

use super::types::{
    BalanceSheet, CashFlow, CashFlowBucket, GlLedger, GlLedgerRow, ProfitAndLoss, Report,
    ReportRow, RetainedEarnings, Section, Severity, TrialBalance, TrialBalanceRow,
};
use crate::ledger::engine::ReportScope;
use crate::ledger::types::{AccountBalance, AccountType, FiscalYearBalance, GlAccountRecord};
use crate::store::records::LedgerWindowPage;

/// Builds a trial balance from cumulative per-account sums.
///
/// Balance is exact equality of total debits and credits; there is no
/// tolerance, a 1-cent mismatch reports `Critical`.
pub fn trial_balance(
    scope: &ReportScope,
    as_of: NaiveDate,
    balances: Vec<AccountBalance>,
) -> CoreResult<TrialBalance> {
    let entity_id = scope
        .entity_id
        .ok_or_else(|| CoreError::validation("trial balance requires a single entity"))?;

    let mut rows = balances
        .into_iter()
        .map(|b| TrialBalanceRow {
            account_id: b.account_id,
            code: b.code,
            name: b.name,
            account_type: b.account_type,
            debit: b.total_debit,
            credit: b.total_credit,
        })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| a.code.cmp(&b.code));

    let total_debits = MinorUnits::total(rows.iter().map(|r| r.debit))?;
    let total_credits = MinorUnits::total(rows.iter().map(|r| r.credit))?;
    let is_balanced = total_debits == total_credits;

    Ok(TrialBalance {
        entity_id,
        entity_name: scope.entity_name.clone(),
        currency: scope.currency.clone(),
        as_of,
        rows,
        total_debits,
        total_credits,
        is_balanced,
        severity: if is_balanced {
            Severity::Ok
        } else {
            Severity::Critical
        },
    })
}

/// Builds a profit-and-loss statement from period revenue/expense sums.
///
/// Zero activity yields zero totals, not an error; net income may be
/// negative.
pub fn profit_and_loss(
    scope: &ReportScope,
    start: NaiveDate,
    end: NaiveDate,
    balances: Vec<AccountBalance>,
) -> CoreResult<ProfitAndLoss> {
    let mut revenue_rows = Vec::new();
    let mut expense_rows = Vec::new();
    for balance in balances {
        let row = report_row(&balance);
        match balance.account_type {
            AccountType::Revenue => revenue_rows.push(row),
            AccountType::Expense => expense_rows.push(row),
            _ => {}
        }
    }
    let revenue = section(revenue_rows)?;
    let expenses = section(expense_rows)?;
    let net_income = revenue.total.checked_sub(expenses.total)?;

    Ok(ProfitAndLoss {
        entity_id: scope.entity_id,
        entity_name: scope.entity_name.clone(),
        currency: scope.currency.clone(),
        start,
        end,
        revenue,
        expenses,
        net_income,
    })
}

/// Builds a balance sheet from cumulative sums with fiscal-year columns.
///
/// Current-year income is excluded from equity sums until a year-end close,
/// so it is added to the liabilities-and-equity side exactly once, via the
/// retained-earnings breakdown.
pub fn balance_sheet(
    scope: &ReportScope,
    as_of: NaiveDate,
    balances: Vec<FiscalYearBalance>,
    retained_earnings_code: &str,
) -> CoreResult<BalanceSheet> {
    let mut asset_rows = Vec::new();
    let mut liability_rows = Vec::new();
    let mut equity_rows = Vec::new();
    let mut prior_years = MinorUnits::ZERO;
    let mut current_year_wide: i128 = 0;

    for balance in &balances {
        let row = report_row(&balance.cumulative);
        match balance.cumulative.account_type {
            AccountType::Asset => asset_rows.push(row),
            AccountType::Liability => liability_rows.push(row),
            AccountType::Equity => {
                // Consolidated scopes can carry one such account per entity.
                if balance.cumulative.code == retained_earnings_code {
                    prior_years = prior_years.checked_add(balance.cumulative.balance)?;
                }
                equity_rows.push(row);
            }
            AccountType::Revenue => current_year_wide += balance.current_year_balance.widen(),
            AccountType::Expense => current_year_wide -= balance.current_year_balance.widen(),
        }
    }
    let current_year = MinorUnits::from_accumulated(current_year_wide)?;

    let assets = section(asset_rows)?;
    let liabilities = section(liability_rows)?;
    let equity = section(equity_rows)?;

    let total_assets = assets.total;
    let total_liabilities_and_equity = MinorUnits::from_accumulated(
        liabilities.total.widen() + equity.total.widen() + current_year.widen(),
    )?;
    let is_balanced = total_assets == total_liabilities_and_equity;

    Ok(BalanceSheet {
        entity_id: scope.entity_id,
        entity_name: scope.entity_name.clone(),
        currency: scope.currency.clone(),
        as_of,
        assets,
        liabilities,
        equity,
        retained_earnings: RetainedEarnings {
            prior_years,
            current_year,
            total: prior_years.checked_add(current_year)?,
        },
        total_assets,
        total_liabilities_and_equity,
        is_balanced,
        severity: if is_balanced {
            Severity::Ok
        } else {
            Severity::Critical
        },
    })
}

/// Buckets a balance-sheet account for the cash-flow statement by its
/// account-code range. Unparsable codes fall back to operating.
#[must_use]
pub fn cash_flow_bucket(account_type: AccountType, code: &str) -> CashFlowBucket {
    let numeric = code
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>()
        .parse::<u32>()
        .ok();
    match (account_type, numeric) {
        (AccountType::Asset, Some(1500..=1999)) => CashFlowBucket::Investing,
        (AccountType::Liability, Some(2500..=2999)) | (AccountType::Equity, _) => {
            CashFlowBucket::Financing
        }
        _ => CashFlowBucket::Operating,
    }
}

/// Builds an indirect-method cash-flow statement.
///
/// `period_balances` are signed period-activity balances of balance-sheet
/// accounts. Sign convention: an asset increase subtracts from cash, a
/// liability or equity increase adds to it. Cash-designated accounts are
/// excluded from the buckets since their movement is the cash change
/// itself.
pub fn cash_flow(
    scope: &ReportScope,
    start: NaiveDate,
    end: NaiveDate,
    net_income: MinorUnits,
    opening_cash: MinorUnits,
    closing_cash: MinorUnits,
    period_balances: Vec<AccountBalance>,
) -> CoreResult<CashFlow> {
    let mut operating_rows = Vec::new();
    let mut investing_rows = Vec::new();
    let mut financing_rows = Vec::new();

    for balance in period_balances {
        if balance.is_cash_account || !balance.account_type.is_balance_sheet() {
            continue;
        }
        let impact_wide = match balance.account_type {
            AccountType::Asset => -balance.balance.widen(),
            _ => balance.balance.widen(),
        };
        let row = ReportRow {
            account_id: balance.account_id,
            code: balance.code.clone(),
            name: balance.name.clone(),
            amount: MinorUnits::from_accumulated(impact_wide)?,
        };
        match cash_flow_bucket(balance.account_type, &balance.code) {
            CashFlowBucket::Operating => operating_rows.push(row),
            CashFlowBucket::Investing => investing_rows.push(row),
            CashFlowBucket::Financing => financing_rows.push(row),
        }
    }

    let mut operating = section(operating_rows)?;
    operating.total =
        MinorUnits::from_accumulated(net_income.widen() + operating.total.widen())?;
    let investing = section(investing_rows)?;
    let financing = section(financing_rows)?;

    let net_cash_change = MinorUnits::from_accumulated(
        operating.total.widen() + investing.total.widen() + financing.total.widen(),
    )?;
    let is_reconciled =
        opening_cash.widen() + net_cash_change.widen() == closing_cash.widen();

    Ok(CashFlow {
        entity_id: scope.entity_id,
        entity_name: scope.entity_name.clone(),
        currency: scope.currency.clone(),
        start,
        end,
        net_income,
        opening_cash,
        closing_cash,
        operating,
        investing,
        financing,
        net_cash_change,
        is_reconciled,
    })
}

/// Builds one page of the general-ledger drill-down.
///
/// The running balance is seeded by the opening balance plus the page's
/// prior-window sums, then advanced per line on the account's normal side.
/// A full page (row count equals the limit) yields a cursor equal to the
/// last row's id; a partial page yields no cursor.
pub fn gl_ledger(
    scope: &ReportScope,
    account: &GlAccountRecord,
    start: NaiveDate,
    end: NaiveDate,
    opening_balance: MinorUnits,
    page: LedgerWindowPage,
    limit: u32,
) -> CoreResult<GlLedger> {
    let entity_id = scope
        .entity_id
        .ok_or_else(|| CoreError::validation("ledger drill-down requires a single entity"))?;
    let side = account.account_type.normal_balance();

    let mut running = opening_balance.widen()
        + side.signed_balance_wide(page.prior_debit, page.prior_credit);
    let mut ledger_rows = Vec::with_capacity(page.rows.len());
    for row in &page.rows {
        running += side.signed_balance_wide(row.debit.widen(), row.credit.widen());
        ledger_rows.push(GlLedgerRow {
            id: row.id,
            date: row.date,
            entry_number: row.entry_number.clone(),
            memo: row.memo.clone(),
            debit: row.debit,
            credit: row.credit,
            running_balance: MinorUnits::from_accumulated(running)?,
        });
    }
    let page = CursorPage::from_rows(ledger_rows, limit, |r| r.id);

    Ok(GlLedger {
        entity_id,
        entity_name: scope.entity_name.clone(),
        currency: scope.currency.clone(),
        account_id: account.id,
        account_code: account.code.clone(),
        account_name: account.name.clone(),
        start,
        end,
        opening_balance,
        rows: page.items,
        next_cursor: page.next_cursor,
    })
}

fn report_row(balance: &AccountBalance) -> ReportRow {
    ReportRow {
        account_id: balance.account_id,
        code: balance.code.clone(),
        name: balance.name.clone(),
        amount: balance.balance,
    }
}

fn section(mut rows: Vec<ReportRow>) -> CoreResult<Section> {
    rows.sort_by(|a, b| a.code.cmp(&b.code));
    let total = MinorUnits::total(rows.iter().map(|r| r.amount))?;
    Ok(Section { rows, total })
}

impl From<TrialBalance> for Report {
    fn from(value: TrialBalance) -> Self {
        Self::TrialBalance(value)
    }
}

impl From<ProfitAndLoss> for Report {
    fn from(value: ProfitAndLoss) -> Self {
        Self::ProfitAndLoss(value)
    }
}

impl From<BalanceSheet> for Report {
    fn from(value: BalanceSheet) -> Self {
        Self::BalanceSheet(value)
    }
}

impl From<CashFlow> for Report {
    fn from(value: CashFlow) -> Self {
        Self::CashFlow(value)
    }
}

impl From<GlLedger> for Report {
    fn from(value: GlLedger) -> Self {
        Self::GlLedger(value)
    }
}
