//! Report orchestration: scope resolution, aggregation, caching.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tally_shared::config::LedgerConfig;
use tally_shared::error::{CoreError, CoreResult};
use tally_shared::types::{EntityId, GlAccountId, JournalLineId, MinorUnits, PageRequest};
use tracing::debug;

use super::builder;
use super::types::Report;
use crate::ledger::engine::{AggregationService, ReportScope};
use crate::ledger::fiscal::fiscal_year_window;
use crate::ledger::types::{AccountType, AggregateQuery, DateFilter, FiscalYearQuery};
use crate::store::scope::TenantScope;
use crate::store::traits::{EntityStore, JournalStore, ReportCache};

/// Generates financial statements over the journal store, memoized per
/// tenant in the report cache.
///
/// Every generator is pure given fixed journal state; cache misses under
/// concurrency recompute the same value, so the cache is an optimization,
/// never a correctness mechanism.
pub struct ReportService {
    journal: Arc<dyn JournalStore>,
    entities: Arc<dyn EntityStore>,
    cache: Arc<dyn ReportCache>,
    config: LedgerConfig,
}

impl ReportService {
    /// Creates the service over the journal and entity stores.
    pub fn new(
        journal: Arc<dyn JournalStore>,
        entities: Arc<dyn EntityStore>,
        cache: Arc<dyn ReportCache>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            journal,
            entities,
            cache,
            config,
        }
    }

    /// Per-account cumulative debits and credits for one entity as of a
    /// date, with the exact double-entry balance check.
    pub async fn trial_balance(
        &self,
        scope: &TenantScope,
        entity_id: EntityId,
        as_of: NaiveDate,
    ) -> CoreResult<Arc<Report>> {
        let key = format!("trial_balance:{entity_id}:{as_of}");
        if let Some(hit) = self.cache.get(scope, &key) {
            return Ok(hit);
        }

        let report_scope =
            AggregationService::resolve_scope(self.entities.as_ref(), scope, Some(entity_id))
                .await?;
        let rows = self
            .journal
            .aggregate(
                scope,
                AggregateQuery {
                    entity_ids: report_scope.entity_ids.clone(),
                    account_types: None,
                    date: DateFilter::Through(as_of),
                },
            )
            .await?;
        let balances = AggregationService::signed_balances(rows)?;
        let report = builder::trial_balance(&report_scope, as_of, balances)?;

        self.finish(scope, key, report.into())
    }

    /// Revenue and expenses over an inclusive period, for one entity or the
    /// whole tenant.
    pub async fn profit_and_loss(
        &self,
        scope: &TenantScope,
        entity_id: Option<EntityId>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CoreResult<Arc<Report>> {
        let key = format!("profit_and_loss:{}:{start}:{end}", entity_key(entity_id));
        if let Some(hit) = self.cache.get(scope, &key) {
            return Ok(hit);
        }

        let report_scope =
            AggregationService::resolve_scope(self.entities.as_ref(), scope, entity_id).await?;
        let report = self
            .compute_profit_and_loss(scope, &report_scope, start, end)
            .await?;

        self.finish(scope, key, report.into())
    }

    /// Assets, liabilities, and equity as of a date, with retained earnings
    /// split into prior years and the current fiscal year.
    pub async fn balance_sheet(
        &self,
        scope: &TenantScope,
        entity_id: Option<EntityId>,
        as_of: NaiveDate,
    ) -> CoreResult<Arc<Report>> {
        let key = format!("balance_sheet:{}:{as_of}", entity_key(entity_id));
        if let Some(hit) = self.cache.get(scope, &key) {
            return Ok(hit);
        }

        let report_scope =
            AggregationService::resolve_scope(self.entities.as_ref(), scope, entity_id).await?;

        let mut fiscal_starts = Vec::with_capacity(report_scope.entity_ids.len());
        for id in &report_scope.entity_ids {
            let entity = self
                .entities
                .find_entity(scope, *id)
                .await?
                .ok_or_else(|| CoreError::not_found(format!("entity {id}")))?;
            let calendar = self
                .entities
                .find_fiscal_calendar(scope, *id, as_of.year())
                .await?;
            let window = fiscal_year_window(&entity, calendar.as_ref(), as_of);
            fiscal_starts.push((*id, window.start));
        }

        let rows = self
            .journal
            .aggregate_with_fiscal_year(
                scope,
                FiscalYearQuery {
                    as_of,
                    fiscal_starts,
                },
            )
            .await?;
        let balances = AggregationService::signed_fiscal_balances(rows)?;
        let report = builder::balance_sheet(
            &report_scope,
            as_of,
            balances,
            &self.config.retained_earnings_code,
        )?;

        self.finish(scope, key, report.into())
    }

    /// Indirect-method cash movements over an inclusive period.
    pub async fn cash_flow(
        &self,
        scope: &TenantScope,
        entity_id: Option<EntityId>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CoreResult<Arc<Report>> {
        let key = format!("cash_flow:{}:{start}:{end}", entity_key(entity_id));
        if let Some(hit) = self.cache.get(scope, &key) {
            return Ok(hit);
        }

        let report_scope =
            AggregationService::resolve_scope(self.entities.as_ref(), scope, entity_id).await?;

        let income = self
            .compute_profit_and_loss(scope, &report_scope, start, end)
            .await?;
        let opening_cash = self
            .cash_balance(scope, &report_scope, DateFilter::Before(start))
            .await?;
        let closing_cash = self
            .cash_balance(scope, &report_scope, DateFilter::Through(end))
            .await?;

        let period = DateFilter::Period { start, end };
        period.validate()?;
        let rows = self
            .journal
            .aggregate(
                scope,
                AggregateQuery {
                    entity_ids: report_scope.entity_ids.clone(),
                    account_types: Some(vec![
                        AccountType::Asset,
                        AccountType::Liability,
                        AccountType::Equity,
                    ]),
                    date: period,
                },
            )
            .await?;
        let period_balances = AggregationService::signed_balances(rows)?;

        let report = builder::cash_flow(
            &report_scope,
            start,
            end,
            income.net_income,
            opening_cash,
            closing_cash,
            period_balances,
        )?;

        self.finish(scope, key, report.into())
    }

    /// One page of a single account's ledger with running balance.
    pub async fn gl_ledger(
        &self,
        scope: &TenantScope,
        account_id: GlAccountId,
        start: NaiveDate,
        end: NaiveDate,
        page: PageRequest<JournalLineId>,
    ) -> CoreResult<Arc<Report>> {
        let limit = page.limit_or(self.config.page_limit);
        let cursor_key = page
            .cursor
            .map_or_else(|| "start".to_string(), |c| c.to_string());
        let key = format!("gl_ledger:{account_id}:{start}:{end}:{cursor_key}:{limit}");
        if let Some(hit) = self.cache.get(scope, &key) {
            return Ok(hit);
        }

        let account = self
            .journal
            .find_account(scope, account_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("account {account_id}")))?;
        let report_scope = AggregationService::resolve_scope(
            self.entities.as_ref(),
            scope,
            Some(account.entity_id),
        )
        .await?;

        let window = DateFilter::Period { start, end };
        window.validate()?;

        // Opening balance: signed cumulative balance strictly before the
        // window start.
        let opening_rows = self
            .journal
            .aggregate(
                scope,
                AggregateQuery {
                    entity_ids: report_scope.entity_ids.clone(),
                    account_types: None,
                    date: DateFilter::Before(start),
                },
            )
            .await?;
        let opening_balance = AggregationService::signed_balances(opening_rows)?
            .into_iter()
            .find(|b| b.account_id == account_id)
            .map_or(MinorUnits::ZERO, |b| b.balance);

        let lines = self
            .journal
            .windowed_lines(scope, account_id, window, page.cursor, limit)
            .await?;
        let report = builder::gl_ledger(
            &report_scope,
            &account,
            start,
            end,
            opening_balance,
            lines,
            limit,
        )?;

        self.finish(scope, key, report.into())
    }

    async fn compute_profit_and_loss(
        &self,
        scope: &TenantScope,
        report_scope: &ReportScope,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CoreResult<super::types::ProfitAndLoss> {
        let period = DateFilter::Period { start, end };
        period.validate()?;
        let rows = self
            .journal
            .aggregate(
                scope,
                AggregateQuery {
                    entity_ids: report_scope.entity_ids.clone(),
                    account_types: Some(vec![AccountType::Revenue, AccountType::Expense]),
                    date: period,
                },
            )
            .await?;
        let balances = AggregationService::signed_balances(rows)?;
        builder::profit_and_loss(report_scope, start, end, balances)
    }

    async fn cash_balance(
        &self,
        scope: &TenantScope,
        report_scope: &ReportScope,
        date: DateFilter,
    ) -> CoreResult<MinorUnits> {
        let rows = self
            .journal
            .aggregate(
                scope,
                AggregateQuery {
                    entity_ids: report_scope.entity_ids.clone(),
                    account_types: Some(vec![AccountType::Asset]),
                    date,
                },
            )
            .await?;
        let balances = AggregationService::signed_balances(rows)?;
        MinorUnits::total(
            balances
                .iter()
                .filter(|b| b.is_cash_account)
                .map(|b| b.balance),
        )
    }

    fn finish(&self, scope: &TenantScope, key: String, report: Report) -> CoreResult<Arc<Report>> {
        let report = Arc::new(report);
        debug!(kind = report.kind(), %key, "computed report");
        self.cache.set(scope, key, Arc::clone(&report));
        Ok(report)
    }
}

fn entity_key(entity_id: Option<EntityId>) -> String {
    entity_id.map_or_else(|| "all".to_string(), |id| id.to_string())
}
