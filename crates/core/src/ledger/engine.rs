//! Scope resolution and balance narrowing.

use tally_shared::error::{CoreError, CoreResult};
use tally_shared::types::{EntityId, MinorUnits};

use super::types::{AccountAggregate, AccountBalance, FiscalYearAggregate, FiscalYearBalance};
use crate::store::scope::TenantScope;
use crate::store::traits::EntityStore;

/// The entity set a report runs over, with its reporting currency.
#[derive(Debug, Clone)]
pub struct ReportScope {
    /// The single entity, or `None` for tenant-wide consolidation.
    pub entity_id: Option<EntityId>,
    /// All entities covered (one for single-entity reports).
    pub entity_ids: Vec<EntityId>,
    /// Display name ("Consolidated" for multi-entity scopes).
    pub entity_name: String,
    /// Shared functional currency (ISO 4217).
    pub currency: String,
}

/// Aggregation engine: resolves report scopes and narrows raw sums into
/// signed balances.
pub struct AggregationService;

impl AggregationService {
    /// Resolves the entity set for a report.
    ///
    /// A named entity must belong to the calling tenant (`NOT_FOUND`
    /// otherwise, identically for cross-tenant references). With no entity,
    /// all tenant entities consolidate, which requires a shared functional
    /// currency and at least one entity.
    pub async fn resolve_scope(
        entities: &dyn EntityStore,
        scope: &TenantScope,
        entity_id: Option<EntityId>,
    ) -> CoreResult<ReportScope> {
        match entity_id {
            Some(id) => {
                let entity = entities
                    .find_entity(scope, id)
                    .await?
                    .ok_or_else(|| CoreError::not_found(format!("entity {id}")))?;
                Ok(ReportScope {
                    entity_id: Some(entity.id),
                    entity_ids: vec![entity.id],
                    entity_name: entity.name,
                    currency: entity.functional_currency,
                })
            }
            None => {
                let all = entities.entities_for_tenant(scope).await?;
                let Some(first) = all.first() else {
                    return Err(CoreError::NoEntitiesFound);
                };
                let currency = first.functional_currency.clone();
                for entity in &all {
                    if entity.functional_currency != currency {
                        return Err(CoreError::ConsolidationCurrencyMismatch {
                            first: currency,
                            second: entity.functional_currency.clone(),
                        });
                    }
                }
                Ok(ReportScope {
                    entity_id: None,
                    entity_ids: all.iter().map(|e| e.id).collect(),
                    entity_name: "Consolidated".to_string(),
                    currency,
                })
            }
        }
    }

    /// Narrows raw aggregates into signed balances.
    ///
    /// Each sum is narrowed exactly once; a value outside the safe integer
    /// range fails `OVERFLOW` rather than truncating.
    pub fn signed_balances(rows: Vec<AccountAggregate>) -> CoreResult<Vec<AccountBalance>> {
        rows.into_iter().map(Self::narrow_row).collect()
    }

    /// Narrows fiscal-year aggregates, keeping the current-year component.
    pub fn signed_fiscal_balances(
        rows: Vec<FiscalYearAggregate>,
    ) -> CoreResult<Vec<FiscalYearBalance>> {
        rows.into_iter()
            .map(|row| {
                let side = row.account_type.normal_balance();
                let current_year_balance = MinorUnits::from_accumulated(
                    side.signed_balance_wide(row.current_year_debit, row.current_year_credit),
                )?;
                let cumulative = Self::narrow_row(AccountAggregate {
                    account_id: row.account_id,
                    code: row.code,
                    name: row.name,
                    account_type: row.account_type,
                    is_cash_account: row.is_cash_account,
                    total_debit: row.total_debit,
                    total_credit: row.total_credit,
                })?;
                Ok(FiscalYearBalance {
                    cumulative,
                    current_year_balance,
                })
            })
            .collect()
    }

    fn narrow_row(row: AccountAggregate) -> CoreResult<AccountBalance> {
        let side = row.account_type.normal_balance();
        let balance = MinorUnits::from_accumulated(
            side.signed_balance_wide(row.total_debit, row.total_credit),
        )?;
        Ok(AccountBalance {
            account_id: row.account_id,
            code: row.code,
            name: row.name,
            account_type: row.account_type,
            is_cash_account: row.is_cash_account,
            total_debit: MinorUnits::from_accumulated(row.total_debit)?,
            total_credit: MinorUnits::from_accumulated(row.total_credit)?,
            balance,
        })
    }
}
