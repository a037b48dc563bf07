//! Fiscal-year window resolution.
//!
//! The balance-sheet path needs revenue/expense sums scoped to the current
//! fiscal year. An explicit fiscal calendar record for the as-of year wins;
//! otherwise the window is derived from the entity's fiscal-year start month.

use chrono::{Datelike, NaiveDate};

use crate::store::records::{EntityRecord, FiscalCalendarRecord};

/// A resolved fiscal-year window (inclusive dates).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalYearWindow {
    /// First day of the fiscal year.
    pub start: NaiveDate,
    /// Last day of the fiscal year.
    pub end: NaiveDate,
}

/// Resolves the fiscal year containing `as_of` for an entity.
///
/// Prefers the explicit calendar record when one covers the as-of calendar
/// year. Otherwise derives the window from the entity's fiscal-year start
/// month, rolling back one year when the as-of date precedes day 1 of that
/// month in the current year.
#[must_use]
pub fn fiscal_year_window(
    entity: &EntityRecord,
    calendar: Option<&FiscalCalendarRecord>,
    as_of: NaiveDate,
) -> FiscalYearWindow {
    if let Some(record) = calendar {
        return FiscalYearWindow {
            start: record.start_date,
            end: record.end_date,
        };
    }

    let month = entity.fiscal_year_start_month.clamp(1, 12);
    let this_year_start = first_of_month(as_of.year(), month);

    let start = if as_of < this_year_start {
        first_of_month(as_of.year() - 1, month)
    } else {
        this_year_start
    };

    let end = first_of_month(start.year() + 1, month)
        .pred_opt()
        .unwrap_or(start);

    FiscalYearWindow { start, end }
}

// Day 1 of a clamped month always exists; the fallback is unreachable.
fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}
