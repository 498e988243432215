//! Per-farm and per-month weight totals for reports.
//!
//! Each report window (month, year, date range) is reduced to one
//! [`FarmShare`] per farm, and a single farm's year is reduced to twelve
//! [`MonthShare`] rows. Percentages are kept to three decimals.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use milkweight_core::formatting::percentage;
use milkweight_core::models::{Entry, MONTH_NAMES};
use milkweight_core::{MilkError, Result};
use serde::Serialize;

use crate::ledger::MilkLedger;

const PERCENT_DECIMALS: u32 = 3;

// ── FarmShare ─────────────────────────────────────────────────────────────────

/// One farm's total weight within a report window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmShare {
    pub farm_id: String,
    pub total_weight: i64,
    /// Share of the window total, in percent.
    pub percent: f64,
}

/// All farm shares of one report window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmShareReport {
    /// Farms in ledger order (lexicographic once organised).
    pub shares: Vec<FarmShare>,
    pub total_weight: i64,
    pub entry_count: usize,
}

// ── MonthShare ────────────────────────────────────────────────────────────────

/// One month of a single farm's year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthShare {
    /// Zero-based month.
    pub month: u32,
    pub month_name: &'static str,
    pub total_weight: i64,
    /// Share of the farm's annual total, in percent.
    pub percent: f64,
}

/// A single farm's weights for one year, month by month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmYearReport {
    pub farm_id: String,
    pub year: i32,
    /// Always twelve rows, January first.
    pub months: Vec<MonthShare>,
    pub total_weight: i64,
}

// ── ReportAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that turns ledger queries into report rows.
///
/// Sums are checked; a total outside the `i64` range is reported as
/// [`MilkError::WeightOverflow`].
pub struct ReportAggregator;

impl ReportAggregator {
    /// Farm totals for the zero-based `month` of `year`. Farms without
    /// entries that month are omitted.
    pub fn monthly(ledger: &MilkLedger, year: i32, month: i32) -> Result<FarmShareReport> {
        let entries = ledger.entries_for_month(year, month)?;
        let window = format!("month {} of {}", month + 1, year);
        Self::farm_shares(ledger.farm_ids(), entries, false, &window)
    }

    /// Farm totals for `year`. Every known farm is listed, including farms
    /// with a zero total.
    pub fn annual(ledger: &MilkLedger, year: i32) -> Result<FarmShareReport> {
        let window = format!("year {}", year);
        Self::farm_shares(ledger.farm_ids(), &ledger.entries_for_year(year), true, &window)
    }

    /// Farm totals for `start..=end`. Farms without entries in the range are
    /// omitted.
    pub fn date_range(
        ledger: &MilkLedger,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FarmShareReport> {
        let window = format!("{} to {}", start, end);
        Self::farm_shares(
            ledger.farm_ids(),
            &ledger.entries_for_date_range(start, end),
            false,
            &window,
        )
    }

    /// Month-by-month totals of `farm_id` in `year`.
    pub fn farm_year(ledger: &MilkLedger, farm_id: &str, year: i32) -> Result<FarmYearReport> {
        let window = format!("{} in {}", farm_id, year);
        let mut monthly = [0i64; 12];
        let mut total_weight = 0i64;
        for entry in ledger
            .entries_for_farm(farm_id)
            .iter()
            .filter(|e| e.year() == year)
        {
            let slot = &mut monthly[entry.month0() as usize];
            *slot = add_weight(*slot, entry.weight, &window)?;
            total_weight = add_weight(total_weight, entry.weight, &window)?;
        }

        let months = monthly
            .iter()
            .zip(MONTH_NAMES)
            .enumerate()
            .map(|(month, (&weight, name))| MonthShare {
                month: month as u32,
                month_name: name,
                total_weight: weight,
                percent: share_of(weight, total_weight),
            })
            .collect();

        Ok(FarmYearReport {
            farm_id: farm_id.to_string(),
            year,
            months,
            total_weight,
        })
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn farm_shares(
        farm_ids: &[String],
        entries: &[Arc<Entry>],
        include_empty: bool,
        window: &str,
    ) -> Result<FarmShareReport> {
        let mut totals: HashMap<&str, i64> = HashMap::new();
        let mut total_weight = 0i64;

        for entry in entries {
            let farm_total = totals.entry(entry.farm_id.as_str()).or_default();
            *farm_total = add_weight(*farm_total, entry.weight, window)?;
            total_weight = add_weight(total_weight, entry.weight, window)?;
        }

        let shares = farm_ids
            .iter()
            .filter_map(|farm_id| {
                let weight = match totals.get(farm_id.as_str()) {
                    Some(&weight) => weight,
                    None if include_empty => 0,
                    None => return None,
                };
                Some(FarmShare {
                    farm_id: farm_id.clone(),
                    total_weight: weight,
                    percent: share_of(weight, total_weight),
                })
            })
            .collect();

        Ok(FarmShareReport {
            shares,
            total_weight,
            entry_count: entries.len(),
        })
    }
}

fn add_weight(total: i64, weight: i64, window: &str) -> Result<i64> {
    total
        .checked_add(weight)
        .ok_or_else(|| MilkError::WeightOverflow(window.to_string()))
}

fn share_of(part: i64, whole: i64) -> f64 {
    percentage(part as f64, whole as f64, PERCENT_DECIMALS)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
