//! Resolve command-line report options against a loaded ledger.

use chrono::NaiveDate;
use milkweight_core::models::month_name;
use milkweight_core::settings::Settings;
use milkweight_core::{MilkError, Result};
use milkweight_data::{MilkLedger, ReportAggregator};
use tracing::debug;

use crate::Report;

/// Build the report selected by `settings`.
///
/// Missing options fall back to the first year, month or farm with data;
/// a range without bounds covers every loaded year.
pub fn resolve_report(settings: &Settings, ledger: &MilkLedger) -> Result<Report> {
    let years = ledger.valid_years();
    let (Some(&first_year), Some(&last_year)) = (years.first(), years.last()) else {
        return Err(MilkError::NoValidData);
    };

    let report = match settings.report.as_str() {
        "monthly" => {
            let year = resolve_year(settings, ledger, first_year)?;
            let month = match settings.month0() {
                Some(month) => month,
                None => ledger
                    .valid_month_indices(year)
                    .first()
                    .map(|&m| m as i32)
                    .ok_or_else(|| no_data_for_year(year))?,
            };
            let name = month_name(month as u32).ok_or_else(|| MilkError::invalid_month(month))?;
            Report::Monthly {
                year,
                month: month as u32,
                month_name: name,
                report: ReportAggregator::monthly(ledger, year, month)?,
            }
        }
        "annual" => {
            let year = resolve_year(settings, ledger, first_year)?;
            Report::Annual {
                year,
                report: ReportAggregator::annual(ledger, year)?,
            }
        }
        "farm" => {
            let year = resolve_year(settings, ledger, first_year)?;
            let farm_id = match &settings.farm {
                Some(farm) if ledger.farm_ids().contains(farm) => farm.clone(),
                Some(farm) => {
                    return Err(MilkError::Config(format!("unknown farm: {farm}")));
                }
                None => ledger
                    .farm_ids()
                    .first()
                    .cloned()
                    .ok_or(MilkError::NoValidData)?,
            };
            Report::Farm {
                report: ReportAggregator::farm_year(ledger, &farm_id, year)?,
            }
        }
        "range" => {
            let start = match settings.start {
                Some(date) => date,
                None => year_bound(first_year, 1, 1)?,
            };
            let end = match settings.end {
                Some(date) => date,
                None => year_bound(last_year, 12, 31)?,
            };
            if start > end {
                return Err(MilkError::Config(format!(
                    "range start {start} is after end {end}"
                )));
            }
            Report::DateRange {
                start,
                end,
                report: ReportAggregator::date_range(ledger, start, end)?,
            }
        }
        other => {
            return Err(MilkError::Config(format!("unknown report type: {other}")));
        }
    };

    debug!("Resolved {}", report.title());
    Ok(report)
}

fn resolve_year(settings: &Settings, ledger: &MilkLedger, first_year: i32) -> Result<i32> {
    match settings.year {
        Some(year) if ledger.valid_month_indices(year).is_empty() => Err(no_data_for_year(year)),
        Some(year) => Ok(year),
        None => Ok(first_year),
    }
}

fn year_bound(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| MilkError::Config(format!("year {year} is out of range")))
}

fn no_data_for_year(year: i32) -> MilkError {
    MilkError::Config(format!("no data for year {year}"))
}
