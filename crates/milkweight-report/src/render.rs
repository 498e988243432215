//! Plain-text CSV and JSON renderings of a [`Report`].

use milkweight_core::formatting::format_percent;
use milkweight_core::Result;
use milkweight_data::{FarmShareReport, FarmYearReport};

use crate::Report;

pub const FARM_SHARE_HEADER: &str = "Farm ID,Total Weight,Percent of Total Weight";
pub const FARM_YEAR_HEADER: &str = "Month,Month Weight,Percentage of Total";

/// Render `report` as CSV text.
///
/// Farm-share reports get one `farm,weight,percent` row per farm. The farm
/// report gets twelve `month,weight,percent` rows followed by a
/// `farm,year,total` trailer.
pub fn to_csv(report: &Report) -> String {
    match report {
        Report::Monthly { report, .. }
        | Report::Annual { report, .. }
        | Report::DateRange { report, .. } => farm_shares_csv(report),
        Report::Farm { report } => farm_year_csv(report),
    }
}

/// Render `report` as pretty-printed JSON tagged with its `kind`.
pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn farm_shares_csv(report: &FarmShareReport) -> String {
    let mut out = String::from(FARM_SHARE_HEADER);
    out.push('\n');
    for share in &report.shares {
        out.push_str(&format!(
            "{},{},{}\n",
            share.farm_id,
            share.total_weight,
            format_percent(share.percent)
        ));
    }
    out
}

fn farm_year_csv(report: &FarmYearReport) -> String {
    let mut out = String::from(FARM_YEAR_HEADER);
    out.push('\n');
    for month in &report.months {
        out.push_str(&format!(
            "{},{},{}\n",
            month.month_name,
            month.total_weight,
            format_percent(month.percent)
        ));
    }
    out.push_str(&format!(
        "{},{},{}\n",
        report.farm_id, report.year, report.total_weight
    ));
    out
}
