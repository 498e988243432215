//! Report rendering and export for the milk weight ledger.
//!
//! A [`Report`] is built from the ledger by [`request::resolve_report`] and
//! rendered as CSV, JSON or a terminal table before being written out with
//! [`export::export`].

pub mod export;
pub mod render;
pub mod request;
pub mod table;

use chrono::NaiveDate;
use milkweight_data::{FarmShareReport, FarmYearReport};
use serde::Serialize;

pub use export::export;
pub use render::{to_csv, to_json};
pub use request::resolve_report;
pub use table::render_table;

/// One of the four report kinds, with the window it covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Monthly {
        year: i32,
        /// Zero-based month.
        month: u32,
        month_name: &'static str,
        report: FarmShareReport,
    },
    Annual {
        year: i32,
        report: FarmShareReport,
    },
    DateRange {
        start: NaiveDate,
        end: NaiveDate,
        report: FarmShareReport,
    },
    Farm {
        report: FarmYearReport,
    },
}

impl Report {
    /// Heading shown above the table view.
    pub fn title(&self) -> String {
        match self {
            Report::Monthly {
                year, month_name, ..
            } => format!("Monthly Report: {} {}", month_name, year),
            Report::Annual { year, .. } => format!("Annual Report: {}", year),
            Report::DateRange { start, end, .. } => {
                format!("Date Range Report: {} to {}", start, end)
            }
            Report::Farm { report } => {
                format!("Farm Report: {} {}", report.farm_id, report.year)
            }
        }
    }
}
