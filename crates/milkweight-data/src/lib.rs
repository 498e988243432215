//! Data layer for the milk weight ledger.
//!
//! Reads farm CSV exports, indexes the accepted entries by year, month and
//! farm, and reduces ledger queries to the totals shown in reports.

pub mod aggregator;
pub mod ledger;
pub mod loader;
pub mod parser;

pub use aggregator::{FarmShare, FarmShareReport, FarmYearReport, MonthShare, ReportAggregator};
pub use ledger::MilkLedger;
pub use loader::{discover_sources, load_sources, IngestSummary, LoadOutcome};
pub use milkweight_core as core;
