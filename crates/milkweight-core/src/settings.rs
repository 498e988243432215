use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use crate::models::parse_date;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Milk weight reports from farm CSV exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "milkweight",
    about = "Milk weight reports from farm CSV exports",
    version
)]
pub struct Settings {
    /// CSV files or directories of CSV files to load
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Report type
    #[arg(long, default_value = "annual", value_parser = ["monthly", "annual", "farm", "range"])]
    pub report: String,

    /// Report year (defaults to the first year with data)
    #[arg(long)]
    pub year: Option<i32>,

    /// Report month, 1-12 (defaults to the first month with data)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Farm ID for the farm report (defaults to the first farm)
    #[arg(long)]
    pub farm: Option<String>,

    /// First day of the range report, Y-M-D
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// Last day of the range report, Y-M-D
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "csv", "json"])]
    pub format: String,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply derived overrides.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list.
    pub fn try_load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    /// Zero-based month index of `--month`, if given.
    pub fn month0(&self) -> Option<i32> {
        self.month.map(|m| m as i32 - 1)
    }

    fn resolve(mut settings: Settings) -> Settings {
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("expected a Y-M-D date, got '{value}'"))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
