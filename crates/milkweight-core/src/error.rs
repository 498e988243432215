use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the milk weight ledger and its front ends.
#[derive(Error, Debug)]
pub enum MilkError {
    /// A query received an argument outside its domain, e.g. a month index
    /// that is not in `0..=11`.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A report could not be written to its destination.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report total does not fit in an `i64`.
    #[error("Total weight overflows: {0}")]
    WeightOverflow(String),

    /// Ingestion finished but not a single valid entry was found.
    #[error("No valid data could be found in the files selected")]
    NoValidData,

    /// A report option is missing or inconsistent with the loaded data.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A report could not be serialised to JSON.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MilkError {
    /// Error for a month index outside `0..=11`.
    pub fn invalid_month(month: i32) -> Self {
        MilkError::InvalidArgument(format!(
            "Month should be a number between 0 and 11, got {month}"
        ))
    }
}

/// Convenience alias used throughout the milkweight crates.
pub type Result<T> = std::result::Result<T, MilkError>;
