//! Shared domain types for the milk weight ledger.
//!
//! Holds the [`models::Entry`] record, the crate-wide error type, command-line
//! settings and the number formatting helpers used by reports.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{MilkError, Result};
pub use models::Entry;
