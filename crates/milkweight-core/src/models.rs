use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// English month names indexed by zero-based month.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Name of the zero-based `month`, or `None` outside `0..=11`.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month as usize).copied()
}

/// Parse a record date in `year-month-day` numeric form.
///
/// The year has exactly four digits; month and day have one or two
/// (`2019-1-2`). Signs and inner whitespace are rejected, and the date must
/// exist in the proleptic Gregorian calendar.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.trim().split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    NaiveDate::from_ymd_opt(
        date_field(year, 4..=4)? as i32,
        date_field(month, 1..=2)?,
        date_field(day, 1..=2)?,
    )
}

fn date_field(field: &str, digits: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !digits.contains(&field.len()) || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// A single validated milk weight record.
///
/// Entries carry no identity beyond their three fields. Ordering between
/// entries is by `date` only; callers sort with a stable sort keyed on
/// [`Entry::date`] so that equal dates keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Opaque, case-sensitive farm identifier.
    pub farm_id: String,
    /// Calendar date of the record (timezone-naive).
    pub date: NaiveDate,
    /// Recorded weight. Not validated; negative values pass through.
    pub weight: i64,
}

impl Entry {
    pub fn new(farm_id: impl Into<String>, date: NaiveDate, weight: i64) -> Self {
        Self {
            farm_id: farm_id.into(),
            date,
            weight,
        }
    }

    /// Calendar year of the entry.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Zero-based month of the entry (`0` = January).
    pub fn month0(&self) -> u32 {
        self.date.month0()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Farm: {}, Weight: {}, Date: {}",
            self.farm_id, self.weight, self.date
        )
    }
}
