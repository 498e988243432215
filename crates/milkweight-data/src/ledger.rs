//! In-memory milk weight ledger with redundant year/month and farm indexes.
//!
//! Every inserted [`Entry`] is shared (via [`Arc`]) between exactly one
//! year/month bucket and exactly one farm list, so lookups along either axis
//! need no scan. The ledger is filled with [`MilkLedger::insert`], sorted once
//! with [`MilkLedger::organize`] and read-only afterwards.
//!
//! Query results reflect insertion order until `organize` has run.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use milkweight_core::models::{month_name, Entry};
use milkweight_core::{MilkError, Result};
use tracing::debug;

/// Entries of one (year, month) pair or one farm.
pub type Bucket = Vec<Arc<Entry>>;

/// Indexed store of all loaded entries.
#[derive(Debug, Clone, Default)]
pub struct MilkLedger {
    /// Distinct farm IDs, first-seen order until organised.
    farm_ids: Vec<String>,
    /// Year → month indices (0-11) that hold at least one entry.
    valid_months: BTreeMap<i32, Vec<u32>>,
    /// Year → one bucket per month; empty buckets mean no data.
    year_month_index: HashMap<i32, [Bucket; 12]>,
    /// Farm ID → every entry of that farm.
    farm_index: HashMap<String, Bucket>,
    len: usize,
    organized: bool,
}

impl MilkLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Building ──────────────────────────────────────────────────────────────

    /// Add one entry to every index. No validation is performed.
    pub fn insert(&mut self, entry: impl Into<Arc<Entry>>) {
        let entry: Arc<Entry> = entry.into();
        let year = entry.year();
        let month = entry.month0();

        let months = self.valid_months.entry(year).or_default();
        if !months.contains(&month) {
            months.push(month);
        }

        self.year_month_index.entry(year).or_default()[month as usize].push(Arc::clone(&entry));

        if let Some(list) = self.farm_index.get_mut(&entry.farm_id) {
            list.push(entry);
        } else {
            self.farm_ids.push(entry.farm_id.clone());
            self.farm_index.insert(entry.farm_id.clone(), vec![entry]);
        }

        self.len += 1;
        self.organized = false;
    }

    /// Sort every index: farm IDs lexicographically, month lists ascending and
    /// every bucket and farm list by date.
    ///
    /// Date sorts are stable, so entries sharing a date keep insertion order.
    /// Meant to be called once after the last insert; calling it again is
    /// harmless.
    pub fn organize(&mut self) {
        self.farm_ids.sort();

        for months in self.valid_months.values_mut() {
            months.sort_unstable();
        }

        for buckets in self.year_month_index.values_mut() {
            for bucket in buckets.iter_mut() {
                bucket.sort_by_key(|e| e.date);
            }
        }

        for list in self.farm_index.values_mut() {
            list.sort_by_key(|e| e.date);
        }

        self.organized = true;
        debug!(
            "Organised {} entries across {} years and {} farms",
            self.len,
            self.valid_months.len(),
            self.farm_ids.len()
        );
    }

    /// `true` once [`organize`](Self::organize) has run after the last insert.
    pub fn is_organized(&self) -> bool {
        self.organized
    }

    /// Number of inserted entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // ── Dimensions ────────────────────────────────────────────────────────────

    pub fn farm_ids(&self) -> &[String] {
        &self.farm_ids
    }

    /// Years with at least one entry, ascending.
    pub fn valid_years(&self) -> Vec<i32> {
        self.valid_months.keys().copied().collect()
    }

    /// Zero-based month indices with data in `year`; empty for unknown years.
    pub fn valid_month_indices(&self, year: i32) -> &[u32] {
        self.valid_months
            .get(&year)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Month names with data in `year`; empty for unknown years.
    pub fn valid_months_in_year(&self, year: i32) -> Vec<&'static str> {
        self.valid_month_indices(year)
            .iter()
            .filter_map(|&m| month_name(m))
            .collect()
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// All entries of the zero-based `month` in `year`.
    ///
    /// Fails with [`MilkError::InvalidArgument`] when `month` is outside
    /// `0..=11`. Returns an empty slice when there is no data.
    pub fn entries_for_month(&self, year: i32, month: i32) -> Result<&[Arc<Entry>]> {
        let slot = month_slot(month)?;
        Ok(self
            .year_month_index
            .get(&year)
            .map(|buckets| buckets[slot].as_slice())
            .unwrap_or(&[]))
    }

    /// Entries of `month` in `year` that belong to `farm_id`.
    pub fn entries_for_month_and_farm(
        &self,
        year: i32,
        month: i32,
        farm_id: &str,
    ) -> Result<Vec<Arc<Entry>>> {
        Ok(self
            .entries_for_month(year, month)?
            .iter()
            .filter(|e| e.farm_id == farm_id)
            .cloned()
            .collect())
    }

    /// Every entry of `year`: the twelve month buckets concatenated in month
    /// order. Since each bucket only spans its own month, the result is date
    /// sorted whenever the buckets are.
    pub fn entries_for_year(&self, year: i32) -> Vec<Arc<Entry>> {
        self.year_month_index
            .get(&year)
            .map(|buckets| buckets.iter().flatten().cloned().collect())
            .unwrap_or_default()
    }

    /// Every entry of `farm_id`; empty for unknown farms.
    pub fn entries_for_farm(&self, farm_id: &str) -> &[Arc<Entry>] {
        self.farm_index
            .get(farm_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Entries dated within `start..=end`.
    ///
    /// Only the month buckets between the two dates are visited; entries are
    /// then compared at full date. The result is ordered by year, month and
    /// position within the bucket. A reversed range yields nothing.
    pub fn entries_for_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Arc<Entry>> {
        if start > end {
            return Vec::new();
        }

        let (start_year, start_month) = (start.year(), start.month0());
        let (end_year, end_month) = (end.year(), end.month0());

        let mut entries = Vec::new();
        for (&year, _) in self.valid_months.range(start_year..=end_year) {
            let Some(buckets) = self.year_month_index.get(&year) else {
                continue;
            };
            let first = if year == start_year { start_month } else { 0 };
            let last = if year == end_year { end_month } else { 11 };

            for bucket in &buckets[first as usize..=last as usize] {
                entries.extend(
                    bucket
                        .iter()
                        .filter(|e| e.date >= start && e.date <= end)
                        .cloned(),
                );
            }
        }
        entries
    }
}

fn month_slot(month: i32) -> Result<usize> {
    if (0..12).contains(&month) {
        Ok(month as usize)
    } else {
        Err(MilkError::invalid_month(month))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
