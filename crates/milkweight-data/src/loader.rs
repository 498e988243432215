//! CSV source discovery and ingestion into a [`MilkLedger`].
//!
//! Every line of every source is attempted. Rejected sources and lines are
//! counted in an [`IngestSummary`] rather than aborting the load, so the
//! caller can present one combined warning.

use std::io::BufRead;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::ledger::MilkLedger;
use crate::parser::{open_source, SourceRecords};

// ── Public types ──────────────────────────────────────────────────────────────

/// Counts gathered while loading sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Sources whose header was accepted.
    pub sources_read: usize,
    /// Entries inserted into the ledger.
    pub entries_accepted: usize,
    /// Data lines discarded as malformed.
    pub rejected_lines: usize,
    /// Sources that could not be opened or carried a wrong header.
    pub rejected_sources: usize,
}

impl IngestSummary {
    pub fn has_rejections(&self) -> bool {
        self.rejected_lines > 0 || self.rejected_sources > 0
    }

    /// The combined warning for rejected input, e.g.
    /// `"2 lines and 1 file could not be read."`; `None` if nothing was
    /// rejected.
    pub fn warning(&self) -> Option<String> {
        if !self.has_rejections() {
            return None;
        }
        Some(format!(
            "{} line{} and {} file{} could not be read.",
            self.rejected_lines,
            plural(self.rejected_lines),
            self.rejected_sources,
            plural(self.rejected_sources),
        ))
    }
}

/// The organised ledger together with the ingestion counts.
#[derive(Debug)]
pub struct LoadOutcome {
    pub ledger: MilkLedger,
    pub summary: IngestSummary,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Expand `inputs` into the list of sources to load.
///
/// Directories are searched recursively for `.csv` files (sorted by path).
/// Anything else is kept as given, so a missing file is still attempted and
/// counted as a rejected source.
pub fn discover_sources(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut sources = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            sources.push(input.clone());
            continue;
        }

        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(input)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .map(|ext| ext.eq_ignore_ascii_case("csv"))
                        .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();

        if files.is_empty() {
            warn!("No CSV files found in {}", input.display());
        }
        files.sort();
        sources.extend(files);
    }

    sources
}

/// Load every source in `paths` into a fresh ledger and organise it.
pub fn load_sources(paths: &[PathBuf]) -> LoadOutcome {
    let mut ledger = MilkLedger::new();
    let mut summary = IngestSummary::default();

    for path in paths {
        match open_source(path) {
            Ok(records) => ingest(&mut ledger, records, &mut summary),
            Err(rejected) => {
                warn!("Rejected source: {}", rejected);
                summary.rejected_sources += 1;
            }
        }
    }

    ledger.organize();

    info!(
        "Loaded {} entries from {} of {} sources ({} lines rejected)",
        summary.entries_accepted,
        summary.sources_read,
        paths.len(),
        summary.rejected_lines,
    );

    LoadOutcome { ledger, summary }
}

/// Drain one accepted source into `ledger`, updating `summary`.
///
/// The ledger is not organised here; callers do that once after the last
/// source.
pub fn ingest<R: BufRead>(
    ledger: &mut MilkLedger,
    records: SourceRecords<R>,
    summary: &mut IngestSummary,
) {
    let name = records.name().to_string();
    let mut accepted = 0usize;
    let mut rejected = 0usize;

    for record in records {
        match record {
            Ok(entry) => {
                ledger.insert(entry);
                accepted += 1;
            }
            Err(_) => rejected += 1,
        }
    }

    summary.sources_read += 1;
    summary.entries_accepted += accepted;
    summary.rejected_lines += rejected;

    debug!("Source {}: {} accepted, {} rejected", name, accepted, rejected);
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
