//! Line-oriented parser for `date,farm_id,weight` sources.
//!
//! A source is accepted or rejected as a whole based on its header line.
//! Once accepted, every data line is attempted; malformed lines are reported
//! as [`RejectedLine`] items and never stop the iteration.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::{Path, PathBuf};

use milkweight_core::models::{parse_date, Entry};
use thiserror::Error;
use tracing::debug;

/// The exact header every source must start with.
pub const HEADER: &str = "date,farm_id,weight";

// ── Rejections ────────────────────────────────────────────────────────────────

/// A whole input source that was discarded.
#[derive(Error, Debug)]
pub enum RejectedSource {
    /// The source could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source contained no non-empty line at all.
    #[error("{name}: missing header line")]
    MissingHeader { name: String },

    /// The first non-empty line was not `date,farm_id,weight`.
    #[error("{name}: unexpected header '{found}'")]
    BadHeader { name: String, found: String },
}

/// Why a single data line was discarded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineRejection {
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),
    #[error("invalid date '{0}'")]
    BadDate(String),
    #[error("invalid weight '{0}'")]
    BadWeight(String),
    #[error("read error: {0}")]
    Io(String),
}

/// A single malformed data line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct RejectedLine {
    /// 1-based line number within the source.
    pub line: usize,
    pub reason: LineRejection,
}

// ── SourceRecords ─────────────────────────────────────────────────────────────

/// Lazy iterator over the records of one accepted source.
pub struct SourceRecords<R> {
    name: String,
    lines: Lines<R>,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> SourceRecords<R> {
    /// Validate the header of `reader` and return an iterator over its data
    /// lines.
    ///
    /// Leading blank lines are skipped. A UTF-8 byte order mark in front of
    /// the header is ignored.
    pub fn new(name: impl Into<String>, reader: R) -> Result<Self, RejectedSource> {
        let name = name.into();
        let mut lines = reader.lines();
        let mut line_number = 0;

        loop {
            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(source)) => {
                    return Err(RejectedSource::Unreadable {
                        path: PathBuf::from(name),
                        source,
                    })
                }
                None => return Err(RejectedSource::MissingHeader { name }),
            };
            line_number += 1;

            let header = line.trim().trim_start_matches('\u{feff}').trim();
            if header.is_empty() {
                continue;
            }
            if header != HEADER {
                return Err(RejectedSource::BadHeader {
                    name,
                    found: header.to_string(),
                });
            }
            break;
        }

        Ok(Self {
            name,
            lines,
            line_number,
            finished: false,
        })
    }

    /// Display name of the source (usually its path).
    pub fn name(&self) -> &str {
        &self.name
    }

    fn reject(&self, reason: LineRejection) -> RejectedLine {
        debug!("{}: rejected line {}: {}", self.name, self.line_number, reason);
        RejectedLine {
            line: self.line_number,
            reason,
        }
    }
}

impl<R: BufRead> Iterator for SourceRecords<R> {
    type Item = Result<Entry, RejectedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                // Invalid UTF-8 only spoils the current line; the reader has
                // already moved past it.
                Some(Err(e)) if e.kind() == ErrorKind::InvalidData => {
                    self.line_number += 1;
                    return Some(Err(self.reject(LineRejection::Io(e.to_string()))));
                }
                Some(Err(e)) => {
                    self.line_number += 1;
                    self.finished = true;
                    return Some(Err(self.reject(LineRejection::Io(e.to_string()))));
                }
                None => {
                    self.finished = true;
                    return None;
                }
            };
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(parse_line(trimmed).map_err(|reason| self.reject(reason)));
        }
    }
}

/// Open `path` and validate its header.
pub fn open_source(path: &Path) -> Result<SourceRecords<BufReader<File>>, RejectedSource> {
    let file = File::open(path).map_err(|source| RejectedSource::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    SourceRecords::new(path.display().to_string(), BufReader::new(file))
}

/// Parse one data line into an [`Entry`].
///
/// The line must hold exactly three comma-separated fields: a `Y-M-D` date,
/// a farm ID and a base-10 integer weight. Fields are trimmed.
pub fn parse_line(line: &str) -> Result<Entry, LineRejection> {
    let fields: Vec<&str> = line.split(',').collect();
    let [date, farm_id, weight] = fields.as_slice() else {
        return Err(LineRejection::FieldCount(fields.len()));
    };

    let date = parse_date(date).ok_or_else(|| LineRejection::BadDate(date.trim().to_string()))?;
    let weight = weight
        .trim()
        .parse::<i64>()
        .map_err(|_| LineRejection::BadWeight(weight.trim().to_string()))?;

    Ok(Entry::new(farm_id.trim(), date, weight))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::{Cursor, Read, Write};
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn records(text: &str) -> Result<SourceRecords<Cursor<Vec<u8>>>, RejectedSource> {
        SourceRecords::new("test.csv", Cursor::new(text.as_bytes().to_vec()))
    }

    fn split(text: &str) -> (Vec<Entry>, Vec<RejectedLine>) {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for record in records(text).unwrap() {
            match record {
                Ok(entry) => accepted.push(entry),
                Err(line) => rejected.push(line),
            }
        }
        (accepted, rejected)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Reader that yields its data and then fails instead of reporting EOF.
    struct FailAfter {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.data.read(buf)?;
            if n == 0 {
                Err(std::io::Error::new(ErrorKind::Other, "device went away"))
            } else {
                Ok(n)
            }
        }
    }

    // ── header ────────────────────────────────────────────────────────────────

    #[test]
    fn test_header_accepted() {
        let (accepted, rejected) = split("date,farm_id,weight\n2019-1-2,Farm 0,6305\n");
        assert_eq!(accepted, vec![Entry::new("Farm 0", date(2019, 1, 2), 6305)]);
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_wrong_header_rejects_source() {
        let result = records("id,weight,date\n2019-1-2,Farm 0,6305\n2019-1-3,Farm 0,6306\n");
        match result {
            Err(RejectedSource::BadHeader { name, found }) => {
                assert_eq!(name, "test.csv");
                assert_eq!(found, "id,weight,date");
            }
            Err(other) => panic!("unexpected rejection: {other}"),
            Ok(_) => panic!("source with wrong header must be rejected"),
        }
    }

    #[test]
    fn test_header_is_case_sensitive() {
        assert!(matches!(
            records("Date,Farm_ID,Weight\n"),
            Err(RejectedSource::BadHeader { .. })
        ));
    }

    #[test]
    fn test_header_with_spaces_between_columns_rejected() {
        assert!(records("date, farm_id, weight\n").is_err());
    }

    #[test]
    fn test_header_after_blank_lines_and_padding() {
        let (accepted, _) = split("\n   \n  date,farm_id,weight  \r\n2019-2-1,Farm 1,10\r\n");
        assert_eq!(accepted.len(), 1);
    }

    #[test]
    fn test_header_with_byte_order_mark() {
        let (accepted, _) = split("\u{feff}date,farm_id,weight\n2019-2-1,Farm 1,10\n");
        assert_eq!(accepted.len(), 1);
    }

    #[test]
    fn test_empty_source_missing_header() {
        assert!(matches!(
            records(""),
            Err(RejectedSource::MissingHeader { .. })
        ));
        assert!(matches!(
            records("\n\n  \n"),
            Err(RejectedSource::MissingHeader { .. })
        ));
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let (accepted, rejected) = split("date,farm_id,weight\n");
        assert!(accepted.is_empty());
        assert!(rejected.is_empty());
    }

    // ── data lines ────────────────────────────────────────────────────────────

    #[test]
    fn test_malformed_lines_counted_not_fatal() {
        let (accepted, rejected) = split(
            "date,farm_id,weight\n\
             2019-1-2,Farm A,500\n\
             bad,line,here,extra\n\
             2019-1-3,Farm A,notanumber\n",
        );
        assert_eq!(accepted, vec![Entry::new("Farm A", date(2019, 1, 2), 500)]);
        assert_eq!(rejected.len(), 2);
        assert_eq!(
            rejected[0],
            RejectedLine {
                line: 3,
                reason: LineRejection::FieldCount(4)
            }
        );
        assert_eq!(
            rejected[1],
            RejectedLine {
                line: 4,
                reason: LineRejection::BadWeight("notanumber".to_string())
            }
        );
    }

    #[test]
    fn test_processing_continues_after_rejection() {
        let (accepted, rejected) = split(
            "date,farm_id,weight\n\
             nonsense\n\
             2019-13-1,Farm 1,5\n\
             2019-1-5,Farm 1,5\n",
        );
        assert_eq!(accepted.len(), 1);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].reason, LineRejection::FieldCount(1));
        assert_eq!(
            rejected[1].reason,
            LineRejection::BadDate("2019-13-1".to_string())
        );
    }

    #[test]
    fn test_lenient_date_forms_rejected() {
        let (accepted, rejected) = split(
            "date,farm_id,weight\n\
             +2019-1-2,F,1\n\
             12019-1-2,F,1\n\
             2019- 1-2,F,1\n",
        );
        assert!(accepted.is_empty());
        let reasons: Vec<LineRejection> = rejected.into_iter().map(|r| r.reason).collect();
        assert_eq!(
            reasons,
            vec![
                LineRejection::BadDate("+2019-1-2".to_string()),
                LineRejection::BadDate("12019-1-2".to_string()),
                LineRejection::BadDate("2019- 1-2".to_string()),
            ]
        );
    }

    #[test]
    fn test_extreme_weights_accepted() {
        let (accepted, rejected) = split(&format!(
            "date,farm_id,weight\n2019-1-1,A,{}\n2019-1-1,B,{}\n",
            i64::MAX,
            i64::MIN
        ));
        assert!(rejected.is_empty());
        assert_eq!(accepted[0].weight, i64::MAX);
        assert_eq!(accepted[1].weight, i64::MIN);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let (accepted, _) = split("date,farm_id,weight\n 2019-01-02 ,  Farm 7 , 42 \n");
        assert_eq!(accepted, vec![Entry::new("Farm 7", date(2019, 1, 2), 42)]);
    }

    #[test]
    fn test_farm_id_is_case_sensitive() {
        let (accepted, _) = split("date,farm_id,weight\n2019-1-2,farm a,1\n2019-1-2,Farm A,1\n");
        assert_eq!(accepted[0].farm_id, "farm a");
        assert_eq!(accepted[1].farm_id, "Farm A");
    }

    #[test]
    fn test_trailing_comma_is_a_field_count_error() {
        let (_, rejected) = split("date,farm_id,weight\n2019-1-2,Farm 1,5,\n");
        assert_eq!(rejected[0].reason, LineRejection::FieldCount(4));
    }

    #[test]
    fn test_signed_and_negative_weights_pass_through() {
        let (accepted, rejected) = split("date,farm_id,weight\n2019-1-2,F,+12\n2019-1-3,F,-7\n");
        assert!(rejected.is_empty());
        assert_eq!(accepted[0].weight, 12);
        assert_eq!(accepted[1].weight, -7);
    }

    #[test]
    fn test_fractional_weight_rejected() {
        let (_, rejected) = split("date,farm_id,weight\n2019-1-2,F,12.5\n");
        assert_eq!(rejected[0].reason, LineRejection::BadWeight("12.5".to_string()));
    }

    #[test]
    fn test_blank_data_lines_skipped() {
        let (accepted, rejected) = split("date,farm_id,weight\n\n2019-1-2,F,1\n   \n2019-1-3,F,2\n");
        assert_eq!(accepted.len(), 2);
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_line_numbers_count_blank_lines() {
        let (_, rejected) = split("date,farm_id,weight\n\n\nbroken\n");
        assert_eq!(rejected[0].line, 4);
    }

    #[test]
    fn test_invalid_utf8_line_rejected_and_skipped() {
        let mut bytes = b"date,farm_id,weight\n2019-1-2,F,1\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b',', b'x', b'\n']);
        bytes.extend_from_slice(b"2019-1-3,F,2\n");
        let mut accepted = 0;
        let mut rejected = Vec::new();
        for record in SourceRecords::new("bytes", Cursor::new(bytes)).unwrap() {
            match record {
                Ok(_) => accepted += 1,
                Err(line) => rejected.push(line),
            }
        }
        assert_eq!(accepted, 2);
        assert_eq!(rejected.len(), 1);
        assert!(matches!(rejected[0].reason, LineRejection::Io(_)));
    }

    #[test]
    fn test_read_error_ends_source() {
        let reader = BufReader::new(FailAfter {
            data: Cursor::new(b"date,farm_id,weight\n2019-1-2,F,1\n".to_vec()),
        });
        let items: Vec<_> = SourceRecords::new("flaky", reader).unwrap().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(
            items[1],
            Err(RejectedLine {
                reason: LineRejection::Io(_),
                ..
            })
        ));
    }

    #[test]
    fn test_iterator_is_lazy() {
        let mut iter = records("date,farm_id,weight\n2019-1-2,F,1\nbad\n").unwrap();
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    // ── open_source ───────────────────────────────────────────────────────────

    #[test]
    fn test_open_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");
        match open_source(&path) {
            Err(RejectedSource::Unreadable { path: p, .. }) => assert_eq!(p, path),
            Err(other) => panic!("unexpected rejection: {other}"),
            Ok(_) => panic!("missing file must be rejected"),
        }
    }

    #[test]
    fn test_open_source_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("2019-1.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "date,farm_id,weight").unwrap();
        writeln!(file, "2019-1-1,Farm 0,6305").unwrap();
        writeln!(file, "2019-1-1,Farm 1,5916").unwrap();
        drop(file);

        let source = open_source(&path).unwrap();
        assert_eq!(source.name(), path.display().to_string());
        let entries: Vec<Entry> = source.filter_map(|r| r.ok()).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].weight, 5916);
    }

    // ── parse_line ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_line_empty_fields() {
        assert_eq!(
            parse_line(",,"),
            Err(LineRejection::BadDate(String::new()))
        );
        assert_eq!(
            parse_line("2019-1-1,,"),
            Err(LineRejection::BadWeight(String::new()))
        );
    }

    #[test]
    fn test_rejected_line_display() {
        let line = RejectedLine {
            line: 7,
            reason: LineRejection::BadDate("bad".to_string()),
        };
        assert_eq!(line.to_string(), "line 7: invalid date 'bad'");
    }
}
