//! Aligned terminal table for a [`Report`].
//!
//! One row per farm (or per month for the farm report) plus a totals row
//! under a rule. Column widths are measured in display cells so farm IDs
//! with wide characters stay aligned.

use milkweight_core::formatting::{format_percent, format_weight};
use unicode_width::UnicodeWidthStr;

use crate::Report;

const COLUMN_GAP: &str = "  ";

type Row = [String; 3];

/// Render `report` as a titled table with a totals row.
pub fn render_table(report: &Report) -> String {
    let (headers, rows, totals) = match report {
        Report::Monthly { report, .. }
        | Report::Annual { report, .. }
        | Report::DateRange { report, .. } => {
            let rows = report
                .shares
                .iter()
                .map(|s| {
                    [
                        s.farm_id.clone(),
                        format_weight(s.total_weight),
                        format_percent(s.percent),
                    ]
                })
                .collect::<Vec<Row>>();
            let totals = [
                format!("Total ({} entries)", report.entry_count),
                format_weight(report.total_weight),
                total_percent(report.total_weight),
            ];
            (["Farm ID", "Total Weight", "Percent"], rows, totals)
        }
        Report::Farm { report } => {
            let rows = report
                .months
                .iter()
                .map(|m| {
                    [
                        m.month_name.to_string(),
                        format_weight(m.total_weight),
                        format_percent(m.percent),
                    ]
                })
                .collect::<Vec<Row>>();
            let totals = [
                "Total".to_string(),
                format_weight(report.total_weight),
                total_percent(report.total_weight),
            ];
            (["Month", "Weight", "Percent"], rows, totals)
        }
    };

    layout(&report.title(), headers, &rows, &totals)
}

fn total_percent(total_weight: i64) -> String {
    if total_weight == 0 {
        format_percent(0.0)
    } else {
        format_percent(100.0)
    }
}

fn layout(title: &str, headers: [&str; 3], rows: &[Row], totals: &Row) -> String {
    let mut widths = headers.map(|h| h.width());
    for row in rows.iter().chain(std::iter::once(totals)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }
    let line_width: usize = widths.iter().sum::<usize>() + COLUMN_GAP.len() * (widths.len() - 1);
    let rule = "─".repeat(line_width);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    push_row(&mut out, &headers.map(str::to_string), &widths);
    out.push_str(&rule);
    out.push('\n');
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out.push_str(&rule);
    out.push('\n');
    push_row(&mut out, totals, &widths);
    out
}

// First column left-aligned, numeric columns right-aligned.
fn push_row(out: &mut String, row: &Row, widths: &[usize; 3]) {
    let mut cells = Vec::with_capacity(row.len());
    for (i, (cell, &width)) in row.iter().zip(widths).enumerate() {
        let pad = " ".repeat(width.saturating_sub(cell.width()));
        if i == 0 {
            cells.push(format!("{cell}{pad}"));
        } else {
            cells.push(format!("{pad}{cell}"));
        }
    }
    out.push_str(cells.join(COLUMN_GAP).trim_end());
    out.push('\n');
}
