//! Delimited-text report output.
//!
//! Serializes report rows to CSV with a fixed column set. Downstream
//! spreadsheet consumers depend on the exact column order and the presence
//! of the header row, so both are constants here. The `board` field is
//! carried internally for grouping but never emitted.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::types::ReportRow;

/// Output columns, in the order downstream consumers expect.
pub const REPORT_HEADERS: [&str; 8] = [
    "project",
    "member",
    "item",
    "progress",
    "date",
    "done",
    "todos",
    "additionalRate",
];

/// Errors that can occur while writing a report file.
#[derive(Debug, Error)]
pub enum WriterError {
    /// The output file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Serializes rows to CSV and writes them to `path`.
///
/// # Errors
///
/// Returns [`WriterError::Io`] when the file cannot be written; in that case
/// nothing is written, but files produced by earlier calls are not rolled
/// back.
pub fn write_report<'a, I>(path: &Path, rows: I) -> Result<(), WriterError>
where
    I: IntoIterator<Item = &'a ReportRow>,
{
    let csv = rows_to_csv(rows);
    fs::write(path, csv).map_err(|source| WriterError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Renders rows as CSV text, header line first.
pub fn rows_to_csv<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = &'a ReportRow>,
{
    let mut out = String::new();
    out.push_str(&REPORT_HEADERS.join(","));
    out.push('\n');

    for row in rows {
        let fields = [
            csv_escape(&row.project),
            csv_escape(&row.member),
            csv_escape(&row.item),
            format_ratio(row.progress),
            csv_escape(&row.date),
            csv_escape(&row.done),
            csv_escape(&row.todos),
            format_ratio(row.additional_rate),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}

/// Quotes a field when it contains a delimiter, quote, or line break;
/// embedded quotes are doubled.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Formats a ratio as a plain decimal. A non-finite value renders as `0` so
/// the output never carries a non-numeric token.
fn format_ratio(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        "0".to_string()
    }
}
