//! Run exports: Parquet files for queue samples and patient records, plus a
//! plain-text queue table for terminals.

use std::fmt::Write as _;

use crate::telemetry::QueueSample;

mod patient_records;
mod queue_samples;
mod utils;
mod validate;

pub use patient_records::write_patient_records_parquet;
pub use queue_samples::write_queue_samples_parquet;
pub use validate::validate_patient_timestamp_ordering;

const TABLE_HEADERS: [&str; 3] = ["time", "nurse_queue", "doctor_queue"];

/// Renders queue samples as a right-aligned table with a row index, one row
/// per sample in arrival order.
pub fn format_queue_table(samples: &[QueueSample]) -> String {
    let index_width = samples.len().saturating_sub(1).to_string().len();
    let rows: Vec<[String; 3]> = samples
        .iter()
        .map(|s| {
            [
                format!("{:.2}", s.time),
                s.nurse_queue_len.to_string(),
                s.doctor_queue_len.to_string(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let _ = write!(out, "{:index_width$}", "");
    for (header, width) in TABLE_HEADERS.iter().zip(widths) {
        let _ = write!(out, "  {header:>width$}");
    }
    out.push('\n');
    for (i, row) in rows.iter().enumerate() {
        let _ = write!(out, "{i:>index_width$}");
        for (cell, width) in row.iter().zip(widths) {
            let _ = write!(out, "  {cell:>width$}");
        }
        out.push('\n');
    }
    out
}
