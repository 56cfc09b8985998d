//! Presentation of allocation results: terminal tables, JSON and the CSV
//! export format.

pub mod csv;
pub mod error;
pub mod table;

pub use csv::{CSV_HEADERS, DEFAULT_EXPORT_FILE, export_csv, to_csv, write_csv};
pub use error::ReportError;
pub use table::{filter_by_name, group_thousands, render_summary, render_table};

use allocation::AllocationReport;

/// Pretty-printed JSON of the full report, including the raw quotas.
pub fn to_json(report: &AllocationReport) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}
