use crate::error::ReportError;
use allocation::CalculationResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Header row of every exported file.
pub const CSV_HEADERS: [&str; 4] = [
    "Director Name",
    "Original Shares",
    "% of Original Shares",
    "% of Final Share",
];

/// File name used when the caller does not choose one.
pub const DEFAULT_EXPORT_FILE: &str = "imf_quota_calculation.csv";

/// Renders results as CSV: the header row, then one row per result in the
/// given order. Lines are joined by `\n` with no trailing newline, and only
/// the name column is quoted.
pub fn to_csv(results: &[CalculationResult]) -> String {
    std::iter::once(CSV_HEADERS.join(","))
        .chain(results.iter().map(csv_row))
        .collect::<Vec<_>>()
        .join("\n")
}

fn csv_row(result: &CalculationResult) -> String {
    format!(
        "{},{},{},{}",
        quote(&result.name),
        result.original_shares,
        result.original_percentage,
        result.final_percentage
    )
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Writes the CSV rendering of `results` to `writer`.
pub fn write_csv<W: Write>(mut writer: W, results: &[CalculationResult]) -> Result<(), ReportError> {
    if results.is_empty() {
        return Err(ReportError::NothingToExport);
    }
    writer.write_all(to_csv(results).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the CSV export into it.
pub fn export_csv(path: &Path, results: &[CalculationResult]) -> Result<(), ReportError> {
    if results.is_empty() {
        return Err(ReportError::NothingToExport);
    }
    let file = File::create(path).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(BufWriter::new(file), results).map_err(|err| match err {
        ReportError::Io(source) => ReportError::Write {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    tracing::info!(path = %path.display(), rows = results.len(), "Exported results to CSV.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn result(name: &str, original: u64, original_pct: &str, final_pct: &str) -> CalculationResult {
        CalculationResult {
            name: name.to_string(),
            original_shares: original,
            original_percentage: original_pct.to_string(),
            new_shares_gained: 0,
            updated_shares: original as i64,
            final_percentage: final_pct.to_string(),
            calculated_quota: dec!(1),
            baseline_quota: dec!(1),
        }
    }

    #[test]
    fn header_and_rows_in_order() {
        let csv = to_csv(&[
            result("A", 50, "50.00%", "75.00%"),
            result("B", 50, "50.00%", "25.00%"),
        ]);
        assert_eq!(
            csv,
            "Director Name,Original Shares,% of Original Shares,% of Final Share\n\
             \"A\",50,50.00%,75.00%\n\
             \"B\",50,50.00%,25.00%"
        );
    }

    #[test]
    fn names_with_commas_stay_in_one_column() {
        let csv = to_csv(&[result("Korea, Republic of", 1200, "100.00%", "100.00%")]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "\"Korea, Republic of\",1200,100.00%,100.00%");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let csv = to_csv(&[result("The \"Nordic\" chair", 1, "100.00%", "100.00%")]);
        assert!(csv.ends_with("\"The \"\"Nordic\"\" chair\",1,100.00%,100.00%"));
    }

    #[test]
    fn empty_results_are_not_exported() {
        let mut buffer = Vec::new();
        assert!(matches!(write_csv(&mut buffer, &[]), Err(ReportError::NothingToExport)));
        assert!(buffer.is_empty());
        assert_eq!(to_csv(&[]), CSV_HEADERS.join(","));
    }
}
