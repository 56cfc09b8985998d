use allocation::{AllocationReport, CalculationResult};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

/// Keeps the results whose name contains `term`, ignoring case.
/// An empty or blank term keeps everything.
pub fn filter_by_name<'a>(results: &'a [CalculationResult], term: &str) -> Vec<&'a CalculationResult> {
    let needle = term.trim().to_lowercase();
    results
        .iter()
        .filter(|r| needle.is_empty() || r.name.to_lowercase().contains(&needle))
        .collect()
}

/// Formats a share count with comma thousands separators: `1234567` becomes `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn group_signed(value: i64) -> String {
    let grouped = group_thousands(value.unsigned_abs());
    if value < 0 { format!("-{grouped}") } else { grouped }
}

/// Renders the result rows as a terminal table.
pub fn render_table(results: &[&CalculationResult]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Director Name"),
            Cell::new("Original Shares").set_alignment(CellAlignment::Right),
            Cell::new("% of Original Shares").set_alignment(CellAlignment::Right),
            Cell::new("% of Final Share").set_alignment(CellAlignment::Right),
        ]);

    for result in results {
        table.add_row(vec![
            Cell::new(&result.name),
            Cell::new(group_thousands(result.original_shares)).set_alignment(CellAlignment::Right),
            Cell::new(&result.original_percentage).set_alignment(CellAlignment::Right),
            Cell::new(&result.final_percentage).set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

/// One line of pass-level totals shown under the table.
pub fn render_summary(report: &AllocationReport) -> String {
    let mut summary = format!(
        "New shares: {} (allocated {}) | Original total: {} | Updated total: {}",
        group_thousands(report.new_shares_total),
        group_signed(report.total_new_shares_gained),
        group_thousands(report.total_original_shares),
        group_signed(report.total_updated_shares),
    );
    if !report.is_reconciled() {
        summary.push_str(&format!(
            " | Rounding discrepancy: {:+}",
            report.rounding_discrepancy
        ));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn named(name: &str) -> CalculationResult {
        CalculationResult {
            name: name.to_string(),
            original_shares: 1_234_567,
            original_percentage: "50.00%".to_string(),
            new_shares_gained: 3,
            updated_shares: 1_234_570,
            final_percentage: "50.00%".to_string(),
            calculated_quota: dec!(2.5),
            baseline_quota: dec!(2.4),
        }
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(831_407), "831,407");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_signed(-12_345), "-12,345");
    }

    #[test]
    fn search_is_case_insensitive_and_keeps_order() {
        let results = vec![named("United States"), named("Japan"), named("United Kingdom")];

        let hits: Vec<&str> = filter_by_name(&results, "united")
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(hits, vec!["United States", "United Kingdom"]);

        assert_eq!(filter_by_name(&results, "  ").len(), 3);
        assert!(filter_by_name(&results, "brazil").is_empty());
    }

    #[test]
    fn table_shows_grouped_shares_and_percentages() {
        let results = vec![named("Japan")];
        let refs: Vec<&CalculationResult> = results.iter().collect();
        let rendered = render_table(&refs);

        assert!(rendered.contains("Director Name"));
        assert!(rendered.contains("% of Final Share"));
        assert!(rendered.contains("Japan"));
        assert!(rendered.contains("1,234,567"));
        assert!(rendered.contains("50.00%"));
    }

    #[test]
    fn summary_mentions_discrepancy_only_when_present() {
        let mut report = AllocationReport {
            results: vec![named("Japan")],
            new_shares_total: 1000,
            total_new_shares_gained: 1000,
            rounding_discrepancy: 0,
            total_original_shares: 2_000,
            total_updated_shares: 3_000,
        };
        assert!(!render_summary(&report).contains("discrepancy"));

        report.total_new_shares_gained = 999;
        report.rounding_discrepancy = -1;
        let summary = render_summary(&report);
        assert!(summary.contains("Rounding discrepancy: -1"), "{summary}");
        assert!(summary.contains("New shares: 1,000 (allocated 999)"));
    }
}
