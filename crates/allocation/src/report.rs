use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// The outcome of one calculation pass for a single director.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub name: String,
    pub original_shares: u64,
    /// Share of the original-share total, e.g. `"12.50%"`.
    pub original_percentage: String,
    pub new_shares_gained: i64,
    /// `original_shares + new_shares_gained`.
    pub updated_shares: i64,
    /// Share of the updated-share total, e.g. `"13.07%"`.
    pub final_percentage: String,
    /// Quota produced by the caller's formula.
    pub calculated_quota: Decimal,
    /// Quota produced by the baseline formula, kept for comparison.
    pub baseline_quota: Decimal,
}

/// All per-director results of a calculation pass, in input order, together
/// with the pass-level totals.
///
/// New shares are rounded per director, independently. Their sum can
/// therefore miss `new_shares_total` by a few shares; `rounding_discrepancy`
/// records by how much. The gap is reported, never redistributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub results: Vec<CalculationResult>,
    pub new_shares_total: u64,
    pub total_new_shares_gained: i64,
    /// `total_new_shares_gained - new_shares_total`.
    pub rounding_discrepancy: i64,
    pub total_original_shares: u64,
    pub total_updated_shares: i64,
}

impl AllocationReport {
    /// True when the rounded allocations add up to exactly the pool size.
    pub fn is_reconciled(&self) -> bool {
        self.rounding_discrepancy == 0
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CalculationResult> {
        self.results.iter()
    }

    /// Looks a director's result up by exact name.
    pub fn get(&self, name: &str) -> Option<&CalculationResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

impl<'a> IntoIterator for &'a AllocationReport {
    type Item = &'a CalculationResult;
    type IntoIter = std::slice::Iter<'a, CalculationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Formats a percentage with exactly two decimals and a `%` suffix,
/// rounding half away from zero: `12.345` becomes `"12.35%"`.
pub fn format_percentage(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("{rounded}%")
}

/// Parses a string produced by [`format_percentage`] back into a number.
pub fn parse_percentage(formatted: &str) -> Option<Decimal> {
    formatted.strip_suffix('%')?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn percentages_always_carry_two_decimals() {
        assert_eq!(format_percentage(dec!(75)), "75.00%");
        assert_eq!(format_percentage(dec!(0)), "0.00%");
        assert_eq!(format_percentage(dec!(33.333333)), "33.33%");
        assert_eq!(format_percentage(dec!(66.666666)), "66.67%");
        assert_eq!(format_percentage(dec!(12.345)), "12.35%");
        assert_eq!(format_percentage(dec!(100)), "100.00%");
    }

    #[test]
    fn formatted_percentages_parse_back() {
        assert_eq!(parse_percentage("25.00%"), Some(dec!(25)));
        assert_eq!(parse_percentage("25.00"), None);
        assert_eq!(parse_percentage("abc%"), None);
    }
}
