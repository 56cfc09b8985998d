use crate::error::{AllocationError, DegenerateTotal};
use crate::report::{AllocationReport, CalculationResult, format_percentage};
use crate::scorer::QuotaScorer;
use core_types::{DirectorRecord, Formula, OriginalShareTable};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// A director's quotas under the caller's formula and the baseline formula.
#[derive(Debug, Clone, Copy)]
struct ScoredDirector<'a> {
    name: &'a str,
    calculated_quota: Decimal,
    baseline_quota: Decimal,
}

/// An intermediate per-director row, before the updated-share total is known.
#[derive(Debug)]
struct Allocation<'a> {
    scored: ScoredDirector<'a>,
    original_shares: u64,
    original_percentage: Decimal,
    new_shares_gained: i64,
    updated_shares: i64,
}

/// A stateless calculator that distributes a pool of new shares in
/// proportion to each director's calculated quota.
///
/// The baseline formula is part of the allocator's configuration rather than
/// a process-wide constant; `ShareAllocator::default()` uses the historical
/// weights (0.30, 0.20, 0.30, 0.15, 0.05) with compression 0.95.
#[derive(Debug, Clone, Default)]
pub struct ShareAllocator {
    baseline: Formula,
}

impl ShareAllocator {
    pub fn new(baseline: Formula) -> Self {
        Self { baseline }
    }

    pub fn baseline(&self) -> &Formula {
        &self.baseline
    }

    /// The main entry point for a calculation pass.
    ///
    /// # Arguments
    ///
    /// * `directors` - The indicator table. Output order follows this order.
    /// * `formula` - The caller's weights and compression factor.
    /// * `new_shares_total` - The pool of new shares to distribute.
    /// * `original_shares` - Historical holdings; absent names hold 0 shares.
    ///   Only directors present in `directors` count toward the original-share
    ///   total, so entries with no indicator row do not dilute the percentages.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AllocationReport`, or a
    /// `DegenerateInput` error when any of the three running totals is zero.
    pub fn calculate(
        &self,
        directors: &[DirectorRecord],
        formula: &Formula,
        new_shares_total: u64,
        original_shares: &OriginalShareTable,
    ) -> Result<AllocationReport, AllocationError> {
        let scored = self.score_directors(directors, formula)?;

        let total_final_score = checked_sum(scored.iter().map(|s| s.calculated_quota))?;
        if total_final_score.is_zero() {
            return Err(AllocationError::DegenerateInput(DegenerateTotal::FinalScore));
        }

        let holdings: Vec<u64> = scored
            .iter()
            .map(|s| lookup_shares(original_shares, s.name))
            .collect();
        let total_original_shares = holdings.iter().try_fold(0u64, |total, &shares| {
            total
                .checked_add(shares)
                .ok_or_else(|| AllocationError::Calculation("original share total overflows".to_string()))
        })?;
        if total_original_shares == 0 {
            return Err(AllocationError::DegenerateInput(DegenerateTotal::OriginalShares));
        }

        let pool = Decimal::from(new_shares_total);
        let allocations = scored
            .into_iter()
            .zip(holdings)
            .map(|(s, shares)| allocate(s, shares, total_original_shares, total_final_score, pool))
            .collect::<Result<Vec<_>, _>>()?;

        // Summed after per-director rounding, not derived from the pool.
        let total_updated_shares = checked_sum_i64(allocations.iter().map(|a| a.updated_shares))?;
        if total_updated_shares == 0 {
            return Err(AllocationError::DegenerateInput(DegenerateTotal::UpdatedShares));
        }
        let total_new_shares_gained = checked_sum_i64(allocations.iter().map(|a| a.new_shares_gained))?;

        let results = allocations
            .into_iter()
            .map(|a| -> Result<CalculationResult, AllocationError> {
                let final_percentage =
                    percentage_of(Decimal::from(a.updated_shares), Decimal::from(total_updated_shares))?;
                Ok(CalculationResult {
                    name: a.scored.name.to_string(),
                    original_shares: a.original_shares,
                    original_percentage: format_percentage(a.original_percentage),
                    new_shares_gained: a.new_shares_gained,
                    updated_shares: a.updated_shares,
                    final_percentage: format_percentage(final_percentage),
                    calculated_quota: a.scored.calculated_quota,
                    baseline_quota: a.scored.baseline_quota,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rounding_discrepancy = total_new_shares_gained
            - i64::try_from(new_shares_total)
                .map_err(|_| AllocationError::Calculation("new share pool too large".to_string()))?;

        tracing::info!(
            directors = results.len(),
            new_shares_total,
            total_new_shares_gained,
            rounding_discrepancy,
            total_updated_shares,
            "Share allocation complete."
        );

        Ok(AllocationReport {
            results,
            new_shares_total,
            total_new_shares_gained,
            rounding_discrepancy,
            total_original_shares,
            total_updated_shares,
        })
    }

    /// Runs the quota scorer twice per director: once with the caller's
    /// formula and once with the baseline.
    fn score_directors<'a>(
        &self,
        directors: &'a [DirectorRecord],
        formula: &Formula,
    ) -> Result<Vec<ScoredDirector<'a>>, AllocationError> {
        let final_scorer = QuotaScorer::new(*formula);
        let baseline_scorer = QuotaScorer::new(self.baseline);

        directors
            .iter()
            .map(|director| -> Result<ScoredDirector<'a>, AllocationError> {
                Ok(ScoredDirector {
                    name: director.name.as_str(),
                    calculated_quota: final_scorer.score(&director.indicators)?,
                    baseline_quota: baseline_scorer.score(&director.indicators)?,
                })
            })
            .collect()
    }
}

/// Computes everything for one director that does not depend on the
/// updated-share total.
fn allocate(
    scored: ScoredDirector<'_>,
    original_shares: u64,
    total_original_shares: u64,
    total_final_score: Decimal,
    pool: Decimal,
) -> Result<Allocation<'_>, AllocationError> {
    // quota / total * pool, multiplied first so exact halves stay exact.
    let exact_share = scored
        .calculated_quota
        .checked_mul(pool)
        .and_then(|v| v.checked_div(total_final_score))
        .ok_or_else(|| AllocationError::Calculation(format!("overflow allocating shares to {}", scored.name)))?;

    let new_shares_gained = exact_share
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| AllocationError::Calculation(format!("share count for {} out of range", scored.name)))?;

    let updated_shares = i64::try_from(original_shares)
        .ok()
        .and_then(|original| original.checked_add(new_shares_gained))
        .ok_or_else(|| AllocationError::Calculation(format!("updated shares for {} out of range", scored.name)))?;

    let original_percentage =
        percentage_of(Decimal::from(original_shares), Decimal::from(total_original_shares))?;

    tracing::debug!(
        director = scored.name,
        calculated_quota = %scored.calculated_quota,
        baseline_quota = %scored.baseline_quota,
        %exact_share,
        new_shares_gained,
        updated_shares,
        "Allocated new shares."
    );

    Ok(Allocation {
        scored,
        original_shares,
        original_percentage,
        new_shares_gained,
        updated_shares,
    })
}

fn lookup_shares(table: &OriginalShareTable, name: &str) -> u64 {
    if !table.contains(name) {
        tracing::debug!(director = name, "No original shares on record; counting 0.");
    }
    table.shares_for(name)
}

/// `100 * part / whole`. Callers have already rejected a zero `whole`.
fn percentage_of(part: Decimal, whole: Decimal) -> Result<Decimal, AllocationError> {
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|v| v.checked_div(whole))
        .ok_or_else(|| AllocationError::Calculation(format!("cannot express {part} as a percentage of {whole}")))
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>) -> Result<Decimal, AllocationError> {
    values.try_fold(Decimal::ZERO, |total, v| {
        total
            .checked_add(v)
            .ok_or_else(|| AllocationError::Calculation("quota total overflows".to_string()))
    })
}

fn checked_sum_i64(mut values: impl Iterator<Item = i64>) -> Result<i64, AllocationError> {
    values.try_fold(0i64, |total, v| {
        total
            .checked_add(v)
            .ok_or_else(|| AllocationError::Calculation("share total overflows".to_string()))
    })
}
