use crate::error::AllocationError;
use core_types::{Formula, IndicatorValues, IndicatorWeights};
use rust_decimal::Decimal;

/// Reduces a director's indicator values to a single calculated quota:
/// `compression_factor * sum(value * weight)`.
///
/// Weights are used exactly as given. Nothing is normalized or clamped, so
/// negative weights simply flow through the arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaScorer {
    formula: Formula,
}

impl QuotaScorer {
    pub fn new(formula: Formula) -> Self {
        Self { formula }
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Scores one set of indicator values.
    pub fn score(&self, indicators: &IndicatorValues) -> Result<Decimal, AllocationError> {
        let weights = &self.formula.weights;
        let weighted_sum = indicators
            .iter()
            .try_fold(Decimal::ZERO, |sum, (indicator, value)| {
                value
                    .checked_mul(weights.get(indicator))
                    .and_then(|term| sum.checked_add(term))
                    .ok_or_else(|| {
                        AllocationError::Calculation(format!(
                            "overflow while weighting {indicator} ({value})"
                        ))
                    })
            })?;

        weighted_sum
            .checked_mul(self.formula.compression_factor)
            .ok_or_else(|| {
                AllocationError::Calculation(format!(
                    "overflow while compressing weighted sum {weighted_sum}"
                ))
            })
    }
}

/// Scores raw positional vectors.
///
/// Both `values` and `weights` must hold exactly one entry per indicator;
/// anything else is rejected with a shape error instead of reading past the
/// shorter vector.
pub fn score_vectors(
    values: &[Decimal],
    weights: &[Decimal],
    compression_factor: Decimal,
) -> Result<Decimal, AllocationError> {
    let indicators = IndicatorValues::try_from(values)?;
    let weights = IndicatorWeights::try_from(weights)?;
    QuotaScorer::new(Formula::new(weights, compression_factor)).score(&indicators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CoreError;
    use rust_decimal_macros::dec;

    fn values(v: [Decimal; 5]) -> IndicatorValues {
        IndicatorValues::try_from(&v[..]).unwrap()
    }

    #[test]
    fn uniform_weights_average_the_indicators() {
        let scorer = QuotaScorer::new(Formula::new(
            IndicatorWeights::try_from(&[dec!(0.2); 5][..]).unwrap(),
            dec!(1.0),
        ));
        assert_eq!(scorer.score(&values([dec!(10); 5])).unwrap(), dec!(10));
        assert_eq!(scorer.score(&values([Decimal::ZERO; 5])).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn baseline_formula_applies_compression_after_the_sum() {
        let scorer = QuotaScorer::new(Formula::baseline());
        // 0.30*10 + 0.20*20 + 0.30*30 + 0.15*40 + 0.05*50 = 24.5, times 0.95
        let score = scorer
            .score(&values([dec!(10), dec!(20), dec!(30), dec!(40), dec!(50)]))
            .unwrap();
        assert_eq!(score, dec!(23.275));
    }

    #[test]
    fn negative_weights_are_not_clamped() {
        let weights = IndicatorWeights::new(dec!(1), dec!(-1), dec!(0), dec!(0), dec!(0));
        let scorer = QuotaScorer::new(Formula::new(weights, dec!(0.5)));
        let score = scorer
            .score(&values([dec!(2), dec!(6), dec!(1), dec!(1), dec!(1)]))
            .unwrap();
        assert_eq!(score, dec!(-2));
    }

    #[test]
    fn positional_vectors_must_match_the_indicator_count() {
        let err = score_vectors(&[dec!(1); 5], &[dec!(0.25); 4], dec!(1)).unwrap_err();
        assert_eq!(
            err,
            AllocationError::Shape(CoreError::ShapeMismatch { expected: 5, actual: 4 })
        );

        let err = score_vectors(&[dec!(1); 3], &[dec!(0.2); 5], dec!(1)).unwrap_err();
        assert!(matches!(err, AllocationError::Shape(_)));

        assert_eq!(score_vectors(&[dec!(1); 5], &[dec!(0.2); 5], dec!(1)).unwrap(), dec!(1));
    }

    #[test]
    fn overflow_is_reported_instead_of_panicking() {
        let scorer = QuotaScorer::new(Formula::new(
            IndicatorWeights::try_from(&[dec!(2); 5][..]).unwrap(),
            dec!(1),
        ));
        let err = scorer.score(&values([Decimal::MAX; 5])).unwrap_err();
        assert!(matches!(err, AllocationError::Calculation(_)));
    }
}
