use crate::enums::Indicator;
use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One director's raw indicator values, one named field per indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndicatorValues {
    pub gdp_mer: Decimal,
    pub gdp_ppp: Decimal,
    pub openness: Decimal,
    pub variability: Decimal,
    pub reserves: Decimal,
}

impl IndicatorValues {
    pub fn new(
        gdp_mer: Decimal,
        gdp_ppp: Decimal,
        openness: Decimal,
        variability: Decimal,
        reserves: Decimal,
    ) -> Self {
        Self {
            gdp_mer,
            gdp_ppp,
            openness,
            variability,
            reserves,
        }
    }

    /// Returns the value recorded for a single indicator.
    pub fn get(&self, indicator: Indicator) -> Decimal {
        match indicator {
            Indicator::GdpMer => self.gdp_mer,
            Indicator::GdpPpp => self.gdp_ppp,
            Indicator::Openness => self.openness,
            Indicator::Variability => self.variability,
            Indicator::Reserves => self.reserves,
        }
    }

    /// Iterates `(indicator, value)` pairs in positional order.
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, Decimal)> + '_ {
        Indicator::ALL.into_iter().map(move |i| (i, self.get(i)))
    }
}

impl TryFrom<&[Decimal]> for IndicatorValues {
    type Error = CoreError;

    fn try_from(values: &[Decimal]) -> Result<Self, Self::Error> {
        match values {
            [gdp_mer, gdp_ppp, openness, variability, reserves] => Ok(Self::new(
                *gdp_mer,
                *gdp_ppp,
                *openness,
                *variability,
                *reserves,
            )),
            _ => Err(CoreError::ShapeMismatch {
                expected: Indicator::COUNT,
                actual: values.len(),
            }),
        }
    }
}

/// The weight applied to each indicator by a quota formula.
///
/// Weights are expected to sum to 1.0, but nothing here normalizes or rejects
/// them; `is_balanced` lets callers check before calculating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndicatorWeights {
    pub gdp_mer: Decimal,
    pub gdp_ppp: Decimal,
    pub openness: Decimal,
    pub variability: Decimal,
    pub reserves: Decimal,
}

impl IndicatorWeights {
    pub fn new(
        gdp_mer: Decimal,
        gdp_ppp: Decimal,
        openness: Decimal,
        variability: Decimal,
        reserves: Decimal,
    ) -> Self {
        Self {
            gdp_mer,
            gdp_ppp,
            openness,
            variability,
            reserves,
        }
    }

    /// The historical weights: 30% GDP-MER, 20% GDP-PPP, 30% openness,
    /// 15% variability and 5% reserves.
    pub fn baseline() -> Self {
        Self::new(dec!(0.30), dec!(0.20), dec!(0.30), dec!(0.15), dec!(0.05))
    }

    pub fn get(&self, indicator: Indicator) -> Decimal {
        match indicator {
            Indicator::GdpMer => self.gdp_mer,
            Indicator::GdpPpp => self.gdp_ppp,
            Indicator::Openness => self.openness,
            Indicator::Variability => self.variability,
            Indicator::Reserves => self.reserves,
        }
    }

    /// Returns a copy with a single indicator's weight replaced.
    pub fn with(mut self, indicator: Indicator, weight: Decimal) -> Self {
        match indicator {
            Indicator::GdpMer => self.gdp_mer = weight,
            Indicator::GdpPpp => self.gdp_ppp = weight,
            Indicator::Openness => self.openness = weight,
            Indicator::Variability => self.variability = weight,
            Indicator::Reserves => self.reserves = weight,
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Indicator, Decimal)> + '_ {
        Indicator::ALL.into_iter().map(move |i| (i, self.get(i)))
    }

    /// Sum of all five weights. Fails instead of panicking when the
    /// weights are too large to add up.
    pub fn total(&self) -> Result<Decimal, CoreError> {
        self.iter().try_fold(Decimal::ZERO, |sum, (_, w)| {
            sum.checked_add(w)
                .ok_or(CoreError::Overflow("summing the indicator weights"))
        })
    }

    /// True when the weights sum to 1.0 within `tolerance` (exclusive).
    /// A total that overflows is never balanced.
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        self.total()
            .ok()
            .and_then(|total| total.checked_sub(Decimal::ONE))
            .is_some_and(|gap| gap.abs() < tolerance)
    }
}

impl Default for IndicatorWeights {
    fn default() -> Self {
        Self::baseline()
    }
}

impl TryFrom<&[Decimal]> for IndicatorWeights {
    type Error = CoreError;

    fn try_from(weights: &[Decimal]) -> Result<Self, Self::Error> {
        match weights {
            [gdp_mer, gdp_ppp, openness, variability, reserves] => Ok(Self::new(
                *gdp_mer,
                *gdp_ppp,
                *openness,
                *variability,
                *reserves,
            )),
            _ => Err(CoreError::ShapeMismatch {
                expected: Indicator::COUNT,
                actual: weights.len(),
            }),
        }
    }
}

/// A complete quota formula: indicator weights plus the compression factor
/// applied to the weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Formula {
    pub weights: IndicatorWeights,
    pub compression_factor: Decimal,
}

impl Formula {
    pub fn new(weights: IndicatorWeights, compression_factor: Decimal) -> Self {
        Self {
            weights,
            compression_factor,
        }
    }

    /// The historical formula used for the "original" comparison run.
    pub fn baseline() -> Self {
        Self::new(IndicatorWeights::baseline(), dec!(0.95))
    }
}

impl Default for Formula {
    fn default() -> Self {
        Self::baseline()
    }
}

/// A named director together with the indicator values of the constituency
/// they represent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorRecord {
    pub name: String,
    pub indicators: IndicatorValues,
}

impl DirectorRecord {
    pub fn new(name: impl Into<String>, indicators: IndicatorValues) -> Self {
        Self {
            name: name.into(),
            indicators,
        }
    }
}

/// Historical share counts keyed by director name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OriginalShareTable {
    shares: HashMap<String, u64>,
}

impl OriginalShareTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, shares: u64) -> Option<u64> {
        self.shares.insert(name.into(), shares)
    }

    /// Share count for `name`; directors missing from the table hold 0 shares.
    pub fn shares_for(&self, name: &str) -> u64 {
        self.shares.get(name).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shares.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for OriginalShareTable {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        Self {
            shares: iter.into_iter().map(|(name, n)| (name.into(), n)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_values_require_five_positions() {
        let four = [dec!(1), dec!(2), dec!(3), dec!(4)];
        let err = IndicatorValues::try_from(&four[..]).unwrap_err();
        assert_eq!(err, CoreError::ShapeMismatch { expected: 5, actual: 4 });

        let five = [dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)];
        let values = IndicatorValues::try_from(&five[..]).unwrap();
        assert_eq!(values.get(Indicator::Openness), dec!(3));
        assert_eq!(values.reserves, dec!(5));
    }

    #[test]
    fn weights_reject_extra_positions() {
        let six = [dec!(0.2); 6];
        assert!(matches!(
            IndicatorWeights::try_from(&six[..]),
            Err(CoreError::ShapeMismatch { expected: 5, actual: 6 })
        ));
    }

    #[test]
    fn baseline_weights_are_balanced() {
        let weights = IndicatorWeights::baseline();
        assert_eq!(weights.total().unwrap(), dec!(1.00));
        assert!(weights.is_balanced(dec!(0.001)));
        assert_eq!(Formula::baseline().compression_factor, dec!(0.95));
    }

    #[test]
    fn unbalanced_weights_are_detected_but_kept() {
        let weights = IndicatorWeights::baseline().with(Indicator::Reserves, dec!(0.10));
        assert_eq!(weights.reserves, dec!(0.10));
        assert_eq!(weights.total().unwrap(), dec!(1.05));
        assert!(!weights.is_balanced(dec!(0.001)));
        // Just inside the tolerance band.
        let close = IndicatorWeights::baseline().with(Indicator::Reserves, dec!(0.0505));
        assert!(close.is_balanced(dec!(0.001)));
    }

    #[test]
    fn oversized_weights_overflow_instead_of_panicking() {
        let weights = IndicatorWeights::baseline()
            .with(Indicator::GdpMer, Decimal::MAX)
            .with(Indicator::GdpPpp, Decimal::MAX);
        assert!(matches!(weights.total(), Err(CoreError::Overflow(_))));
        assert!(!weights.is_balanced(dec!(0.001)));
    }

    #[test]
    fn missing_director_holds_no_shares() {
        let table: OriginalShareTable = [("Alpha", 120u64), ("Beta", 80)].into_iter().collect();
        assert_eq!(table.shares_for("Alpha"), 120);
        assert_eq!(table.shares_for("Gamma"), 0);
        assert!(!table.contains("Gamma"));
        assert_eq!(table.len(), 2);
    }
}
