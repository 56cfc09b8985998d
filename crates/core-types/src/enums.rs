use serde::{Deserialize, Serialize};
use std::fmt;

/// The five economic indicators that feed the quota formula.
///
/// The declaration order is the positional order used whenever indicators or
/// weights are read from a plain sequence (dataset files, CLI lists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    GdpMer,
    GdpPpp,
    Openness,
    Variability,
    Reserves,
}

impl Indicator {
    /// All indicators in positional order.
    pub const ALL: [Indicator; 5] = [
        Indicator::GdpMer,
        Indicator::GdpPpp,
        Indicator::Openness,
        Indicator::Variability,
        Indicator::Reserves,
    ];

    /// Number of indicator positions in every record and weight vector.
    pub const COUNT: usize = Self::ALL.len();

    /// The short label shown in tables and CSV headers.
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::GdpMer => "GDP-MER",
            Indicator::GdpPpp => "GDP-PPP",
            Indicator::Openness => "Openness",
            Indicator::Variability => "Variability",
            Indicator::Reserves => "Reserves",
        }
    }

    /// A one-sentence explanation of what the indicator measures.
    pub fn description(&self) -> &'static str {
        match self {
            Indicator::GdpMer => {
                "Gross Domestic Product at Market Exchange Rates - measures a country's economic output in current US dollars."
            }
            Indicator::GdpPpp => {
                "Gross Domestic Product at Purchasing Power Parity - adjusts a country's GDP for differences in price levels."
            }
            Indicator::Openness => {
                "Measure of a country's integration with the global economy through trade and financial flows."
            }
            Indicator::Variability => {
                "Reflects the volatility in a country's external receipts and net capital flows."
            }
            Indicator::Reserves => {
                "A country's official reserves including foreign exchange, gold, and SDRs."
            }
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
