use core_types::CoreError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Invalid input shape: {0}")]
    Shape(#[from] CoreError),

    #[error("Cannot calculate: {0} is zero, so the percentages are undefined")]
    DegenerateInput(DegenerateTotal),

    #[error("Calculation error: {0}")]
    Calculation(String),
}

/// The running total that came out as zero in a degenerate calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DegenerateTotal {
    /// Every calculated quota is zero (or they cancel out), usually because
    /// the weights produce a zero total.
    FinalScore,
    /// No director in the indicator table holds any original shares.
    OriginalShares,
    /// Original plus newly gained shares sum to zero.
    UpdatedShares,
}

impl fmt::Display for DegenerateTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DegenerateTotal::FinalScore => "the total calculated quota",
            DegenerateTotal::OriginalShares => "the total of original shares",
            DegenerateTotal::UpdatedShares => "the total of updated shares",
        };
        f.write_str(name)
    }
}
