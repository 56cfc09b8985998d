use core_types::{Formula, IndicatorWeights};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `quota.toml`; missing sections fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub formula: FormulaSettings,
    /// The historical formula used for the "original" comparison run.
    pub baseline: Formula,
    pub validation: Validation,
    pub data: DataSettings,
    pub output: OutputSettings,
}

/// The formula and pool size a calculation starts from when no overrides
/// are given on the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormulaSettings {
    pub weights: IndicatorWeights,
    /// Multiplier applied after the weighted sum. Must lie in [0, 1].
    pub compression_factor: Decimal,
    /// The pool of new shares to distribute.
    pub new_shares_total: u64,
}

impl FormulaSettings {
    pub fn formula(&self) -> Formula {
        Formula::new(self.weights, self.compression_factor)
    }
}

impl Default for FormulaSettings {
    fn default() -> Self {
        let baseline = Formula::baseline();
        Self {
            weights: baseline.weights,
            compression_factor: baseline.compression_factor,
            new_shares_total: 1000,
        }
    }
}

/// Checks applied by the front end before the calculation runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Validation {
    /// How far the weight total may drift from 1.0.
    pub weight_tolerance: Decimal,
}

impl Default for Validation {
    fn default() -> Self {
        Self {
            weight_tolerance: dec!(0.001),
        }
    }
}

/// Where director data is read from. `None` selects the bundled dataset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub dataset_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Destination used by the `export` command when no path is given.
    pub csv_path: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            csv_path: PathBuf::from("imf_quota_calculation.csv"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}
