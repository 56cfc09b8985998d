use core_types::{CoreError, Indicator};
use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Indicator row for '{director}' is malformed: {source}")]
    Shape {
        director: String,
        #[source]
        source: CoreError,
    },

    #[error("Director '{director}' has a negative {indicator} value ({value})")]
    NegativeIndicator {
        director: String,
        indicator: Indicator,
        value: Decimal,
    },

    #[error("Director '{0}' appears more than once in the indicator table")]
    DuplicateDirector(String),

    #[error("Dataset contains a director with an empty name")]
    EmptyName,

    #[error("Dataset contains no directors")]
    Empty,
}
