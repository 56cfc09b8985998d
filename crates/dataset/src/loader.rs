use crate::error::DatasetError;
use core_types::{DirectorRecord, IndicatorValues, OriginalShareTable};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// The illustrative dataset compiled into the binary.
const BUNDLED_DATASET: &str = include_str!("../data/directors.json");

/// On-disk layout of a dataset file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDataset {
    directors: Vec<RawDirector>,
    #[serde(default)]
    original_shares: HashMap<String, u64>,
}

/// One indicator row, values in positional order
/// (GDP-MER, GDP-PPP, Openness, Variability, Reserves).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDirector {
    name: String,
    indicators: Vec<Decimal>,
}

/// The static reference data for one calculation: the ordered indicator
/// table and the historical share table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    directors: Vec<DirectorRecord>,
    original_shares: OriginalShareTable,
}

impl Dataset {
    /// Builds a dataset from already-validated parts.
    pub fn new(directors: Vec<DirectorRecord>, original_shares: OriginalShareTable) -> Self {
        Self {
            directors,
            original_shares,
        }
    }

    /// Loads the dataset shipped with the application.
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::from_json_str(BUNDLED_DATASET)
    }

    /// Reads and validates a dataset file.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            directors = dataset.directors.len(),
            "Loaded director dataset."
        );
        Ok(dataset)
    }

    /// Loads `path` when given, otherwise the bundled dataset.
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self, DatasetError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("No dataset path configured; using the bundled dataset.");
                Self::bundled()
            }
        }
    }

    /// Parses and validates a dataset from its JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_json::from_str(json)?;
        if raw.directors.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut seen = HashSet::new();
        let directors = raw
            .directors
            .into_iter()
            .map(|row| -> Result<DirectorRecord, DatasetError> {
                let name = row.name.trim().to_string();
                if name.is_empty() {
                    return Err(DatasetError::EmptyName);
                }
                if !seen.insert(name.clone()) {
                    return Err(DatasetError::DuplicateDirector(name));
                }
                let indicators = IndicatorValues::try_from(row.indicators.as_slice()).map_err(|source| {
                    DatasetError::Shape {
                        director: name.clone(),
                        source,
                    }
                })?;
                if let Some((indicator, value)) = indicators.iter().find(|(_, v)| v.is_sign_negative()) {
                    return Err(DatasetError::NegativeIndicator {
                        director: name,
                        indicator,
                        value,
                    });
                }
                Ok(DirectorRecord::new(name, indicators))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for name in raw.original_shares.keys().filter(|n| !seen.contains(n.as_str())) {
            tracing::debug!(director = %name, "Original shares listed for a director with no indicator row.");
        }

        Ok(Self {
            directors,
            original_shares: raw.original_shares.into_iter().collect(),
        })
    }

    /// The indicator table, in file order.
    pub fn directors(&self) -> &[DirectorRecord] {
        &self.directors
    }

    pub fn original_shares(&self) -> &OriginalShareTable {
        &self.original_shares
    }
}
