use crate::error::ConfigError;
use rust_decimal::Decimal;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DataSettings, FormulaSettings, OutputFormat, OutputSettings, Validation};

/// Base name of the optional configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "quota";

/// Prefix for environment overrides, e.g. `QUOTA_FORMULA__NEW_SHARES_TOTAL=500`.
pub const ENV_PREFIX: &str = "QUOTA";

/// Loads the application configuration.
///
/// Sources are layered as: built-in defaults, then the TOML file at `path`
/// (or an optional `quota.toml` in the working directory when `path` is
/// `None`), then `QUOTA_`-prefixed environment variables. The merged result
/// is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded.");
    Ok(config)
}

impl Config {
    /// Checks the values that the calculation cannot sensibly run with.
    ///
    /// Weight totals are deliberately not checked here; the front end
    /// decides whether an unbalanced formula may still be calculated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_compression("formula.compression_factor", self.formula.compression_factor)?;
        check_compression("baseline.compression_factor", self.baseline.compression_factor)?;

        if self.validation.weight_tolerance.is_sign_negative() {
            return Err(ConfigError::ValidationError(format!(
                "validation.weight_tolerance must not be negative (got {})",
                self.validation.weight_tolerance
            )));
        }
        Ok(())
    }
}

/// Rejects a compression factor outside of [0, 1].
pub fn check_compression(field: &str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigError::ValidationError(format!(
            "{field} must be between 0 and 1 (got {value})"
        )));
    }
    Ok(())
}
