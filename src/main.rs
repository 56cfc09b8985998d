use allocation::{AllocationReport, ShareAllocator};
use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use configuration::{Config, OutputFormat, check_compression, load_config};
use core_types::{Formula, Indicator, IndicatorWeights};
use dataset::Dataset;
use reporter::{export_csv, filter_by_name, render_summary, render_table, to_csv, to_json};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the quota reform calculator.
fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; it only carries optional overrides.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install the tracing subscriber")?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Calculate(args) => handle_calculate(args, &config),
        Commands::Export(args) => handle_export(args, &config),
        Commands::Indicators => {
            println!("{}", render_indicators(&config.formula.weights, &config.baseline.weights));
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Recalculates IMF quota shares for a chosen formula and distributes new shares.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./quota.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate quotas and print the results.
    Calculate(CalculateArgs),
    /// Calculate quotas and write every result row to a CSV file.
    Export(ExportArgs),
    /// List the formula indicators with their configured weights.
    Indicators,
}

/// Formula and data inputs shared by `calculate` and `export`.
#[derive(Args, Debug, Default)]
struct FormulaArgs {
    /// All five weights in indicator order, e.g. "0.3,0.2,0.3,0.15,0.05".
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    weights: Option<Vec<Decimal>>,

    /// Weight of GDP at market exchange rates.
    #[arg(long)]
    gdp_mer: Option<Decimal>,

    /// Weight of GDP at purchasing power parity.
    #[arg(long)]
    gdp_ppp: Option<Decimal>,

    /// Weight of economic openness.
    #[arg(long)]
    openness: Option<Decimal>,

    /// Weight of economic variability.
    #[arg(long)]
    variability: Option<Decimal>,

    /// Weight of international reserves.
    #[arg(long)]
    reserves: Option<Decimal>,

    /// Compression factor between 0 and 1.
    #[arg(long)]
    compression: Option<Decimal>,

    /// Number of new shares to distribute.
    #[arg(long)]
    new_shares: Option<u64>,

    /// JSON dataset of directors and original shares (the bundled dataset by default).
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Calculate even when the weights do not sum to 1.
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct CalculateArgs {
    #[command(flatten)]
    formula: FormulaArgs,

    /// Only show directors whose name contains this text (table output).
    #[arg(long)]
    search: Option<String>,

    /// Output format; overrides output.format from the configuration.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Parser)]
struct ExportArgs {
    #[command(flatten)]
    formula: FormulaArgs,

    /// Destination CSV file; overrides output.csv_path from the configuration.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

// ==============================================================================
// Formula Resolution
// ==============================================================================

/// The inputs of one calculation after command-line overrides are applied.
#[derive(Debug)]
struct Scenario {
    formula: Formula,
    weight_total: Decimal,
    new_shares_total: u64,
    dataset: Option<PathBuf>,
}

impl FormulaArgs {
    /// Layers the command-line values over the configured formula and checks the result.
    fn resolve(&self, config: &Config) -> anyhow::Result<Scenario> {
        let mut weights = match &self.weights {
            Some(list) => IndicatorWeights::try_from(list.as_slice())
                .context("--weights needs one value per indicator")?,
            None => config.formula.weights,
        };

        let overrides = [
            (Indicator::GdpMer, self.gdp_mer),
            (Indicator::GdpPpp, self.gdp_ppp),
            (Indicator::Openness, self.openness),
            (Indicator::Variability, self.variability),
            (Indicator::Reserves, self.reserves),
        ];
        for (indicator, weight) in overrides {
            if let Some(weight) = weight {
                weights = weights.with(indicator, weight);
            }
        }

        let compression = self.compression.unwrap_or(config.formula.compression_factor);
        check_compression("--compression", compression)?;

        let total = weights
            .total()
            .context("The weights are too large to add up; check the weight flags")?;
        if !weights.is_balanced(config.validation.weight_tolerance) {
            if !self.force {
                bail!("Total weight is {total:.2}, it should sum to 1.00 (pass --force to calculate anyway)");
            }
            tracing::warn!(%total, "Calculating with weights that do not sum to 1.");
        }

        Ok(Scenario {
            formula: Formula::new(weights, compression),
            weight_total: total,
            new_shares_total: self.new_shares.unwrap_or(config.formula.new_shares_total),
            dataset: self.dataset.clone().or_else(|| config.data.dataset_path.clone()),
        })
    }
}

impl Scenario {
    fn run(&self, config: &Config) -> anyhow::Result<AllocationReport> {
        let data = Dataset::load_or_bundled(self.dataset.as_deref())
            .context("Failed to load the director dataset")?;

        let report = ShareAllocator::new(config.baseline)
            .calculate(
                data.directors(),
                &self.formula,
                self.new_shares_total,
                data.original_shares(),
            )
            .context("Quota calculation failed")?;
        Ok(report)
    }
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_calculate(args: CalculateArgs, config: &Config) -> anyhow::Result<()> {
    let scenario = args.formula.resolve(config)?;
    let report = scenario.run(config)?;
    let format = args.format.unwrap_or(config.output.format);

    match format {
        OutputFormat::Table => {
            println!("Total weight: {:.2}", scenario.weight_total);
            let term = args.search.as_deref().unwrap_or("");
            let rows = filter_by_name(&report.results, term);
            if rows.is_empty() {
                println!("No directors match \"{}\".", term.trim());
            } else {
                println!("{}", render_table(&rows));
            }
            println!("{}", render_summary(&report));
        }
        OutputFormat::Json => {
            if args.search.is_some() {
                tracing::warn!("--search only filters the table output; printing every row.");
            }
            println!("{}", to_json(&report)?);
        }
        OutputFormat::Csv => {
            if args.search.is_some() {
                tracing::warn!("--search only filters the table output; printing every row.");
            }
            println!("{}", to_csv(&report.results));
        }
    }
    Ok(())
}

fn handle_export(args: ExportArgs, config: &Config) -> anyhow::Result<()> {
    let report = args.formula.resolve(config)?.run(config)?;
    let path = args.output.unwrap_or_else(|| config.output.csv_path.clone());

    export_csv(&path, &report.results)?;
    println!("Exported {} rows to {}", report.len(), path.display());
    Ok(())
}

fn render_indicators(configured: &IndicatorWeights, baseline: &IndicatorWeights) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        Cell::new("Indicator"),
        Cell::new("Weight").set_alignment(CellAlignment::Right),
        Cell::new("Baseline").set_alignment(CellAlignment::Right),
        Cell::new("Description"),
    ]);

    for indicator in Indicator::ALL {
        table.add_row(vec![
            Cell::new(indicator.label()),
            Cell::new(configured.get(indicator)).set_alignment(CellAlignment::Right),
            Cell::new(baseline.get(indicator)).set_alignment(CellAlignment::Right),
            Cell::new(indicator.description()),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(display_total(configured)).set_alignment(CellAlignment::Right),
        Cell::new(display_total(baseline)).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table.to_string()
}

fn display_total(weights: &IndicatorWeights) -> String {
    weights
        .total()
        .map_or_else(|_| "out of range".to_string(), |total| total.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("quota-reform").chain(args.iter().copied())).unwrap()
    }

    fn calculate_args(args: &[&str]) -> CalculateArgs {
        match parse(args).command {
            Commands::Calculate(args) => args,
            _ => panic!("expected the calculate command"),
        }
    }

    #[test]
    fn defaults_come_from_the_configuration() {
        let args = calculate_args(&["calculate"]);
        let scenario = args.formula.resolve(&Config::default()).unwrap();

        assert_eq!(scenario.formula, Formula::baseline());
        assert_eq!(scenario.new_shares_total, 1000);
        assert!(scenario.dataset.is_none());
        assert_eq!(Config::default().output.csv_path, PathBuf::from(reporter::DEFAULT_EXPORT_FILE));
    }

    #[test]
    fn single_weight_flags_override_the_configured_weights() {
        let args = calculate_args(&[
            "calculate",
            "--gdp-mer",
            "0.25",
            "--reserves",
            "0.10",
            "--compression",
            "1",
            "--new-shares",
            "500",
        ]);
        let scenario = args.formula.resolve(&Config::default()).unwrap();

        let weights = scenario.formula.weights;
        assert_eq!(weights.get(Indicator::GdpMer), dec!(0.25));
        assert_eq!(weights.get(Indicator::GdpPpp), dec!(0.20));
        assert_eq!(weights.get(Indicator::Reserves), dec!(0.10));
        assert_eq!(scenario.formula.compression_factor, dec!(1));
        assert_eq!(scenario.new_shares_total, 500);
    }

    #[test]
    fn weight_list_must_cover_every_indicator() {
        let args = calculate_args(&["calculate", "--weights", "0.5,0.5"]);
        let err = args.formula.resolve(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("--weights"), "{err:#}");

        let args = calculate_args(&["calculate", "--weights", "0.2,0.2,0.2,0.2,0.2"]);
        let scenario = args.formula.resolve(&Config::default()).unwrap();
        assert_eq!(scenario.weight_total, dec!(1.0));
    }

    #[test]
    fn unbalanced_weights_need_force() {
        let args = calculate_args(&["calculate", "--gdp-mer", "0.5"]);
        let err = args.formula.resolve(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("1.20"), "{err:#}");

        let args = calculate_args(&["calculate", "--gdp-mer", "0.5", "--force"]);
        let scenario = args.formula.resolve(&Config::default()).unwrap();
        assert_eq!(scenario.weight_total, dec!(1.20));
    }

    #[test]
    fn weights_too_large_to_sum_are_rejected_even_with_force() {
        let max = Decimal::MAX.to_string();
        let args = calculate_args(&["calculate", "--gdp-mer", &max, "--gdp-ppp", &max, "--force"]);
        let err = args.formula.resolve(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("too large"), "{err:#}");

        let oversized = IndicatorWeights::baseline()
            .with(Indicator::GdpMer, Decimal::MAX)
            .with(Indicator::GdpPpp, Decimal::MAX);
        assert!(render_indicators(&oversized, &IndicatorWeights::baseline()).contains("out of range"));
    }

    #[test]
    fn compression_outside_unit_range_is_rejected() {
        let args = calculate_args(&["calculate", "--compression", "1.5"]);
        assert!(args.formula.resolve(&Config::default()).is_err());
    }

    #[test]
    fn format_and_output_flags_parse() {
        let args = calculate_args(&["calculate", "--format", "json", "--search", "jap"]);
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.search.as_deref(), Some("jap"));

        let cli = parse(&["--config", "custom.toml", "export", "-o", "out.csv"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Commands::Export(args) => assert_eq!(args.output, Some(PathBuf::from("out.csv"))),
            _ => panic!("expected the export command"),
        }
    }

    #[test]
    fn bundled_dataset_calculates_with_the_default_formula() {
        let config = Config::default();
        let scenario = FormulaArgs::default().resolve(&config).unwrap();
        let report = scenario.run(&config).unwrap();

        assert!(!report.is_empty());
        assert_eq!(report.new_shares_total, 1000);
        assert!(report.rounding_discrepancy.abs() <= report.len() as i64);
    }

    #[test]
    fn indicator_listing_names_every_indicator() {
        let weights = IndicatorWeights::baseline();
        let rendered = render_indicators(&weights, &weights);
        for indicator in Indicator::ALL {
            assert!(rendered.contains(indicator.label()));
        }
        assert!(rendered.contains("Total"));
    }
}
