mod render;

use analytics::{
    AnalyticsError, BandSummary, DigitFrequency, ErrorMetrics, ErrorMetricsTable, StatsEngine,
    WeeklyAggregate, YearlyReport,
};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use configuration::Config;
use core_types::{DailyRecord, ReturnSource};
use market_data::PriceLoader;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The main entry point for the tickstats application.
fn main() -> anyhow::Result<()> {
    // A .env file is optional; it only feeds TICKSTATS__* overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let _log_guard = configuration::init_tracing(&config.logging)?;

    let input = cli
        .data
        .clone()
        .unwrap_or_else(|| config.dataset.input_path());
    let records = PriceLoader::new(config.dataset.return_source)
        .load(&input)
        .with_context(|| format!("Failed to load prices from {}", input.display()))?;

    let engine = StatsEngine::new();
    match &cli.command {
        Commands::Returns(args) => handle_returns(&engine, &records, &config, args, cli.format),
        Commands::Digits(args) => handle_digits(&engine, &records, &config, args, cli.format),
        Commands::Weekly(args) => handle_weekly(&engine, &records, &config, args, cli.format),
        Commands::Band(_) => handle_band(&engine, &records, &config, cli.format),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Return and price statistics for one ticker's daily history.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides `dataset.ticker`.
    #[arg(long)]
    ticker: Option<String>,

    /// Reads prices from this CSV file instead of the configured dataset.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Overrides `dataset.return_source`.
    #[arg(long, value_enum)]
    returns: Option<ReturnSource>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign counts, mean-relative and tail tables for each year.
    Returns(YearRangeArgs),
    /// Cent-digit frequencies of opening prices and their error against a uniform prior.
    Digits(YearRangeArgs),
    /// Mean return and volatility for every (year, week).
    Weekly(WeeklyArgs),
    /// Summary of one year's returns inside a return band.
    Band(BandArgs),
}

#[derive(Parser)]
struct YearRangeArgs {
    /// First year of the window (defaults to `analysis.start_year`).
    #[arg(long)]
    from_year: Option<i32>,

    /// Last year of the window (defaults to `analysis.end_year`).
    #[arg(long)]
    to_year: Option<i32>,

    /// Also write the tables as CSV files under `output.dir`.
    #[arg(long)]
    export: bool,
}

#[derive(Parser)]
struct WeeklyArgs {
    /// Output file (defaults to `{output.dir}/{ticker}_weekly_return_volatility.csv`).
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct BandArgs {
    #[arg(long)]
    year: Option<i32>,

    /// Exclusive lower bound, in percent.
    #[arg(long, allow_hyphen_values = true)]
    low: Option<f64>,

    /// Exclusive upper bound, in percent.
    #[arg(long, allow_hyphen_values = true)]
    high: Option<f64>,
}

/// Loads the configuration file and folds the command-line overrides into it.
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    apply_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ticker) = &cli.ticker {
        config.dataset.ticker = ticker.clone();
    }
    if let Some(source) = cli.returns {
        config.dataset.return_source = source;
    }
    match &cli.command {
        Commands::Returns(args) | Commands::Digits(args) => {
            if let Some(year) = args.from_year {
                config.analysis.start_year = year;
            }
            if let Some(year) = args.to_year {
                config.analysis.end_year = year;
            }
        }
        Commands::Band(args) => {
            if let Some(year) = args.year {
                config.band.year = year;
            }
            if let Some(low) = args.low {
                config.band.low_return = low;
            }
            if let Some(high) = args.high {
                config.band.high_return = high;
            }
        }
        Commands::Weekly(_) => {}
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ==============================================================================
// Command Handlers
// ==============================================================================

#[derive(Serialize)]
struct ReturnsOutput<'a> {
    ticker: &'a str,
    years: &'a [YearlyReport],
}

fn handle_returns(
    engine: &StatsEngine,
    records: &[DailyRecord],
    config: &Config,
    args: &YearRangeArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (start, end) = (config.analysis.start_year, config.analysis.end_year);
    let reports = engine.yearly_report(records, start, end)?;
    for report in reports.iter().filter(|r| r.is_empty()) {
        tracing::warn!(year = report.year, "No trading days in year, skipping its tables");
    }

    match format {
        OutputFormat::Json => print_json(&ReturnsOutput {
            ticker: &config.dataset.ticker,
            years: &reports,
        })?,
        OutputFormat::Table => {
            println!("{} daily returns, {start}-{end}", config.dataset.ticker);
            println!("{}", render::sign_counts(&reports));
            println!("{}", render::mean_relative(&reports));
            println!("{}", render::tails(&reports));
        }
    }

    if args.export {
        let mean_relative: Vec<_> = reports.iter().filter_map(|r| r.mean_relative.clone()).collect();
        let tails: Vec<_> = reports.iter().filter_map(|r| r.tail.clone()).collect();
        let ticker = &config.dataset.ticker;
        market_data::write_file(
            &config.output.dir.join(format!("{ticker}_mean_relative.csv")),
            |file| market_data::write_mean_relative(file, &mean_relative),
        )?;
        market_data::write_file(&config.output.dir.join(format!("{ticker}_tails.csv")), |file| {
            market_data::write_tail(file, &tails)
        })?;
    }
    Ok(())
}

#[derive(Serialize)]
struct DigitsOutput<'a> {
    ticker: &'a str,
    start_year: i32,
    end_year: i32,
    window: &'a DigitFrequency,
    most_frequent: Option<u8>,
    least_frequent: Option<u8>,
    by_year: &'a [(i32, DigitFrequency)],
    aggregate: &'a ErrorMetrics,
    per_year: Option<&'a ErrorMetricsTable>,
}

fn handle_digits(
    engine: &StatsEngine,
    records: &[DailyRecord],
    config: &Config,
    args: &YearRangeArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (start, end) = (config.analysis.start_year, config.analysis.end_year);
    let window = engine.digit_frequencies_between(records, start, end)?;
    let aggregate = engine
        .aggregate_error_metrics(records, start, end)
        .with_context(|| format!("No opening prices between {start} and {end}"))?;

    let mut by_year = Vec::new();
    for year in start..=end {
        let partition = engine.partition_by_year(records, year)?;
        by_year.push((year, engine.digit_frequencies(partition.records().iter().copied())));
    }

    let per_year = match engine.per_year_error_table(records, start, end) {
        Ok(table) => Some(table),
        Err(AnalyticsError::EmptyPartition { year }) => {
            tracing::warn!(year, "No opening prices in year, skipping the per-year error table");
            None
        }
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Json => print_json(&DigitsOutput {
            ticker: &config.dataset.ticker,
            start_year: start,
            end_year: end,
            window: &window,
            most_frequent: window.most_frequent().map(|(digit, _)| digit),
            least_frequent: window.least_frequent().map(|(digit, _)| digit),
            by_year: &by_year,
            aggregate: &aggregate,
            per_year: per_year.as_ref(),
        })?,
        OutputFormat::Table => {
            let label = format!("{start}-{end}");
            println!("{} opening price cent digits", config.dataset.ticker);
            println!("{}", render::digit_frequencies(&label, &window, &by_year));
            if let (Some((most, _)), Some((least, _))) =
                (window.most_frequent(), window.least_frequent())
            {
                println!("Most frequent digit: {most}, least frequent digit: {least}");
            }
            println!("Error against a uniform prior, {label}");
            println!("{}", render::error_metrics(&aggregate));
            if let Some(table) = &per_year {
                println!("{}", render::error_table(table));
            }
        }
    }

    if args.export {
        if let Some(table) = &per_year {
            let path = config
                .output
                .dir
                .join(format!("{}_digit_errors.csv", config.dataset.ticker));
            market_data::write_file(&path, |file| market_data::write_error_table(file, table))?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct WeeklyOutput<'a> {
    ticker: &'a str,
    path: &'a Path,
    weeks: &'a [WeeklyAggregate],
}

/// Recomputes returns over the analysis window and writes one row per (year, week).
fn handle_weekly(
    engine: &StatsEngine,
    records: &[DailyRecord],
    config: &Config,
    args: &WeeklyArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (start, end) = (config.analysis.start_year, config.analysis.end_year);
    let window: Vec<DailyRecord> = analytics::partition::partition_by_range(records, start, end)?
        .into_iter()
        .cloned()
        .collect();
    let weeks = engine.weekly_aggregate(&engine.derive_returns(&window));

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| config.output.weekly_file(&config.dataset.ticker));
    market_data::write_file(&path, |file| market_data::write_weekly(file, &weeks))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    match format {
        OutputFormat::Json => print_json(&WeeklyOutput {
            ticker: &config.dataset.ticker,
            path: &path,
            weeks: &weeks,
        }),
        OutputFormat::Table => {
            println!("{}", render::weekly(&weeks));
            println!("Wrote {} weeks to {}", weeks.len(), path.display());
            Ok(())
        }
    }
}

fn handle_band(
    engine: &StatsEngine,
    records: &[DailyRecord],
    config: &Config,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let band = &config.band;
    let partition = engine.partition_by_year(records, band.year)?;
    let summary: BandSummary = engine
        .band_summary(&partition, band.low_return, band.high_return)
        .with_context(|| {
            format!(
                "No {} returns between {}% and {}%",
                band.year, band.low_return, band.high_return
            )
        })?;

    match format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Table => {
            println!("{}", render::band(&summary));
            Ok(())
        }
    }
}
