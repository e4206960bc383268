use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use tax_cli::app::{self, EstimateReport};
use tax_cli::config::AppConfig;
use tax_cli::utils::parse_decimal;
use tax_cli::{logging, report};
use tax_core::{BracketTable, ScenarioRequest};
use tax_data::{ExchangeRate, ScenarioRequestLoader};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income-tax planner for exercising stock options.
///
/// Compares exercising everything this year against exercising only what
/// fits in the current bracket of the 2025 Impuesto Global Complementario.
#[derive(Debug, Parser)]
#[command(name = "stock-tax", version, about)]
struct Cli {
    /// TOML configuration file. Defaults to $STOCK_TAX_CONFIG, then
    /// ./stock-tax.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter (e.g. "debug"). Overrides the config file; RUST_LOG wins.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate one salary and stock grant.
    Estimate {
        /// Monthly gross salary in CLP.
        #[arg(long, value_parser = parse_decimal)]
        monthly_gross: Decimal,

        /// Stock options in USD.
        #[arg(long, value_parser = parse_decimal)]
        stock_amount: Decimal,

        /// CLP per USD. Skips the configured rate source.
        #[arg(long, value_parser = parse_decimal)]
        exchange_rate: Option<Decimal>,

        /// Print the sampled yield curve.
        #[arg(long)]
        curve: bool,

        /// Also write the yield curve as CSV to this path.
        #[arg(long)]
        curve_csv: Option<PathBuf>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Evaluate every row of a CSV file.
    Batch {
        /// CSV with monthly_gross, stock_amount and optional exchange_rate.
        file: PathBuf,

        /// CLP per USD for rows that leave the rate empty.
        #[arg(long, value_parser = parse_decimal)]
        exchange_rate: Option<Decimal>,
    },

    /// Print the 2025 bracket schedule.
    Brackets,

    /// Print the exchange rate the configured source resolves to.
    Rate,
}

#[derive(Serialize)]
struct JsonEstimate<'a> {
    exchange_rate: &'a ExchangeRate,
    #[serde(flatten)]
    report: &'a EstimateReport,
}

// ─── logging ─────────────────────────────────────────────────────────────────

/// Applies the config file's logging section once it has been read.
fn apply_logging_config(
    config: &AppConfig,
    level_from_cli: bool,
) -> Result<()> {
    if !level_from_cli && !logging::env_filter_overrides() {
        logging::set_log_level(&config.logging.level)
            .context("Invalid logging.level in configuration")?;
    }
    if let Some(path) = &config.logging.file {
        logging::enable_file_logging(path)?;
    }
    Ok(())
}

// ─── commands ────────────────────────────────────────────────────────────────

fn run_estimate(
    request: ScenarioRequest,
    rate: &ExchangeRate,
    curve: bool,
    curve_csv: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let estimate = app::estimate(&request).context("Failed to evaluate scenarios")?;

    if let Some(path) = curve_csv {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        tax_data::write_curve(BufWriter::new(file), &estimate.curve)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "wrote yield curve");
    }

    let mut out = io::stdout().lock();
    if json {
        let document = JsonEstimate {
            exchange_rate: rate,
            report: &estimate,
        };
        serde_json::to_writer_pretty(&mut out, &document)?;
        writeln!(out)?;
    } else {
        report::write_rate(&mut out, rate)?;
        report::write_estimate(&mut out, &estimate, curve)?;
    }
    Ok(())
}

async fn resolve_rate(
    config: &AppConfig,
    override_rate: Option<Decimal>,
) -> Result<ExchangeRate> {
    app::resolve_exchange_rate(&app::build_registry(), &config.exchange_rate, override_rate)
        .await
        .context("Failed to determine exchange rate")
}

async fn run_batch(
    config: &AppConfig,
    file: PathBuf,
    exchange_rate: Option<Decimal>,
) -> Result<()> {
    let records = ScenarioRequestLoader::load_from_file(&file)
        .with_context(|| format!("Failed to load requests from {}", file.display()))?;
    debug!(rows = records.len(), file = %file.display(), "loaded batch");

    let rate = if app::batch_needs_rate(&records) {
        resolve_rate(config, exchange_rate)
            .await
            .inspect_err(|error| warn!("{error:#}; rows without an exchange rate will fail"))
            .ok()
    } else {
        None
    };

    let mut out = io::stdout().lock();
    if let Some(rate) = &rate {
        report::write_rate(&mut out, rate)?;
    }

    let entries = app::estimate_batch(&records, rate.map(|rate| rate.value));
    report::write_batch(&mut out, &entries)?;

    let failed = entries.iter().filter(|entry| entry.outcome.is_err()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} rows failed", entries.len());
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref().unwrap_or(logging::DEFAULT_LEVEL));

    let (config, config_path) =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    apply_logging_config(&config, cli.log_level.is_some())?;
    match &config_path {
        Some(path) => debug!(path = %path.display(), "loaded configuration"),
        None => debug!("no configuration file, using defaults"),
    }

    match cli.command {
        Command::Estimate {
            monthly_gross,
            stock_amount,
            exchange_rate,
            curve,
            curve_csv,
            json,
        } => {
            // Reject bad amounts before any network call.
            let probe = ScenarioRequest {
                monthly_gross,
                stock_amount,
                exchange_rate: exchange_rate.unwrap_or(Decimal::ONE),
            };
            probe.validate().context("Invalid input")?;

            let rate = resolve_rate(&config, exchange_rate).await?;
            let request = ScenarioRequest {
                exchange_rate: rate.value,
                ..probe
            };
            run_estimate(request, &rate, curve, curve_csv, json)
        }
        Command::Batch {
            file,
            exchange_rate,
        } => run_batch(&config, file, exchange_rate).await,
        Command::Brackets => {
            let mut out = io::stdout().lock();
            report::write_brackets(&mut out, BracketTable::igc_2025())?;
            Ok(())
        }
        Command::Rate => {
            let rate = resolve_rate(&config, None).await?;
            report::write_rate(&mut io::stdout().lock(), &rate)?;
            Ok(())
        }
    }
}
