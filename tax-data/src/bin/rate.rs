use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tax_data::mindicador::DEFAULT_ENDPOINT;
use tax_data::{ExchangeRateProvider, MindicadorProvider};
use tracing_subscriber::EnvFilter;

/// Print the latest USD/CLP observed rate from mindicador.cl.
#[derive(Parser, Debug)]
#[command(name = "tax-data-rate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Indicator endpoint to query
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();

    let args = Args::parse();

    let provider = MindicadorProvider::new(&args.endpoint, Duration::from_secs(args.timeout_secs))
        .context("Failed to build HTTP client")?;

    let rate = provider
        .latest_rate()
        .await
        .with_context(|| format!("Failed to fetch exchange rate from: {}", args.endpoint))?;

    match rate.observed_at {
        Some(observed_at) => println!("{} CLP per USD (observed {})", rate.value, observed_at),
        None => println!("{} CLP per USD", rate.value),
    }

    Ok(())
}
