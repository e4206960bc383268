use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::{
    ScenarioCalculator, ScenarioRequest, ScenarioSet, TaxEngine, TaxEngineError, YieldCurvePoint,
    YieldCurveSampler,
};
use tax_data::{
    ExchangeRate, ExchangeRateUnavailable, FixedRateFactory, MindicadorFactory, ProviderRegistry,
    ScenarioRequestRecord,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ExchangeRateSettings;

/// Source name recorded for a rate given on the command line.
pub const OVERRIDE_SOURCE: &str = "override";

/// Source name recorded for the configured fallback rate.
pub const FALLBACK_SOURCE: &str = "fallback";

/// Registry with every exchange-rate source this binary knows about.
pub fn build_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(MindicadorFactory));
    registry.register(Box::new(FixedRateFactory));
    registry
}

/// Picks the exchange rate for a run.
///
/// An explicit `override_rate` wins. Otherwise the configured provider is
/// asked, and if it cannot answer the configured fallback rate is used.
///
/// # Errors
///
/// The provider's error when it fails and no fallback is configured, or
/// [`ExchangeRateUnavailable::InvalidRate`] for a non-positive override.
pub async fn resolve_exchange_rate(
    registry: &ProviderRegistry,
    settings: &ExchangeRateSettings,
    override_rate: Option<Decimal>,
) -> Result<ExchangeRate, ExchangeRateUnavailable> {
    if let Some(rate) = override_rate {
        debug!(%rate, "using exchange rate from the command line");
        return ExchangeRate::new(rate, None, OVERRIDE_SOURCE);
    }

    let fetched = match registry.create(&settings.rate_source_config()) {
        Ok(provider) => provider.latest_rate().await,
        Err(error) => Err(error),
    };

    match (fetched, settings.fallback_rate) {
        (Ok(rate), _) => {
            info!(rate = %rate.value, source = %rate.source, "resolved exchange rate");
            Ok(rate)
        }
        (Err(error), Some(fallback)) => {
            warn!(%error, %fallback, "exchange rate unavailable, using configured fallback");
            ExchangeRate::new(fallback, None, FALLBACK_SOURCE)
        }
        (Err(error), None) => Err(error),
    }
}

/// Everything shown for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimateReport {
    pub request: ScenarioRequest,
    pub scenarios: ScenarioSet,
    /// Sampled from zero up to the full stock total.
    pub curve: Vec<YieldCurvePoint>,
}

/// Evaluates `request` against the 2025 schedule.
pub fn estimate(request: &ScenarioRequest) -> Result<EstimateReport, TaxEngineError> {
    let engine = TaxEngine::igc_2025();
    let scenarios = ScenarioCalculator::new(engine).evaluate(request)?;
    let curve = YieldCurveSampler::new(engine)
        .sample(scenarios.base.income, scenarios.full.extra_amount)?;

    Ok(EstimateReport {
        request: *request,
        scenarios,
        curve,
    })
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchRowError {
    #[error("row has no exchange rate and none was resolved")]
    MissingRate,

    #[error(transparent)]
    Engine(#[from] TaxEngineError),
}

/// Outcome for one row of a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// 1-based data row, the header being row 0.
    pub row: usize,
    pub outcome: Result<EstimateReport, BatchRowError>,
}

/// Whether any row leaves the exchange rate to the caller.
pub fn batch_needs_rate(records: &[ScenarioRequestRecord]) -> bool {
    records.iter().any(|record| record.exchange_rate.is_none())
}

/// Estimates every row. A failing row does not stop the others.
pub fn estimate_batch(
    records: &[ScenarioRequestRecord],
    resolved_rate: Option<Decimal>,
) -> Vec<BatchEntry> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let outcome = match record.exchange_rate.or(resolved_rate) {
                Some(rate) => estimate(&record.to_request(rate)).map_err(BatchRowError::from),
                None => Err(BatchRowError::MissingRate),
            };
            if let Err(error) = &outcome {
                warn!(row = i + 1, %error, "batch row failed");
            }
            BatchEntry { row: i + 1, outcome }
        })
        .collect()
}
