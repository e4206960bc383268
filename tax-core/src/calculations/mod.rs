//! Tax evaluation over a bracket schedule.
//!
//! [`TaxEngine`] answers per-income questions (total tax, incremental tax,
//! bracket lookup). [`ScenarioCalculator`] and [`YieldCurveSampler`] build on
//! it to compare ways of adding extra income to a base salary.
//!
//! The free functions below evaluate the built-in 2025 schedule.

pub mod common;
pub mod engine;
pub mod scenarios;
pub mod yield_curve;

use rust_decimal::Decimal;

pub use engine::{TaxEngine, TaxEngineError};
pub use scenarios::ScenarioCalculator;
pub use yield_curve::{CURVE_STEPS, YieldCurveSampler};

use crate::models::{ScenarioSet, TaxBracket, YieldCurvePoint};

/// See [`TaxEngine::total_tax`].
pub fn total_tax(income: Decimal) -> Result<Decimal, TaxEngineError> {
    TaxEngine::igc_2025().total_tax(income)
}

/// See [`TaxEngine::incremental_tax`].
pub fn incremental_tax(
    base_income: Decimal,
    extra_income: Decimal,
) -> Result<Decimal, TaxEngineError> {
    TaxEngine::igc_2025().incremental_tax(base_income, extra_income)
}

/// See [`TaxEngine::bracket_of`].
pub fn bracket_of(income: Decimal) -> Result<&'static TaxBracket, TaxEngineError> {
    TaxEngine::igc_2025().bracket_of(income)
}

/// See [`TaxEngine::bracket_index_of`].
pub fn bracket_index_of(income: Decimal) -> Result<usize, TaxEngineError> {
    TaxEngine::igc_2025().bracket_index_of(income)
}

/// See [`ScenarioCalculator::compute_scenarios`].
pub fn compute_scenarios(
    base_income: Decimal,
    available_extra: Decimal,
) -> Result<ScenarioSet, TaxEngineError> {
    ScenarioCalculator::default().compute_scenarios(base_income, available_extra)
}

/// See [`YieldCurveSampler::sample`].
pub fn sample_yield_curve(
    base_income: Decimal,
    max_extra: Decimal,
) -> Result<Vec<YieldCurvePoint>, TaxEngineError> {
    YieldCurveSampler::default().sample(base_income, max_extra)
}
