//! Full and bracket-bounded exercise scenarios.
//!
//! Given a base annual income and an available extra amount, two scenarios
//! are evaluated:
//!
//! - **Full**: the whole extra amount is added.
//! - **Optimal**: only the part that fits before the base income's bracket
//!   ends is added, so the marginal rate never jumps. For the top bracket the
//!   headroom is unbounded and both scenarios coincide.
//!
//! Staying inside the current bracket keeps the marginal rate flat, which
//! with non-decreasing factors usually maximises the percentage yield. It is
//! a heuristic bound and not a global optimum for arbitrary schedules.

use rust_decimal::Decimal;
use tracing::debug;

use super::TaxEngineError;
use super::common::{ensure_non_negative, yield_percent};
use super::engine::{TaxEngine, combined_income};
use crate::models::{BracketPlacement, Scenario, ScenarioRequest, ScenarioSet};

#[derive(Debug, Clone, Copy)]
pub struct ScenarioCalculator<'a> {
    engine: TaxEngine<'a>,
}

impl<'a> ScenarioCalculator<'a> {
    pub fn new(engine: TaxEngine<'a>) -> Self {
        Self { engine }
    }

    /// Evaluates both scenarios for a request.
    ///
    /// The base is twelve monthly salaries and the available extra is the
    /// stock amount converted at the request's exchange rate.
    pub fn evaluate(
        &self,
        request: &ScenarioRequest,
    ) -> Result<ScenarioSet, TaxEngineError> {
        request.validate()?;
        self.compute_scenarios(request.annual_gross()?, request.stock_total()?)
    }

    /// Evaluates the full and optimal scenarios.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError`] if either amount is negative or their sum
    /// overflows.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::calculations::{ScenarioCalculator, TaxEngine};
    ///
    /// let calculator = ScenarioCalculator::new(TaxEngine::igc_2025());
    /// let set = calculator.compute_scenarios(dec!(20000000), dec!(10000000)).unwrap();
    ///
    /// // Bracket 2 ends at 24,225,840
    /// assert_eq!(set.optimal.extra_amount, dec!(4225840));
    /// assert_eq!(set.full.resulting_bracket_index(), 3);
    /// ```
    pub fn compute_scenarios(
        &self,
        base_income: Decimal,
        available_extra: Decimal,
    ) -> Result<ScenarioSet, TaxEngineError> {
        ensure_non_negative("base income", base_income)?;
        ensure_non_negative("available extra", available_extra)?;

        let base = self.placement(base_income)?;
        let full = self.scenario(base_income, available_extra)?;
        let optimal_extra = self.optimal_extra(base_income, available_extra)?;
        let optimal = self.scenario(base_income, optimal_extra)?;

        debug!(
            %base_income,
            %available_extra,
            %optimal_extra,
            full_yield = %full.yield_percent,
            optimal_yield = %optimal.yield_percent,
            "computed scenarios"
        );

        Ok(ScenarioSet {
            base,
            full,
            optimal,
        })
    }

    /// Largest part of `available_extra` that keeps `base_income` inside its
    /// current bracket.
    pub fn optimal_extra(
        &self,
        base_income: Decimal,
        available_extra: Decimal,
    ) -> Result<Decimal, TaxEngineError> {
        ensure_non_negative("available extra", available_extra)?;
        let bracket = self.engine.bracket_of(base_income)?;

        Ok(match bracket.headroom(base_income) {
            Some(headroom) => available_extra.min(headroom.max(Decimal::ZERO)),
            None => available_extra,
        })
    }

    /// Bracket and 1-based index for `income`.
    pub fn placement(
        &self,
        income: Decimal,
    ) -> Result<BracketPlacement, TaxEngineError> {
        Ok(BracketPlacement {
            income,
            bracket: *self.engine.bracket_of(income)?,
            index: self.engine.bracket_index_of(income)?,
        })
    }

    fn scenario(
        &self,
        base_income: Decimal,
        extra: Decimal,
    ) -> Result<Scenario, TaxEngineError> {
        let incremental_tax = self.engine.incremental_tax(base_income, extra)?;
        let net_benefit = extra - incremental_tax;
        let resulting = self.placement(combined_income(base_income, extra)?)?;

        Ok(Scenario {
            extra_amount: extra,
            incremental_tax,
            net_benefit,
            yield_percent: yield_percent(net_benefit, extra),
            resulting,
        })
    }
}

impl Default for ScenarioCalculator<'static> {
    fn default() -> Self {
        Self::new(TaxEngine::igc_2025())
    }
}
