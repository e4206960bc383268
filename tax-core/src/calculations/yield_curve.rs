//! Sampled gross/tax/net curve for charting.
//!
//! The curve has `CURVE_STEPS + 1` points, from 0% to 100% of the maximum
//! extra amount in equal steps. Sampling is a pure function of its inputs.

use rust_decimal::Decimal;

use super::TaxEngineError;
use super::common::ensure_non_negative;
use super::engine::{TaxEngine, combined_income};
use crate::models::YieldCurvePoint;

/// Number of intervals between 0% and 100%.
pub const CURVE_STEPS: u32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct YieldCurveSampler<'a> {
    engine: TaxEngine<'a>,
}

impl<'a> YieldCurveSampler<'a> {
    pub fn new(engine: TaxEngine<'a>) -> Self {
        Self { engine }
    }

    /// Samples incremental tax and net extra at 0%, 10%, … 100% of `max_extra`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError`] if either amount is negative or
    /// `base_income + max_extra` overflows.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::calculations::{TaxEngine, YieldCurveSampler};
    ///
    /// let sampler = YieldCurveSampler::new(TaxEngine::igc_2025());
    /// let curve = sampler.sample(dec!(20000000), dec!(10000000)).unwrap();
    ///
    /// assert_eq!(curve.len(), 11);
    /// assert_eq!(curve[10].gross_extra, dec!(10000000));
    /// ```
    pub fn sample(
        &self,
        base_income: Decimal,
        max_extra: Decimal,
    ) -> Result<Vec<YieldCurvePoint>, TaxEngineError> {
        ensure_non_negative("base income", base_income)?;
        ensure_non_negative("maximum extra", max_extra)?;
        combined_income(base_income, max_extra)?;

        (0..=CURVE_STEPS)
            .map(|step| {
                let extra_fraction = Decimal::from(step) / Decimal::from(CURVE_STEPS);
                let gross_extra = max_extra * extra_fraction;
                let incremental_tax = self.engine.incremental_tax(base_income, gross_extra)?;

                Ok(YieldCurvePoint {
                    extra_fraction,
                    gross_extra,
                    incremental_tax,
                    net_extra: gross_extra - incremental_tax,
                })
            })
            .collect()
    }
}

impl Default for YieldCurveSampler<'static> {
    fn default() -> Self {
        Self::new(TaxEngine::igc_2025())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn sample_produces_eleven_ordered_points() {
        let curve = YieldCurveSampler::default()
            .sample(dec!(20000000), dec!(10000000))
            .unwrap();

        let fractions: Vec<Decimal> = curve.iter().map(|p| p.extra_fraction).collect();
        let expected: Vec<Decimal> = (0..=10).map(|i| Decimal::new(i, 1)).collect();

        assert_eq!(fractions, expected);
    }

    #[test]
    fn sample_scales_gross_linearly() {
        let curve = YieldCurveSampler::default()
            .sample(dec!(20000000), dec!(10000000))
            .unwrap();

        assert_eq!(curve[0].gross_extra, dec!(0));
        assert_eq!(curve[3].gross_extra, dec!(3000000));
        assert_eq!(curve[10].gross_extra, dec!(10000000));
    }

    #[test]
    fn sample_matches_incremental_tax_at_each_point() {
        let engine = TaxEngine::igc_2025();
        let curve = YieldCurveSampler::new(engine)
            .sample(dec!(20000000), dec!(10000000))
            .unwrap();

        for point in &curve {
            let tax = engine
                .incremental_tax(dec!(20000000), point.gross_extra)
                .unwrap();
            assert_eq!(point.incremental_tax, tax);
            assert_eq!(point.net_extra, point.gross_extra - tax);
        }
    }

    #[test]
    fn sample_first_point_is_zero() {
        let curve = YieldCurveSampler::default()
            .sample(dec!(50000000), dec!(8000000))
            .unwrap();

        assert_eq!(
            curve[0],
            YieldCurvePoint {
                extra_fraction: dec!(0),
                gross_extra: dec!(0),
                incremental_tax: dec!(0),
                net_extra: dec!(0),
            }
        );
        assert_eq!(curve[0].yield_percent(), dec!(0));
    }

    #[test]
    fn sample_yield_drops_after_crossing_bracket() {
        let curve = YieldCurveSampler::default()
            .sample(dec!(20000000), dec!(10000000))
            .unwrap();

        // 40% (4,000,000) stays in bracket 2 at 4%; 100% ends in bracket 3
        assert_eq!(curve[4].yield_percent(), dec!(96));
        assert!(curve[10].yield_percent() < curve[4].yield_percent());
        assert_eq!(curve[4].percent(), dec!(40));
    }

    #[test]
    fn sample_is_deterministic() {
        let sampler = YieldCurveSampler::default();

        let first = sampler.sample(dec!(12345678), dec!(98765432)).unwrap();
        let second = sampler.sample(dec!(12345678), dec!(98765432)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn sample_with_zero_max_is_flat() {
        let curve = YieldCurveSampler::default()
            .sample(dec!(20000000), dec!(0))
            .unwrap();

        assert_eq!(curve.len(), 11);
        assert!(curve.iter().all(|p| p.net_extra.is_zero()));
    }

    #[test]
    fn sample_rejects_negative_max_extra() {
        let result = YieldCurveSampler::default().sample(dec!(0), dec!(-1));

        assert_eq!(
            result,
            Err(TaxEngineError::NegativeAmount {
                field: "maximum extra",
                value: dec!(-1),
            })
        );
    }
}
