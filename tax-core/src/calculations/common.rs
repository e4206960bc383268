//! Common utility functions for tax calculations.
//!
//! Rounding, input checks and the yield formula shared by the engine, the
//! scenario calculator and the curve sampler.

use rust_decimal::Decimal;

use super::TaxEngineError;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(16168447.044)), dec!(16168447.04));
/// assert_eq!(round_half_up(dec!(436065.125)), dec!(436065.13));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Fails with [`TaxEngineError::NegativeAmount`] when `value` is below zero.
pub fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), TaxEngineError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(TaxEngineError::NegativeAmount { field, value });
    }
    Ok(())
}

/// Percentage of `gross` retained as `net`; zero when `gross` is zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::yield_percent;
///
/// assert_eq!(yield_percent(dec!(960), dec!(1000)), dec!(96));
/// assert_eq!(yield_percent(dec!(0), dec!(0)), dec!(0));
/// ```
pub fn yield_percent(
    net: Decimal,
    gross: Decimal,
) -> Decimal {
    if gross > Decimal::ZERO {
        net / gross * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}
