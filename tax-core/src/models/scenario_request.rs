use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::TaxEngineError;
use crate::calculations::common::ensure_non_negative;

pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Inputs for one planning run.
///
/// `monthly_gross` is in local currency; `stock_amount` is in the foreign
/// currency the extra income is paid in, and `exchange_rate` converts one
/// foreign unit into local currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRequest {
    pub monthly_gross: Decimal,
    pub stock_amount: Decimal,
    pub exchange_rate: Decimal,
}

impl ScenarioRequest {
    /// Rejects negative inputs.
    pub fn validate(&self) -> Result<(), TaxEngineError> {
        ensure_non_negative("monthly gross income", self.monthly_gross)?;
        ensure_non_negative("stock amount", self.stock_amount)?;
        ensure_non_negative("exchange rate", self.exchange_rate)?;
        Ok(())
    }

    /// Base annual income: twelve monthly salaries.
    pub fn annual_gross(&self) -> Result<Decimal, TaxEngineError> {
        self.monthly_gross
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or(TaxEngineError::AmountOutOfRange {
                field: "annual gross income",
            })
    }

    /// The extra income converted to local currency.
    pub fn stock_total(&self) -> Result<Decimal, TaxEngineError> {
        self.stock_amount
            .checked_mul(self.exchange_rate)
            .ok_or(TaxEngineError::AmountOutOfRange {
                field: "stock total",
            })
    }

    /// Converts a local-currency amount back to the foreign currency.
    ///
    /// Returns `None` when the exchange rate is zero.
    pub fn to_foreign(
        &self,
        amount: Decimal,
    ) -> Option<Decimal> {
        amount.checked_div(self.exchange_rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn request() -> ScenarioRequest {
        ScenarioRequest {
            monthly_gross: dec!(2500000),
            stock_amount: dec!(12000),
            exchange_rate: dec!(950.50),
        }
    }

    #[test]
    fn annual_gross_is_twelve_months() {
        assert_eq!(request().annual_gross(), Ok(dec!(30000000)));
    }

    #[test]
    fn stock_total_converts_to_local_currency() {
        assert_eq!(request().stock_total(), Ok(dec!(11406000)));
    }

    #[test]
    fn to_foreign_divides_by_rate() {
        assert_eq!(request().to_foreign(dec!(1901000)), Some(dec!(2000)));
    }

    #[test]
    fn to_foreign_returns_none_for_zero_rate() {
        let request = ScenarioRequest {
            exchange_rate: dec!(0),
            ..request()
        };

        assert_eq!(request.to_foreign(dec!(1000)), None);
    }

    #[test]
    fn validate_accepts_zero_values() {
        let request = ScenarioRequest {
            monthly_gross: dec!(0),
            stock_amount: dec!(0),
            exchange_rate: dec!(0),
        };

        assert_eq!(request.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_exchange_rate() {
        let request = ScenarioRequest {
            exchange_rate: dec!(-1),
            ..request()
        };

        assert_eq!(
            request.validate(),
            Err(TaxEngineError::NegativeAmount {
                field: "exchange rate",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn annual_gross_reports_overflow() {
        let request = ScenarioRequest {
            monthly_gross: Decimal::MAX,
            ..request()
        };

        assert_eq!(
            request.annual_gross(),
            Err(TaxEngineError::AmountOutOfRange {
                field: "annual gross income",
            })
        );
    }
}
