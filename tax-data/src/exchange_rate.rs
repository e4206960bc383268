use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an exchange rate could not be obtained.
///
/// Every variant is recoverable by the caller: fall back to another rate or
/// report the failure, never panic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeRateUnavailable {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not parse exchange-rate response: {0}")]
    Parse(String),

    #[error("exchange-rate response contained no observations")]
    EmptySeries,

    #[error("invalid exchange rate '{0}': must be a positive number")]
    InvalidRate(String),

    #[error("unknown exchange-rate source '{name}'; available: {available:?}")]
    UnknownSource {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("exchange-rate source misconfigured: {0}")]
    Configuration(String),
}

/// Local-currency value of one foreign-currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub value: Decimal,
    /// When the provider observed the rate, if it reports one.
    pub observed_at: Option<DateTime<Utc>>,
    /// Name of the provider that produced the rate.
    pub source: String,
}

impl ExchangeRate {
    /// Creates a rate, rejecting zero and negative values.
    pub fn new(
        value: Decimal,
        observed_at: Option<DateTime<Utc>>,
        source: impl Into<String>,
    ) -> Result<Self, ExchangeRateUnavailable> {
        if value <= Decimal::ZERO {
            return Err(ExchangeRateUnavailable::InvalidRate(value.to_string()));
        }
        Ok(Self {
            value,
            observed_at,
            source: source.into(),
        })
    }
}

/// A source of the current exchange rate.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Unique, lowercase identifier for this source.
    fn source_name(&self) -> &'static str;

    /// Fetches the most recent rate.
    async fn latest_rate(&self) -> Result<ExchangeRate, ExchangeRateUnavailable>;
}

/// Always answers with the same rate. Used for manual overrides and offline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedRateProvider {
    rate: Decimal,
}

impl FixedRateProvider {
    pub fn new(rate: Decimal) -> Result<Self, ExchangeRateUnavailable> {
        ExchangeRate::new(rate, None, "fixed")?;
        Ok(Self { rate })
    }
}

#[async_trait]
impl ExchangeRateProvider for FixedRateProvider {
    fn source_name(&self) -> &'static str {
        "fixed"
    }

    async fn latest_rate(&self) -> Result<ExchangeRate, ExchangeRateUnavailable> {
        ExchangeRate::new(self.rate, None, self.source_name())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_accepts_positive_rate() {
        let rate = ExchangeRate::new(dec!(950.25), None, "fixed").unwrap();

        assert_eq!(rate.value, dec!(950.25));
        assert_eq!(rate.source, "fixed");
    }

    #[test]
    fn new_rejects_zero_rate() {
        assert_eq!(
            ExchangeRate::new(dec!(0), None, "fixed"),
            Err(ExchangeRateUnavailable::InvalidRate("0".to_string()))
        );
    }

    #[test]
    fn fixed_provider_rejects_negative_rate() {
        assert!(FixedRateProvider::new(dec!(-3)).is_err());
    }

    #[tokio::test]
    async fn fixed_provider_returns_configured_rate() {
        let provider = FixedRateProvider::new(dec!(987.65)).unwrap();

        let rate = provider.latest_rate().await.unwrap();

        assert_eq!(rate.value, dec!(987.65));
        assert_eq!(rate.observed_at, None);
        assert_eq!(rate.source, "fixed");
    }
}
