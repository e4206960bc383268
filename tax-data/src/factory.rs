use std::collections::HashMap;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::exchange_rate::{ExchangeRateProvider, ExchangeRateUnavailable, FixedRateProvider};
use crate::mindicador::{DEFAULT_ENDPOINT, MindicadorProvider};

/// Source-agnostic provider configuration.
///
/// `source` must match the [`ProviderFactory::source_name`] of a registered
/// factory. The other fields are read only by the factories that need them.
///
/// | source       | reads                     |
/// |--------------|---------------------------|
/// | `mindicador` | `endpoint`, `timeout`     |
/// | `fixed`      | `fixed_rate`              |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateSourceConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"mindicador"`).
    pub source: String,
    /// Overrides the provider's default URL.
    pub endpoint: Option<String>,
    pub timeout: Duration,
    pub fixed_rate: Option<Decimal>,
}

impl Default for RateSourceConfig {
    fn default() -> Self {
        Self {
            source: MindicadorProvider::SOURCE_NAME.to_string(),
            endpoint: None,
            timeout: Duration::from_secs(10),
            fixed_rate: None,
        }
    }
}

/// One implementation per exchange-rate source, registered with a
/// [`ProviderRegistry`] at startup.
pub trait ProviderFactory: Send + Sync {
    /// Unique, lowercase identifier for this source.
    fn source_name(&self) -> &'static str;

    /// Build a ready-to-use provider from `config`.
    fn create(
        &self,
        config: &RateSourceConfig,
    ) -> Result<Box<dyn ExchangeRateProvider>, ExchangeRateUnavailable>;
}

pub struct MindicadorFactory;

impl ProviderFactory for MindicadorFactory {
    fn source_name(&self) -> &'static str {
        MindicadorProvider::SOURCE_NAME
    }

    fn create(
        &self,
        config: &RateSourceConfig,
    ) -> Result<Box<dyn ExchangeRateProvider>, ExchangeRateUnavailable> {
        let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        Ok(Box::new(MindicadorProvider::new(endpoint, config.timeout)?))
    }
}

pub struct FixedRateFactory;

impl ProviderFactory for FixedRateFactory {
    fn source_name(&self) -> &'static str {
        "fixed"
    }

    fn create(
        &self,
        config: &RateSourceConfig,
    ) -> Result<Box<dyn ExchangeRateProvider>, ExchangeRateUnavailable> {
        let rate = config.fixed_rate.ok_or_else(|| {
            ExchangeRateUnavailable::Configuration(
                "the 'fixed' source requires fixed_rate".to_string(),
            )
        })?;
        Ok(Box::new(FixedRateProvider::new(rate)?))
    }
}

/// Registry of [`ProviderFactory`] instances, keyed by source name.
pub struct ProviderRegistry {
    factories: HashMap<&'static str, Box<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a source factory, replacing any with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn ProviderFactory>,
    ) {
        self.factories.insert(factory.source_name(), factory);
    }

    /// Names of every registered source, sorted alphabetically.
    pub fn available_sources(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.source`.
    ///
    /// # Errors
    /// * [`ExchangeRateUnavailable::UnknownSource`]: nothing is registered
    ///   under the requested name.
    /// * Any error the chosen factory itself returns.
    pub fn create(
        &self,
        config: &RateSourceConfig,
    ) -> Result<Box<dyn ExchangeRateProvider>, ExchangeRateUnavailable> {
        let factory = self
            .factories
            .get(config.source.as_str())
            .ok_or_else(|| ExchangeRateUnavailable::UnknownSource {
                name: config.source.clone(),
                available: self.available_sources(),
            })?;

        factory.create(config)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
