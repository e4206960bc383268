//! TOML configuration for the `stock-tax` binary.
//!
//! Every key is optional; a missing file means defaults.
//!
//! ```toml
//! [exchange_rate]
//! source = "mindicador"
//! endpoint = "https://mindicador.cl/api/dolar"
//! timeout_secs = 10
//! fixed_rate = 950.0
//! fallback_rate = 950.0
//!
//! [logging]
//! level = "info"
//! file = "stock-tax.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_data::RateSourceConfig;
use thiserror::Error;

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "STOCK_TAX_CONFIG";

/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "stock-tax.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub exchange_rate: ExchangeRateSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExchangeRateSettings {
    /// Registered provider name, `"mindicador"` or `"fixed"`.
    pub source: String,
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
    /// Rate answered by the `"fixed"` source.
    pub fixed_rate: Option<Decimal>,
    /// Rate used when the provider cannot answer.
    pub fallback_rate: Option<Decimal>,
}

impl Default for ExchangeRateSettings {
    fn default() -> Self {
        Self {
            source: "mindicador".to_string(),
            endpoint: None,
            timeout_secs: 10,
            fixed_rate: None,
            fallback_rate: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// EnvFilter directive. `RUST_LOG` takes precedence.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl ExchangeRateSettings {
    /// Provider settings in the shape the registry expects.
    pub fn rate_source_config(&self) -> RateSourceConfig {
        RateSourceConfig {
            source: self.source.trim().to_lowercase(),
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            fixed_rate: self.fixed_rate,
        }
    }
}

impl AppConfig {
    /// Parses TOML text. `origin` is only used in error messages.
    pub fn from_toml(
        text: &str,
        origin: &Path,
    ) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Loads the first config found: `explicit`, then `$STOCK_TAX_CONFIG`,
    /// then `./stock-tax.toml`. Falls back to defaults when none exists.
    ///
    /// An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        let candidates = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .into_iter()
            .chain(std::iter::once(PathBuf::from(DEFAULT_CONFIG_FILE)));

        for path in candidates {
            if path.is_file() {
                return Ok((Self::from_file(&path)?, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("exchange_rate.fixed_rate", self.exchange_rate.fixed_rate),
            ("exchange_rate.fallback_rate", self.exchange_rate.fallback_rate),
        ];
        for (key, rate) in rates {
            if let Some(rate) = rate.filter(|r| *r <= Decimal::ZERO) {
                return Err(ConfigError::Invalid(format!(
                    "{key} must be positive, got {rate}"
                )));
            }
        }

        if self.exchange_rate.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "exchange_rate.timeout_secs must be at least 1".to_string(),
            ));
        }

        if self.exchange_rate.source.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "exchange_rate.source must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
