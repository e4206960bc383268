//! USD/CLP observed rate from the mindicador.cl public API.
//!
//! The endpoint answers with a JSON document whose `serie` array lists
//! observations newest first:
//!
//! ```json
//! {
//!   "codigo": "dolar",
//!   "serie": [
//!     { "fecha": "2025-03-14T03:00:00.000Z", "valor": 931.75 },
//!     { "fecha": "2025-03-13T03:00:00.000Z", "valor": 929.9 }
//!   ]
//! }
//! ```

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::exchange_rate::{ExchangeRate, ExchangeRateProvider, ExchangeRateUnavailable};

pub const DEFAULT_ENDPOINT: &str = "https://mindicador.cl/api/dolar";

#[derive(Debug, Deserialize)]
struct IndicatorResponse {
    #[serde(default)]
    serie: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    fecha: Option<DateTime<Utc>>,
    valor: serde_json::Number,
}

/// Extracts the most recent rate from a mindicador.cl response body.
pub fn parse_indicator_response(body: &str) -> Result<ExchangeRate, ExchangeRateUnavailable> {
    let response: IndicatorResponse =
        serde_json::from_str(body).map_err(|e| ExchangeRateUnavailable::Parse(e.to_string()))?;

    let latest = response
        .serie
        .first()
        .ok_or(ExchangeRateUnavailable::EmptySeries)?;

    // Keep the textual value so the rate is not routed through f64.
    let text = latest.valor.to_string();
    let value = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| ExchangeRateUnavailable::InvalidRate(text))?;

    ExchangeRate::new(value, latest.fecha, MindicadorProvider::SOURCE_NAME)
}

/// Fetches the observed dollar rate over HTTP.
#[derive(Debug, Clone)]
pub struct MindicadorProvider {
    client: Client,
    endpoint: String,
}

impl MindicadorProvider {
    pub const SOURCE_NAME: &'static str = "mindicador";

    /// Creates a provider for `endpoint` with a per-request `timeout`.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ExchangeRateUnavailable> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExchangeRateUnavailable::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(&self) -> Result<ExchangeRate, ExchangeRateUnavailable> {
        let network_error = |e: reqwest::Error| ExchangeRateUnavailable::Network {
            url: self.endpoint.clone(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeRateUnavailable::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(network_error)?;
        parse_indicator_response(&body)
    }
}

#[async_trait]
impl ExchangeRateProvider for MindicadorProvider {
    fn source_name(&self) -> &'static str {
        Self::SOURCE_NAME
    }

    async fn latest_rate(&self) -> Result<ExchangeRate, ExchangeRateUnavailable> {
        debug!(url = %self.endpoint, "fetching exchange rate");

        let result = self.fetch().await;
        match &result {
            Ok(rate) => debug!(rate = %rate.value, observed_at = ?rate.observed_at, "exchange rate fetched"),
            Err(error) => warn!(url = %self.endpoint, %error, "exchange rate unavailable"),
        }
        result
    }
}
