//! CSV loader for batches of scenario requests.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column          | Required | Type    | Notes                                  |
//! |-----------------|----------|---------|----------------------------------------|
//! | `monthly_gross` | yes      | decimal | Local currency, e.g. `2500000`         |
//! | `stock_amount`  | yes      | decimal | Foreign currency, e.g. `12000.50`      |
//! | `exchange_rate` | no       | decimal | Empty cell uses the resolved live rate |
//!
//! ```csv
//! monthly_gross,stock_amount,exchange_rate
//! 2500000,12000,950.50
//! 1800000,4000,
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::ScenarioRequest;
use thiserror::Error;

/// Errors that can occur when loading scenario requests.
#[derive(Debug, Error)]
pub enum ScenarioLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("cannot open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{field} must be non-negative on row {row}, got {value}")]
    NegativeValue {
        field: &'static str,
        row: usize,
        value: Decimal,
    },
}

/// A single row of the requests file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ScenarioRequestRecord {
    #[serde(deserialize_with = "deserialize_decimal")]
    pub monthly_gross: Decimal,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub stock_amount: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub exchange_rate: Option<Decimal>,
}

impl ScenarioRequestRecord {
    /// Builds the request, using `fallback_rate` when the row has no rate.
    pub fn to_request(
        &self,
        fallback_rate: Decimal,
    ) -> ScenarioRequest {
        ScenarioRequest {
            monthly_gross: self.monthly_gross,
            stock_amount: self.stock_amount,
            exchange_rate: self.exchange_rate.unwrap_or(fallback_rate),
        }
    }

    fn check(
        &self,
        row: usize,
    ) -> Result<(), ScenarioLoaderError> {
        let fields = [
            ("monthly_gross", Some(self.monthly_gross)),
            ("stock_amount", Some(self.stock_amount)),
            ("exchange_rate", self.exchange_rate),
        ];
        for (field, value) in fields {
            if let Some(value) = value.filter(|v| *v < Decimal::ZERO) {
                return Err(ScenarioLoaderError::NegativeValue { field, row, value });
            }
        }
        Ok(())
    }
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<Decimal>().map_err(serde::de::Error::custom)
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for scenario requests from CSV data.
pub struct ScenarioRequestLoader;

impl ScenarioRequestLoader {
    /// Parse request records from any reader, such as a file or a byte slice.
    ///
    /// Rows with negative amounts are rejected with their 1-based row number
    /// (the header is row 0).
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScenarioRequestRecord>, ScenarioLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for (i, result) in csv_reader.deserialize().enumerate() {
            let record: ScenarioRequestRecord = result?;
            record.check(i + 1)?;
            records.push(record);
        }

        Ok(records)
    }

    /// Open `path` and parse it.
    pub fn load_from_file(path: &Path) -> Result<Vec<ScenarioRequestRecord>, ScenarioLoaderError> {
        let file = File::open(path).map_err(|source| ScenarioLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(file)
    }
}
