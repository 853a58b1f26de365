//! CSV price source.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use dca_core::error::DataError;
use dca_core::traits::PriceSource;
use dca_core::types::{AssetPair, PricePoint, PriceSeries};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Price", alias = "price", alias = "Close", alias = "close", alias = "Adj Close")]
    price: f64,
}

/// Offline price source reading a `date,price` CSV file.
///
/// Serves whatever pair it is asked for; the caller decides which file
/// belongs to which pair. The spot price is the newest point in the file.
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    /// Create a CSV price source from an existing file.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DataError> {
        let path = path.into();
        if !Path::new(&path).exists() {
            return Err(DataError::FetchFailed(format!(
                "data file not found: {}",
                path.display()
            )));
        }
        Ok(Self { path })
    }

    /// Load every point in the file, oldest first.
    pub fn load_all(&self) -> Result<PriceSeries, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut points = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let timestamp = parse_timestamp(&record.date)?;
            points.push(PricePoint::new(timestamp, record.price));
        }

        Ok(PriceSeries::from_points(points))
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    async fn historical_prices(
        &self,
        _pair: &AssetPair,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<PriceSeries, DataError> {
        let all = self.load_all()?;
        Ok(all.between(from_ms, to_ms).copied().collect())
    }

    async fn current_price(&self, pair: &AssetPair) -> Result<f64, DataError> {
        let all = self.load_all()?;
        all.last()
            .map(|p| p.price)
            .ok_or_else(|| DataError::NoDataAvailable {
                pair: pair.to_string(),
            })
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse various timestamp formats into Unix milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d-%m-%Y",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            let dt = d.and_hms_opt(0, 0, 0).unwrap();
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    // Try parsing as a Unix timestamp; assume milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        } else {
            return Ok(ts * 1000);
        }
    }

    Err(DataError::ParseError(format!(
        "could not parse date: {}",
        date_str
    )))
}
