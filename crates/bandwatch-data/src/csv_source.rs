//! CSV file data source, for offline runs and tests.

use async_trait::async_trait;
use bandwatch_core::error::DataError;
use bandwatch_core::traits::DataSource;
use bandwatch_core::types::{Bar, BarSeries, Timeframe};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
}

/// Data source reading one CSV file per run.
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self { path })
    }

    fn load(&self, symbol: &str, timeframe: Timeframe) -> Result<BarSeries, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut bars = Vec::new();
        for record in reader.deserialize() {
            let record: CsvRecord = record.map_err(|e| DataError::ParseError(e.to_string()))?;
            bars.push(Bar::new(parse_timestamp(&record.date)?, record.close));
        }
        bars.sort_by_key(|b| b.timestamp);

        let mut series = BarSeries::new(symbol.to_string(), timeframe);
        series.extend(bars);
        Ok(series)
    }
}

/// Parse various timestamp formats into unix milliseconds, treating naive
/// values as UTC.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        let dt = d.and_hms_opt(0, 0, 0).unwrap();
        return Ok(dt.and_utc().timestamp_millis());
    }

    // Bare integers are unix timestamps; > 10 digits means milliseconds
    if let Ok(ts) = date_str.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return Ok(ts * 1000);
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<BarSeries, DataError> {
        let mut series = self.load(symbol, timeframe)?;
        if lookback > 0 {
            series.truncate_front(lookback);
        }
        Ok(series)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
