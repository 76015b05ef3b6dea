//! Yahoo chart API data source.

use async_trait::async_trait;
use bandwatch_core::error::DataError;
use bandwatch_core::traits::DataSource;
use bandwatch_core::types::{Bar, BarSeries, Timeframe};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Chart API response envelope.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[allow(dead_code)]
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    /// Bar timestamps, unix seconds
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    /// Closes aligned with `timestamp`; nulls mark halted/partial bars
    close: Option<Vec<Option<f64>>>,
}

/// Historical close-price source backed by the public Yahoo chart endpoint.
pub struct YahooDataSource {
    client: Client,
}

impl YahooDataSource {
    /// Create a source with a bounded-timeout HTTP client.
    pub fn new() -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("bandwatch/0.1")
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;
        Ok(Self { client })
    }

    fn series_from_result(
        symbol: &str,
        timeframe: Timeframe,
        result: ChartResult,
    ) -> BarSeries {
        let mut series = BarSeries::new(symbol.to_string(), timeframe);

        let timestamps = match result.timestamp {
            Some(ts) => ts,
            None => return series,
        };
        let closes = match result.indicators.quote.into_iter().next() {
            Some(quote) => quote.close.unwrap_or_default(),
            None => return series,
        };

        for (ts, close) in timestamps.into_iter().zip(closes) {
            // Null closes are gaps; skip rather than fabricate
            if let Some(close) = close {
                if close.is_finite() {
                    series.push(Bar::new(ts * 1000, close));
                }
            }
        }

        series
    }
}

#[async_trait]
impl DataSource for YahooDataSource {
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<BarSeries, DataError> {
        let url = format!("{}/{}", CHART_URL, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("interval", timeframe.yahoo_interval()),
                ("range", timeframe.yahoo_range()),
            ])
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }
        if !response.status().is_success() {
            return Err(DataError::ConnectionError(format!(
                "chart API returned status {}",
                response.status()
            )));
        }

        let payload: ChartResponse = response
            .json()
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        if let Some(err) = payload.chart.error {
            return Err(DataError::ConnectionError(
                err.description.unwrap_or_else(|| "unknown chart error".to_string()),
            ));
        }

        // Missing result set is a valid "no data" response
        let result = match payload.chart.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.remove(0))
            }
        }) {
            Some(result) => result,
            None => {
                debug!(symbol, "chart API returned no result set");
                return Ok(BarSeries::new(symbol.to_string(), timeframe));
            }
        };

        let mut series = Self::series_from_result(symbol, timeframe, result);
        if lookback > 0 {
            series.truncate_front(lookback);
        }
        debug!(symbol, bars = series.len(), "fetched chart data");
        Ok(series)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}
