//! Data source trait definition.

use crate::error::DataError;
use crate::types::{BarSeries, Timeframe};
use async_trait::async_trait;

/// Trait for historical close-price sources.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch recent bars for a symbol.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `timeframe` - The bar timeframe
    /// * `lookback` - Keep at most this many trailing bars (0 = all)
    ///
    /// # Returns
    /// Bars in ascending time order. An empty series is a valid
    /// "no data" response, not an error.
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<BarSeries, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
