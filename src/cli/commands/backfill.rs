//! Backfill diagnostic command implementation.
//!
//! Read-only by construction: no notifier and no ledger are ever built
//! here, so this path cannot produce or suppress notifications.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

use bandwatch_config::load_config;
use bandwatch_core::traits::{normalized_ts, DataSource};
use bandwatch_data::YahooDataSource;
use bandwatch_indicators::BollingerBands;
use bandwatch_notify::display_symbol;
use bandwatch_signals::CrossDetector;

use crate::cli::BackfillArgs;

pub async fn run(args: BackfillArgs, config_path: &Path) -> Result<()> {
    let mut config = load_config(config_path).context("Failed to load configuration")?;
    if !args.symbols.is_empty() {
        config.alert.symbols = args.symbols;
    }

    let bands = BollingerBands::with_params(config.alert.length, config.alert.mult);
    let detector = CrossDetector::new(false);
    let source = YahooDataSource::new()?;

    for symbol in config.symbols() {
        let series = match source
            .fetch_bars(&symbol, config.alert.timeframe, config.alert.lookback)
            .await
        {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "fetch failed");
                continue;
            }
        };

        let banded = bands.banded_bars(&series);
        if banded.len() < 2 {
            println!("{}: insufficient data", display_symbol(&symbol));
            continue;
        }

        let tail_len = args.lookback.max(2).min(banded.len());
        let tail = &banded[banded.len() - tail_len..];
        match detector.scan_backfill(tail) {
            Some(hit) => println!(
                "{}: last {} at {}",
                display_symbol(&symbol),
                hit.kind.label(),
                normalized_ts(hit.timestamp)
            ),
            None => println!(
                "{}: no crossing in last {} bars",
                display_symbol(&symbol),
                tail.len()
            ),
        }
    }

    Ok(())
}
