//! Alert pass command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use bandwatch_config::load_config;
use bandwatch_core::traits::Notifier;
use bandwatch_data::YahooDataSource;
use bandwatch_ledger::SqliteLedger;
use bandwatch_notify::{DiscordNotifier, DryRunNotifier};
use bandwatch_pipeline::{AlertPipeline, PipelineConfig};

use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config_path: &Path) -> Result<()> {
    let mut config = load_config(config_path).context("Failed to load configuration")?;

    // CLI flags override the file
    if !args.symbols.is_empty() {
        config.alert.symbols = args.symbols;
    }
    if args.dry_run {
        config.alert.dry_run = true;
    }
    if args.loose {
        config.alert.loose_mode = true;
    }

    // Fatal before any symbol is touched; per-symbol errors never are
    config.validate().context("Invalid configuration")?;

    let symbols = config.symbols();
    info!(
        symbols = symbols.len(),
        length = config.alert.length,
        mult = config.alert.mult,
        timeframe = %config.alert.timeframe,
        loose = config.alert.loose_mode,
        dry_run = config.alert.dry_run,
        "starting alert pass"
    );

    let source = Arc::new(YahooDataSource::new()?);
    let notifier: Arc<dyn Notifier> = if config.alert.dry_run {
        Arc::new(DryRunNotifier::new(config.notify.username.clone()))
    } else {
        let url = config
            .notify
            .webhook_url
            .clone()
            .unwrap_or_default();
        Arc::new(DiscordNotifier::new(url, config.notify.username.clone())?)
    };
    let ledger = Arc::new(
        SqliteLedger::open(&config.ledger.path)
            .await
            .context("Failed to open alert ledger")?,
    );

    let pipeline = AlertPipeline::new(
        source,
        notifier,
        ledger.clone(),
        PipelineConfig {
            length: config.alert.length,
            mult: config.alert.mult,
            timeframe: config.alert.timeframe,
            lookback: config.alert.lookback,
            loose_mode: config.alert.loose_mode,
            backfill_lookback: config.alert.backfill_lookback,
            pace: Duration::from_millis(config.alert.pace_ms),
        },
    );

    let summary = pipeline.run(&symbols).await;
    ledger.close().await;

    println!("{}", summary.summary());
    Ok(())
}
