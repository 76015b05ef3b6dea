//! Validate configuration command.

use anyhow::Result;
use bandwatch_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = load_config(config_path)?;
    config.validate()?;

    println!("Configuration is valid!");
    println!();
    println!("Symbols: {}", config.symbols().join(", "));
    println!("Length: {}", config.alert.length);
    println!("Multiplier: {}", config.alert.mult);
    println!("Timeframe: {}", config.alert.timeframe);
    println!("Loose mode: {}", config.alert.loose_mode);
    println!("Dry run: {}", config.alert.dry_run);
    println!("Ledger path: {}", config.ledger.path);
    println!(
        "Webhook configured: {}",
        config
            .notify
            .webhook_url
            .as_deref()
            .map(|u| !u.trim().is_empty())
            .unwrap_or(false)
    );

    Ok(())
}
