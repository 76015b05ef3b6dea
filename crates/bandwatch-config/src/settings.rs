//! Configuration structures.

use bandwatch_core::types::Timeframe;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors. Fatal at startup, before any symbol
/// is processed.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("notify.webhook_url is required unless alert.dry_run is set")]
    MissingWebhook,

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub alert: AlertSettings,
    #[serde(default)]
    pub notify: NotifySettings,
    #[serde(default)]
    pub ledger: LedgerSettings,
}

impl AppConfig {
    /// Validate before the pipeline runs. A missing webhook without
    /// dry-run is the one fatal configuration error.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.alert.dry_run
            && self
                .notify
                .webhook_url
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .is_empty()
        {
            return Err(SettingsError::MissingWebhook);
        }
        if self.alert.length < 2 {
            return Err(SettingsError::Invalid(
                "alert.length must be at least 2".to_string(),
            ));
        }
        if self.alert.mult <= 0.0 {
            return Err(SettingsError::Invalid(
                "alert.mult must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Configured symbols, falling back to the default universe.
    pub fn symbols(&self) -> Vec<String> {
        if self.alert.symbols.is_empty() {
            default_symbols()
        } else {
            self.alert.symbols.clone()
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Signal detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Symbols to watch; empty means the default universe
    pub symbols: Vec<String>,
    /// Rolling window length
    pub length: usize,
    /// Standard deviation multiplier
    pub mult: f64,
    /// Bar timeframe
    pub timeframe: Timeframe,
    /// Trailing bars kept from the data source (0 = all)
    pub lookback: usize,
    /// Alert when the latest close is outside the band without a strict
    /// crossing edge
    pub loose_mode: bool,
    /// Bars scanned for the diagnostic backfill report (0 = off)
    pub backfill_lookback: usize,
    /// Print payloads instead of posting them
    pub dry_run: bool,
    /// Advisory pause between symbols, in milliseconds
    pub pace_ms: u64,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            symbols: vec![],
            length: 107,
            mult: 1.7,
            timeframe: Timeframe::Minute5,
            lookback: 0,
            loose_mode: false,
            backfill_lookback: 0,
            dry_run: false,
            pace_ms: 250,
        }
    }
}

/// Notification sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifySettings {
    /// Discord webhook URL; required unless dry_run
    pub webhook_url: Option<String>,
    /// Webhook display name
    pub username: String,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            webhook_url: None,
            username: "bandwatch".to_string(),
        }
    }
}

/// Dedup ledger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// SQLite database path
    pub path: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            path: ".state/bandwatch.sqlite3".to_string(),
        }
    }
}

/// Default symbol universe, used when the config lists none.
pub fn default_symbols() -> Vec<String> {
    [
        "AAPL", "MSFT", "TSLA", "SPY", "QQQ", "NVDA", "MES=F", "MNQ=F", "MGC=F", "MCL=F",
        "MHG=F", "SIL=F", "EURUSD=X", "GBPUSD=X", "JPY=X", "USDJPY=X", "USDCAD=X", "AUDUSD=X",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
