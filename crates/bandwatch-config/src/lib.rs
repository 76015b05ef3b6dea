//! Configuration management.

mod settings;

pub use settings::{
    default_symbols, AlertSettings, AppConfig, LedgerSettings, LoggingConfig, NotifySettings,
    SettingsError,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// The file is optional so an env-only deployment works; variables use the
/// `BANDWATCH__` prefix with `__` section separators, e.g.
/// `BANDWATCH__NOTIFY__WEBHOOK_URL`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("BANDWATCH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
