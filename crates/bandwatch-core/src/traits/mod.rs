//! Boundary trait definitions.

mod data_source;
mod indicator;
mod ledger;
mod notifier;

pub use data_source::DataSource;
pub use indicator::{Indicator, MultiOutputIndicator};
pub use ledger::{normalized_ts, AlertLedger};
pub use notifier::Notifier;
