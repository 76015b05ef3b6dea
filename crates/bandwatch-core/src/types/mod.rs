//! Data model for bars, bands, and signals.

mod bar;
mod signal;
mod timeframe;

pub use bar::{Bar, BarSeries};
pub use signal::{BandedBar, CrossingEvent, SignalKind};
pub use timeframe::Timeframe;
