//! Core types and traits for the band alerting system.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries, Timeframe)
//! - Band and signal types (BandedBar, SignalKind, CrossingEvent)
//! - Boundary traits for data sources, notifiers, and the dedup ledger

pub mod types;
pub mod traits;
pub mod error;

pub use error::{AlertError, AlertResult};
pub use types::*;
pub use traits::*;
