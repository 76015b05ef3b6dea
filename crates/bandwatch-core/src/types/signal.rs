//! Band and signal types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a band crossing signal.
///
/// The `Cross*` kinds are edge-triggered: price moved from inside or at a
/// band to strictly beyond it between two consecutive bars. The `Outside*`
/// kinds are produced only in loose mode, when the latest close sits outside
/// a band without a fresh edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    CrossAbove,
    CrossBelow,
    OutsideAbove,
    OutsideBelow,
}

impl SignalKind {
    /// Stable wire form used as part of the ledger key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::CrossAbove => "CROSS_ABOVE",
            SignalKind::CrossBelow => "CROSS_BELOW",
            SignalKind::OutsideAbove => "OUTSIDE_ABOVE",
            SignalKind::OutsideBelow => "OUTSIDE_BELOW",
        }
    }

    /// Human-readable label ("CROSS ABOVE").
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CROSS_ABOVE" => Ok(SignalKind::CrossAbove),
            "CROSS_BELOW" => Ok(SignalKind::CrossBelow),
            "OUTSIDE_ABOVE" => Ok(SignalKind::OutsideAbove),
            "OUTSIDE_BELOW" => Ok(SignalKind::OutsideBelow),
            _ => Err(format!("Invalid signal kind: {}", s)),
        }
    }
}

/// A bar carrying fully defined band values.
///
/// Only materialized once the warm-up window is filled; bars inside the
/// warm-up span simply never appear as `BandedBar`s. Band values are a pure
/// function of the trailing window, the length, and the multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandedBar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Closing price
    pub close: f64,
    /// Rolling mean of closes over the window
    pub basis: f64,
    /// basis + mult * stdev
    pub upper: f64,
    /// basis - mult * stdev
    pub lower: f64,
}

impl BandedBar {
    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }
}

/// A classified crossing on the most recently closed bar.
///
/// Produced only by the detector; lives for one pipeline pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingEvent {
    /// Instrument symbol
    pub symbol: String,
    /// Trigger bar timestamp, unix milliseconds
    pub timestamp: i64,
    /// Signal classification
    pub kind: SignalKind,
    /// Close at the trigger bar
    pub close: f64,
    /// Upper band at the trigger bar
    pub upper: f64,
    /// Lower band at the trigger bar
    pub lower: f64,
}

impl CrossingEvent {
    /// Build an event from the trigger bar.
    pub fn from_bar(symbol: &str, kind: SignalKind, bar: &BandedBar) -> Self {
        Self {
            symbol: symbol.to_string(),
            timestamp: bar.timestamp,
            kind,
            close: bar.close,
            upper: bar.upper,
            lower: bar.lower,
        }
    }

    /// Get the trigger bar timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
    }
}
