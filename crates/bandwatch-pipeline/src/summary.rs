//! Per-run result accounting.

use serde::{Deserialize, Serialize};

/// Counters for one pipeline invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Symbols fed through the pipeline
    pub processed: usize,
    /// Symbols skipped for missing or insufficient data
    pub skipped: usize,
    /// Signals classified on the latest bar pair
    pub signals: usize,
    /// Signals suppressed by the dedup ledger
    pub duplicates: usize,
    /// Notifications confirmed delivered
    pub delivered: usize,
    /// Deliveries that failed (retried next run)
    pub delivery_failures: usize,
    /// Ledger writes that could not be confirmed after delivery
    pub ledger_failures: usize,
    /// Symbols whose processing errored
    pub errors: usize,
}

impl RunSummary {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═════════════════════════════════════════\n");
        s.push_str("               RUN SUMMARY               \n");
        s.push_str("═════════════════════════════════════════\n");
        s.push_str(&format!("  Symbols processed:   {}\n", self.processed));
        s.push_str(&format!("  Skipped (no data):   {}\n", self.skipped));
        s.push_str(&format!("  Signals found:       {}\n", self.signals));
        s.push_str(&format!("  Duplicates held:     {}\n", self.duplicates));
        s.push_str(&format!("  Delivered:           {}\n", self.delivered));
        s.push_str(&format!("  Delivery failures:   {}\n", self.delivery_failures));
        if self.ledger_failures > 0 {
            s.push_str(&format!("  Ledger failures:     {}\n", self.ledger_failures));
        }
        s.push_str(&format!("  Errors:              {}\n", self.errors));

        s
    }
}
