//! Notification sink trait definition.

use crate::error::NotifyError;
use async_trait::async_trait;

/// Trait for outbound notification sinks.
///
/// Failure must be distinguishable from success: the pipeline withholds
/// the ledger write when delivery fails so the event is retried next run.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a formatted message.
    async fn deliver(&self, message: &str) -> Result<(), NotifyError>;

    /// Get the sink name.
    fn name(&self) -> &str;
}
