//! Dedup ledger trait definition and key normalization.

use crate::error::LedgerError;
use crate::types::SignalKind;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

/// Normalize a bar timestamp (unix milliseconds) into the fixed UTC
/// RFC 3339 form used as part of the ledger key.
///
/// Equivalent local-time representations of one instant must map to one
/// key, so everything funnels through UTC before formatting.
pub fn normalized_ts(timestamp_millis: i64) -> String {
    let dt: DateTime<Utc> = DateTime::from_timestamp_millis(timestamp_millis)
        .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap());
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Durable record of already-notified (symbol, bar timestamp, kind) triples.
///
/// The store only grows: entries are never updated or deleted, and
/// recording an existing triple is a no-op rather than an error.
#[async_trait]
pub trait AlertLedger: Send + Sync {
    /// True iff this exact triple was previously recorded.
    async fn exists(
        &self,
        symbol: &str,
        bar_ts: &str,
        kind: SignalKind,
    ) -> Result<bool, LedgerError>;

    /// Idempotent insert-if-absent. Once this returns Ok the triple
    /// survives process restart.
    async fn record(
        &self,
        symbol: &str,
        bar_ts: &str,
        kind: SignalKind,
    ) -> Result<(), LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_normalized_ts_is_utc_rfc3339() {
        // 2024-03-10T07:00:00Z, the US DST-transition morning
        assert_eq!(normalized_ts(1_710_054_000_000), "2024-03-10T07:00:00Z");
    }

    #[test]
    fn test_equivalent_local_instants_share_a_key() {
        let utc = "2024-03-10T07:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let local = DateTime::<FixedOffset>::parse_from_rfc3339("2024-03-10T02:00:00-05:00")
            .unwrap();

        assert_eq!(
            normalized_ts(utc.timestamp_millis()),
            normalized_ts(local.timestamp_millis())
        );
    }
}
