//! SQLite-backed dedup ledger.
//!
//! One append-only table keyed by (symbol, bar timestamp, signal kind).
//! `INSERT OR IGNORE` against the composite primary key gives the atomic
//! insert-if-absent the pipeline relies on, including across overlapping
//! runs sharing one database file.

use async_trait::async_trait;
use bandwatch_core::error::LedgerError;
use bandwatch_core::traits::AlertLedger;
use bandwatch_core::types::SignalKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::debug;

/// Durable alert ledger on a local SQLite database.
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Open (creating if needed) the ledger database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| LedgerError::Connection(e.to_string()))?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        Self::init_schema(&pool).await?;
        debug!(path = %path.display(), "opened alert ledger");
        Ok(Self { pool })
    }

    /// Open an in-memory ledger. Used by tests; contents do not survive
    /// the pool.
    pub async fn in_memory() -> Result<Self, LedgerError> {
        // A single connection, or each pooled connection would get its
        // own private in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), LedgerError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS alerts (
                symbol TEXT NOT NULL,
                bar_ts TEXT NOT NULL,
                signal TEXT NOT NULL,
                PRIMARY KEY (symbol, bar_ts, signal)
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| LedgerError::Query(e.to_string()))?;
        Ok(())
    }

    /// Close the underlying pool, flushing outstanding writes.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl AlertLedger for SqliteLedger {
    async fn exists(
        &self,
        symbol: &str,
        bar_ts: &str,
        kind: SignalKind,
    ) -> Result<bool, LedgerError> {
        let row = sqlx::query(
            "SELECT 1 FROM alerts WHERE symbol = ? AND bar_ts = ? AND signal = ? LIMIT 1",
        )
        .bind(symbol)
        .bind(bar_ts)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Query(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn record(
        &self,
        symbol: &str,
        bar_ts: &str,
        kind: SignalKind,
    ) -> Result<(), LedgerError> {
        sqlx::query("INSERT OR IGNORE INTO alerts (symbol, bar_ts, signal) VALUES (?, ?, ?)")
            .bind(symbol)
            .bind(bar_ts)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| LedgerError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandwatch_core::traits::normalized_ts;

    #[tokio::test]
    async fn test_record_then_exists() {
        let ledger = SqliteLedger::in_memory().await.unwrap();
        let ts = normalized_ts(1_710_054_000_000);

        assert!(!ledger.exists("AAPL", &ts, SignalKind::CrossAbove).await.unwrap());
        ledger.record("AAPL", &ts, SignalKind::CrossAbove).await.unwrap();
        assert!(ledger.exists("AAPL", &ts, SignalKind::CrossAbove).await.unwrap());
    }

    #[tokio::test]
    async fn test_record_is_idempotent() {
        let ledger = SqliteLedger::in_memory().await.unwrap();
        let ts = normalized_ts(1_710_054_000_000);

        ledger.record("SPY", &ts, SignalKind::CrossBelow).await.unwrap();
        ledger.record("SPY", &ts, SignalKind::CrossBelow).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alerts")
            .fetch_one(&ledger.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_triples_are_distinct_per_kind_and_bar() {
        let ledger = SqliteLedger::in_memory().await.unwrap();
        let ts = normalized_ts(1_710_054_000_000);
        let later = normalized_ts(1_710_054_300_000);

        ledger.record("SPY", &ts, SignalKind::CrossAbove).await.unwrap();

        assert!(!ledger.exists("SPY", &ts, SignalKind::CrossBelow).await.unwrap());
        assert!(!ledger.exists("SPY", &later, SignalKind::CrossAbove).await.unwrap());
        assert!(!ledger.exists("QQQ", &ts, SignalKind::CrossAbove).await.unwrap());
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.sqlite3");
        let ts = normalized_ts(1_710_054_000_000);

        {
            let ledger = SqliteLedger::open(&path).await.unwrap();
            ledger.record("TSLA", &ts, SignalKind::OutsideAbove).await.unwrap();
            ledger.close().await;
        }

        let reopened = SqliteLedger::open(&path).await.unwrap();
        assert!(reopened
            .exists("TSLA", &ts, SignalKind::OutsideAbove)
            .await
            .unwrap());
    }
}
