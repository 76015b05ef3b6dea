//! The alerting pipeline.

use std::sync::Arc;
use std::time::Duration;

use bandwatch_core::error::AlertError;
use bandwatch_core::traits::{normalized_ts, AlertLedger, DataSource, Notifier};
use bandwatch_core::types::{CrossingEvent, SignalKind, Timeframe};
use bandwatch_indicators::BollingerBands;
use bandwatch_notify::{display_symbol, format_alert};
use bandwatch_signals::CrossDetector;
use tracing::{debug, error, info, warn};

use crate::summary::RunSummary;

/// Pipeline parameters, fixed for one invocation.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Rolling window length
    pub length: usize,
    /// Standard deviation multiplier
    pub mult: f64,
    /// Bar timeframe
    pub timeframe: Timeframe,
    /// Trailing bars kept from the data source (0 = all)
    pub lookback: usize,
    /// Report outside-band closes without a strict edge
    pub loose_mode: bool,
    /// Bars scanned for the diagnostic backfill report (0 = off)
    pub backfill_lookback: usize,
    /// Advisory pause between symbols, against rate limits
    pub pace: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            length: 107,
            mult: 1.7,
            timeframe: Timeframe::Minute5,
            lookback: 0,
            loose_mode: false,
            backfill_lookback: 0,
            pace: Duration::from_millis(250),
        }
    }
}

/// What happened for one symbol in one pass.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    /// Data source returned nothing
    NoData,
    /// Too few bars to form a defined-band pair
    InsufficientData,
    /// Latest pair classified no signal
    NoSignal,
    /// Signal already recorded for this (symbol, bar, kind)
    Duplicate(SignalKind),
    /// Notification confirmed delivered and recorded
    Delivered(SignalKind),
    /// Delivered, but the ledger write failed; will re-fire next run
    DeliveredUnrecorded(SignalKind),
    /// Delivery failed; nothing recorded, retried next run
    DeliveryFailed(SignalKind),
}

/// Sequential per-symbol alert pipeline.
///
/// One instance per run; the ledger is the only state that outlives it.
pub struct AlertPipeline {
    source: Arc<dyn DataSource>,
    notifier: Arc<dyn Notifier>,
    ledger: Arc<dyn AlertLedger>,
    bands: BollingerBands,
    detector: CrossDetector,
    config: PipelineConfig,
}

impl AlertPipeline {
    /// Create a pipeline over the given collaborators.
    pub fn new(
        source: Arc<dyn DataSource>,
        notifier: Arc<dyn Notifier>,
        ledger: Arc<dyn AlertLedger>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            bands: BollingerBands::with_params(config.length, config.mult),
            detector: CrossDetector::new(config.loose_mode),
            source,
            notifier,
            ledger,
            config,
        }
    }

    /// Process all symbols sequentially. A symbol's failure is logged and
    /// counted, never propagated; the loop always completes.
    pub async fn run(&self, symbols: &[String]) -> RunSummary {
        let mut summary = RunSummary::default();

        for (i, symbol) in symbols.iter().enumerate() {
            summary.processed += 1;
            match self.process_symbol(symbol).await {
                Ok(outcome) => self.tally(symbol, outcome, &mut summary),
                Err(e) => {
                    summary.errors += 1;
                    error!(symbol = %symbol, error = %e, "symbol processing failed");
                }
            }

            if i + 1 < symbols.len() && !self.config.pace.is_zero() {
                tokio::time::sleep(self.config.pace).await;
            }
        }

        summary
    }

    fn tally(&self, symbol: &str, outcome: SymbolOutcome, summary: &mut RunSummary) {
        match outcome {
            SymbolOutcome::NoData | SymbolOutcome::InsufficientData => summary.skipped += 1,
            SymbolOutcome::NoSignal => {}
            SymbolOutcome::Duplicate(kind) => {
                summary.signals += 1;
                summary.duplicates += 1;
                debug!(symbol, kind = %kind, "duplicate suppressed");
            }
            SymbolOutcome::Delivered(kind) => {
                summary.signals += 1;
                summary.delivered += 1;
                info!(symbol, kind = %kind, "alert delivered");
            }
            SymbolOutcome::DeliveredUnrecorded(kind) => {
                summary.signals += 1;
                summary.delivered += 1;
                summary.ledger_failures += 1;
                info!(symbol, kind = %kind, "alert delivered");
            }
            SymbolOutcome::DeliveryFailed(kind) => {
                summary.signals += 1;
                summary.delivery_failures += 1;
                warn!(symbol, kind = %kind, "delivery failed, will retry next run");
            }
        }
    }

    /// One symbol, one pass: fetch, band, detect, dedup, deliver, record.
    async fn process_symbol(&self, symbol: &str) -> Result<SymbolOutcome, AlertError> {
        let series = self
            .source
            .fetch_bars(symbol, self.config.timeframe, self.config.lookback)
            .await?;

        if series.is_empty() {
            warn!(symbol, timeframe = %self.config.timeframe, "no data");
            return Ok(SymbolOutcome::NoData);
        }

        let banded = self.bands.banded_bars(&series);
        if banded.len() < 2 {
            info!(
                symbol,
                bars = series.len(),
                required = self.config.length + 1,
                "insufficient data after band warm-up"
            );
            return Ok(SymbolOutcome::InsufficientData);
        }

        // Diagnostic backfill: report-only, no ledger or notifier access
        if self.config.backfill_lookback > 0 {
            let tail_len = self.config.backfill_lookback.max(2).min(banded.len());
            let tail = &banded[banded.len() - tail_len..];
            match self.detector.scan_backfill(tail) {
                Some(hit) => debug!(
                    symbol = %display_symbol(symbol),
                    kind = %hit.kind,
                    bar = %normalized_ts(hit.timestamp),
                    "backfill: last crossing"
                ),
                None => debug!(
                    symbol = %display_symbol(symbol),
                    bars = tail.len(),
                    "backfill: no crossing"
                ),
            }
        }

        let prev = &banded[banded.len() - 2];
        let cur = &banded[banded.len() - 1];

        let kind = match self.detector.classify(prev, cur) {
            Some(kind) => kind,
            None => {
                debug!(
                    symbol = %display_symbol(symbol),
                    bar = %normalized_ts(cur.timestamp),
                    "no signal (prevC={:.6}, prevU={:.6}, prevL={:.6} | curC={:.6}, curU={:.6}, curL={:.6})",
                    prev.close,
                    prev.upper,
                    prev.lower,
                    cur.close,
                    cur.upper,
                    cur.lower
                );
                return Ok(SymbolOutcome::NoSignal);
            }
        };

        let bar_ts = normalized_ts(cur.timestamp);
        if self.ledger.exists(symbol, &bar_ts, kind).await? {
            return Ok(SymbolOutcome::Duplicate(kind));
        }

        let event = CrossingEvent::from_bar(symbol, kind, cur);
        let message = format_alert(&event, self.config.timeframe);

        if let Err(e) = self.notifier.deliver(&message).await {
            warn!(symbol, error = %e, "notification delivery failed");
            return Ok(SymbolOutcome::DeliveryFailed(kind));
        }

        // Record only after confirmed delivery. A failed write leaves the
        // triple absent, trading a possible repeat alert for never losing
        // one.
        if let Err(e) = self.ledger.record(symbol, &bar_ts, kind).await {
            error!(symbol, error = %e, "ledger write failed after delivery");
            return Ok(SymbolOutcome::DeliveredUnrecorded(kind));
        }

        Ok(SymbolOutcome::Delivered(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bandwatch_core::error::{DataError, LedgerError, NotifyError};
    use bandwatch_core::types::{Bar, BarSeries};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    struct FixedSource {
        closes: Vec<f64>,
        fail_symbols: Vec<String>,
    }

    impl FixedSource {
        fn new(closes: Vec<f64>) -> Self {
            Self {
                closes,
                fail_symbols: vec![],
            }
        }
    }

    #[async_trait]
    impl DataSource for FixedSource {
        async fn fetch_bars(
            &self,
            symbol: &str,
            timeframe: Timeframe,
            _lookback: usize,
        ) -> Result<BarSeries, DataError> {
            if self.fail_symbols.iter().any(|s| s == symbol) {
                return Err(DataError::ConnectionError("boom".to_string()));
            }
            let mut series = BarSeries::new(symbol.to_string(), timeframe);
            series.extend(
                self.closes
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| Bar::new(i as i64 * 300_000, c)),
            );
            Ok(series)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        fail: AtomicBool,
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn deliver(&self, message: &str) -> Result<(), NotifyError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(NotifyError::Transport("unreachable".to_string()));
            }
            self.sent.lock().unwrap().push(message.to_string());
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[derive(Default)]
    struct MemoryLedger {
        entries: Mutex<HashSet<(String, String, SignalKind)>>,
    }

    #[async_trait]
    impl AlertLedger for MemoryLedger {
        async fn exists(
            &self,
            symbol: &str,
            bar_ts: &str,
            kind: SignalKind,
        ) -> Result<bool, LedgerError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .contains(&(symbol.to_string(), bar_ts.to_string(), kind)))
        }

        async fn record(
            &self,
            symbol: &str,
            bar_ts: &str,
            kind: SignalKind,
        ) -> Result<(), LedgerError> {
            self.entries
                .lock()
                .unwrap()
                .insert((symbol.to_string(), bar_ts.to_string(), kind));
            Ok(())
        }
    }

    // Flat history then a step over the collapsed band: a strict cross
    // on the final pair with length 7
    fn crossing_closes() -> Vec<f64> {
        vec![100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 101.0]
    }

    fn config(length: usize) -> PipelineConfig {
        PipelineConfig {
            length,
            mult: 2.0,
            pace: Duration::ZERO,
            ..Default::default()
        }
    }

    fn pipeline(
        source: FixedSource,
        notifier: Arc<RecordingNotifier>,
        ledger: Arc<MemoryLedger>,
        cfg: PipelineConfig,
    ) -> AlertPipeline {
        AlertPipeline::new(Arc::new(source), notifier, ledger, cfg)
    }

    #[tokio::test]
    async fn test_delivers_then_suppresses_duplicate() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ledger = Arc::new(MemoryLedger::default());
        let symbols = vec!["AAPL".to_string()];

        let p = pipeline(
            FixedSource::new(crossing_closes()),
            notifier.clone(),
            ledger.clone(),
            config(7),
        );
        let first = p.run(&symbols).await;
        assert_eq!(first.delivered, 1);
        assert_eq!(first.duplicates, 0);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);

        // Same data next run: the same (symbol, bar, kind) is held back
        let second = p.run(&symbols).await;
        assert_eq!(second.delivered, 0);
        assert_eq!(second.duplicates, 1);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_withholds_ledger_write() {
        let notifier = Arc::new(RecordingNotifier::default());
        notifier.fail.store(true, Ordering::SeqCst);
        let ledger = Arc::new(MemoryLedger::default());
        let symbols = vec!["AAPL".to_string()];

        let p = pipeline(
            FixedSource::new(crossing_closes()),
            notifier.clone(),
            ledger.clone(),
            config(7),
        );
        let first = p.run(&symbols).await;
        assert_eq!(first.delivery_failures, 1);
        assert!(ledger.entries.lock().unwrap().is_empty());

        // Notifier recovers: the same bar is retried, delivered, recorded
        notifier.fail.store(false, Ordering::SeqCst);
        let second = p.run(&symbols).await;
        assert_eq!(second.delivered, 1);
        assert_eq!(ledger.entries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insufficient_data_skips_without_error() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ledger = Arc::new(MemoryLedger::default());

        // Fewer than length + 1 bars: zero or one defined-band bars
        let p = pipeline(
            FixedSource::new(vec![100.0, 100.0, 100.0]),
            notifier.clone(),
            ledger,
            config(7),
        );
        let summary = p.run(&["AAPL".to_string()]).await;

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, 0);
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_symbol_failure_does_not_abort_run() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ledger = Arc::new(MemoryLedger::default());

        let mut source = FixedSource::new(crossing_closes());
        source.fail_symbols = vec!["BAD".to_string()];

        let p = pipeline(source, notifier.clone(), ledger, config(7));
        let summary = p
            .run(&["BAD".to_string(), "AAPL".to_string()])
            .await;

        assert_eq!(summary.errors, 1);
        assert_eq!(summary.delivered, 1);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_flat_series_produces_no_signal() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ledger = Arc::new(MemoryLedger::default());

        let p = pipeline(
            FixedSource::new(vec![100.0; 12]),
            notifier.clone(),
            ledger,
            config(7),
        );
        let summary = p.run(&["AAPL".to_string()]).await;

        assert_eq!(summary.signals, 0);
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_loose_mode_reports_outside_band() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ledger = Arc::new(MemoryLedger::default());

        // Price is already above the band on the previous bar and still
        // beyond it on the latest: strict finds no edge, loose still alerts
        let closes = vec![
            100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 101.0, 103.0,
        ];
        let mut cfg = config(7);
        cfg.loose_mode = true;

        let p = pipeline(FixedSource::new(closes), notifier.clone(), ledger, cfg);
        let summary = p.run(&["AAPL".to_string()]).await;

        assert_eq!(summary.delivered, 1);
        let sent = notifier.sent.lock().unwrap();
        assert!(sent[0].contains("OUTSIDE ABOVE"));
    }
}
