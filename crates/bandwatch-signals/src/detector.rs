//! Two-bar crossing classification.

use bandwatch_core::types::{BandedBar, SignalKind};

/// The most recent crossing found by a backfill scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackfillHit {
    /// Trigger bar timestamp, unix milliseconds
    pub timestamp: i64,
    /// Signal classification
    pub kind: SignalKind,
}

/// Classifies the transition between two consecutive banded bars.
///
/// Pure: no side effects, no state beyond the loose-mode flag. Callers
/// must supply pairs where `cur` immediately follows `prev` and both carry
/// defined bands; bars inside the warm-up span never reach the detector.
#[derive(Debug, Clone, Copy)]
pub struct CrossDetector {
    loose: bool,
}

impl CrossDetector {
    /// Create a detector. With `loose` enabled, a close sitting outside a
    /// band without a fresh edge still classifies as an `Outside*` kind.
    pub fn new(loose: bool) -> Self {
        Self { loose }
    }

    /// Classify the transition from `prev` to `cur`, if any.
    ///
    /// At most one kind is returned. The two strict kinds cannot both fire
    /// for one pair: with a positive multiplier the bands never invert.
    pub fn classify(&self, prev: &BandedBar, cur: &BandedBar) -> Option<SignalKind> {
        if let Some(kind) = strict_cross(prev, cur) {
            return Some(kind);
        }

        if self.loose {
            if cur.close > cur.upper {
                return Some(SignalKind::OutsideAbove);
            }
            if cur.close < cur.lower {
                return Some(SignalKind::OutsideBelow);
            }
        }

        None
    }

    /// Scan consecutive pairs of a defined-band tail and report the most
    /// recent strict crossing, later hits overwriting earlier ones.
    ///
    /// Diagnostic only: always strict regardless of loose mode, and the
    /// result is never notified or written to the ledger.
    pub fn scan_backfill(&self, bars: &[BandedBar]) -> Option<BackfillHit> {
        let mut hit = None;
        for pair in bars.windows(2) {
            if let Some(kind) = strict_cross(&pair[0], &pair[1]) {
                hit = Some(BackfillHit {
                    timestamp: pair[1].timestamp,
                    kind,
                });
            }
        }
        hit
    }
}

fn strict_cross(prev: &BandedBar, cur: &BandedBar) -> Option<SignalKind> {
    if prev.close <= prev.upper && cur.close > cur.upper {
        return Some(SignalKind::CrossAbove);
    }
    if prev.close >= prev.lower && cur.close < cur.lower {
        return Some(SignalKind::CrossBelow);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandwatch_core::types::{Bar, BarSeries, Timeframe};
    use bandwatch_indicators::BollingerBands;

    fn banded(timestamp: i64, close: f64, basis: f64, width: f64) -> BandedBar {
        BandedBar {
            timestamp,
            close,
            basis,
            upper: basis + width,
            lower: basis - width,
        }
    }

    #[test]
    fn test_cross_above_requires_edge() {
        let prev = banded(1_000, 103.0, 100.0, 4.0);
        let cur = banded(2_000, 105.0, 100.0, 4.0);
        let detector = CrossDetector::new(false);

        assert_eq!(detector.classify(&prev, &cur), Some(SignalKind::CrossAbove));

        // Already outside on the previous bar: no fresh edge
        let prev_outside = banded(1_000, 104.5, 100.0, 4.0);
        assert_eq!(detector.classify(&prev_outside, &cur), None);
    }

    #[test]
    fn test_cross_below() {
        let prev = banded(1_000, 96.5, 100.0, 4.0);
        let cur = banded(2_000, 95.0, 100.0, 4.0);
        let detector = CrossDetector::new(false);

        assert_eq!(detector.classify(&prev, &cur), Some(SignalKind::CrossBelow));
    }

    #[test]
    fn test_inside_bands_no_signal() {
        let prev = banded(1_000, 100.0, 100.0, 4.0);
        let cur = banded(2_000, 101.0, 100.0, 4.0);

        assert_eq!(CrossDetector::new(false).classify(&prev, &cur), None);
        assert_eq!(CrossDetector::new(true).classify(&prev, &cur), None);
    }

    #[test]
    fn test_loose_mode_reports_outside() {
        // Outside on both bars: strict sees no edge, loose still reports
        let prev = banded(1_000, 105.0, 100.0, 4.0);
        let cur = banded(2_000, 106.0, 100.0, 4.0);

        assert_eq!(CrossDetector::new(false).classify(&prev, &cur), None);
        assert_eq!(
            CrossDetector::new(true).classify(&prev, &cur),
            Some(SignalKind::OutsideAbove)
        );

        let below_prev = banded(1_000, 94.0, 100.0, 4.0);
        let below_cur = banded(2_000, 93.0, 100.0, 4.0);
        assert_eq!(
            CrossDetector::new(true).classify(&below_prev, &below_cur),
            Some(SignalKind::OutsideBelow)
        );
    }

    #[test]
    fn test_flat_series_never_crosses() {
        let bb = BollingerBands::with_params(3, 2.0);
        let mut series = BarSeries::new("FLAT".to_string(), Timeframe::Minute5);
        series.extend((0..8).map(|i| Bar::new(i * 300_000, 50.0)));

        let banded = bb.banded_bars(&series);
        let detector = CrossDetector::new(false);
        for pair in banded.windows(2) {
            assert_eq!(detector.classify(&pair[0], &pair[1]), None);
        }
    }

    #[test]
    fn test_spike_widens_band_and_suppresses_cross() {
        // L=3, M=2, closes [10,10,10,10,20]: the final spike also widens
        // the band, so close (20) stays under upper (~22.76)
        let bb = BollingerBands::with_params(3, 2.0);
        let mut series = BarSeries::new("SPIKE".to_string(), Timeframe::Minute5);
        series.extend(
            [10.0, 10.0, 10.0, 10.0, 20.0]
                .iter()
                .enumerate()
                .map(|(i, &c)| Bar::new(i as i64 * 300_000, c)),
        );

        let banded = bb.banded_bars(&series);
        let (prev, cur) = (banded[banded.len() - 2], banded[banded.len() - 1]);

        assert!(prev.close <= prev.upper);
        assert!(cur.close < cur.upper);
        assert_eq!(CrossDetector::new(false).classify(&prev, &cur), None);
    }

    #[test]
    fn test_rise_through_established_band_fires_exactly_once() {
        // Flat history collapses the band to the basis; the first close
        // beyond upper fires, and the already-outside edge plus the widened
        // band keep it from firing again while price holds the new level
        let bb = BollingerBands::with_params(7, 2.0);
        let closes = [
            100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 101.0, 101.0, 101.0,
        ];
        let mut series = BarSeries::new("RISE".to_string(), Timeframe::Minute5);
        series.extend(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| Bar::new(i as i64 * 300_000, c)),
        );

        let banded = bb.banded_bars(&series);
        let detector = CrossDetector::new(false);
        let crossings: Vec<_> = banded
            .windows(2)
            .filter_map(|p| detector.classify(&p[0], &p[1]).map(|k| (p[1].timestamp, k)))
            .collect();

        // Fires on the first 101.0 bar (index 7) and never again
        assert_eq!(crossings, vec![(7 * 300_000, SignalKind::CrossAbove)]);
    }

    #[test]
    fn test_backfill_keeps_most_recent_hit() {
        let bars = vec![
            banded(1_000, 100.0, 100.0, 4.0),
            banded(2_000, 105.0, 100.0, 4.0), // cross above
            banded(3_000, 101.0, 100.0, 4.0),
            banded(4_000, 95.0, 100.0, 4.0), // cross below, most recent
            banded(5_000, 94.0, 100.0, 4.0),
        ];

        let hit = CrossDetector::new(false).scan_backfill(&bars).unwrap();
        assert_eq!(hit.kind, SignalKind::CrossBelow);
        assert_eq!(hit.timestamp, 4_000);
    }

    #[test]
    fn test_backfill_no_crossing() {
        let bars = vec![
            banded(1_000, 100.0, 100.0, 4.0),
            banded(2_000, 101.0, 100.0, 4.0),
        ];
        assert_eq!(CrossDetector::new(false).scan_backfill(&bars), None);
    }
}
