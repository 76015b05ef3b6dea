//! Bollinger band calculation.

use bandwatch_core::traits::MultiOutputIndicator;
use bandwatch_core::types::{BandedBar, BarSeries};
use serde::{Deserialize, Serialize};

/// Band values for one bar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Band {
    /// Middle line (rolling mean)
    pub basis: f64,
    /// basis + mult * stdev
    pub upper: f64,
    /// basis - mult * stdev
    pub lower: f64,
}

/// Bollinger Bands over closing prices.
///
/// The middle line is a rolling mean; the bands sit `mult` population
/// standard deviations away. The population normalization (divide by the
/// window length, not length - 1) matches the Pine-script convention and
/// shifts where crossings land, so it is load-bearing here.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    length: usize,
    mult: f64,
}

impl BollingerBands {
    /// Create bands with custom parameters.
    pub fn with_params(length: usize, mult: f64) -> Self {
        assert!(length > 1, "Length must be greater than 1");
        assert!(mult > 0.0, "Multiplier must be positive");
        Self { length, mult }
    }

    /// Combine a bar series with its band values, keeping only bars whose
    /// trailing window is fully warmed up.
    ///
    /// The first `length - 1` bars never appear in the output.
    pub fn banded_bars(&self, series: &BarSeries) -> Vec<BandedBar> {
        let closes = series.closes();
        let bands = self.calculate(&closes);
        let offset = self.length - 1;

        bands
            .into_iter()
            .enumerate()
            .filter_map(|(i, band)| {
                series.get(offset + i).map(|bar| BandedBar {
                    timestamp: bar.timestamp,
                    close: bar.close,
                    basis: band.basis,
                    upper: band.upper,
                    lower: band.lower,
                })
            })
            .collect()
    }
}

impl Default for BollingerBands {
    /// Default parameters (107, 1.7).
    fn default() -> Self {
        Self::with_params(107, 1.7)
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = Band;

    fn calculate(&self, data: &[f64]) -> Vec<Band> {
        if data.len() < self.length {
            return vec![];
        }

        let length_f64 = self.length as f64;
        let mut result = Vec::with_capacity(data.len() - self.length + 1);

        for window in data.windows(self.length) {
            let mean: f64 = window.iter().sum::<f64>() / length_f64;
            let variance: f64 =
                window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / length_f64;
            let std_dev = variance.sqrt();

            result.push(Band {
                basis: mean,
                upper: mean + self.mult * std_dev,
                lower: mean - self.mult * std_dev,
            });
        }

        result
    }

    fn period(&self) -> usize {
        self.length
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}
