//! Rolling-statistic band computation.

mod bollinger;

pub use bollinger::{Band, BollingerBands};
