//! Edge-triggered band crossing detection.

mod detector;

pub use detector::{BackfillHit, CrossDetector};
