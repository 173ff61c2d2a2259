//! Moving-average features.
//!
//! Each feature either wraps rolling-window engines or carries a scalar
//! recurrence, and resumes from its carried state on continuation fits.

pub mod ema;
pub mod frama;
pub mod hull;
pub mod kama;
pub mod smma;
pub mod tema;

pub use ema::{EwmOperation, ExponentialMovingConfig, ExponentialMovingFeature};
pub use frama::{FractalAdaptiveConfig, FractalAdaptiveMovingAverage};
pub use hull::{HullMovingConfig, HullMovingFeature};
pub use kama::{KaufmanAdaptiveConfig, KaufmanAdaptiveMovingAverage};
pub use smma::{SmoothedMovingAverage, SmoothedMovingAverageConfig};
pub use tema::TripleExponentialMovingFeature;
