//! Momentum features.
//!
//! This module contains momentum features:
//! - Absolute price oscillator
//! - Percentage value oscillator
//! - MACD
//! - Kaufman efficiency ratio
//! - Relative strength index and its inverse Fisher transform
//! - Triple exponential moving average oscillator

pub mod apo;
pub mod inverse_fisher_rsi;
pub mod kaufman_efficiency;
pub mod macd;
pub mod pvo;
pub mod rsi;
pub mod tema_oscillator;

pub use apo::{AbsolutePriceOscillator, AbsolutePriceOscillatorConfig};
pub use inverse_fisher_rsi::{InverseFisherRsi, InverseFisherRsiConfig};
pub use kaufman_efficiency::{KaufmanEfficiency, KaufmanEfficiencyConfig};
pub use macd::{MovingAverageConvergenceDivergence, MovingAverageConvergenceDivergenceConfig};
pub use pvo::{PercentageValueOscillator, PercentageValueOscillatorConfig};
pub use rsi::{RelativeStrengthIndex, RelativeStrengthIndexConfig};
pub use tema_oscillator::TripleExponentialMovingOscillator;
