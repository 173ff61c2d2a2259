//! Trend features.
//!
//! This module contains trend features:
//! - Average directional movement index (ADX)
//! - Aroon oscillator
//! - Zero lag exponential moving feature

pub mod adx;
pub mod aroon;
pub mod zlema;

pub use adx::{AverageDirectionalMovementIndex, AverageDirectionalMovementIndexConfig};
pub use aroon::{AroonOscillator, AroonOscillatorConfig};
pub use zlema::{ZeroLagExponentialMovingConfig, ZeroLagExponentialMovingFeature};
