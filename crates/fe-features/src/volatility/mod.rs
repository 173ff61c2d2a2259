//! Volatility features.
//!
//! This module contains volatility features:
//! - Average true range
//! - Typical value
//! - Bollinger bands
//! - Keltner channel

pub mod atr;
pub mod bollinger;
pub mod keltner;
pub mod typical_value;

pub use atr::{AverageTrueRange, AverageTrueRangeConfig};
pub use bollinger::{BollingerBands, BollingerBandsConfig};
pub use keltner::{KeltnerChannel, KeltnerChannelConfig};
pub use typical_value::{TypicalValue, TypicalValueConfig};
