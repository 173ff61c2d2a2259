//! # fe-features
//!
//! Moving averages and technical indicators built on the `fe-core`
//! rolling-window engine.
//!
//! Every feature can be fitted over a full history at once or chunk by chunk
//! and produces the same rows either way. Features are organised into:
//!
//! - **Moving averages**: exponential, Hull, triple exponential, Kaufman
//!   adaptive, fractal adaptive, smoothed
//! - **Momentum**: APO, PVO, MACD, Kaufman efficiency, RSI, inverse Fisher
//!   RSI, TEMA oscillator
//! - **Trend**: ADX, Aroon, zero lag exponential
//! - **Volatility**: ATR, typical value, Bollinger bands, Keltner channel
//! - **Volume**: series weighted averages over a value and a weight column
//!
//! A [`plan::FeaturePlan`] describes many features declaratively.
//!
//! # Example
//!
//! ```
//! use fe_core::prelude::*;
//! use fe_features::prelude::*;
//!
//! let mut rsi = RelativeStrengthIndex::<f64>::per_column(RelativeStrengthIndexConfig::new(3))
//!     .unwrap();
//!
//! let history = DataFrame::from_series("close", Series::from_vec(vec![1.0, 2.0, 1.5, 3.0]));
//! let first = rsi.fit(&history, true).unwrap();
//!
//! let update = DataFrame::from_series("close", Series::from_vec(vec![2.5]));
//! let next = rsi.fit(&update, false).unwrap();
//! assert_eq!(first.len(), 4);
//! assert_eq!(next.len(), 1);
//!
//! assert!(rsi.is_fitted());
//! rsi.reset();
//! assert!(rsi.fit(&update, false).unwrap_err().is_state());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod momentum;
pub mod moving_average;
pub mod plan;
pub mod trend;
pub mod volatility;
pub mod volume;

pub mod prelude;

pub use prelude::*;
