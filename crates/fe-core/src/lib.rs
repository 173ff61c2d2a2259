//! # fe-core
//!
//! Core types for resumable rolling-window feature computation.
//!
//! Every feature built on this crate can be fitted once over a full history
//! or chunk by chunk (`first_fit = true`, then `first_fit = false` for each
//! later batch) and produces the same rows either way. This crate provides:
//!
//! - [`TaFloat`] - Trait for numeric types (f32/f64)
//! - [`Series`] and [`DataFrame`] - Ordered columns and tables
//! - [`WindowShape`] - The window-shape library
//! - [`ReducerKind`] and [`Reducer`] - Window reductions
//! - [`RollingWindow`] - The stateful rolling-window engine
//! - [`ColumnFeature`], [`Feature`] and [`PerColumn`] - Feature traits and
//!   per-column state
//!
//! ## Feature Flags
//!
//! - `serde` (default) - Serialize and deserialize configurations
//!
//! ## Example
//!
//! ```rust
//! use fe_core::prelude::*;
//!
//! let descriptor = WindowDescriptor::new(3)
//!     .with_min_periods(1)
//!     .with_shape(WindowShape::Triang);
//! let mut window = RollingWindow::<f64>::new(&descriptor).unwrap();
//!
//! let first = window.compute(&[1.0, 2.0, 3.0], true).unwrap();
//! let next = window.compute(&[4.0], false).unwrap();
//! assert_eq!(first.len(), 3);
//! assert_eq!(next.len(), 1);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod columns;
pub mod dataframe;
pub mod engine;
pub mod error;
pub mod num;
pub mod prelude;
pub mod reducer;
pub mod rolling;
pub mod series;
pub mod shapes;
pub mod traits;
pub mod utils;
pub mod window;

// Re-export core types at crate root
pub use columns::PerColumn;
pub use dataframe::DataFrame;
pub use engine::{compute, RollingKernel, RollingWindow, WindowDescriptor};
pub use error::{ConfigError, DataError, FeatureError, Result, StateError};
pub use num::TaFloat;
pub use reducer::{Reducer, ReducerKind};
pub use rolling::RollingFeature;
pub use series::Series;
pub use shapes::WindowShape;
pub use traits::{
    check_batch, check_paired_batch, Bands, ColumnFeature, ColumnOutput, Feature, FeatureConfig,
    PairedColumnFeature,
};
pub use window::TrailingBuffer;
