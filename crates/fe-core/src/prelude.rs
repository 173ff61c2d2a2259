//! Convenient re-exports of commonly used types.
//!
//! ```rust
//! use fe_core::prelude::*;
//! ```

pub use crate::columns::PerColumn;
pub use crate::dataframe::DataFrame;
pub use crate::engine::{RollingWindow, WindowDescriptor};
pub use crate::error::{FeatureError, Result};
pub use crate::num::TaFloat;
pub use crate::reducer::{Reducer, ReducerKind};
pub use crate::rolling::RollingFeature;
pub use crate::series::Series;
pub use crate::shapes::WindowShape;
pub use crate::traits::{Bands, ColumnFeature, Feature, PairedColumnFeature};
