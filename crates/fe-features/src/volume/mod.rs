//! Weighted-series features.
//!
//! Features over a value column paired with a weight column, such as price
//! and volume:
//! - Series weighted average
//! - Elastic series weighted average
//! - Series weighted moving feature

pub mod elastic_swa;
pub mod series_weighted_average;
pub mod series_weighted_moving;

pub use elastic_swa::{ElasticSeriesWeightedAverage, ElasticSeriesWeightedAverageConfig};
pub use series_weighted_average::{SeriesWeightedAverage, SeriesWeightedAverageConfig};
pub use series_weighted_moving::{SeriesWeightedMovingConfig, SeriesWeightedMovingFeature};
