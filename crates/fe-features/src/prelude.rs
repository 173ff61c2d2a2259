//! Prelude for fe-features.
//!
//! This module re-exports all features and their configurations.

// Moving averages
pub use crate::moving_average::{
    EwmOperation, ExponentialMovingConfig, ExponentialMovingFeature,
    FractalAdaptiveConfig, FractalAdaptiveMovingAverage,
    HullMovingConfig, HullMovingFeature,
    KaufmanAdaptiveConfig, KaufmanAdaptiveMovingAverage,
    SmoothedMovingAverage, SmoothedMovingAverageConfig,
    TripleExponentialMovingFeature,
};

// Momentum
pub use crate::momentum::{
    AbsolutePriceOscillator, AbsolutePriceOscillatorConfig,
    InverseFisherRsi, InverseFisherRsiConfig,
    KaufmanEfficiency, KaufmanEfficiencyConfig,
    MovingAverageConvergenceDivergence, MovingAverageConvergenceDivergenceConfig,
    PercentageValueOscillator, PercentageValueOscillatorConfig,
    RelativeStrengthIndex, RelativeStrengthIndexConfig,
    TripleExponentialMovingOscillator,
};

// Trend
pub use crate::trend::{
    AroonOscillator, AroonOscillatorConfig,
    AverageDirectionalMovementIndex, AverageDirectionalMovementIndexConfig,
    ZeroLagExponentialMovingConfig, ZeroLagExponentialMovingFeature,
};

// Volatility
pub use crate::volatility::{
    AverageTrueRange, AverageTrueRangeConfig,
    BollingerBands, BollingerBandsConfig,
    KeltnerChannel, KeltnerChannelConfig,
    TypicalValue, TypicalValueConfig,
};

// Volume
pub use crate::volume::{
    ElasticSeriesWeightedAverage, ElasticSeriesWeightedAverageConfig,
    SeriesWeightedAverage, SeriesWeightedAverageConfig,
    SeriesWeightedMovingConfig, SeriesWeightedMovingFeature,
};

// Plans
pub use crate::plan::{FeaturePlan, FeatureSet, FeatureSpec, PlanEntry};
