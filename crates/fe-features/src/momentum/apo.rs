//! Absolute price oscillator.
//!
//! The difference between a fast and a slow exponential moving feature of
//! the same column.

use fe_core::{
    error::Result,
    num::TaFloat,
    series::Series,
    traits::{check_batch, ColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::moving_average::{EwmOperation, ExponentialMovingConfig, ExponentialMovingFeature};

/// Configuration for the absolute price oscillator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbsolutePriceOscillatorConfig {
    /// Span of the fast moving feature (default: 12).
    pub fast_period: usize,
    /// Span of the slow moving feature (default: 26).
    pub slow_period: usize,
    /// Moment computed by the fast moving feature.
    pub fast_operation: EwmOperation,
    /// Moment computed by the slow moving feature.
    pub slow_operation: EwmOperation,
    /// Seed both moving features with their operation.
    pub initialize_using_operation: bool,
    /// Seed length; defaults to each feature's span.
    pub initialize_span: Option<usize>,
    /// Minimum observations of both moving features.
    pub min_periods: usize,
    /// Do not decay weights across missing values.
    pub ignore_na: bool,
}

impl Default for AbsolutePriceOscillatorConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            fast_operation: EwmOperation::Mean,
            slow_operation: EwmOperation::Mean,
            initialize_using_operation: false,
            initialize_span: None,
            min_periods: 0,
            ignore_na: false,
        }
    }
}

impl AbsolutePriceOscillatorConfig {
    /// Create a configuration with the given spans.
    #[must_use]
    pub fn new(fast_period: usize, slow_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            ..Self::default()
        }
    }

    /// Seed the moving features with their operation.
    #[must_use]
    pub fn with_initialization(mut self, span: Option<usize>) -> Self {
        self.initialize_using_operation = true;
        self.initialize_span = span;
        self
    }

    /// Exponential moving configuration for one leg.
    pub(crate) fn leg(&self, span: usize, operation: EwmOperation) -> ExponentialMovingConfig {
        ExponentialMovingConfig {
            span: Some(span as f64),
            operation,
            initialize_using_operation: self.initialize_using_operation,
            initialize_span: self.initialize_span,
            min_periods: self.min_periods,
            ignore_na: self.ignore_na,
            ..ExponentialMovingConfig::default()
        }
    }
}

/// Absolute price oscillator: `fast EMA − slow EMA`.
///
/// # Example
///
/// ```rust
/// use fe_core::prelude::*;
/// use fe_features::momentum::{AbsolutePriceOscillator, AbsolutePriceOscillatorConfig};
///
/// let config = AbsolutePriceOscillatorConfig::new(3, 7);
/// let mut apo = AbsolutePriceOscillator::<f64>::new(config).unwrap();
/// let out = apo.fit(&[1.0, 2.0, 3.0, 4.0], true).unwrap();
/// assert!(out[3] > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct AbsolutePriceOscillator<T: TaFloat> {
    config: AbsolutePriceOscillatorConfig,
    fast: ExponentialMovingFeature<T>,
    slow: ExponentialMovingFeature<T>,
}

impl<T: TaFloat> ColumnFeature<T> for AbsolutePriceOscillator<T> {
    type Config = AbsolutePriceOscillatorConfig;
    type Output = Series<T>;

    const NAME: &'static str = "absolute_price_oscillator";

    fn new(config: Self::Config) -> Result<Self> {
        Ok(Self {
            fast: ExponentialMovingFeature::new(
                config.leg(config.fast_period, config.fast_operation),
            )?,
            slow: ExponentialMovingFeature::new(
                config.leg(config.slow_period, config.slow_operation),
            )?,
            config,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let fast = self.fast.fit(values, first_fit)?;
        let slow = self.slow.fit(values, first_fit)?;
        Ok(fast.iter().zip(slow.iter()).map(|(&f, &s)| f - s).collect())
    }

    fn is_fitted(&self) -> bool {
        self.slow.is_fitted()
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
