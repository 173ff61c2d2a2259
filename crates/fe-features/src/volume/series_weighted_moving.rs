//! Series weighted moving feature.

use fe_core::{
    engine::{RollingWindow, WindowDescriptor},
    error::Result,
    num::TaFloat,
    reducer::ReducerKind,
    series::Series,
    traits::{check_paired_batch, PairedColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the series weighted moving feature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SeriesWeightedMovingConfig {
    /// Window length (default: 4).
    pub lookback_period: usize,
    /// Minimum observations; `None` means the full window.
    pub min_periods: Option<usize>,
    /// Reduction applied to both the weighted values and the weights.
    pub operation: ReducerKind,
}

impl Default for SeriesWeightedMovingConfig {
    fn default() -> Self {
        Self {
            lookback_period: 4,
            min_periods: None,
            operation: ReducerKind::Mean,
        }
    }
}

impl SeriesWeightedMovingConfig {
    /// Create a configuration with the given window.
    #[must_use]
    pub fn new(lookback_period: usize) -> Self {
        Self {
            lookback_period,
            ..Self::default()
        }
    }

    /// Set the reduction.
    #[must_use]
    pub fn with_operation(mut self, operation: ReducerKind) -> Self {
        self.operation = operation;
        self
    }
}

/// Series weighted moving feature: `op(x·w) / op(w)` over a trailing window.
///
/// A zero denominator gives a missing output.
#[derive(Debug, Clone)]
pub struct SeriesWeightedMovingFeature<T: TaFloat> {
    config: SeriesWeightedMovingConfig,
    numerator: RollingWindow<T>,
    denominator: RollingWindow<T>,
}

impl<T: TaFloat> PairedColumnFeature<T> for SeriesWeightedMovingFeature<T> {
    type Config = SeriesWeightedMovingConfig;

    const NAME: &'static str = "series_weighted_moving_feature";

    fn new(config: Self::Config) -> Result<Self> {
        let mut descriptor =
            WindowDescriptor::new(config.lookback_period).with_reducer(config.operation);
        descriptor.min_periods = config.min_periods;
        Ok(Self {
            numerator: RollingWindow::new(&descriptor)?,
            denominator: RollingWindow::new(&descriptor)?,
            config,
        })
    }

    fn fit(&mut self, values: &[T], weights: &[T], first_fit: bool) -> Result<Series<T>> {
        check_paired_batch(values.len(), weights.len(), first_fit, self.is_fitted())?;
        let products: Vec<T> = values.iter().zip(weights).map(|(&x, &w)| x * w).collect();
        let numerator = self.numerator.compute(&products, first_fit)?;
        let denominator = self.denominator.compute(weights, first_fit)?;
        Ok(numerator
            .into_iter()
            .zip(denominator)
            .map(|(n, d)| n.div_or(d, T::NAN))
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.denominator.is_fitted()
    }

    fn reset(&mut self) {
        self.numerator.reset();
        self.denominator.reset();
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weighted_mean() {
        let mut swmf =
            SeriesWeightedMovingFeature::<f64>::new(SeriesWeightedMovingConfig::new(2)).unwrap();
        let out = swmf.fit(&[1.0, 3.0, 5.0], &[1.0, 3.0, 1.0], true).unwrap();
        assert!(out[0].is_nan());
        assert_relative_eq!(out[1], (1.0 + 9.0) / 4.0);
        assert_relative_eq!(out[2], (9.0 + 5.0) / 4.0);
    }

    #[test]
    fn test_sum_operation_matches_mean() {
        let config = SeriesWeightedMovingConfig::new(2).with_operation(ReducerKind::Sum);
        let mut swmf = SeriesWeightedMovingFeature::<f64>::new(config).unwrap();
        let out = swmf.fit(&[1.0, 3.0], &[1.0, 3.0], true).unwrap();
        assert_relative_eq!(out[1], 2.5);
    }
}
