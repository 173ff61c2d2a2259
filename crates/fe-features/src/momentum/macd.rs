//! Moving average convergence divergence.
//!
//! MACD smooths the absolute price oscillator with a further exponential
//! moving feature. With `return_histogram` the feature returns the gap
//! between the oscillator and its smoothed line instead.

use fe_core::{
    error::Result,
    num::TaFloat,
    series::Series,
    traits::{check_batch, ColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::apo::{AbsolutePriceOscillator, AbsolutePriceOscillatorConfig};
use crate::moving_average::{EwmOperation, ExponentialMovingFeature};

/// Configuration for MACD.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovingAverageConvergenceDivergenceConfig {
    /// Fast and slow legs of the oscillator (default: 12 and 26).
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub oscillator: AbsolutePriceOscillatorConfig,
    /// Span of the signal smoothing (default: 9).
    pub smoothing_period: usize,
    /// Return `APO − signal` instead of the signal line.
    pub return_histogram: bool,
}

impl Default for MovingAverageConvergenceDivergenceConfig {
    fn default() -> Self {
        Self {
            oscillator: AbsolutePriceOscillatorConfig::default(),
            smoothing_period: 9,
            return_histogram: false,
        }
    }
}

impl MovingAverageConvergenceDivergenceConfig {
    /// Create a configuration with the given spans.
    #[must_use]
    pub fn new(fast_period: usize, slow_period: usize, smoothing_period: usize) -> Self {
        Self {
            oscillator: AbsolutePriceOscillatorConfig::new(fast_period, slow_period),
            smoothing_period,
            return_histogram: false,
        }
    }

    /// Set the histogram option.
    #[must_use]
    pub fn with_histogram(mut self, return_histogram: bool) -> Self {
        self.return_histogram = return_histogram;
        self
    }
}

/// Moving average convergence divergence.
///
/// # Formula
///
/// ```text
/// MACD      = EMA_smoothing(APO)
/// Histogram = APO − MACD
/// ```
#[derive(Debug, Clone)]
pub struct MovingAverageConvergenceDivergence<T: TaFloat> {
    config: MovingAverageConvergenceDivergenceConfig,
    oscillator: AbsolutePriceOscillator<T>,
    signal: ExponentialMovingFeature<T>,
}

impl<T: TaFloat> ColumnFeature<T> for MovingAverageConvergenceDivergence<T> {
    type Config = MovingAverageConvergenceDivergenceConfig;
    type Output = Series<T>;

    const NAME: &'static str = "moving_average_convergence_divergence";

    fn new(config: Self::Config) -> Result<Self> {
        let signal = ExponentialMovingFeature::new(
            config
                .oscillator
                .leg(config.smoothing_period, EwmOperation::Mean),
        )?;
        Ok(Self {
            oscillator: AbsolutePriceOscillator::new(config.oscillator.clone())?,
            signal,
            config,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let apo = self.oscillator.fit(values, first_fit)?;
        let signal = self.signal.fit(apo.as_slice(), first_fit)?;
        if !self.config.return_histogram {
            return Ok(signal);
        }
        Ok(apo.iter().zip(signal.iter()).map(|(&a, &s)| a - s).collect())
    }

    fn is_fitted(&self) -> bool {
        self.signal.is_fitted()
    }

    fn reset(&mut self) {
        self.oscillator.reset();
        self.signal.reset();
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
    fn test_signal_and_histogram() {
        let values = [2.0, 4.0, 8.0];
        let config = MovingAverageConvergenceDivergenceConfig::new(1, 3, 3);

        let mut macd = MovingAverageConvergenceDivergence::<f64>::new(config.clone()).unwrap();
        let signal = macd.fit(&values, true).unwrap();
        // APO is [0, 1, 2.5]; smoothing with alpha 0.5.
        assert_relative_eq!(signal[0], 0.0);
        assert_relative_eq!(signal[1], 0.5);
        assert_relative_eq!(signal[2], 1.5);

        let mut histogram =
            MovingAverageConvergenceDivergence::<f64>::new(config.with_histogram(true)).unwrap();
        let out = histogram.fit(&values, true).unwrap();
        assert_relative_eq!(out[1], 0.5);
        assert_relative_eq!(out[2], 1.0);
    }
}
