//! Average true range.
//!
//! Single-column form: high, low and close of each step are approximated by
//! the maximum, minimum and last value of a trailing window.

use fe_core::{
    engine::{RollingWindow, WindowDescriptor},
    error::{ConfigError, Result},
    num::TaFloat,
    reducer::Reducer,
    series::Series,
    shapes::WindowShape,
    traits::{check_batch, ColumnFeature},
    utils::bounds,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the average true range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AverageTrueRangeConfig {
    /// Window of the true range (default: 4).
    pub true_range_lookback: usize,
    /// Window of the average (default: 6).
    pub average_true_range_span: usize,
    /// Minimum observations for the true range; `None` means the full window.
    pub true_range_min_periods: Option<usize>,
    /// Minimum observations for the average (default: 1).
    pub average_true_range_periods: usize,
    /// Return the true range instead of its average.
    pub return_true_range: bool,
}

impl Default for AverageTrueRangeConfig {
    fn default() -> Self {
        Self {
            true_range_lookback: 4,
            average_true_range_span: 6,
            true_range_min_periods: None,
            average_true_range_periods: 1,
            return_true_range: false,
        }
    }
}

impl AverageTrueRangeConfig {
    /// Create a configuration with the given windows.
    #[must_use]
    pub fn new(true_range_lookback: usize, average_true_range_span: usize) -> Self {
        Self {
            true_range_lookback,
            average_true_range_span,
            ..Self::default()
        }
    }

    /// Return the true range instead of its average.
    #[must_use]
    pub fn with_true_range(mut self, return_true_range: bool) -> Self {
        self.return_true_range = return_true_range;
        self
    }
}

/// True range of one window: `max(max − min, |max − last|, |min − last|)`.
pub(crate) fn true_range<T: TaFloat>(window: &[T]) -> T {
    let Some((lo, hi)) = bounds(window) else {
        return T::NAN;
    };
    let last = window.last().copied().unwrap_or(T::NAN);
    (hi - lo).max((hi - last).abs()).max((lo - last).abs())
}

/// Average true range.
#[derive(Debug, Clone)]
pub struct AverageTrueRange<T: TaFloat> {
    config: AverageTrueRangeConfig,
    true_range: RollingWindow<T>,
    average: RollingWindow<T>,
}

impl<T: TaFloat> ColumnFeature<T> for AverageTrueRange<T> {
    type Config = AverageTrueRangeConfig;
    type Output = Series<T>;

    const NAME: &'static str = "average_true_range";

    fn new(config: Self::Config) -> Result<Self> {
        if config.true_range_lookback < 2 {
            return Err(ConfigError::InvalidWindow {
                name: "true_range_lookback",
                value: config.true_range_lookback,
                min: 2,
            }
            .into());
        }
        let mut range = WindowDescriptor::new(config.true_range_lookback)
            .with_shape(WindowShape::Identity);
        range.min_periods = config.true_range_min_periods;
        let average = WindowDescriptor::new(config.average_true_range_span)
            .with_min_periods(config.average_true_range_periods);
        Ok(Self {
            true_range: RollingWindow::with_reducer(&range, Reducer::custom(true_range::<T>))?,
            average: RollingWindow::new(&average)?,
            config,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let true_range = self.true_range.compute(values, first_fit)?;
        // The average is kept current even when only the range is returned.
        let average = self.average.compute(&true_range, first_fit)?;
        Ok(if self.config.return_true_range {
            true_range.into()
        } else {
            average.into()
        })
    }

    fn is_fitted(&self) -> bool {
        self.average.is_fitted()
    }

    fn reset(&mut self) {
        self.true_range.reset();
        self.average.reset();
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
    fn test_true_range_window() {
        assert_relative_eq!(true_range(&[1.0, 4.0, 2.0]), 3.0);
        assert_relative_eq!(true_range(&[1.0, f64::NAN, 2.0]), 1.0);
        assert!(true_range::<f64>(&[f64::NAN]).is_nan());
    }

    #[test]
    fn test_average_of_true_range() {
        let config = AverageTrueRangeConfig::new(2, 2);
        let mut atr = AverageTrueRange::<f64>::new(config.clone()).unwrap();
        let out = atr.fit(&[1.0, 3.0, 2.0, 2.0], true).unwrap();
        // True ranges [NaN, 2, 1, 0].
        assert!(out[0].is_nan());
        assert_relative_eq!(out[1], 2.0);
        assert_relative_eq!(out[2], 1.5);
        assert_relative_eq!(out[3], 0.5);

        let mut tr = AverageTrueRange::<f64>::new(config.with_true_range(true)).unwrap();
        let out = tr.fit(&[1.0, 3.0, 2.0, 2.0], true).unwrap();
        assert_relative_eq!(out[2], 1.0);
    }

    #[test]
    fn test_window_validation() {
        let err = AverageTrueRange::<f64>::new(AverageTrueRangeConfig::new(1, 6)).unwrap_err();
        assert!(err.is_config());
    }
}
