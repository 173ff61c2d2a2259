//! Kaufman efficiency ratio.

use fe_core::{
    engine::{RollingWindow, WindowDescriptor},
    error::{ConfigError, Result},
    num::TaFloat,
    reducer::Reducer,
    series::Series,
    shapes::WindowShape,
    traits::ColumnFeature,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the Kaufman efficiency ratio.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KaufmanEfficiencyConfig {
    /// Lookback window.
    pub lookback_period: usize,
    /// Minimum observations per window; `None` means the full lookback.
    pub min_periods: Option<usize>,
}

impl Default for KaufmanEfficiencyConfig {
    fn default() -> Self {
        Self {
            lookback_period: 4,
            min_periods: None,
        }
    }
}

impl KaufmanEfficiencyConfig {
    /// Create a configuration with the given lookback.
    #[must_use]
    pub fn new(lookback_period: usize) -> Self {
        Self {
            lookback_period,
            min_periods: None,
        }
    }

    /// Set the minimum number of observations.
    #[must_use]
    pub fn with_min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = Some(min_periods);
        self
    }
}

/// Net move over total movement of one window.
///
/// ```text
/// ER = |x[last] − x[first]| / Σ |x[i] − x[i−1]|
/// ```
///
/// Steps touching a missing value contribute nothing to the denominator. A
/// window without any movement has ratio 0.
pub(crate) fn efficiency_ratio<T: TaFloat>(window: &[T]) -> T {
    let (Some(&first), Some(&last)) = (window.first(), window.last()) else {
        return T::NAN;
    };
    let path = window
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs().or_zero())
        .fold(T::ZERO, |acc, step| acc + step);
    if path == T::ZERO {
        return T::ZERO;
    }
    (last - first).abs() / path
}

/// Rolling window computing the efficiency ratio.
pub(crate) fn efficiency_window<T: TaFloat>(
    lookback_period: usize,
    min_periods: Option<usize>,
) -> Result<RollingWindow<T>> {
    if lookback_period < 2 {
        return Err(ConfigError::InvalidWindow {
            name: "lookback_period",
            value: lookback_period,
            min: 2,
        }
        .into());
    }
    let mut descriptor = WindowDescriptor::new(lookback_period).with_shape(WindowShape::Identity);
    descriptor.min_periods = min_periods;
    RollingWindow::with_reducer(&descriptor, Reducer::custom(efficiency_ratio::<T>))
}

/// Kaufman efficiency ratio over a rolling lookback.
///
/// Values lie in `[0, 1]`: 1 for a straight move, near 0 for noise.
#[derive(Debug, Clone)]
pub struct KaufmanEfficiency<T: TaFloat> {
    config: KaufmanEfficiencyConfig,
    window: RollingWindow<T>,
}

impl<T: TaFloat> ColumnFeature<T> for KaufmanEfficiency<T> {
    type Config = KaufmanEfficiencyConfig;
    type Output = Series<T>;

    const NAME: &'static str = "kaufman_efficiency";

    fn new(config: Self::Config) -> Result<Self> {
        let window = efficiency_window(config.lookback_period, config.min_periods)?;
        Ok(Self { config, window })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        self.window.compute(values, first_fit).map(Series::from_vec)
    }

    fn is_fitted(&self) -> bool {
        self.window.is_fitted()
    }

    fn reset(&mut self) {
        self.window.reset();
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
    fn test_constant_window_is_zero() {
        let mut er = KaufmanEfficiency::<f64>::new(KaufmanEfficiencyConfig::new(3)).unwrap();
        let out = er.fit(&[5.0, 5.0, 5.0, 5.0], true).unwrap();
        assert!(out[1].is_nan());
        assert_eq!(out[2], 0.0);
        assert_eq!(out[3], 0.0);
    }

    #[test]
    fn test_straight_and_noisy_moves() {
        assert_relative_eq!(efficiency_ratio(&[1.0, 2.0, 3.0, 4.0]), 1.0);
        assert_relative_eq!(efficiency_ratio(&[1.0, 3.0, 2.0]), 1.0 / 3.0);
    }

    #[test]
    fn test_missing_steps_ignored() {
        assert_relative_eq!(efficiency_ratio(&[1.0, f64::NAN, 3.0, 4.0]), 3.0 / 1.0);
        assert!(efficiency_ratio(&[f64::NAN, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn test_short_lookback_rejected() {
        assert!(KaufmanEfficiency::<f64>::new(KaufmanEfficiencyConfig::new(1)).is_err());
    }
}
