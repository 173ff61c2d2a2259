//! Zero lag exponential moving feature.

use fe_core::{
    engine::{RollingWindow, WindowDescriptor},
    error::{ConfigError, Result},
    num::TaFloat,
    reducer::Reducer,
    series::Series,
    shapes::WindowShape,
    traits::{check_batch, ColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::moving_average::{ExponentialMovingConfig, ExponentialMovingFeature};

/// Configuration for the zero lag exponential moving feature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ZeroLagExponentialMovingConfig {
    /// Lag period; the de-lagging window spans `(lag_period − 1) / 2`
    /// values (default: 5).
    pub lag_period: usize,
    /// Smoothing applied to the de-lagged series (default: span 4).
    pub ema: ExponentialMovingConfig,
}

impl Default for ZeroLagExponentialMovingConfig {
    fn default() -> Self {
        Self {
            lag_period: 5,
            ema: ExponentialMovingConfig::span(4.0),
        }
    }
}

impl ZeroLagExponentialMovingConfig {
    /// Create a configuration with the given lag period and smoothing.
    #[must_use]
    pub fn new(lag_period: usize, ema: ExponentialMovingConfig) -> Self {
        Self { lag_period, ema }
    }

    fn lag_window(&self) -> usize {
        self.lag_period.saturating_sub(1) / 2
    }
}

/// Zero lag exponential moving feature.
///
/// # Formula
///
/// ```text
/// d[t]    = 2·x[t] − x[t − w + 1],   w = (lag_period − 1) / 2
/// ZLEMA   = EMA(d)
/// ```
#[derive(Debug, Clone)]
pub struct ZeroLagExponentialMovingFeature<T: TaFloat> {
    config: ZeroLagExponentialMovingConfig,
    delag: RollingWindow<T>,
    ema: ExponentialMovingFeature<T>,
}

impl<T: TaFloat> ColumnFeature<T> for ZeroLagExponentialMovingFeature<T> {
    type Config = ZeroLagExponentialMovingConfig;
    type Output = Series<T>;

    const NAME: &'static str = "zero_lag_exponential_moving_feature";

    fn new(config: Self::Config) -> Result<Self> {
        if config.lag_period < 3 {
            return Err(ConfigError::InvalidWindow {
                name: "lag_period",
                value: config.lag_period,
                min: 3,
            }
            .into());
        }
        let descriptor = WindowDescriptor::new(config.lag_window()).with_shape(WindowShape::Identity);
        let delag = RollingWindow::with_reducer(
            &descriptor,
            Reducer::custom(|w: &[T]| match (w.first(), w.last()) {
                (Some(&first), Some(&last)) => T::TWO * last - first,
                _ => T::NAN,
            }),
        )?;
        Ok(Self {
            ema: ExponentialMovingFeature::new(config.ema.clone())?,
            delag,
            config,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let delagged = self.delag.compute(values, first_fit)?;
        self.ema.fit(&delagged, first_fit)
    }

    fn is_fitted(&self) -> bool {
        self.ema.is_fitted()
    }

    fn reset(&mut self) {
        self.delag.reset();
        self.ema.reset();
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
    fn test_delagged_series() {
        let config = ZeroLagExponentialMovingConfig::new(7, ExponentialMovingConfig::alpha(1.0));
        let mut zlema = ZeroLagExponentialMovingFeature::<f64>::new(config).unwrap();
        let out = zlema.fit(&[1.0, 2.0, 4.0, 7.0], true).unwrap();
        // Window of 3: output waits for a full window.
        assert!(out[1].is_nan());
        assert_relative_eq!(out[2], 2.0 * 4.0 - 1.0);
        assert_relative_eq!(out[3], 2.0 * 7.0 - 2.0);
    }

    #[test]
    fn test_lag_period_validation() {
        let config = ZeroLagExponentialMovingConfig::new(2, ExponentialMovingConfig::span(3.0));
        assert!(ZeroLagExponentialMovingFeature::<f64>::new(config).unwrap_err().is_config());
    }
}
