//! Aroon oscillator.

use fe_core::{
    engine::{RollingWindow, WindowDescriptor},
    error::{ConfigError, Result},
    num::TaFloat,
    reducer::Reducer,
    series::Series,
    shapes::WindowShape,
    traits::{check_batch, ColumnFeature},
    utils::{arg_max, arg_min},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the Aroon oscillator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AroonOscillatorConfig {
    /// Window length (default: 4).
    pub lookback_period: usize,
    /// Minimum observations; `None` means the full window.
    pub min_periods: Option<usize>,
}

impl Default for AroonOscillatorConfig {
    fn default() -> Self {
        Self {
            lookback_period: 4,
            min_periods: None,
        }
    }
}

impl AroonOscillatorConfig {
    /// Create a configuration with the given window.
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

/// Aroon oscillator.
///
/// # Formula
///
/// ```text
/// up   = position of the window maximum / L
/// down = position of the window minimum / L
/// AO   = 100·(up − down)
/// ```
///
/// Positions count from the oldest value of the window, so a fresh high
/// pushes the oscillator towards +100 and a fresh low towards −100.
#[derive(Debug, Clone)]
pub struct AroonOscillator<T: TaFloat> {
    config: AroonOscillatorConfig,
    window: RollingWindow<T>,
}

impl<T: TaFloat> ColumnFeature<T> for AroonOscillator<T> {
    type Config = AroonOscillatorConfig;
    type Output = Series<T>;

    const NAME: &'static str = "aroon_oscillator";

    fn new(config: Self::Config) -> Result<Self> {
        if config.lookback_period < 2 {
            return Err(ConfigError::InvalidWindow {
                name: "lookback_period",
                value: config.lookback_period,
                min: 2,
            }
            .into());
        }
        let mut descriptor =
            WindowDescriptor::new(config.lookback_period).with_shape(WindowShape::Identity);
        descriptor.min_periods = config.min_periods;
        let lookback = <T as TaFloat>::from_usize(config.lookback_period);
        let reducer = Reducer::custom(move |w: &[T]| match (arg_max(w), arg_min(w)) {
            (Some(up), Some(down)) => {
                let up = <T as TaFloat>::from_usize(up) / lookback;
                let down = <T as TaFloat>::from_usize(down) / lookback;
                T::HUNDRED * (up - down)
            }
            _ => T::NAN,
        });
        Ok(Self {
            window: RollingWindow::with_reducer(&descriptor, reducer)?,
            config,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        Ok(self.window.compute(values, first_fit)?.into())
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
    fn test_oscillator_values() {
        let mut aroon = AroonOscillator::<f64>::new(AroonOscillatorConfig::new(4)).unwrap();
        let out = aroon.fit(&[1.0, 2.0, 3.0, 4.0, 0.0], true).unwrap();
        assert!(out[2].is_nan());
        // Max at position 3, min at 0.
        assert_relative_eq!(out[3], 75.0);
        // Window [2, 3, 4, 0]: max at 2, min at 3.
        assert_relative_eq!(out[4], -25.0);
    }

    #[test]
    fn test_short_lookback_rejected() {
        assert!(AroonOscillator::<f64>::new(AroonOscillatorConfig::new(1)).is_err());
    }
}
