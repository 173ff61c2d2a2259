//! Relative strength index.
//!
//! RSI measures the balance of recent gains against recent losses on a
//! 0-100 scale.

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

use crate::moving_average::{SmoothedMovingAverage, SmoothedMovingAverageConfig};

/// Configuration for the RSI.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RelativeStrengthIndexConfig {
    /// Smoothing length of gains and losses (default: 8).
    pub lookback_period: usize,
}

impl Default for RelativeStrengthIndexConfig {
    fn default() -> Self {
        Self { lookback_period: 8 }
    }
}

impl RelativeStrengthIndexConfig {
    /// Create a new RSI configuration with the given lookback.
    #[must_use]
    pub fn new(lookback_period: usize) -> Self {
        Self { lookback_period }
    }
}

/// Step-to-step change clipped to one side, through a two-value window.
fn change_window<T: TaFloat>(sign: T) -> Result<RollingWindow<T>> {
    let descriptor = WindowDescriptor::new(2).with_shape(WindowShape::Identity);
    RollingWindow::with_reducer(
        &descriptor,
        Reducer::custom(move |w: &[T]| match w {
            [prev, last] => (sign * (*last - *prev)).max(T::ZERO),
            _ => T::NAN,
        }),
    )
}

/// Map smoothed gain and loss to the index.
///
/// # Edge Cases
///
/// - gain = 0 and loss = 0 → 50 (neutral)
/// - loss = 0 → 100
/// - gain = 0 → 0
pub(crate) fn strength_index<T: TaFloat>(gain: T, loss: T) -> T {
    if gain.is_nan() || loss.is_nan() {
        return T::NAN;
    }
    let epsilon = T::from_f64_lossy(1e-10);
    if gain < epsilon && loss < epsilon {
        T::FIFTY
    } else if loss < epsilon {
        T::HUNDRED
    } else if gain < epsilon {
        T::ZERO
    } else {
        T::HUNDRED - T::HUNDRED / (T::ONE + gain / loss)
    }
}

/// Relative strength index.
///
/// # Formula
///
/// ```text
/// gain[t] = max(x[t] − x[t−1], 0)
/// loss[t] = max(x[t−1] − x[t], 0)
/// RSI     = 100 − 100 / (1 + SMMA(gain) / SMMA(loss))
/// ```
#[derive(Debug, Clone)]
pub struct RelativeStrengthIndex<T: TaFloat> {
    config: RelativeStrengthIndexConfig,
    gains: RollingWindow<T>,
    losses: RollingWindow<T>,
    avg_gain: SmoothedMovingAverage<T>,
    avg_loss: SmoothedMovingAverage<T>,
}

impl<T: TaFloat> ColumnFeature<T> for RelativeStrengthIndex<T> {
    type Config = RelativeStrengthIndexConfig;
    type Output = Series<T>;

    const NAME: &'static str = "relative_strength_index";

    fn new(config: Self::Config) -> Result<Self> {
        if config.lookback_period == 0 {
            return Err(ConfigError::InvalidWindow {
                name: "lookback_period",
                value: 0,
                min: 1,
            }
            .into());
        }
        let smoothing = SmoothedMovingAverageConfig::new(config.lookback_period);
        Ok(Self {
            gains: change_window(T::ONE)?,
            losses: change_window(-T::ONE)?,
            avg_gain: SmoothedMovingAverage::new(smoothing.clone())?,
            avg_loss: SmoothedMovingAverage::new(smoothing)?,
            config,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let gains = self.gains.compute(values, first_fit)?;
        let losses = self.losses.compute(values, first_fit)?;
        let gain = self.avg_gain.fit(&gains, first_fit)?;
        let loss = self.avg_loss.fit(&losses, first_fit)?;
        Ok(gain
            .iter()
            .zip(loss.iter())
            .map(|(&g, &l)| strength_index(g, l))
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.avg_loss.is_fitted()
    }

    fn reset(&mut self) {
        self.gains.reset();
        self.losses.reset();
        self.avg_gain.reset();
        self.avg_loss.reset();
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
    fn test_edge_cases() {
        assert_relative_eq!(strength_index(0.0f64, 0.0), 50.0);
        assert_relative_eq!(strength_index(1.0f64, 0.0), 100.0);
        assert_relative_eq!(strength_index(0.0f64, 1.0), 0.0);
        assert_relative_eq!(strength_index(1.0f64, 1.0), 50.0);
        assert!(strength_index(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn test_seeded_average() {
        let mut rsi =
            RelativeStrengthIndex::<f64>::new(RelativeStrengthIndexConfig::new(2)).unwrap();
        let out = rsi.fit(&[1.0, 3.0, 2.0, 4.0], true).unwrap();
        assert!(out[0].is_nan() && out[1].is_nan());
        // gains [2, 0] and losses [0, 1] seed with means 1 and 0.5.
        assert_relative_eq!(out[2], 100.0 - 100.0 / 3.0);
        // gain (1 + 2) / 2 = 1.5, loss (0.5 + 0) / 2 = 0.25.
        assert_relative_eq!(out[3], 100.0 - 100.0 / 7.0);
    }

    #[test]
    fn test_monotonic_rise() {
        let mut rsi = RelativeStrengthIndex::<f64>::new(RelativeStrengthIndexConfig::new(3)).unwrap();
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let out = rsi.fit(&values, true).unwrap();
        assert_relative_eq!(out[9], 100.0);
    }
}
