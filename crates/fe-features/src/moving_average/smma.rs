//! Smoothed moving average.

use fe_core::{
    error::{ConfigError, Result},
    num::TaFloat,
    series::Series,
    traits::{check_batch, ColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the smoothed moving average.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SmoothedMovingAverageConfig {
    /// Smoothing length.
    pub lookback_period: usize,
}

impl Default for SmoothedMovingAverageConfig {
    fn default() -> Self {
        Self { lookback_period: 4 }
    }
}

impl SmoothedMovingAverageConfig {
    /// Create a configuration with the given smoothing length.
    #[must_use]
    pub fn new(lookback_period: usize) -> Self {
        Self { lookback_period }
    }
}

/// Smoothed (Wilder) moving average.
///
/// # Formula
///
/// ```text
/// SMMA[seed] = mean of the first L observations
/// SMMA[t]    = (SMMA[t-1]·(L-1) + x[t]) / L
/// ```
///
/// Missing values before the seed are skipped rather than counted. Outputs
/// before the seed are NaN, and after it a missing input yields NaN without
/// disturbing the running value.
#[derive(Debug, Clone)]
pub struct SmoothedMovingAverage<T: TaFloat> {
    config: SmoothedMovingAverageConfig,
    length: T,
    /// Observations collected for the seed.
    seed: Vec<T>,
    value: Option<T>,
    fitted: bool,
}

impl<T: TaFloat> SmoothedMovingAverage<T> {
    /// Returns the current smoothed value, if seeded.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.value
    }

    pub(crate) fn step(&mut self, x: T) -> T {
        if x.is_nan() {
            return T::NAN;
        }
        match self.value {
            Some(prev) => {
                let next = (prev * (self.length - T::ONE) + x) / self.length;
                self.value = Some(next);
                next
            }
            None => {
                self.seed.push(x);
                if self.seed.len() < self.config.lookback_period {
                    return T::NAN;
                }
                let seed = self.seed.iter().fold(T::ZERO, |acc, &v| acc + v) / self.length;
                self.seed.clear();
                self.value = Some(seed);
                seed
            }
        }
    }
}

impl<T: TaFloat> ColumnFeature<T> for SmoothedMovingAverage<T> {
    type Config = SmoothedMovingAverageConfig;
    type Output = Series<T>;

    const NAME: &'static str = "smoothed_moving_average";

    fn new(config: Self::Config) -> Result<Self> {
        if config.lookback_period == 0 {
            return Err(ConfigError::InvalidWindow {
                name: "lookback_period",
                value: 0,
                min: 1,
            }
            .into());
        }
        Ok(Self {
            length: <T as TaFloat>::from_usize(config.lookback_period),
            config,
            seed: Vec::new(),
            value: None,
            fitted: false,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.fitted)?;
        if first_fit {
            self.reset();
            self.fitted = true;
        }
        Ok(values.iter().map(|&x| self.step(x)).collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }

    fn reset(&mut self) {
        self.seed.clear();
        self.value = None;
        self.fitted = false;
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
    fn test_seed_and_recurrence() {
        let mut smma = SmoothedMovingAverage::<f64>::new(SmoothedMovingAverageConfig::new(3)).unwrap();
        let out = smma.fit(&[1.0, 2.0, 3.0, 6.0, 9.0], true).unwrap();
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_relative_eq!(out[2], 2.0);
        assert_relative_eq!(out[3], (2.0 * 2.0 + 6.0) / 3.0);
        assert_relative_eq!(out[4], (out[3] * 2.0 + 9.0) / 3.0);
    }

    #[test]
    fn test_leading_missing_values_skipped() {
        let mut smma = SmoothedMovingAverage::<f64>::new(SmoothedMovingAverageConfig::new(2)).unwrap();
        let out = smma.fit(&[f64::NAN, 4.0, 6.0, f64::NAN, 7.0], true).unwrap();
        assert!(out[1].is_nan());
        assert_relative_eq!(out[2], 5.0);
        assert!(out[3].is_nan());
        assert_relative_eq!(out[4], 6.0);
    }

    #[test]
    fn test_seed_across_chunks() {
        let config = SmoothedMovingAverageConfig::new(3);
        let mut smma = SmoothedMovingAverage::<f64>::new(config).unwrap();
        smma.fit(&[3.0], true).unwrap();
        let out = smma.fit(&[6.0, 9.0], false).unwrap();
        assert_relative_eq!(out[1], 6.0);
        assert_eq!(smma.value(), Some(6.0));
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(SmoothedMovingAverage::<f64>::new(SmoothedMovingAverageConfig::new(0)).is_err());
    }
}
