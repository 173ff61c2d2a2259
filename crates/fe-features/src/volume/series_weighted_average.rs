//! Series weighted average.

use fe_core::{
    error::Result,
    num::TaFloat,
    series::Series,
    traits::{check_paired_batch, PairedColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the series weighted average.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SeriesWeightedAverageConfig {
    /// Observed pairs required before output is produced (default: 1).
    pub min_periods: usize,
}

impl Default for SeriesWeightedAverageConfig {
    fn default() -> Self {
        Self { min_periods: 1 }
    }
}

/// Cumulative weighted average since the first fit.
///
/// ```text
/// SWA[t] = Σ x[i]·w[i] / Σ w[i],   i ≤ t
/// ```
///
/// Pairs with a missing value or weight are skipped. A zero weight total
/// gives a missing output.
#[derive(Debug, Clone)]
pub struct SeriesWeightedAverage<T: TaFloat> {
    config: SeriesWeightedAverageConfig,
    weighted_sum: T,
    weight_sum: T,
    observed: usize,
    fitted: bool,
}

impl<T: TaFloat> PairedColumnFeature<T> for SeriesWeightedAverage<T> {
    type Config = SeriesWeightedAverageConfig;

    const NAME: &'static str = "series_weighted_average";

    fn new(config: Self::Config) -> Result<Self> {
        Ok(Self {
            config,
            weighted_sum: T::ZERO,
            weight_sum: T::ZERO,
            observed: 0,
            fitted: false,
        })
    }

    fn fit(&mut self, values: &[T], weights: &[T], first_fit: bool) -> Result<Series<T>> {
        check_paired_batch(values.len(), weights.len(), first_fit, self.fitted)?;
        if first_fit {
            self.reset();
            self.fitted = true;
        }
        Ok(values
            .iter()
            .zip(weights)
            .map(|(&x, &w)| {
                if !x.is_nan() && !w.is_nan() {
                    self.weighted_sum = self.weighted_sum + x * w;
                    self.weight_sum = self.weight_sum + w;
                    self.observed += 1;
                }
                if self.observed < self.config.min_periods {
                    return T::NAN;
                }
                self.weighted_sum.div_or(self.weight_sum, T::NAN)
            })
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }

    fn reset(&mut self) {
        self.weighted_sum = T::ZERO;
        self.weight_sum = T::ZERO;
        self.observed = 0;
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
    fn test_cumulative_average() {
        let mut swa = SeriesWeightedAverage::<f64>::new(SeriesWeightedAverageConfig::default())
            .unwrap();
        let out = swa.fit(&[2.0, 4.0, f64::NAN, 1.0], &[1.0, 3.0, 5.0, 0.0], true).unwrap();
        assert_relative_eq!(out[0], 2.0);
        assert_relative_eq!(out[1], 14.0 / 4.0);
        assert_relative_eq!(out[2], 14.0 / 4.0);
        assert_relative_eq!(out[3], 14.0 / 4.0);
    }

    #[test]
    fn test_length_mismatch() {
        let mut swa = SeriesWeightedAverage::<f64>::new(SeriesWeightedAverageConfig::default())
            .unwrap();
        assert!(swa.fit(&[1.0, 2.0], &[1.0], true).unwrap_err().is_data());
    }
}
