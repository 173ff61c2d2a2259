//! Elastic series weighted average.

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

/// Configuration for the elastic series weighted average.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ElasticSeriesWeightedAverageConfig {
    /// Window of the weight total (default: 4).
    pub weight_sum_lookback: usize,
}

impl Default for ElasticSeriesWeightedAverageConfig {
    fn default() -> Self {
        Self {
            weight_sum_lookback: 4,
        }
    }
}

impl ElasticSeriesWeightedAverageConfig {
    /// Create a configuration with the given weight window.
    #[must_use]
    pub fn new(weight_sum_lookback: usize) -> Self {
        Self {
            weight_sum_lookback,
        }
    }
}

/// Elastic series weighted average.
///
/// # Formula
///
/// ```text
/// W[t]    = Σ w over the last `weight_sum_lookback` weights
/// ESWA[t] = ESWA[t−1] + (w[t] / W[t])·(x[t] − ESWA[t−1])
/// ```
///
/// The recurrence starts from the first input value. Missing terms count as
/// zero, and a zero weight total leaves the previous value unchanged.
#[derive(Debug, Clone)]
pub struct ElasticSeriesWeightedAverage<T: TaFloat> {
    config: ElasticSeriesWeightedAverageConfig,
    weight_sum: RollingWindow<T>,
    value: Option<T>,
}

impl<T: TaFloat> PairedColumnFeature<T> for ElasticSeriesWeightedAverage<T> {
    type Config = ElasticSeriesWeightedAverageConfig;

    const NAME: &'static str = "elastic_series_weighted_average";

    fn new(config: Self::Config) -> Result<Self> {
        let descriptor = WindowDescriptor::new(config.weight_sum_lookback)
            .with_min_periods(1)
            .with_reducer(ReducerKind::Sum);
        Ok(Self {
            weight_sum: RollingWindow::new(&descriptor)?,
            config,
            value: None,
        })
    }

    fn fit(&mut self, values: &[T], weights: &[T], first_fit: bool) -> Result<Series<T>> {
        check_paired_batch(values.len(), weights.len(), first_fit, self.is_fitted())?;
        let totals = self.weight_sum.compute(weights, first_fit)?;
        let mut previous = match (first_fit, self.value) {
            (false, Some(previous)) => previous,
            _ => values[0],
        };
        let out: Series<T> = values
            .iter()
            .zip(weights)
            .zip(totals)
            .map(|((&x, &w), total)| {
                let share = w.div_or(total.or_zero(), T::ZERO);
                previous = previous.or_zero() + ((x - previous) * share).or_zero();
                previous
            })
            .collect();
        self.value = Some(previous);
        Ok(out)
    }

    fn is_fitted(&self) -> bool {
        self.weight_sum.is_fitted()
    }

    fn reset(&mut self) {
        self.weight_sum.reset();
        self.value = None;
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
    fn test_recurrence() {
        let mut eswa = ElasticSeriesWeightedAverage::<f64>::new(
            ElasticSeriesWeightedAverageConfig::new(2),
        )
        .unwrap();
        let out = eswa.fit(&[2.0, 4.0, 1.0], &[1.0, 1.0, 2.0], true).unwrap();
        // First step has w / W = 1 and reproduces the seed.
        assert_relative_eq!(out[0], 2.0);
        assert_relative_eq!(out[1], 2.0 + 0.5 * 2.0);
        assert_relative_eq!(out[2], 3.0 + (2.0 / 3.0) * (1.0 - 3.0));
    }

    #[test]
    fn test_zero_weights_hold_value() {
        let mut eswa = ElasticSeriesWeightedAverage::<f64>::new(
            ElasticSeriesWeightedAverageConfig::new(2),
        )
        .unwrap();
        eswa.fit(&[5.0], &[1.0], true).unwrap();
        let out = eswa.fit(&[9.0, 7.0], &[0.0, 0.0], false).unwrap();
        assert_relative_eq!(out[0], 5.0);
        assert_relative_eq!(out[1], 5.0);
    }
}
