//! Percentage value oscillator.

use fe_core::{
    error::Result,
    num::TaFloat,
    series::Series,
    traits::{check_batch, ColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::apo::AbsolutePriceOscillatorConfig;
use crate::moving_average::ExponentialMovingFeature;

/// Configuration for the percentage value oscillator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PercentageValueOscillatorConfig {
    /// Fast and slow legs; the spans default to 4 and 8.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub legs: AbsolutePriceOscillatorConfig,
    /// Span of the smoothing applied to the ratio (default: 9).
    pub smoothing_period: usize,
}

impl Default for PercentageValueOscillatorConfig {
    fn default() -> Self {
        Self {
            legs: AbsolutePriceOscillatorConfig::new(4, 8),
            smoothing_period: 9,
        }
    }
}

impl PercentageValueOscillatorConfig {
    /// Create a configuration with the given spans.
    #[must_use]
    pub fn new(fast_period: usize, slow_period: usize, smoothing_period: usize) -> Self {
        Self {
            legs: AbsolutePriceOscillatorConfig::new(fast_period, slow_period),
            smoothing_period,
        }
    }
}

/// Percentage value oscillator.
///
/// # Formula
///
/// ```text
/// PVO = EMA_smoothing((slow − fast) / slow)
/// ```
///
/// The smoothing leg computes the slow leg's operation. A zero slow value
/// gives a missing ratio.
#[derive(Debug, Clone)]
pub struct PercentageValueOscillator<T: TaFloat> {
    config: PercentageValueOscillatorConfig,
    fast: ExponentialMovingFeature<T>,
    slow: ExponentialMovingFeature<T>,
    smoothing: ExponentialMovingFeature<T>,
}

impl<T: TaFloat> ColumnFeature<T> for PercentageValueOscillator<T> {
    type Config = PercentageValueOscillatorConfig;
    type Output = Series<T>;

    const NAME: &'static str = "percentage_value_oscillator";

    fn new(config: Self::Config) -> Result<Self> {
        let legs = &config.legs;
        let fast = ExponentialMovingFeature::new(legs.leg(legs.fast_period, legs.fast_operation))?;
        let slow = ExponentialMovingFeature::new(legs.leg(legs.slow_period, legs.slow_operation))?;
        let smoothing =
            ExponentialMovingFeature::new(legs.leg(config.smoothing_period, legs.slow_operation))?;
        Ok(Self {
            config,
            fast,
            slow,
            smoothing,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let fast = self.fast.fit(values, first_fit)?;
        let slow = self.slow.fit(values, first_fit)?;
        let ratio: Vec<T> = fast
            .iter()
            .zip(slow.iter())
            .map(|(&f, &s)| (s - f).div_or(s, T::NAN))
            .collect();
        self.smoothing.fit(&ratio, first_fit)
    }

    fn is_fitted(&self) -> bool {
        self.smoothing.is_fitted()
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.smoothing.reset();
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
