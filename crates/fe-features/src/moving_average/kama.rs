//! Kaufman adaptive moving average.

use fe_core::{
    engine::RollingWindow,
    error::{ConfigError, Result},
    num::TaFloat,
    series::Series,
    traits::{check_batch, ColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::momentum::kaufman_efficiency::efficiency_window;

/// Configuration for the Kaufman adaptive moving average.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KaufmanAdaptiveConfig {
    /// Lookback of the efficiency ratio.
    pub kaufman_efficiency_lookback_period: usize,
    /// Minimum observations for the efficiency ratio; `None` means the full
    /// lookback.
    pub kaufman_efficiency_min_periods: Option<usize>,
    /// Span of the fastest smoothing.
    pub fast_ema_span: usize,
    /// Span of the slowest smoothing.
    pub slow_ema_span: usize,
}

impl Default for KaufmanAdaptiveConfig {
    fn default() -> Self {
        Self {
            kaufman_efficiency_lookback_period: 4,
            kaufman_efficiency_min_periods: None,
            fast_ema_span: 2,
            slow_ema_span: 5,
        }
    }
}

impl KaufmanAdaptiveConfig {
    /// Create a configuration with the given efficiency lookback.
    #[must_use]
    pub fn new(lookback_period: usize) -> Self {
        Self {
            kaufman_efficiency_lookback_period: lookback_period,
            ..Self::default()
        }
    }

    /// Set the fast and slow spans.
    #[must_use]
    pub fn with_spans(mut self, fast: usize, slow: usize) -> Self {
        self.fast_ema_span = fast;
        self.slow_ema_span = slow;
        self
    }
}

/// Kaufman adaptive moving average.
///
/// # Formula
///
/// ```text
/// SC[t]   = (ER[t]·(2/(fast+1) − 2/(slow+1)) + 2/(slow+1))²
/// KAMA[t] = KAMA[t−1] + SC[t]·(x[t] − KAMA[t−1])
/// ```
///
/// The average is seeded with the input at the first position where the
/// efficiency ratio is defined. Afterwards a missing input or ratio yields NaN
/// and leaves the running value untouched.
#[derive(Debug, Clone)]
pub struct KaufmanAdaptiveMovingAverage<T: TaFloat> {
    config: KaufmanAdaptiveConfig,
    efficiency: RollingWindow<T>,
    fast_alpha: T,
    slow_alpha: T,
    value: Option<T>,
}

impl<T: TaFloat> ColumnFeature<T> for KaufmanAdaptiveMovingAverage<T> {
    type Config = KaufmanAdaptiveConfig;
    type Output = Series<T>;

    const NAME: &'static str = "kaufman_adaptive_moving_average";

    fn new(config: Self::Config) -> Result<Self> {
        for (name, span) in [
            ("fast_ema_span", config.fast_ema_span),
            ("slow_ema_span", config.slow_ema_span),
        ] {
            if span == 0 {
                return Err(ConfigError::InvalidWindow { name, value: 0, min: 1 }.into());
            }
        }
        let efficiency = efficiency_window(
            config.kaufman_efficiency_lookback_period,
            config.kaufman_efficiency_min_periods,
        )?;
        let alpha = |span: usize| T::TWO / (<T as TaFloat>::from_usize(span) + T::ONE);
        Ok(Self {
            fast_alpha: alpha(config.fast_ema_span),
            slow_alpha: alpha(config.slow_ema_span),
            efficiency,
            config,
            value: None,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        if first_fit {
            self.value = None;
        }
        let ratios = self.efficiency.compute(values, first_fit)?;
        Ok(values
            .iter()
            .zip(ratios)
            .map(|(&x, er)| {
                let sc = er * (self.fast_alpha - self.slow_alpha) + self.slow_alpha;
                let sc = sc * sc;
                if x.is_nan() || sc.is_nan() {
                    return T::NAN;
                }
                let next = match self.value {
                    Some(prev) => prev + sc * (x - prev),
                    None => x,
                };
                self.value = Some(next);
                next
            })
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.efficiency.is_fitted()
    }

    fn reset(&mut self) {
        self.efficiency.reset();
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
    fn test_seed_then_recurrence() {
        let config = KaufmanAdaptiveConfig::new(3);
        let mut kama = KaufmanAdaptiveMovingAverage::<f64>::new(config).unwrap();
        let out = kama.fit(&[1.0, 2.0, 3.0, 3.0], true).unwrap();
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_relative_eq!(out[2], 3.0);
        // ER over [2, 3, 3] is 1/1, so SC is the fast constant squared.
        let sc = (2.0f64 / 3.0).powi(2);
        assert_relative_eq!(out[3], 3.0 + sc * (3.0 - 3.0));
    }

    #[test]
    fn test_flat_market_uses_slow_constant() {
        let mut kama =
            KaufmanAdaptiveMovingAverage::<f64>::new(KaufmanAdaptiveConfig::new(2)).unwrap();
        let out = kama.fit(&[4.0, 4.0, 10.0], true).unwrap();
        assert_relative_eq!(out[1], 4.0);
        let sc = (2.0f64 / 3.0).powi(2);
        assert_relative_eq!(out[2], 4.0 + sc * 6.0);

        let mut kama =
            KaufmanAdaptiveMovingAverage::<f64>::new(KaufmanAdaptiveConfig::new(3)).unwrap();
        let out = kama.fit(&[4.0, 4.0, 4.0, 5.0, 4.0], true).unwrap();
        // ER over [4, 5, 4] is 0: only the slow constant applies.
        let slow = (2.0f64 / 6.0).powi(2);
        assert_relative_eq!(out[4], out[3] + slow * (4.0 - out[3]));
    }

    #[test]
    fn test_missing_input_keeps_value() {
        let mut kama =
            KaufmanAdaptiveMovingAverage::<f64>::new(KaufmanAdaptiveConfig::new(2)).unwrap();
        kama.fit(&[1.0, 2.0], true).unwrap();
        let out = kama.fit(&[f64::NAN], false).unwrap();
        assert!(out[0].is_nan());
        assert_eq!(kama.value, Some(2.0));
    }

    #[test]
    fn test_invalid_spans() {
        let config = KaufmanAdaptiveConfig::default().with_spans(0, 5);
        assert!(KaufmanAdaptiveMovingAverage::<f64>::new(config).is_err());
    }
}
