//! Fractal adaptive moving average.

use fe_core::{
    engine::{RollingWindow, WindowDescriptor},
    error::{ConfigError, Result},
    num::TaFloat,
    reducer::Reducer,
    series::Series,
    shapes::WindowShape,
    traits::{check_batch, ColumnFeature},
    utils::range,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the fractal adaptive moving average.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FractalAdaptiveConfig {
    /// Full lookback `L`; the half windows span `L / 2`.
    pub lookback_period: usize,
    /// Minimum observations in each range window.
    pub min_periods: usize,
}

impl Default for FractalAdaptiveConfig {
    fn default() -> Self {
        Self {
            lookback_period: 8,
            min_periods: 1,
        }
    }
}

impl FractalAdaptiveConfig {
    /// Create a configuration with the given lookback.
    #[must_use]
    pub fn new(lookback_period: usize) -> Self {
        Self {
            lookback_period,
            ..Self::default()
        }
    }

    /// Set the minimum number of observations.
    #[must_use]
    pub fn with_min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = min_periods;
        self
    }
}

/// Fractal adaptive moving average.
///
/// # Formula
///
/// ```text
/// N1 = range(last L/2 values) / (L/2)
/// N2 = range(first L/2 values of the last L) / (L/2)
/// N3 = range(last L values) / L
/// D  = (ln(N1 + N2) − ln N3) / ln 2
/// a  = clamp(exp(−4.6·(D − 1)), 0.01, 1)      (NaN → 0.01)
/// N  = (L − L/2)·((2 − a)/a − 1)/(L − 1) + L/2
/// α  = 2 / (N + 1)
/// FRAMA[t] = FRAMA[t−1]·(1 − α) + x[t]·α
/// ```
///
/// The average is seeded with the first non-missing input. A missing input
/// yields NaN and leaves the running value untouched.
#[derive(Debug, Clone)]
pub struct FractalAdaptiveMovingAverage<T: TaFloat> {
    config: FractalAdaptiveConfig,
    recent: RollingWindow<T>,
    older: RollingWindow<T>,
    full: RollingWindow<T>,
    value: Option<T>,
}

impl<T: TaFloat> FractalAdaptiveMovingAverage<T> {
    fn smoothing(&self, n1: T, n2: T, n3: T) -> T {
        let lookback = <T as TaFloat>::from_usize(self.config.lookback_period);
        let half = <T as TaFloat>::from_usize(self.config.lookback_period / 2);
        let dimension = ((n1 + n2).ln() - n3.ln()) / T::TWO.ln();
        let a = (T::from_f64_lossy(-4.6) * (dimension - T::ONE)).exp();
        let a = if a.is_nan() { T::ZERO } else { a };
        let a = a.clamp_value(T::from_f64_lossy(0.01), T::ONE);
        let old_n = (T::TWO - a) / a;
        let new_n = (lookback - half) * (old_n - T::ONE) / (lookback - T::ONE) + half;
        T::TWO / (new_n + T::ONE)
    }
}

impl<T: TaFloat> ColumnFeature<T> for FractalAdaptiveMovingAverage<T> {
    type Config = FractalAdaptiveConfig;
    type Output = Series<T>;

    const NAME: &'static str = "fractal_adaptive_moving_average";

    fn new(config: Self::Config) -> Result<Self> {
        let lookback = config.lookback_period;
        if lookback < 2 {
            return Err(ConfigError::InvalidWindow {
                name: "lookback_period",
                value: lookback,
                min: 2,
            }
            .into());
        }
        let half = lookback / 2;
        let min_periods = config.min_periods;
        let descriptor = |window: usize| {
            WindowDescriptor::new(window)
                .with_shape(WindowShape::Identity)
                .with_min_periods(min_periods.min(window))
        };
        let half_t = <T as TaFloat>::from_usize(half);
        let full_t = <T as TaFloat>::from_usize(lookback);

        let recent = RollingWindow::with_reducer(
            &descriptor(half),
            Reducer::custom(move |w: &[T]| range(w) / half_t),
        )?;
        let older = RollingWindow::with_reducer(
            &descriptor(lookback),
            Reducer::custom(move |w: &[T]| range(&w[..half.min(w.len())]) / half_t),
        )?;
        let full = RollingWindow::with_reducer(
            &descriptor(lookback),
            Reducer::custom(move |w: &[T]| range(w) / full_t),
        )?;
        Ok(Self {
            config,
            recent,
            older,
            full,
            value: None,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        if first_fit {
            self.value = None;
        }
        let n1 = self.recent.compute(values, first_fit)?;
        let n2 = self.older.compute(values, first_fit)?;
        let n3 = self.full.compute(values, first_fit)?;

        let mut out = Series::with_capacity(values.len());
        for (i, &x) in values.iter().enumerate() {
            if x.is_nan() {
                out.push(T::NAN);
                continue;
            }
            let alpha = self.smoothing(n1[i], n2[i], n3[i]);
            let next = match self.value {
                Some(prev) => prev * (T::ONE - alpha) + x * alpha,
                None => x,
            };
            self.value = Some(next);
            out.push(next);
        }
        Ok(out)
    }

    fn is_fitted(&self) -> bool {
        self.full.is_fitted()
    }

    fn reset(&mut self) {
        self.recent.reset();
        self.older.reset();
        self.full.reset();
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
    fn test_constant_series() {
        let mut frama =
            FractalAdaptiveMovingAverage::<f64>::new(FractalAdaptiveConfig::default()).unwrap();
        for v in frama.fit(&[5.0; 12], true).unwrap().iter() {
            assert_relative_eq!(*v, 5.0);
        }
    }

    #[test]
    fn test_straight_line_is_tracked_closely() {
        // On a straight line `a` exceeds 1 and is clamped, which gives the
        // fastest smoothing 2 / (L/2 + 1).
        let config = FractalAdaptiveConfig::new(4);
        let mut frama = FractalAdaptiveMovingAverage::<f64>::new(config).unwrap();
        let values: Vec<f64> = (0..8).map(f64::from).collect();
        let out = frama.fit(&values, true).unwrap();
        let alpha = 2.0 / 3.0;
        assert_relative_eq!(out[0], 0.0);
        let prev = out[6];
        assert_relative_eq!(out[7], prev * (1.0 - alpha) + 7.0 * alpha, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_input_keeps_value() {
        let mut frama =
            FractalAdaptiveMovingAverage::<f64>::new(FractalAdaptiveConfig::new(4)).unwrap();
        let out = frama.fit(&[f64::NAN, 2.0, f64::NAN, 2.0], true).unwrap();
        assert!(out[0].is_nan() && out[2].is_nan());
        assert_relative_eq!(out[1], 2.0);
        assert_relative_eq!(out[3], 2.0);
    }

    #[test]
    fn test_lookback_validation() {
        let err = FractalAdaptiveMovingAverage::<f64>::new(FractalAdaptiveConfig::new(1)).unwrap_err();
        assert!(err.is_config());
    }
}
