//! Average directional movement index.
//!
//! ADX quantifies trend strength regardless of direction. Directional
//! movement is measured between the older and the recent half of a trailing
//! window, smoothed, normalised by the average true range and smoothed again.

use fe_core::{
    engine::{RollingWindow, WindowDescriptor},
    error::{ConfigError, Result},
    num::TaFloat,
    reducer::Reducer,
    series::Series,
    shapes::WindowShape,
    traits::{check_batch, ColumnFeature},
    utils::bounds,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::moving_average::{ExponentialMovingConfig, ExponentialMovingFeature};
use crate::volatility::{AverageTrueRange, AverageTrueRangeConfig};

/// Configuration for the ADX.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AverageDirectionalMovementIndexConfig {
    /// Half of the directional movement window (default: 4).
    pub directional_movement_lookback_period: usize,
    /// Minimum observations of the movement window; `None` means the full
    /// window.
    pub directional_movement_min_periods: Option<usize>,
    /// Smoothing period of the movements, `alpha = 1 / period` (default: 14).
    pub directional_movement_smoothing_period: usize,
    /// Minimum observations of the movement smoothing.
    pub directional_movement_smoothing_min_periods: usize,
    /// Smoothing period of the index, `alpha = 1 / period` (default: 14).
    pub average_directional_movement_smoothing_period: usize,
    /// Minimum observations of the index smoothing.
    pub average_directional_movement_min_periods: usize,
    /// Average true range used for normalisation.
    pub atr: AverageTrueRangeConfig,
}

impl Default for AverageDirectionalMovementIndexConfig {
    fn default() -> Self {
        Self {
            directional_movement_lookback_period: 4,
            directional_movement_min_periods: None,
            directional_movement_smoothing_period: 14,
            directional_movement_smoothing_min_periods: 0,
            average_directional_movement_smoothing_period: 14,
            average_directional_movement_min_periods: 0,
            atr: AverageTrueRangeConfig::default(),
        }
    }
}

impl AverageDirectionalMovementIndexConfig {
    /// Create a configuration with the given movement lookback and smoothing
    /// periods.
    #[must_use]
    pub fn new(lookback_period: usize, smoothing_period: usize, adx_period: usize) -> Self {
        Self {
            directional_movement_lookback_period: lookback_period,
            directional_movement_smoothing_period: smoothing_period,
            average_directional_movement_smoothing_period: adx_period,
            ..Self::default()
        }
    }

    /// Set the average true range configuration.
    #[must_use]
    pub fn with_atr(mut self, atr: AverageTrueRangeConfig) -> Self {
        self.atr = atr;
        self
    }
}

/// Which side of the directional movement a window reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Plus,
    Minus,
}

/// Raw directional movement between the older and recent half of `window`.
///
/// `+DM = max(recent) − max(older)`, `−DM = min(older) − min(recent)`.
fn movement<T: TaFloat>(window: &[T], direction: Direction) -> T {
    let (older, recent) = window.split_at(window.len() / 2);
    match (bounds(older), bounds(recent)) {
        (Some((older_lo, older_hi)), Some((recent_lo, recent_hi))) => match direction {
            Direction::Plus => recent_hi - older_hi,
            Direction::Minus => older_lo - recent_lo,
        },
        _ => T::NAN,
    }
}

/// Keep a movement only if it is positive and dominates the other side.
fn dominant<T: TaFloat>(own: T, other: T) -> T {
    if own.is_nan() || other.is_nan() {
        T::NAN
    } else if own > other && own > T::ZERO {
        own
    } else {
        T::ZERO
    }
}

fn movement_window<T: TaFloat>(
    config: &AverageDirectionalMovementIndexConfig,
    direction: Direction,
) -> Result<RollingWindow<T>> {
    let mut descriptor = WindowDescriptor::new(2 * config.directional_movement_lookback_period)
        .with_shape(WindowShape::Identity);
    descriptor.min_periods = config.directional_movement_min_periods;
    RollingWindow::with_reducer(
        &descriptor,
        Reducer::custom(move |w: &[T]| movement(w, direction)),
    )
}

fn smoothing(period: usize, min_periods: usize) -> ExponentialMovingConfig {
    ExponentialMovingConfig::alpha(1.0 / period as f64).with_min_periods(min_periods)
}

/// Average directional movement index.
///
/// # Formula
///
/// ```text
/// +DI = 100·EMA(+DM) / ATR
/// −DI = 100·EMA(−DM) / ATR
/// DX  = 100·|+DI − −DI| / (+DI + −DI)
/// ADX = EMA(DX)
/// ```
///
/// A vanishing ATR gives zero directional indices, and a zero index sum
/// gives `DX = 0`.
#[derive(Debug, Clone)]
pub struct AverageDirectionalMovementIndex<T: TaFloat> {
    config: AverageDirectionalMovementIndexConfig,
    plus_movement: RollingWindow<T>,
    minus_movement: RollingWindow<T>,
    plus_smoothing: ExponentialMovingFeature<T>,
    minus_smoothing: ExponentialMovingFeature<T>,
    atr: AverageTrueRange<T>,
    adx_smoothing: ExponentialMovingFeature<T>,
}

impl<T: TaFloat> ColumnFeature<T> for AverageDirectionalMovementIndex<T> {
    type Config = AverageDirectionalMovementIndexConfig;
    type Output = Series<T>;

    const NAME: &'static str = "average_directional_movement_index";

    fn new(config: Self::Config) -> Result<Self> {
        if config.directional_movement_lookback_period == 0 {
            return Err(ConfigError::InvalidWindow {
                name: "directional_movement_lookback_period",
                value: 0,
                min: 1,
            }
            .into());
        }
        let dm_smoothing = smoothing(
            config.directional_movement_smoothing_period,
            config.directional_movement_smoothing_min_periods,
        );
        let adx_smoothing = smoothing(
            config.average_directional_movement_smoothing_period,
            config.average_directional_movement_min_periods,
        );
        Ok(Self {
            plus_movement: movement_window(&config, Direction::Plus)?,
            minus_movement: movement_window(&config, Direction::Minus)?,
            plus_smoothing: ExponentialMovingFeature::new(dm_smoothing.clone())?,
            minus_smoothing: ExponentialMovingFeature::new(dm_smoothing)?,
            atr: AverageTrueRange::new(config.atr.clone().with_true_range(false))?,
            adx_smoothing: ExponentialMovingFeature::new(adx_smoothing)?,
            config,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let plus = self.plus_movement.compute(values, first_fit)?;
        let minus = self.minus_movement.compute(values, first_fit)?;
        let (plus, minus): (Vec<T>, Vec<T>) = plus
            .iter()
            .zip(&minus)
            .map(|(&p, &m)| (dominant(p, m), dominant(m, p)))
            .unzip();

        let plus = self.plus_smoothing.fit(&plus, first_fit)?;
        let minus = self.minus_smoothing.fit(&minus, first_fit)?;
        let atr = self.atr.fit(values, first_fit)?;

        let directional_index = |dm: T, atr: T| {
            if atr.abs() < T::EPSILON {
                T::ZERO
            } else {
                T::HUNDRED * dm / atr
            }
        };
        let dx: Vec<T> = plus
            .iter()
            .zip(minus.iter())
            .zip(atr.iter())
            .map(|((&p, &m), &a)| {
                let plus_di = directional_index(p, a);
                let minus_di = directional_index(m, a);
                (T::HUNDRED * (plus_di - minus_di).abs()).div_or(plus_di + minus_di, T::ZERO)
            })
            .collect();
        self.adx_smoothing.fit(&dx, first_fit)
    }

    fn is_fitted(&self) -> bool {
        self.adx_smoothing.is_fitted()
    }

    fn reset(&mut self) {
        self.plus_movement.reset();
        self.minus_movement.reset();
        self.plus_smoothing.reset();
        self.minus_smoothing.reset();
        self.atr.reset();
        self.adx_smoothing.reset();
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
    fn test_movement_halves() {
        let window = [1.0, 3.0, 2.0, 5.0];
        assert_relative_eq!(movement(&window, Direction::Plus), 2.0);
        assert_relative_eq!(movement(&window, Direction::Minus), -1.0);
        assert!(movement(&[1.0f64], Direction::Plus).is_nan());
    }

    #[test]
    fn test_dominant_movement() {
        assert_relative_eq!(dominant(2.0, -1.0), 2.0);
        assert_relative_eq!(dominant(-1.0, 2.0), 0.0);
        assert_relative_eq!(dominant(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_steady_trend_is_strong() {
        let config = AverageDirectionalMovementIndexConfig::new(2, 2, 2);
        let mut adx = AverageDirectionalMovementIndex::<f64>::new(config).unwrap();
        let values: Vec<f64> = (0..30).map(f64::from).collect();
        let out = adx.fit(&values, true).unwrap();
        // Only +DM is ever positive, so DX is 100 once defined.
        assert_relative_eq!(out[29], 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_series_has_no_direction() {
        let config = AverageDirectionalMovementIndexConfig::new(2, 2, 2);
        let mut adx = AverageDirectionalMovementIndex::<f64>::new(config).unwrap();
        let out = adx.fit(&[3.0; 12], true).unwrap();
        assert_relative_eq!(out[11], 0.0);
    }
}
