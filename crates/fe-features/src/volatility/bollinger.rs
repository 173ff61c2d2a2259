//! Bollinger bands.
//!
//! Bands at a multiple of the rolling standard deviation around the rolling
//! mean of the typical value.

use fe_core::{
    engine::{RollingWindow, WindowDescriptor},
    error::{ConfigError, Result},
    num::TaFloat,
    reducer::ReducerKind,
    traits::{check_batch, Bands, ColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::typical_value::TypicalValueConfig;

/// Configuration for Bollinger bands.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BollingerBandsConfig {
    /// Typical value the bands are computed over.
    pub typical_value: TypicalValueConfig,
    /// Window of the mean and standard deviation (default: 6).
    pub lookback_period: usize,
    /// Minimum observations for the mean and deviation (default: 1).
    pub min_periods: usize,
    /// Width of the bands in standard deviations (default: 2).
    pub standard_deviation_multiplier: f64,
}

impl Default for BollingerBandsConfig {
    fn default() -> Self {
        Self {
            typical_value: TypicalValueConfig::default(),
            lookback_period: 6,
            min_periods: 1,
            standard_deviation_multiplier: 2.0,
        }
    }
}

impl BollingerBandsConfig {
    /// Create a configuration with the given window and multiplier.
    #[must_use]
    pub fn new(lookback_period: usize, standard_deviation_multiplier: f64) -> Self {
        Self {
            lookback_period,
            standard_deviation_multiplier,
            ..Self::default()
        }
    }

    /// Set the typical value window.
    #[must_use]
    pub fn with_typical_value(mut self, typical_value: TypicalValueConfig) -> Self {
        self.typical_value = typical_value;
        self
    }
}

/// Bollinger bands.
///
/// # Formula
///
/// ```text
/// TV    = typical value
/// upper = mean(TV) + k·std(TV)
/// lower = mean(TV) − k·std(TV)
/// ```
///
/// The standard deviation is the population form (`ddof = 0`).
#[derive(Debug, Clone)]
pub struct BollingerBands<T: TaFloat> {
    config: BollingerBandsConfig,
    multiplier: T,
    typical_value: RollingWindow<T>,
    mean: RollingWindow<T>,
    deviation: RollingWindow<T>,
}

impl<T: TaFloat> ColumnFeature<T> for BollingerBands<T> {
    type Config = BollingerBandsConfig;
    type Output = Bands<T>;

    const NAME: &'static str = "bollinger_bands";

    fn new(config: Self::Config) -> Result<Self> {
        let k = config.standard_deviation_multiplier;
        if !(k.is_finite() && k >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "standard_deviation_multiplier",
                value: k.to_string(),
                expected: "finite value >= 0",
            }
            .into());
        }
        let band = WindowDescriptor::new(config.lookback_period).with_min_periods(config.min_periods);
        Ok(Self {
            multiplier: T::from_f64_lossy(k),
            typical_value: config.typical_value.window()?,
            mean: RollingWindow::new(&band)?,
            deviation: RollingWindow::new(&band.with_reducer(ReducerKind::Std { ddof: 0 }))?,
            config,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Bands<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let tv = self.typical_value.compute(values, first_fit)?;
        let mean = self.mean.compute(&tv, first_fit)?;
        let deviation = self.deviation.compute(&tv, first_fit)?;
        let k = self.multiplier;
        Ok(Bands {
            positive: mean.iter().zip(&deviation).map(|(&m, &s)| m + k * s).collect(),
            negative: mean.iter().zip(&deviation).map(|(&m, &s)| m - k * s).collect(),
        })
    }

    fn is_fitted(&self) -> bool {
        self.deviation.is_fitted()
    }

    fn reset(&mut self) {
        self.typical_value.reset();
        self.mean.reset();
        self.deviation.reset();
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
