//! Keltner channel.

use fe_core::{
    error::{ConfigError, Result},
    num::TaFloat,
    traits::{check_batch, Bands, ColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::atr::{AverageTrueRange, AverageTrueRangeConfig};
use crate::moving_average::{ExponentialMovingConfig, ExponentialMovingFeature};

/// Configuration for the Keltner channel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeltnerChannelConfig {
    /// Centre line (default: span 8).
    pub ema: ExponentialMovingConfig,
    /// Channel width source.
    pub atr: AverageTrueRangeConfig,
    /// Width of the channel in average true ranges (default: 2).
    pub atr_multiplier: f64,
}

impl Default for KeltnerChannelConfig {
    fn default() -> Self {
        Self {
            ema: ExponentialMovingConfig::span(8.0),
            atr: AverageTrueRangeConfig::default(),
            atr_multiplier: 2.0,
        }
    }
}

impl KeltnerChannelConfig {
    /// Create a configuration with the given centre span and multiplier.
    #[must_use]
    pub fn new(span: f64, atr_multiplier: f64) -> Self {
        Self {
            ema: ExponentialMovingConfig::span(span),
            atr_multiplier,
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

/// Keltner channel: `EMA ± k·ATR`.
#[derive(Debug, Clone)]
pub struct KeltnerChannel<T: TaFloat> {
    config: KeltnerChannelConfig,
    multiplier: T,
    centre: ExponentialMovingFeature<T>,
    atr: AverageTrueRange<T>,
}

impl<T: TaFloat> ColumnFeature<T> for KeltnerChannel<T> {
    type Config = KeltnerChannelConfig;
    type Output = Bands<T>;

    const NAME: &'static str = "keltner_channel";

    fn new(config: Self::Config) -> Result<Self> {
        let k = config.atr_multiplier;
        if !(k.is_finite() && k >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "atr_multiplier",
                value: k.to_string(),
                expected: "finite value >= 0",
            }
            .into());
        }
        // The width is always the average, never the raw true range.
        let atr = config.atr.clone().with_true_range(false);
        Ok(Self {
            multiplier: T::from_f64_lossy(k),
            centre: ExponentialMovingFeature::new(config.ema.clone())?,
            atr: AverageTrueRange::new(atr)?,
            config,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Bands<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let centre = self.centre.fit(values, first_fit)?;
        let atr = self.atr.fit(values, first_fit)?;
        let k = self.multiplier;
        Ok(Bands {
            positive: centre.iter().zip(atr.iter()).map(|(&c, &a)| c + k * a).collect(),
            negative: centre.iter().zip(atr.iter()).map(|(&c, &a)| c - k * a).collect(),
        })
    }

    fn is_fitted(&self) -> bool {
        self.atr.is_fitted()
    }

    fn reset(&mut self) {
        self.centre.reset();
        self.atr.reset();
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
    fn test_channel_width() {
        let config =
            KeltnerChannelConfig::new(1.0, 1.5).with_atr(AverageTrueRangeConfig::new(2, 1));
        let mut channel = KeltnerChannel::<f64>::new(config).unwrap();
        let bands = channel.fit(&[1.0, 3.0, 2.0], true).unwrap();
        assert!(bands.positive[0].is_nan());
        // Span 1 tracks the input; ATR with a one-value average is the true range.
        assert_relative_eq!(bands.positive[1], 3.0 + 1.5 * 2.0);
        assert_relative_eq!(bands.negative[2], 2.0 - 1.5 * 1.0);
    }

    #[test]
    fn test_missing_decay_rejected() {
        let mut config = KeltnerChannelConfig::default();
        config.ema = ExponentialMovingConfig::default();
        assert!(KeltnerChannel::<f64>::new(config).unwrap_err().is_config());
    }
}
