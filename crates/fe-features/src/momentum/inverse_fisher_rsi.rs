//! Inverse Fisher transform of the RSI.

use fe_core::{
    engine::{RollingWindow, WindowDescriptor},
    error::Result,
    num::TaFloat,
    reducer::ReducerKind,
    series::Series,
    shapes::WindowShape,
    traits::{check_batch, ColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::rsi::{RelativeStrengthIndex, RelativeStrengthIndexConfig};

/// Configuration for the inverse Fisher RSI.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InverseFisherRsiConfig {
    /// Underlying RSI.
    pub rsi: RelativeStrengthIndexConfig,
    /// Length of the linearly weighted window (default: 8).
    pub weighted_lookback_period: usize,
    /// Minimum observations in the weighted window (default: 1).
    pub min_periods: usize,
}

impl Default for InverseFisherRsiConfig {
    fn default() -> Self {
        Self {
            rsi: RelativeStrengthIndexConfig::default(),
            weighted_lookback_period: 8,
            min_periods: 1,
        }
    }
}

impl InverseFisherRsiConfig {
    /// Create a configuration with the given RSI and weighting lookbacks.
    #[must_use]
    pub fn new(rsi_lookback_period: usize, weighted_lookback_period: usize) -> Self {
        Self {
            rsi: RelativeStrengthIndexConfig::new(rsi_lookback_period),
            weighted_lookback_period,
            ..Self::default()
        }
    }
}

/// Inverse Fisher RSI, bounded to `(-1, 1)`.
///
/// # Formula
///
/// ```text
/// v   = 0.1·(RSI − 50)
/// wma = Σ w_i·v_i over a linearly weighted window
/// IFR = tanh(wma) = (e^(2·wma) − 1) / (e^(2·wma) + 1)
/// ```
#[derive(Debug, Clone)]
pub struct InverseFisherRsi<T: TaFloat> {
    config: InverseFisherRsiConfig,
    rsi: RelativeStrengthIndex<T>,
    weighted: RollingWindow<T>,
}

impl<T: TaFloat> ColumnFeature<T> for InverseFisherRsi<T> {
    type Config = InverseFisherRsiConfig;
    type Output = Series<T>;

    const NAME: &'static str = "inverse_fisher_relative_strength_index";

    fn new(config: Self::Config) -> Result<Self> {
        let descriptor = WindowDescriptor::new(config.weighted_lookback_period)
            .with_min_periods(config.min_periods)
            .with_shape(WindowShape::Weighted)
            .with_reducer(ReducerKind::Sum);
        Ok(Self {
            rsi: RelativeStrengthIndex::new(config.rsi.clone())?,
            weighted: RollingWindow::new(&descriptor)?,
            config,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let scale = T::from_f64_lossy(0.1);
        let scaled: Vec<T> = self
            .rsi
            .fit(values, first_fit)?
            .iter()
            .map(|&rsi| scale * (rsi - T::FIFTY))
            .collect();
        let weighted = self.weighted.compute(&scaled, first_fit)?;
        Ok(weighted.into_iter().map(|v| v.tanh()).collect())
    }

    fn is_fitted(&self) -> bool {
        self.weighted.is_fitted()
    }

    fn reset(&mut self) {
        self.rsi.reset();
        self.weighted.reset();
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
