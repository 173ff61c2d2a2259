//! Typical value.

use fe_core::{
    engine::{RollingWindow, WindowDescriptor},
    error::Result,
    num::TaFloat,
    reducer::Reducer,
    series::Series,
    shapes::WindowShape,
    traits::{check_batch, ColumnFeature},
    utils::bounds,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the typical value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TypicalValueConfig {
    /// Window length (default: 6).
    pub lookback_period: usize,
    /// Minimum observations; `None` means the full window.
    pub min_periods: Option<usize>,
}

impl Default for TypicalValueConfig {
    fn default() -> Self {
        Self {
            lookback_period: 6,
            min_periods: None,
        }
    }
}

impl TypicalValueConfig {
    /// Create a configuration with the given window.
    #[must_use]
    pub fn new(lookback_period: usize) -> Self {
        Self {
            lookback_period,
            min_periods: None,
        }
    }

    /// Set the minimum number of observations.
    #[must_use]
    pub fn with_min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = Some(min_periods);
        self
    }

    pub(crate) fn window<T: TaFloat>(&self) -> Result<RollingWindow<T>> {
        let mut descriptor =
            WindowDescriptor::new(self.lookback_period).with_shape(WindowShape::Identity);
        descriptor.min_periods = self.min_periods;
        RollingWindow::with_reducer(&descriptor, Reducer::custom(typical_value::<T>))
    }
}

/// `(max + min + last) / 3` of one window.
fn typical_value<T: TaFloat>(window: &[T]) -> T {
    match (bounds(window), window.last()) {
        (Some((lo, hi)), Some(&last)) => (hi + lo + last) / T::THREE,
        _ => T::NAN,
    }
}

/// Typical value: the single-column analogue of `(high + low + close) / 3`.
#[derive(Debug, Clone)]
pub struct TypicalValue<T: TaFloat> {
    config: TypicalValueConfig,
    window: RollingWindow<T>,
}

impl<T: TaFloat> ColumnFeature<T> for TypicalValue<T> {
    type Config = TypicalValueConfig;
    type Output = Series<T>;

    const NAME: &'static str = "typical_value";

    fn new(config: Self::Config) -> Result<Self> {
        Ok(Self {
            window: config.window()?,
            config,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        Ok(self.window.compute(values, first_fit)?.into())
    }

    fn is_fitted(&self) -> bool {
        self.window.is_fitted()
    }

    fn reset(&mut self) {
        self.window.reset();
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
