//! Hull moving feature.
//!
//! Three linearly weighted moving windows:
//!
//! ```text
//! raw  = 2·WMA(x, ceil(L/2)) − WMA(x, L)
//! hull = WMA(raw, ceil(√L))
//! ```

use fe_core::{
    engine::{RollingWindow, WindowDescriptor},
    error::{ConfigError, Result},
    num::TaFloat,
    reducer::ReducerKind,
    series::Series,
    shapes::WindowShape,
    traits::{check_batch, ColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the Hull moving feature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HullMovingConfig {
    /// Length of the full weighted window; must exceed one.
    pub window: usize,
    /// Minimum observations per window, capped at each sub-window length.
    pub min_periods: usize,
    /// Reduction over each linearly weighted window. `Sum` gives the
    /// conventional weighted moving average.
    pub reducer: ReducerKind,
}

impl Default for HullMovingConfig {
    fn default() -> Self {
        Self {
            window: 4,
            min_periods: 1,
            reducer: ReducerKind::Sum,
        }
    }
}

impl HullMovingConfig {
    /// Create a configuration with the given window.
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// Set the minimum number of observations.
    #[must_use]
    pub fn with_min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = min_periods;
        self
    }

    /// Set the reducer.
    #[must_use]
    pub fn with_reducer(mut self, reducer: ReducerKind) -> Self {
        self.reducer = reducer;
        self
    }

    fn weighted(&self, window: usize) -> WindowDescriptor {
        WindowDescriptor::new(window)
            .with_min_periods(self.min_periods.min(window))
            .with_shape(WindowShape::Weighted)
            .with_reducer(self.reducer)
    }
}

/// Hull moving feature over one column.
#[derive(Debug, Clone)]
pub struct HullMovingFeature<T: TaFloat> {
    config: HullMovingConfig,
    full: RollingWindow<T>,
    half: RollingWindow<T>,
    smooth: RollingWindow<T>,
}

impl<T: TaFloat> HullMovingFeature<T> {
    /// Lengths of the full, half and square-root windows.
    #[must_use]
    pub fn windows(&self) -> (usize, usize, usize) {
        (
            self.full.kernel().window(),
            self.half.kernel().window(),
            self.smooth.kernel().window(),
        )
    }
}

impl<T: TaFloat> ColumnFeature<T> for HullMovingFeature<T> {
    type Config = HullMovingConfig;
    type Output = Series<T>;

    const NAME: &'static str = "hull_moving_feature";

    fn new(config: Self::Config) -> Result<Self> {
        if config.window <= 1 {
            return Err(ConfigError::InvalidWindow {
                name: "window",
                value: config.window,
                min: 2,
            }
            .into());
        }
        let half = (config.window + 1) / 2;
        let root = (config.window as f64).sqrt().ceil() as usize;
        Ok(Self {
            full: RollingWindow::new(&config.weighted(config.window))?,
            half: RollingWindow::new(&config.weighted(half))?,
            smooth: RollingWindow::new(&config.weighted(root))?,
            config,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let full = self.full.compute(values, first_fit)?;
        let half = self.half.compute(values, first_fit)?;
        let raw: Vec<T> = half
            .iter()
            .zip(&full)
            .map(|(&h, &f)| T::TWO * h - f)
            .collect();
        self.smooth.compute(&raw, first_fit).map(Series::from_vec)
    }

    fn is_fitted(&self) -> bool {
        self.smooth.is_fitted()
    }

    fn reset(&mut self) {
        self.full.reset();
        self.half.reset();
        self.smooth.reset();
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
