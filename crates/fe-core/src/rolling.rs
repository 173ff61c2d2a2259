//! Shape-weighted rolling feature.

use crate::engine::{RollingWindow, WindowDescriptor};
use crate::error::{ConfigError, Result};
use crate::num::TaFloat;
use crate::reducer::Reducer;
use crate::series::Series;
use crate::traits::ColumnFeature;

/// Rolling reduction of a shape-weighted trailing window.
///
/// This is the table-facing form of the engine: any shape of the library with
/// any reducer, e.g. a Gaussian-weighted sum or an equal-weighted median.
/// Windows shorter than two values are rejected; use
/// [`RollingWindow`] directly for a pass-through window of one.
///
/// # Example
///
/// ```rust
/// use fe_core::prelude::*;
/// use fe_core::{RollingFeature, WindowDescriptor};
///
/// let mut mean = RollingFeature::<f64>::new(WindowDescriptor::new(3).with_min_periods(1)).unwrap();
/// let x: Vec<f64> = (1..=8).map(f64::from).collect();
/// let out = mean.fit(&x, true).unwrap();
/// assert_eq!(out.as_slice(), &[1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
/// ```
#[derive(Debug, Clone)]
pub struct RollingFeature<T: TaFloat> {
    config: WindowDescriptor,
    window: RollingWindow<T>,
}

impl<T: TaFloat> RollingFeature<T> {
    /// Build with a custom reducer in place of the descriptor's.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for windows shorter than two or invalid
    /// descriptor parameters.
    pub fn with_reducer(config: WindowDescriptor, reducer: Reducer<T>) -> Result<Self> {
        check_window(&config)?;
        let window = RollingWindow::with_reducer(&config, reducer)?;
        Ok(Self { config, window })
    }
}

fn check_window(config: &WindowDescriptor) -> Result<()> {
    if config.window <= 1 {
        return Err(ConfigError::InvalidWindow {
            name: "window",
            value: config.window,
            min: 2,
        }
        .into());
    }
    Ok(())
}

impl<T: TaFloat> ColumnFeature<T> for RollingFeature<T> {
    type Config = WindowDescriptor;
    type Output = Series<T>;

    const NAME: &'static str = "rolling_window";

    fn new(config: Self::Config) -> Result<Self> {
        check_window(&config)?;
        let window = RollingWindow::new(&config)?;
        Ok(Self { config, window })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        self.window.compute(values, first_fit).map(Series::from_vec)
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
