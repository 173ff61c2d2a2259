//! Triple exponential moving average oscillator.

use fe_core::{
    engine::{RollingWindow, WindowDescriptor},
    error::Result,
    num::TaFloat,
    reducer::Reducer,
    series::Series,
    shapes::WindowShape,
    traits::{check_batch, ColumnFeature},
};

use crate::moving_average::{ExponentialMovingConfig, TripleExponentialMovingFeature};

/// One-step rate of change of the triple exponential moving feature.
///
/// ```text
/// TRIX[t] = (TEMA[t] − TEMA[t−1]) / TEMA[t−1]
/// ```
///
/// A zero previous value gives a missing output.
#[derive(Debug, Clone)]
pub struct TripleExponentialMovingOscillator<T: TaFloat> {
    tema: TripleExponentialMovingFeature<T>,
    change: RollingWindow<T>,
}

impl<T: TaFloat> ColumnFeature<T> for TripleExponentialMovingOscillator<T> {
    type Config = ExponentialMovingConfig;
    type Output = Series<T>;

    const NAME: &'static str = "triple_exponential_moving_oscillator";

    fn new(config: Self::Config) -> Result<Self> {
        let descriptor = WindowDescriptor::new(2).with_shape(WindowShape::Identity);
        let change = RollingWindow::with_reducer(
            &descriptor,
            Reducer::custom(|w: &[T]| match w {
                [prev, last] => (*last - *prev).div_or(*prev, T::NAN),
                _ => T::NAN,
            }),
        )?;
        Ok(Self {
            tema: TripleExponentialMovingFeature::new(config)?,
            change,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let tema = self.tema.fit(values, first_fit)?;
        Ok(self.change.compute(tema.as_slice(), first_fit)?.into())
    }

    fn is_fitted(&self) -> bool {
        self.change.is_fitted()
    }

    fn reset(&mut self) {
        self.tema.reset();
        self.change.reset();
    }

    fn config(&self) -> &Self::Config {
        self.tema.config()
    }
}
