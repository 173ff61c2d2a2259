//! Triple exponential moving feature.

use fe_core::{
    error::Result,
    num::TaFloat,
    series::Series,
    traits::{check_batch, ColumnFeature},
};

use super::ema::{ExponentialMovingConfig, ExponentialMovingFeature};

/// Triple exponential moving feature.
///
/// Three cascaded exponential moving features, each fed the output of the
/// previous one, combined as `3·e1 − 3·e2 + e3`. All three share the same
/// configuration.
#[derive(Debug, Clone)]
pub struct TripleExponentialMovingFeature<T: TaFloat> {
    first: ExponentialMovingFeature<T>,
    second: ExponentialMovingFeature<T>,
    third: ExponentialMovingFeature<T>,
}

impl<T: TaFloat> ColumnFeature<T> for TripleExponentialMovingFeature<T> {
    type Config = ExponentialMovingConfig;
    type Output = Series<T>;

    const NAME: &'static str = "triple_exponential_moving_feature";

    fn new(config: Self::Config) -> Result<Self> {
        let first = ExponentialMovingFeature::new(config)?;
        Ok(Self {
            second: first.clone(),
            third: first.clone(),
            first,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.is_fitted())?;
        let e1 = self.first.fit(values, first_fit)?;
        let e2 = self.second.fit(e1.as_slice(), first_fit)?;
        let e3 = self.third.fit(e2.as_slice(), first_fit)?;
        Ok(e1
            .iter()
            .zip(e2.iter())
            .zip(e3.iter())
            .map(|((&a, &b), &c)| T::THREE * a - T::THREE * b + c)
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.third.is_fitted()
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
        self.third.reset();
    }

    fn config(&self) -> &Self::Config {
        self.first.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_series_passes_through() {
        let mut tema =
            TripleExponentialMovingFeature::<f64>::new(ExponentialMovingConfig::span(5.0)).unwrap();
        for v in tema.fit(&[4.0; 10], true).unwrap().iter() {
            assert_relative_eq!(*v, 4.0);
        }
    }

    #[test]
    fn test_cascade_formula() {
        let config = ExponentialMovingConfig::alpha(0.5);
        let x = [1.0, 5.0, 2.0, 8.0];
        let mut tema = TripleExponentialMovingFeature::<f64>::new(config.clone()).unwrap();
        let out = tema.fit(&x, true).unwrap();

        let mut ema = ExponentialMovingFeature::<f64>::new(config).unwrap();
        let e1 = ema.fit(&x, true).unwrap();
        let e2 = ema.fit(e1.as_slice(), true).unwrap();
        let e3 = ema.fit(e2.as_slice(), true).unwrap();
        for i in 0..x.len() {
            assert_relative_eq!(out[i], 3.0 * e1[i] - 3.0 * e2[i] + e3[i]);
        }
    }

    #[test]
    fn test_invalid_decay() {
        assert!(TripleExponentialMovingFeature::<f64>::new(ExponentialMovingConfig::default()).is_err());
    }
}
