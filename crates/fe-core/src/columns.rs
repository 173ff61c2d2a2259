//! Table-level fitting with one state per column.
//!
//! [`PerColumn`] turns a single-column feature into a table feature. The
//! instance given at construction serves as an unfitted prototype; a first
//! fit clones it once for every input column and each clone then owns the
//! carried state of its column for the rest of the instance's life.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::dataframe::DataFrame;
use crate::error::{DataError, Result, StateError};
use crate::num::TaFloat;
use crate::traits::{output_name, ColumnFeature, ColumnOutput, Feature, PairedColumnFeature};

/// One feature instance per column, keyed by column name.
///
/// # Example
///
/// ```rust
/// use fe_core::prelude::*;
/// use fe_core::{RollingFeature, WindowDescriptor};
///
/// let mut mean = RollingFeature::<f64>::per_column(WindowDescriptor::new(2)).unwrap();
/// let data = DataFrame::from_series("x", Series::from_vec(vec![1.0, 3.0, 5.0]));
///
/// let head = mean.fit(&data.slice_rows(0..2), true).unwrap();
/// let tail = mean.fit(&data.slice_rows(2..3), false).unwrap();
/// assert_eq!(tail.get_column("x").unwrap().as_slice(), &[4.0]);
/// assert!(head.get_column("x").unwrap()[0].is_nan());
/// ```
#[derive(Debug, Clone)]
pub struct PerColumn<F> {
    prototype: F,
    columns: IndexMap<String, F>,
}

impl<F> PerColumn<F> {
    /// Wrap an unfitted feature.
    #[must_use]
    pub fn from_feature(prototype: F) -> Self {
        Self {
            prototype,
            columns: IndexMap::new(),
        }
    }

    /// The unfitted prototype.
    #[must_use]
    pub fn feature(&self) -> &F {
        &self.prototype
    }

    /// The fitted instance for `column`, if any.
    #[must_use]
    pub fn column(&self, column: &str) -> Option<&F> {
        self.columns.get(column)
    }

    /// Columns seen by the first fit, in input order.
    #[must_use]
    pub fn fitted_columns(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Returns `true` once a first fit has happened.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Drop every per-column instance.
    pub fn reset(&mut self) {
        self.columns.clear();
    }

    fn prepare<T: TaFloat>(&mut self, data: &DataFrame<T>, first_fit: bool, name: &str) -> Result<()> {
        if data.column_count() == 0 || data.is_empty() {
            return Err(DataError::EmptyInput.into());
        }
        debug!(
            feature = name,
            rows = data.len(),
            columns = data.column_count(),
            first_fit,
            "fitting feature"
        );
        if first_fit {
            self.columns.clear();
            return Ok(());
        }
        if self.columns.is_empty() {
            return Err(StateError::NotFitted.into());
        }

        // A continuation must carry exactly the fitted columns; checked here
        // so a rejected batch leaves every carried state untouched.
        if let Some(column) = data.column_names().into_iter().find(|c| !self.columns.contains_key(*c)) {
            warn!(column, "continuation batch carries a column absent at first fit");
            return Err(StateError::UnknownColumn(column.to_string()).into());
        }
        if let Some(column) = self.columns.keys().find(|c| !data.has_column(c)) {
            warn!(column = column.as_str(), "continuation batch omits a fitted column");
            return Err(DataError::MissingColumn(column.clone()).into());
        }
        Ok(())
    }

    fn instance(&mut self, column: &str, first_fit: bool) -> Result<&mut F>
    where
        F: Clone,
    {
        if first_fit {
            let fresh = self.prototype.clone();
            return Ok(self.columns.entry(column.to_string()).or_insert(fresh));
        }
        match self.columns.get_mut(column) {
            Some(instance) => Ok(instance),
            None => {
                warn!(column, "continuation batch carries a column absent at first fit");
                Err(StateError::UnknownColumn(column.to_string()).into())
            }
        }
    }

    /// Fit a value table against a weight table, pairing columns by position.
    ///
    /// Output columns take the names of the value columns.
    ///
    /// # Errors
    ///
    /// Returns a data error if the tables differ in shape or a continuation
    /// omits a fitted column, and a state error on a continuation before the
    /// first fit or with a column absent at first fit.
    pub fn fit_weighted<T>(
        &mut self,
        data: &DataFrame<T>,
        weights: &DataFrame<T>,
        first_fit: bool,
    ) -> Result<DataFrame<T>>
    where
        T: TaFloat,
        F: PairedColumnFeature<T>,
    {
        if data.column_count() != weights.column_count() {
            return Err(DataError::ShapeMismatch {
                expected: data.column_count(),
                actual: weights.column_count(),
            }
            .into());
        }
        if data.len() != weights.len() {
            return Err(DataError::LengthMismatch {
                expected: data.len(),
                actual: weights.len(),
            }
            .into());
        }
        self.prepare(data, first_fit, F::NAME)?;

        let mut output = DataFrame::with_capacity(data.column_count());
        for ((name, values), (_, weight)) in data.iter().zip(weights.iter()) {
            let instance = self.instance(name, first_fit)?;
            let series = instance.fit(values.as_slice(), weight.as_slice(), first_fit)?;
            output.add_column(name.to_string(), series)?;
        }
        Ok(output)
    }
}

impl<T, F> Feature<T> for PerColumn<F>
where
    T: TaFloat,
    F: ColumnFeature<T>,
{
    type Config = F::Config;

    fn fit(&mut self, data: &DataFrame<T>, first_fit: bool) -> Result<DataFrame<T>> {
        self.prepare(data, first_fit, F::NAME)?;

        let suffixes = <F::Output as ColumnOutput<T>>::SUFFIXES;
        let mut output = DataFrame::with_capacity(data.column_count() * suffixes.len());
        for (name, values) in data.iter() {
            let instance = self.instance(name, first_fit)?;
            let produced = instance.fit(values.as_slice(), first_fit)?.into_columns();
            for (suffix, series) in suffixes.iter().zip(produced) {
                output.add_column(output_name(name, *suffix), series)?;
            }
        }
        Ok(output)
    }

    fn output_columns(&self, input_columns: &[String]) -> Vec<String> {
        let suffixes = <F::Output as ColumnOutput<T>>::SUFFIXES;
        input_columns
            .iter()
            .flat_map(|name| suffixes.iter().map(move |suffix| output_name(name, *suffix)))
            .collect()
    }

    fn is_fitted(&self) -> bool {
        PerColumn::is_fitted(self)
    }

    fn reset(&mut self) {
        PerColumn::reset(self);
    }

    fn config(&self) -> &Self::Config {
        self.prototype.config()
    }

    fn name(&self) -> &'static str {
        F::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::WindowDescriptor;
    use crate::error::FeatureError;
    use crate::rolling::RollingFeature;
    use crate::series::Series;

    fn frame(columns: Vec<(&str, Vec<f64>)>) -> DataFrame<f64> {
        DataFrame::from_columns(
            columns
                .into_iter()
                .map(|(name, values)| (name.to_string(), Series::from_vec(values)))
                .collect(),
        )
        .unwrap()
    }

    fn rolling_mean() -> PerColumn<RollingFeature<f64>> {
        RollingFeature::<f64>::per_column(WindowDescriptor::new(2)).unwrap()
    }

    #[test]
    fn test_unknown_column_leaves_state_untouched() {
        let mut mean = rolling_mean();
        mean.fit(&frame(vec![("a", vec![1.0, 3.0])]), true).unwrap();

        let err = mean
            .fit(&frame(vec![("a", vec![5.0, 7.0]), ("z", vec![0.0, 0.0])]), false)
            .unwrap_err();
        assert!(matches!(err, FeatureError::State(StateError::UnknownColumn(ref c)) if c == "z"));

        let out = mean.fit(&frame(vec![("a", vec![5.0, 7.0])]), false).unwrap();
        assert_eq!(out.get_column("a").unwrap().as_slice(), &[4.0, 6.0]);
    }

    #[test]
    fn test_omitted_column_is_rejected() {
        let mut mean = rolling_mean();
        mean.fit(&frame(vec![("a", vec![1.0, 3.0]), ("b", vec![2.0, 4.0])]), true)
            .unwrap();

        let err = mean.fit(&frame(vec![("a", vec![5.0])]), false).unwrap_err();
        assert!(matches!(err, FeatureError::Data(DataError::MissingColumn(ref c)) if c == "b"));

        let out = mean
            .fit(&frame(vec![("b", vec![6.0, 8.0]), ("a", vec![5.0, 7.0])]), false)
            .unwrap();
        assert_eq!(out.column_names(), vec!["b", "a"]);
        assert_eq!(out.get_column("a").unwrap().as_slice(), &[4.0, 6.0]);
        assert_eq!(out.get_column("b").unwrap().as_slice(), &[5.0, 7.0]);
    }

    #[test]
    fn test_first_fit_replaces_columns() {
        let mut mean = rolling_mean();
        mean.fit(&frame(vec![("a", vec![1.0, 3.0])]), true).unwrap();
        mean.fit(&frame(vec![("b", vec![2.0, 4.0])]), true).unwrap();
        assert_eq!(mean.fitted_columns(), vec!["b"]);
        assert!(mean.fit(&frame(vec![("a", vec![5.0])]), false).unwrap_err().is_state());
    }
}
