//! Core trait definitions for resumable features.
//!
//! Features are computed per column by a [`ColumnFeature`] (or a
//! [`PairedColumnFeature`] for value/weight pairs). Table-level fitting, with
//! one independent state per column, is provided by
//! [`PerColumn`](crate::PerColumn), which implements [`Feature`].
//!
//! All fits follow the same lifecycle: the first call passes
//! `first_fit = true` and seeds the carried state; every later call passes
//! `first_fit = false`, resumes from that state and returns rows for the new
//! batch only.

use core::fmt::Debug;

use crate::columns::PerColumn;
use crate::dataframe::DataFrame;
use crate::error::{DataError, Result, StateError};
use crate::num::{MaybeSerde, TaFloat};
use crate::series::Series;

/// Marker trait for feature configuration types.
pub trait FeatureConfig: Clone + Default + Debug + MaybeSerde + Send + Sync {}

impl<T> FeatureConfig for T where T: Clone + Default + Debug + MaybeSerde + Send + Sync {}

/// Output of one column fit, expanded into named table columns.
pub trait ColumnOutput<T: TaFloat> {
    /// One entry per produced series: `None` keeps the source column name,
    /// `Some(suffix)` produces `{column}_{suffix}`.
    const SUFFIXES: &'static [Option<&'static str>];

    /// Split into series, in the order of [`Self::SUFFIXES`].
    fn into_columns(self) -> Vec<Series<T>>;
}

impl<T: TaFloat> ColumnOutput<T> for Series<T> {
    const SUFFIXES: &'static [Option<&'static str>] = &[None];

    fn into_columns(self) -> Vec<Series<T>> {
        vec![self]
    }
}

/// Upper and lower band around a centre line.
#[derive(Debug, Clone, PartialEq)]
pub struct Bands<T: TaFloat> {
    /// Centre plus the band width.
    pub positive: Series<T>,
    /// Centre minus the band width.
    pub negative: Series<T>,
}

impl<T: TaFloat> ColumnOutput<T> for Bands<T> {
    const SUFFIXES: &'static [Option<&'static str>] =
        &[Some("positive_band"), Some("negative_band")];

    fn into_columns(self) -> Vec<Series<T>> {
        vec![self.positive, self.negative]
    }
}

/// A resumable computation over a single column.
pub trait ColumnFeature<T: TaFloat>: Clone + Send + Sync {
    /// Configuration type.
    type Config: FeatureConfig;

    /// Per-call output.
    type Output: ColumnOutput<T>;

    /// Short snake_case name used in logs and plan labels.
    const NAME: &'static str;

    /// Validate `config` and build an unfitted instance.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid parameters.
    fn new(config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Fit one batch of a column.
    ///
    /// # Errors
    ///
    /// Returns a state error if `first_fit` is false before any first fit,
    /// and a data error for an empty batch.
    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Self::Output>;

    /// Returns `true` once a first fit has happened.
    fn is_fitted(&self) -> bool;

    /// Forget all carried state.
    fn reset(&mut self);

    /// Get a reference to the configuration.
    fn config(&self) -> &Self::Config;

    /// Build a table-level feature keeping one instance per column.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid parameters.
    fn per_column(config: Self::Config) -> Result<PerColumn<Self>>
    where
        Self: Sized,
    {
        Ok(PerColumn::from_feature(Self::new(config)?))
    }
}

/// A resumable computation over a value column and a weight column.
pub trait PairedColumnFeature<T: TaFloat>: Clone + Send + Sync {
    /// Configuration type.
    type Config: FeatureConfig;

    /// Short snake_case name used in logs.
    const NAME: &'static str;

    /// Validate `config` and build an unfitted instance.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid parameters.
    fn new(config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Fit one batch of aligned values and weights.
    ///
    /// # Errors
    ///
    /// Returns a data error if the slices differ in length or are empty, and
    /// a state error when continuing before a first fit.
    fn fit(&mut self, values: &[T], weights: &[T], first_fit: bool) -> Result<Series<T>>;

    /// Returns `true` once a first fit has happened.
    fn is_fitted(&self) -> bool;

    /// Forget all carried state.
    fn reset(&mut self);

    /// Get a reference to the configuration.
    fn config(&self) -> &Self::Config;

    /// Build a table-level feature keeping one instance per column pair.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid parameters.
    fn per_column(config: Self::Config) -> Result<PerColumn<Self>>
    where
        Self: Sized,
    {
        Ok(PerColumn::from_feature(Self::new(config)?))
    }
}

/// A resumable table-to-table feature.
pub trait Feature<T: TaFloat>: Send + Sync {
    /// Configuration type.
    type Config: FeatureConfig;

    /// Fit one batch of rows.
    ///
    /// # Errors
    ///
    /// Returns a state error on a continuation before the first fit or for a
    /// column that was absent at first fit.
    fn fit(&mut self, data: &DataFrame<T>, first_fit: bool) -> Result<DataFrame<T>>;

    /// Names of the columns [`fit`](Self::fit) produces for `input_columns`.
    fn output_columns(&self, input_columns: &[String]) -> Vec<String>;

    /// Returns `true` once a first fit has happened.
    fn is_fitted(&self) -> bool;

    /// Forget all carried state.
    fn reset(&mut self);

    /// Get a reference to the configuration.
    fn config(&self) -> &Self::Config;

    /// Short snake_case name.
    fn name(&self) -> &'static str;
}

/// Check a batch against the fit lifecycle before any state is touched.
///
/// # Errors
///
/// Returns [`DataError::EmptyInput`] for an empty batch and
/// [`StateError::NotFitted`] for a continuation of an unfitted feature.
pub fn check_batch(len: usize, first_fit: bool, fitted: bool) -> Result<()> {
    if len == 0 {
        return Err(DataError::EmptyInput.into());
    }
    if !first_fit && !fitted {
        return Err(StateError::NotFitted.into());
    }
    Ok(())
}

/// [`check_batch`] for aligned value and weight slices.
///
/// # Errors
///
/// Additionally returns [`DataError::LengthMismatch`] if the slices differ in
/// length.
pub fn check_paired_batch(
    values: usize,
    weights: usize,
    first_fit: bool,
    fitted: bool,
) -> Result<()> {
    if values != weights {
        return Err(DataError::LengthMismatch {
            expected: values,
            actual: weights,
        }
        .into());
    }
    check_batch(values, first_fit, fitted)
}

/// Output column name for `column` and an optional suffix.
#[must_use]
pub fn output_name(column: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{column}_{suffix}"),
        None => column.to_string(),
    }
}
