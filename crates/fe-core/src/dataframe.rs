//! Multi-column tables with deterministic column order.
//!
//! [`DataFrame`] is the table every feature consumes and produces. Rows are
//! ordered by position (ascending time); the frame never reorders them.
//! Besides column access it offers the two operations chunked fitting relies
//! on: slicing rows by position and concatenating tables vertically.

use core::ops::Range;

use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};
use crate::num::TaFloat;
use crate::series::Series;

/// A column-oriented table keyed by column name.
///
/// `IndexMap` keeps columns in insertion order so that output tables, plan
/// results and test comparisons are reproducible.
///
/// # Example
///
/// ```rust
/// use fe_core::{DataFrame, Series};
///
/// let df: DataFrame<f64> = DataFrame::from_columns(vec![
///     ("close".to_string(), Series::from_vec(vec![1.0, 2.0, 3.0, 4.0])),
///     ("volume".to_string(), Series::from_vec(vec![10.0, 11.0, 12.0, 13.0])),
/// ])
/// .unwrap();
///
/// let head = df.slice_rows(0..2);
/// let tail = df.slice_rows(2..4);
/// assert_eq!(head.concat_rows(&tail).unwrap(), df);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: TaFloat"))]
pub struct DataFrame<T: TaFloat> {
    columns: IndexMap<String, Series<T>>,
}

impl<T: TaFloat> Default for DataFrame<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TaFloat> DataFrame<T> {
    /// Create a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: IndexMap::new(),
        }
    }

    /// Create a table with room for `capacity` columns.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: IndexMap::with_capacity(capacity),
        }
    }

    /// Create a table from (name, series) pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if column lengths differ or a name repeats.
    pub fn from_columns(columns: Vec<(String, Series<T>)>) -> Result<Self> {
        let mut frame = Self::with_capacity(columns.len());
        for (name, series) in columns {
            frame.add_column(name, series)?;
        }
        Ok(frame)
    }

    /// Create a single-column table.
    #[must_use]
    pub fn from_series(name: impl Into<String>, series: Series<T>) -> Self {
        let mut columns = IndexMap::with_capacity(1);
        columns.insert(name.into(), series);
        Self { columns }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.values().next().map_or(0, Series::len)
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column names in insertion order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Get a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Series<T>> {
        self.columns.get(name)
    }

    /// Append a new column.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the length does not match.
    pub fn add_column(&mut self, name: String, series: Series<T>) -> Result<()> {
        if self.columns.contains_key(&name) {
            return Err(DataError::DuplicateColumn(name).into());
        }
        self.check_length(series.len())?;
        self.columns.insert(name, series);
        Ok(())
    }

    /// Add or replace a column.
    ///
    /// # Errors
    ///
    /// Returns an error if the length does not match the other columns.
    pub fn set_column(&mut self, name: String, series: Series<T>) -> Result<()> {
        let replaces_only_column = self.columns.len() == 1 && self.columns.contains_key(&name);
        if !replaces_only_column {
            self.check_length(series.len())?;
        }
        self.columns.insert(name, series);
        Ok(())
    }

    /// Rename a column in place, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns an error if `old_name` is missing or `new_name` is taken.
    pub fn rename_column(&mut self, old_name: &str, new_name: String) -> Result<()> {
        if !self.columns.contains_key(old_name) {
            return Err(DataError::MissingColumn(old_name.to_string()).into());
        }
        if old_name == new_name {
            return Ok(());
        }
        if self.columns.contains_key(&new_name) {
            return Err(DataError::DuplicateColumn(new_name).into());
        }
        self.columns = self
            .columns
            .drain(..)
            .map(|(name, series)| {
                if name == old_name {
                    (new_name.clone(), series)
                } else {
                    (name, series)
                }
            })
            .collect();
        Ok(())
    }

    /// Create a table holding only `columns`, in the order given.
    ///
    /// # Errors
    ///
    /// Returns an error if any column doesn't exist.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Result<Self> {
        let mut result = Self::with_capacity(columns.len());
        for name in columns {
            let name = name.as_ref();
            let series = self
                .columns
                .get(name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
            result.columns.insert(name.to_string(), series.clone());
        }
        Ok(result)
    }

    /// Copy the rows in `range` of every column, clamped to the table bounds.
    #[must_use]
    pub fn slice_rows(&self, range: Range<usize>) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|(name, series)| (name.clone(), series.slice(range.clone())))
                .collect(),
        }
    }

    /// Stack `other` below `self`.
    ///
    /// An empty-column table acts as the identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the column names differ.
    pub fn concat_rows(&self, other: &Self) -> Result<Self> {
        if self.columns.is_empty() {
            return Ok(other.clone());
        }
        if other.columns.is_empty() {
            return Ok(self.clone());
        }
        if self.columns.len() != other.columns.len() {
            return Err(DataError::ShapeMismatch {
                expected: self.columns.len(),
                actual: other.columns.len(),
            }
            .into());
        }

        let mut result = self.clone();
        for (name, series) in &mut result.columns {
            let lower = other
                .columns
                .get(name)
                .ok_or_else(|| DataError::MissingColumn(name.clone()))?;
            series.extend_from_slice(lower.as_slice());
        }
        Ok(result)
    }

    /// Place the columns of `other` to the right of `self`.
    ///
    /// # Errors
    ///
    /// Returns an error on differing row counts or duplicate names.
    pub fn concat_columns(&self, other: &Self) -> Result<Self> {
        let mut result = self.clone();
        for (name, series) in &other.columns {
            result.add_column(name.clone(), series.clone())?;
        }
        Ok(result)
    }

    /// Returns an iterator over (column_name, series) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series<T>)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn check_length(&self, len: usize) -> Result<()> {
        if !self.columns.is_empty() && len != self.len() {
            return Err(DataError::LengthMismatch {
                expected: self.len(),
                actual: len,
            }
            .into());
        }
        Ok(())
    }
}

impl<T: TaFloat> PartialEq for DataFrame<T> {
    fn eq(&self, other: &Self) -> bool {
        self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(other.columns.iter())
                .all(|((k1, v1), (k2, v2))| k1 == k2 && v1 == v2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeatureError;

    fn frame() -> DataFrame<f64> {
        DataFrame::from_columns(vec![
            ("a".to_string(), Series::from_vec(vec![1.0, 2.0, 3.0])),
            ("b".to_string(), Series::from_vec(vec![4.0, 5.0, 6.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_dataframe() {
        let df: DataFrame<f64> = DataFrame::new();
        assert!(df.is_empty());
        assert_eq!(df.column_count(), 0);
    }

    #[test]
    fn test_add_column_length_mismatch() {
        let mut df = frame();
        let err = df
            .add_column("c".to_string(), Series::from_vec(vec![1.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            FeatureError::Data(DataError::LengthMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_add_duplicate_column() {
        let mut df = frame();
        let err = df
            .add_column("a".to_string(), Series::from_vec(vec![0.0; 3]))
            .unwrap_err();
        assert!(err.is_data());
    }

    #[test]
    fn test_column_names_order() {
        let df = DataFrame::from_columns(vec![
            ("c".to_string(), Series::from_vec(vec![1.0f64])),
            ("a".to_string(), Series::from_vec(vec![2.0])),
            ("b".to_string(), Series::from_vec(vec![3.0])),
        ])
        .unwrap();
        assert_eq!(df.column_names(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_rename_keeps_position() {
        let mut df = frame();
        df.rename_column("a", "z".to_string()).unwrap();
        assert_eq!(df.column_names(), vec!["z", "b"]);
        assert!(df.rename_column("missing", "y".to_string()).is_err());
        assert!(df.rename_column("z", "b".to_string()).is_err());
    }

    #[test]
    fn test_select() {
        let df = frame();
        let selected = df.select(&["b"]).unwrap();
        assert_eq!(selected.column_names(), vec!["b"]);
        assert!(df.select(&["nope"]).is_err());
    }

    #[test]
    fn test_slice_and_concat_rows() {
        let df = frame();
        let head = df.slice_rows(0..1);
        let tail = df.slice_rows(1..3);
        assert_eq!(head.len(), 1);
        assert_eq!(tail.get_column("b").unwrap().as_slice(), &[5.0, 6.0]);
        assert_eq!(head.concat_rows(&tail).unwrap(), df);
        assert_eq!(DataFrame::new().concat_rows(&df).unwrap(), df);
    }

    #[test]
    fn test_concat_rows_shape_mismatch() {
        let df = frame();
        let single = df.select(&["a"]).unwrap();
        assert!(df.concat_rows(&single).is_err());
    }

    #[test]
    fn test_concat_columns() {
        let df = frame();
        let other = DataFrame::from_series("c", Series::from_vec(vec![7.0, 8.0, 9.0]));
        let joined = df.concat_columns(&other).unwrap();
        assert_eq!(joined.column_names(), vec!["a", "b", "c"]);
        assert!(joined.concat_columns(&other).is_err());
    }
}
