//! Ordered column of observations.
//!
//! A [`Series`] is one column of a [`DataFrame`](crate::DataFrame): values in
//! ascending time order with NaN marking a missing observation.

use core::ops::{Index, Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::num::TaFloat;

/// A contiguous column of floating-point observations.
///
/// # Example
///
/// ```rust
/// use fe_core::Series;
///
/// let mut series: Series<f64> = Series::new();
/// series.push(1.0);
/// series.push(f64::NAN);
/// series.push(3.0);
///
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.count_valid(), 2);
/// assert_eq!(series.last(), Some(&3.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: TaFloat"))]
pub struct Series<T: TaFloat> {
    data: Vec<T>,
}

impl<T: TaFloat> Default for Series<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TaFloat> Series<T> {
    /// Create a new empty series.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a new series with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a series from an existing vector.
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Create a series of `len` missing values.
    #[must_use]
    pub fn nan(len: usize) -> Self {
        Self {
            data: vec![T::NAN; len],
        }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the series has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append a value.
    pub fn push(&mut self, value: T) {
        self.data.push(value);
    }

    /// Append every value of `values`.
    pub fn extend_from_slice(&mut self, values: &[T]) {
        self.data.extend_from_slice(values);
    }

    /// Get the value at the given row.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Get the last value, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.data.last()
    }

    /// Get the last `n` values. Returns everything if `n > len()`.
    #[must_use]
    pub fn tail(&self, n: usize) -> &[T] {
        let start = self.len().saturating_sub(n);
        &self.data[start..]
    }

    /// Copy the rows in `range`, clamped to the series bounds.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Self::from_vec(self.data[start..end].to_vec())
    }

    /// Number of non-missing values.
    #[must_use]
    pub fn count_valid(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// Returns an iterator over the values.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Returns the values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consumes the series and returns the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` to every value.
    #[must_use]
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        self.data.iter().map(|&v| f(v)).collect()
    }
}

impl<T: TaFloat> Index<usize> for Series<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T: TaFloat> FromIterator<T> for Series<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T: TaFloat> From<Vec<T>> for Series<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: TaFloat> From<&[T]> for Series<T> {
    fn from(data: &[T]) -> Self {
        Self::from_vec(data.to_vec())
    }
}

impl<T: TaFloat> IntoIterator for Series<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T: TaFloat> IntoIterator for &'a Series<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_tail() {
        let mut s: Series<f64> = Series::with_capacity(4);
        s.extend_from_slice(&[1.0, 2.0, 3.0]);
        s.push(4.0);
        assert_eq!(s.tail(2), &[3.0, 4.0]);
        assert_eq!(s.tail(10).len(), 4);
        assert_eq!(s[0], 1.0);
    }

    #[test]
    fn test_slice_clamps() {
        let s: Series<f64> = Series::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(s.slice(1..10).as_slice(), &[2.0, 3.0]);
        assert!(s.slice(5..8).is_empty());
    }

    #[test]
    fn test_count_valid() {
        let s: Series<f64> = Series::from_vec(vec![f64::NAN, 2.0, f64::NAN]);
        assert_eq!(s.count_valid(), 1);
        assert_eq!(Series::<f64>::nan(3).count_valid(), 0);
    }

    #[test]
    fn test_map_and_collect() {
        let s: Series<f64> = (1..=3).map(f64::from).collect();
        assert_eq!(s.map(|v| v * 2.0).into_vec(), vec![2.0, 4.0, 6.0]);
    }
}
