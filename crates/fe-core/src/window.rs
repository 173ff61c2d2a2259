//! Bounded trailing buffer for carried window state.
//!
//! A rolling window of length `w` only ever needs the last `w - 1` raw values
//! of a column to resume on the next batch. [`TrailingBuffer`] keeps exactly
//! that many values in a circular store, so the carried state never grows with
//! the history length.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::num::TaFloat;

/// A fixed-capacity circular buffer holding the most recent values.
///
/// A capacity of zero is allowed and keeps nothing, which is the carried
/// state of a window of length one.
///
/// # Example
///
/// ```rust
/// use fe_core::TrailingBuffer;
///
/// let mut carried: TrailingBuffer<f64> = TrailingBuffer::new(2);
/// carried.extend(&[1.0, 2.0, 3.0]);
/// assert_eq!(carried.to_vec(), vec![2.0, 3.0]);
///
/// carried.push(4.0);
/// assert_eq!(carried.to_vec(), vec![3.0, 4.0]);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: TaFloat"))]
pub struct TrailingBuffer<T: TaFloat> {
    /// Internal storage.
    buffer: Vec<T>,
    /// Index of the next write position (also the oldest element when full).
    head: usize,
    /// Number of elements currently held.
    len: usize,
    /// Maximum number of elements retained.
    capacity: usize,
}

impl<T: TaFloat> TrailingBuffer<T> {
    /// Create an empty buffer retaining at most `capacity` values.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![T::NAN; capacity],
            head: 0,
            len: 0,
            capacity,
        }
    }

    /// Push a value, evicting the oldest when full.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        self.buffer[self.head] = value;
        self.head = (self.head + 1) % self.capacity;
        if self.len < self.capacity {
            self.len += 1;
        }
    }

    /// Push every value of `values` in order.
    pub fn extend(&mut self, values: &[T]) {
        let skip = values.len().saturating_sub(self.capacity);
        for &value in &values[skip..] {
            self.push(value);
        }
    }

    /// Returns the number of values held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity of the buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get a value by age (0 = oldest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let start = if self.len == self.capacity { self.head } else { 0 };
        Some(&self.buffer[(start + index) % self.capacity])
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    /// Copy the held values, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().copied().collect()
    }

    /// Drop every held value.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_fill() {
        let mut buffer: TrailingBuffer<f64> = TrailingBuffer::new(3);
        buffer.push(1.0);
        buffer.push(2.0);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_wraparound() {
        let mut buffer: TrailingBuffer<f64> = TrailingBuffer::new(3);
        buffer.extend(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(buffer.to_vec(), vec![3.0, 4.0, 5.0]);
        assert_eq!(buffer.get(0), Some(&3.0));
        assert_eq!(buffer.get(3), None);
    }

    #[test]
    fn test_zero_capacity() {
        let mut buffer: TrailingBuffer<f64> = TrailingBuffer::new(0);
        buffer.extend(&[1.0, 2.0]);
        assert!(buffer.is_empty());
        assert!(buffer.to_vec().is_empty());
    }

    #[test]
    fn test_keeps_nan() {
        let mut buffer: TrailingBuffer<f64> = TrailingBuffer::new(2);
        buffer.extend(&[1.0, f64::NAN]);
        let held = buffer.to_vec();
        assert_eq!(held[0], 1.0);
        assert!(held[1].is_nan());
    }

    #[test]
    fn test_clear() {
        let mut buffer: TrailingBuffer<f64> = TrailingBuffer::new(2);
        buffer.extend(&[1.0, 2.0]);
        buffer.clear();
        assert!(buffer.is_empty());
        buffer.push(9.0);
        assert_eq!(buffer.to_vec(), vec![9.0]);
    }
}
