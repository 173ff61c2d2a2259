//! Numeric type abstractions for feature computations.
//!
//! This module defines the [`TaFloat`] trait which abstracts over `f32` and `f64`
//! so that every engine and feature can be instantiated for either width.

use core::cmp::Ordering;
use num_traits::{Float, FromPrimitive, ToPrimitive};

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Serialize};

/// Serialization bound that collapses to nothing without the `serde` feature.
#[cfg(feature = "serde")]
pub trait MaybeSerde: Serialize + DeserializeOwned {}
#[cfg(feature = "serde")]
impl<T: Serialize + DeserializeOwned> MaybeSerde for T {}

/// Serialization bound that collapses to nothing without the `serde` feature.
#[cfg(not(feature = "serde"))]
pub trait MaybeSerde {}
#[cfg(not(feature = "serde"))]
impl<T> MaybeSerde for T {}

/// Floating-point types a feature can be computed in.
///
/// Missing observations are represented by NaN throughout the workspace, so
/// the helpers here treat NaN as "absent" rather than as a numeric value.
///
/// # Example
///
/// ```rust
/// use fe_core::TaFloat;
///
/// fn ratio<T: TaFloat>(num: T, den: T) -> T {
///     num.div_or(den, T::ZERO)
/// }
///
/// assert_eq!(ratio(1.0f64, 0.0), 0.0);
/// assert_eq!(ratio(1.0f64, 4.0), 0.25);
/// ```
pub trait TaFloat:
    Float + FromPrimitive + ToPrimitive + Copy + Send + Sync + Default + MaybeSerde + 'static
{
    /// Machine epsilon for this type.
    const EPSILON: Self;
    /// Not-a-number value, the missing-observation sentinel.
    const NAN: Self;
    /// Zero value.
    const ZERO: Self;
    /// One half.
    const HALF: Self;
    /// One value.
    const ONE: Self;
    /// Two value.
    const TWO: Self;
    /// Three value.
    const THREE: Self;
    /// Fifty value, the neutral RSI level.
    const FIFTY: Self;
    /// Hundred value.
    const HUNDRED: Self;

    /// Convert from `f64`.
    #[must_use]
    fn from_f64_lossy(value: f64) -> Self;

    /// Convert to `f64`.
    #[must_use]
    fn to_f64_lossy(self) -> f64;

    /// Convert from `usize`.
    #[must_use]
    fn from_usize(value: usize) -> Self;

    /// Total comparison that orders NaN after every other value.
    #[must_use]
    fn total_cmp_fn(&self, other: &Self) -> Ordering;

    /// Check if the value is valid (not NaN and not infinite).
    #[must_use]
    fn is_valid(self) -> bool {
        !self.is_nan() && !self.is_infinite()
    }

    /// Replace a missing value with zero.
    #[must_use]
    fn or_zero(self) -> Self {
        if self.is_nan() {
            Self::ZERO
        } else {
            self
        }
    }

    /// Divide, returning `fallback` when the denominator is zero.
    ///
    /// NaN operands still produce NaN.
    #[must_use]
    fn div_or(self, den: Self, fallback: Self) -> Self {
        if den == Self::ZERO && !self.is_nan() {
            fallback
        } else {
            self / den
        }
    }

    /// Clamp value to the range [min, max]. NaN passes through.
    #[must_use]
    fn clamp_value(self, min: Self, max: Self) -> Self {
        if self.is_nan() {
            return self;
        }
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }
}

impl TaFloat for f32 {
    const EPSILON: Self = f32::EPSILON;
    const NAN: Self = f32::NAN;
    const ZERO: Self = 0.0;
    const HALF: Self = 0.5;
    const ONE: Self = 1.0;
    const TWO: Self = 2.0;
    const THREE: Self = 3.0;
    const FIFTY: Self = 50.0;
    const HUNDRED: Self = 100.0;

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn from_usize(value: usize) -> Self {
        value as f32
    }

    #[inline]
    fn total_cmp_fn(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl TaFloat for f64 {
    const EPSILON: Self = f64::EPSILON;
    const NAN: Self = f64::NAN;
    const ZERO: Self = 0.0;
    const HALF: Self = 0.5;
    const ONE: Self = 1.0;
    const TWO: Self = 2.0;
    const THREE: Self = 3.0;
    const FIFTY: Self = 50.0;
    const HUNDRED: Self = 100.0;

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self
    }

    #[inline]
    fn from_usize(value: usize) -> Self {
        value as f64
    }

    #[inline]
    fn total_cmp_fn(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!(<f64 as TaFloat>::NAN.is_nan());
        assert_eq!(<f64 as TaFloat>::HALF, 0.5);
        assert_eq!(<f32 as TaFloat>::THREE, 3.0f32);
        assert_eq!(<f64 as TaFloat>::HUNDRED, 100.0);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(f32::from_f64_lossy(42.5), 42.5f32);
        assert_eq!(42.5f32.to_f64_lossy(), 42.5);
        assert_eq!(<f64 as TaFloat>::from_usize(7), 7.0);
    }

    #[test]
    fn test_or_zero() {
        assert_eq!(f64::NAN.or_zero(), 0.0);
        assert_eq!(3.5f64.or_zero(), 3.5);
    }

    #[test]
    fn test_div_or() {
        assert_eq!(0.0f64.div_or(0.0, 0.0), 0.0);
        assert_eq!(3.0f64.div_or(0.0, -1.0), -1.0);
        assert_eq!(3.0f64.div_or(2.0, 0.0), 1.5);
        assert!(f64::NAN.div_or(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_total_cmp_nan_ordering() {
        let mut values = vec![1.0f64, f64::NAN, 2.0, 0.5];
        values.sort_by(|a, b| a.total_cmp_fn(b));
        assert_eq!(values[0], 0.5);
        assert_eq!(values[2], 2.0);
        assert!(values[3].is_nan());
    }

    #[test]
    fn test_clamp_value() {
        assert_eq!(5.0f64.clamp_value(0.0, 1.0), 1.0);
        assert_eq!((-5.0f64).clamp_value(0.0, 1.0), 0.0);
        assert!(f64::NAN.clamp_value(0.0, 1.0).is_nan());
    }
}
