//! Window reducers.
//!
//! A reducer collapses one weighted window into a single value. The built-in
//! [`ReducerKind`]s skip missing values, so a window holding NaNs reduces over
//! the observations it does have; the engine's `min_periods` check decides
//! whether there are enough of them. [`Reducer::Custom`] closures receive the
//! weighted window as-is, NaNs included.

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::num::TaFloat;

/// Closed set of NaN-skipping reductions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum ReducerKind {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Sum.
    Sum,
    /// Median.
    Median,
    /// Minimum.
    Min,
    /// Maximum.
    Max,
    /// Variance with `ddof` delta degrees of freedom.
    Var {
        /// Delta degrees of freedom.
        ddof: usize,
    },
    /// Standard deviation with `ddof` delta degrees of freedom.
    Std {
        /// Delta degrees of freedom.
        ddof: usize,
    },
    /// Linearly interpolated quantile, `q` in `[0, 1]`.
    Quantile {
        /// Quantile level.
        q: f64,
    },
}

impl ReducerKind {
    /// Check reducer arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a quantile level lies outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if let Self::Quantile { q } = *self {
            if !(0.0..=1.0).contains(&q) {
                return Err(ConfigError::InvalidParameter {
                    name: "q",
                    value: q.to_string(),
                    expected: "value in [0, 1]",
                }
                .into());
            }
        }
        Ok(())
    }

    /// Reduce `values`, ignoring NaNs.
    ///
    /// With no valid values, `Sum` gives zero and everything else NaN.
    #[must_use]
    pub fn reduce<T: TaFloat>(&self, values: &[T]) -> T {
        let valid = values.iter().copied().filter(|v| !v.is_nan());
        match *self {
            Self::Sum => valid.fold(T::ZERO, |acc, v| acc + v),
            Self::Mean => {
                let (sum, count) = valid.fold((T::ZERO, 0usize), |(s, n), v| (s + v, n + 1));
                if count == 0 {
                    T::NAN
                } else {
                    sum / <T as TaFloat>::from_usize(count)
                }
            }
            Self::Min => valid.fold(T::NAN, T::min),
            Self::Max => valid.fold(T::NAN, T::max),
            Self::Var { ddof } => variance(values, ddof),
            Self::Std { ddof } => variance(values, ddof).sqrt(),
            Self::Median => quantile(values, 0.5),
            Self::Quantile { q } => quantile(values, q),
        }
    }
}

impl fmt::Display for ReducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean => f.write_str("mean"),
            Self::Sum => f.write_str("sum"),
            Self::Median => f.write_str("median"),
            Self::Min => f.write_str("min"),
            Self::Max => f.write_str("max"),
            Self::Var { ddof } => write!(f, "var(ddof={ddof})"),
            Self::Std { ddof } => write!(f, "std(ddof={ddof})"),
            Self::Quantile { q } => write!(f, "quantile({q})"),
        }
    }
}

impl FromStr for ReducerKind {
    type Err = ConfigError;

    /// Parse a reducer name. `var` and `std` use the sample estimator.
    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Ok(match s {
            "mean" => Self::Mean,
            "sum" => Self::Sum,
            "median" => Self::Median,
            "min" => Self::Min,
            "max" => Self::Max,
            "var" => Self::Var { ddof: 1 },
            "std" => Self::Std { ddof: 1 },
            other => return Err(ConfigError::UnsupportedOperation(other.to_string())),
        })
    }
}

fn variance<T: TaFloat>(values: &[T], ddof: usize) -> T {
    let valid: Vec<T> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.len() <= ddof {
        return T::NAN;
    }
    let n = <T as TaFloat>::from_usize(valid.len());
    let mean = valid.iter().fold(T::ZERO, |acc, &v| acc + v) / n;
    let sum_sq = valid.iter().fold(T::ZERO, |acc, &v| {
        let d = v - mean;
        acc + d * d
    });
    sum_sq / <T as TaFloat>::from_usize(valid.len() - ddof)
}

fn quantile<T: TaFloat>(values: &[T], q: f64) -> T {
    let mut valid: Vec<T> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.is_empty() {
        return T::NAN;
    }
    valid.sort_by(T::total_cmp_fn);
    let pos = q * (valid.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = T::from_f64_lossy(pos - lower as f64);
    valid[lower] + (valid[upper] - valid[lower]) * frac
}

/// Function applied to each weighted window.
pub type ReduceFn<T> = dyn Fn(&[T]) -> T + Send + Sync;

/// A window reducer: a built-in kind or a user closure.
///
/// Closures capture any extra arguments they need.
///
/// # Example
///
/// ```rust
/// use fe_core::{Reducer, ReducerKind};
///
/// let range: Reducer<f64> = Reducer::custom(|w: &[f64]| {
///     let max = w.iter().copied().fold(f64::NAN, f64::max);
///     let min = w.iter().copied().fold(f64::NAN, f64::min);
///     max - min
/// });
/// assert_eq!(range.reduce(&[3.0, 1.0, 2.0]), 2.0);
///
/// let mean: Reducer<f64> = ReducerKind::Mean.into();
/// assert_eq!(mean.reduce(&[1.0, f64::NAN, 3.0]), 2.0);
/// ```
#[derive(Clone)]
pub enum Reducer<T> {
    /// Built-in NaN-skipping reduction.
    Builtin(ReducerKind),
    /// Arbitrary closure over the weighted window.
    Custom(Arc<ReduceFn<T>>),
}

impl<T: TaFloat> Reducer<T> {
    /// Wrap a closure.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[T]) -> T + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Reduce one weighted window.
    #[must_use]
    pub fn reduce(&self, values: &[T]) -> T {
        match self {
            Self::Builtin(kind) => kind.reduce(values),
            Self::Custom(f) => f(values),
        }
    }

    /// Check reducer arguments.
    ///
    /// # Errors
    ///
    /// See [`ReducerKind::validate`].
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Builtin(kind) => kind.validate(),
            Self::Custom(_) => Ok(()),
        }
    }
}

impl<T> From<ReducerKind> for Reducer<T> {
    fn from(kind: ReducerKind) -> Self {
        Self::Builtin(kind)
    }
}

impl<T> Default for Reducer<T> {
    fn default() -> Self {
        Self::Builtin(ReducerKind::Mean)
    }
}

impl<T> fmt::Debug for Reducer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(kind) => f.debug_tuple("Builtin").field(kind).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NAN: f64 = f64::NAN;

    #[test]
    fn test_mean_skips_nan() {
        assert_eq!(ReducerKind::Mean.reduce(&[1.0, NAN, 3.0]), 2.0);
        assert!(ReducerKind::Mean.reduce::<f64>(&[NAN, NAN]).is_nan());
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        assert_eq!(ReducerKind::Sum.reduce::<f64>(&[NAN]), 0.0);
        assert_eq!(ReducerKind::Sum.reduce(&[1.0, 2.5]), 3.5);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(ReducerKind::Min.reduce(&[NAN, 3.0, -1.0]), -1.0);
        assert_eq!(ReducerKind::Max.reduce(&[NAN, 3.0, -1.0]), 3.0);
        assert!(ReducerKind::Max.reduce::<f64>(&[NAN]).is_nan());
    }

    #[test]
    fn test_variance_ddof() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(ReducerKind::Var { ddof: 0 }.reduce(&data), 4.0);
        assert_relative_eq!(ReducerKind::Std { ddof: 0 }.reduce(&data), 2.0);
        assert_relative_eq!(ReducerKind::Var { ddof: 1 }.reduce(&data), 32.0 / 7.0);
        assert!(ReducerKind::Var { ddof: 1 }.reduce(&[1.0f64]).is_nan());
    }

    #[test]
    fn test_median_and_quantile() {
        assert_eq!(ReducerKind::Median.reduce(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(ReducerKind::Median.reduce(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_relative_eq!(ReducerKind::Quantile { q: 0.25 }.reduce(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.0);
        assert!(ReducerKind::Quantile { q: 1.5 }.validate().is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!("std".parse::<ReducerKind>().unwrap(), ReducerKind::Std { ddof: 1 });
        assert!("mode".parse::<ReducerKind>().is_err());
    }

    #[test]
    fn test_custom_sees_nan() {
        let count_nan: Reducer<f64> =
            Reducer::custom(|w: &[f64]| w.iter().filter(|v| v.is_nan()).count() as f64);
        assert_eq!(count_nan.reduce(&[NAN, 1.0, NAN]), 2.0);
        assert_eq!(format!("{count_nan:?}"), "Custom(..)");
    }
}
