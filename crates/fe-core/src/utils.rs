//! Window helpers for custom reducers.
//!
//! Every helper skips missing values, so a window with gaps is summarised by
//! its observed values only.

use crate::num::TaFloat;

/// Smallest and largest observed value, or `None` if nothing was observed.
///
/// # Example
///
/// ```rust
/// use fe_core::utils::bounds;
///
/// assert_eq!(bounds(&[3.0, f64::NAN, 1.0]), Some((1.0, 3.0)));
/// assert_eq!(bounds::<f64>(&[f64::NAN]), None);
/// ```
#[must_use]
pub fn bounds<T: TaFloat>(values: &[T]) -> Option<(T, T)> {
    values
        .iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            Some((lo, hi)) => Some((if v < lo { v } else { lo }, if v > hi { v } else { hi })),
            None => Some((v, v)),
        })
}

/// Spread between the largest and smallest observed value, NaN if empty.
#[must_use]
pub fn range<T: TaFloat>(values: &[T]) -> T {
    bounds(values).map_or(T::NAN, |(lo, hi)| hi - lo)
}

/// Position of the first largest observed value.
#[must_use]
pub fn arg_max<T: TaFloat>(values: &[T]) -> Option<usize> {
    arg_best(values, |candidate, best| candidate > best)
}

/// Position of the first smallest observed value.
#[must_use]
pub fn arg_min<T: TaFloat>(values: &[T]) -> Option<usize> {
    arg_best(values, |candidate, best| candidate < best)
}

fn arg_best<T: TaFloat>(values: &[T], better: impl Fn(T, T) -> bool) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if !better(v, current) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Sum of the observed values; zero for an empty window.
#[must_use]
pub fn nan_sum<T: TaFloat>(values: &[T]) -> T {
    values.iter().fold(T::ZERO, |acc, &v| acc + v.or_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_range() {
        assert_relative_eq!(range(&[3.0, f64::NAN, 1.0, 2.0]), 2.0);
        assert!(range::<f64>(&[]).is_nan());
    }

    #[test]
    fn test_arg_extremes_take_first_occurrence() {
        let values = [2.0, 5.0, f64::NAN, 5.0, 1.0, 1.0];
        assert_eq!(arg_max(&values), Some(1));
        assert_eq!(arg_min(&values), Some(4));
        assert_eq!(arg_max::<f64>(&[f64::NAN, f64::NAN]), None);
    }

    #[test]
    fn test_nan_sum() {
        assert_relative_eq!(nan_sum(&[1.0, f64::NAN, 2.5]), 3.5);
        assert_relative_eq!(nan_sum::<f64>(&[]), 0.0);
    }
}
