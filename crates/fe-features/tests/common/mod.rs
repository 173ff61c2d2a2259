//! Common test utilities for fe-features.
//!
//! Synthetic data generators, NaN-aware comparisons and a driver that fits a
//! feature batch by batch.

#![allow(dead_code)]

use std::ops::Range;

use fe_core::prelude::*;

// ============================================================================
// Comparisons
// ============================================================================

/// Tiered float comparison that treats two NaNs as equal.
///
/// Values near zero are compared absolutely, everything else relatively.
pub fn assert_float_eq(actual: f64, expected: f64, epsilon: f64, context: &str) {
    if expected.is_nan() {
        assert!(actual.is_nan(), "{}: Expected NaN but got {}", context, actual);
        return;
    }
    if actual.is_nan() {
        panic!("{}: Got NaN but expected {}", context, expected);
    }

    if expected.abs() < 1e-10 {
        let diff = (actual - expected).abs();
        assert!(
            diff < epsilon,
            "{}: Expected {} but got {} (diff: {})",
            context,
            expected,
            actual,
            diff
        );
        return;
    }

    let rel_diff = ((actual - expected) / expected).abs();
    assert!(
        rel_diff < epsilon,
        "{}: Expected {} but got {} (rel diff: {:.2e})",
        context,
        expected,
        actual,
        rel_diff
    );
}

/// Assert two series are equal with tolerance.
pub fn assert_series_eq(actual: &[f64], expected: &[f64], epsilon: f64, name: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{}: Length mismatch: {} vs {}",
        name,
        actual.len(),
        expected.len()
    );
    for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_float_eq(a, e, epsilon, &format!("{}[{}]", name, i));
    }
}

/// Assert two tables have the same columns, in order, with equal values.
pub fn assert_frames_eq(actual: &DataFrame<f64>, expected: &DataFrame<f64>, epsilon: f64) {
    assert_eq!(actual.column_names(), expected.column_names());
    for (name, series) in expected.iter() {
        let produced = actual
            .get_column(name)
            .unwrap_or_else(|| panic!("missing column {}", name));
        assert_series_eq(produced.as_slice(), series.as_slice(), epsilon, name);
    }
}

// ============================================================================
// Chunked Fitting
// ============================================================================

/// Normalise split points into sorted, distinct interior row indices.
pub fn split_points(len: usize, cuts: &[usize]) -> Vec<usize> {
    let mut points: Vec<usize> = cuts.iter().copied().filter(|&c| c > 0 && c < len).collect();
    points.sort_unstable();
    points.dedup();
    points
}

/// Fit `len` rows batch by batch, cutting at `cuts`, and stack the outputs.
///
/// `fit` receives the row range of each batch and the `first_fit` flag.
pub fn fit_in_chunks<F>(len: usize, cuts: &[usize], mut fit: F) -> DataFrame<f64>
where
    F: FnMut(Range<usize>, bool) -> fe_core::Result<DataFrame<f64>>,
{
    let mut bounds = vec![0];
    bounds.extend(split_points(len, cuts));
    bounds.push(len);

    let mut output = DataFrame::new();
    for (i, pair) in bounds.windows(2).enumerate() {
        let batch = fit(pair[0]..pair[1], i == 0).expect("batch fit failed");
        assert_eq!(batch.len(), pair[1] - pair[0], "batch row count");
        output = output.concat_rows(&batch).expect("batches share columns");
    }
    output
}

// ============================================================================
// Synthetic Data Generators
// ============================================================================

/// Generate linear series.
pub fn generate_linear(start: f64, step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

/// Generate sine wave series.
pub fn generate_sine(center: f64, amplitude: f64, period: usize, len: usize) -> Vec<f64> {
    use std::f64::consts::PI;
    (0..len)
        .map(|i| center + amplitude * (2.0 * PI * i as f64 / period as f64).sin())
        .collect()
}

/// Generate random walk series with a deterministic seed.
pub fn generate_random_walk(start: f64, volatility: f64, len: usize, seed: u64) -> Vec<f64> {
    let mut rng_state = seed;
    let mut lcg_next = move || -> f64 {
        rng_state = rng_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        (rng_state as f64 / u64::MAX as f64) * 2.0 - 1.0
    };

    let mut values = Vec::with_capacity(len);
    let mut last = start;
    for i in 0..len {
        if i > 0 {
            last = (last + lcg_next() * volatility).max(0.01);
        }
        values.push(last);
    }
    values
}

/// Generate a positive weight series, such as traded volume.
pub fn generate_weights(len: usize, seed: u64) -> Vec<f64> {
    generate_random_walk(1000.0, 150.0, len, seed)
}

/// Replace every `every`-th value, starting at `offset`, with NaN.
pub fn inject_nan(values: &[f64], every: usize, offset: usize) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| if i >= offset && (i - offset) % every == 0 { f64::NAN } else { v })
        .collect()
}

/// Two-column table of a random walk and a sine wave.
pub fn price_frame(len: usize, seed: u64) -> DataFrame<f64> {
    DataFrame::from_columns(vec![
        (
            "close".to_string(),
            Series::from_vec(generate_random_walk(100.0, 2.0, len, seed)),
        ),
        (
            "open".to_string(),
            Series::from_vec(generate_sine(50.0, 5.0, 9, len)),
        ),
    ])
    .expect("columns share a length")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_points() {
        assert_eq!(split_points(10, &[7, 0, 3, 7, 12]), vec![3, 7]);
    }

    #[test]
    fn test_generate_random_walk_deterministic() {
        let data1 = generate_random_walk(100.0, 1.0, 10, 12345);
        let data2 = generate_random_walk(100.0, 1.0, 10, 12345);
        assert_eq!(data1, data2);
        assert_eq!(data1[0], 100.0);
    }

    #[test]
    fn test_inject_nan() {
        let data = inject_nan(&[1.0, 2.0, 3.0, 4.0, 5.0], 2, 1);
        assert!(data[1].is_nan() && data[3].is_nan());
        assert_eq!(data[4], 5.0);
    }
}
