//! Property and serialization tests for the fe-core rolling-window engine.
//!
//! Splitting a history into batches must never change the output, whatever
//! the window shape, reducer or split points.

use fe_core::compute;
use fe_core::prelude::*;
use proptest::prelude::*;

// ============================================================================
// Proptest Strategies
// ============================================================================

/// A finite value, with roughly one in ten missing.
fn gapped_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        9 => -1000.0f64..1000.0,
        1 => Just(f64::NAN),
    ]
}

fn gapped_series(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(gapped_value(), min_len..=max_len)
}

fn any_shape() -> impl Strategy<Value = WindowShape> {
    prop_oneof![
        Just(WindowShape::Equal),
        Just(WindowShape::Weighted),
        Just(WindowShape::Triang),
        Just(WindowShape::Hann),
        Just(WindowShape::Blackman),
        Just(WindowShape::Identity),
        (0.5f64..4.0).prop_map(|std| WindowShape::Gaussian { std }),
        (0.5f64..4.0).prop_map(|tau| WindowShape::Exponential { center: None, tau }),
    ]
}

fn any_reducer() -> impl Strategy<Value = ReducerKind> {
    prop_oneof![
        Just(ReducerKind::Mean),
        Just(ReducerKind::Sum),
        Just(ReducerKind::Median),
        Just(ReducerKind::Min),
        Just(ReducerKind::Max),
        (0usize..2).prop_map(|ddof| ReducerKind::Std { ddof }),
        (0.0f64..=1.0).prop_map(|q| ReducerKind::Quantile { q }),
    ]
}

fn any_descriptor() -> impl Strategy<Value = WindowDescriptor> {
    (2usize..8, any_shape(), any_reducer(), any::<bool>()).prop_flat_map(
        |(window, shape, reducer, symmetric)| {
            (1..=window).prop_map(move |min_periods| {
                WindowDescriptor::new(window)
                    .with_min_periods(min_periods)
                    .with_shape(shape)
                    .with_symmetric(symmetric)
                    .with_reducer(reducer)
            })
        },
    )
}

// ============================================================================
// Helpers
// ============================================================================

fn bounds(len: usize, cuts: &[usize]) -> Vec<usize> {
    let mut points: Vec<usize> = cuts.iter().map(|c| c % len).filter(|&c| c > 0).collect();
    points.push(0);
    points.push(len);
    points.sort_unstable();
    points.dedup();
    points
}

fn assert_same(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        if e.is_nan() {
            assert!(a.is_nan(), "row {}: expected NaN, got {}", i, a);
        } else {
            let tolerance = 1e-9 * e.abs().max(1.0);
            assert!((a - e).abs() <= tolerance, "row {}: expected {}, got {}", i, e, a);
        }
    }
}

// ============================================================================
// Chunking Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_rolling_window_chunks_match_whole(
        descriptor in any_descriptor(),
        values in gapped_series(1, 40),
        cuts in prop::collection::vec(0usize..40, 0..4),
    ) {
        let whole = RollingWindow::<f64>::new(&descriptor).unwrap().compute(&values, true).unwrap();

        let mut window = RollingWindow::<f64>::new(&descriptor).unwrap();
        let mut chunked = Vec::with_capacity(values.len());
        for (i, pair) in bounds(values.len(), &cuts).windows(2).enumerate() {
            chunked.extend(window.compute(&values[pair[0]..pair[1]], i == 0).unwrap());
        }
        assert_same(&chunked, &whole);
    }

    #[test]
    fn prop_free_compute_threads_carried_state(
        descriptor in any_descriptor(),
        values in gapped_series(1, 40),
        cuts in prop::collection::vec(0usize..40, 0..4),
    ) {
        let (whole, _) = compute(&values, &descriptor, true, None).unwrap();

        let mut carried: Vec<f64> = Vec::new();
        let mut chunked = Vec::with_capacity(values.len());
        for (i, pair) in bounds(values.len(), &cuts).windows(2).enumerate() {
            let batch = &values[pair[0]..pair[1]];
            let (out, next) = compute(batch, &descriptor, i == 0, Some(carried.as_slice())).unwrap();
            prop_assert!(next.len() < descriptor.window);
            chunked.extend(out);
            carried = next;
        }
        assert_same(&chunked, &whole);
    }

    #[test]
    fn prop_carried_state_is_the_trailing_values(
        descriptor in any_descriptor(),
        values in gapped_series(1, 40),
    ) {
        let mut window = RollingWindow::<f64>::new(&descriptor).unwrap();
        window.compute(&values, true).unwrap();

        let keep = values.len().min(descriptor.window - 1);
        let carried = window.carried().unwrap();
        assert_same(&carried, &values[values.len() - keep..]);
    }

    #[test]
    fn prop_output_stays_within_window_extremes(
        window in 2usize..8,
        values in prop::collection::vec(-1000.0f64..1000.0, 1..40),
    ) {
        for reducer in [ReducerKind::Mean, ReducerKind::Median, ReducerKind::Quantile { q: 0.3 }] {
            let descriptor = WindowDescriptor::new(window)
                .with_min_periods(1)
                .with_reducer(reducer);
            let out = RollingWindow::<f64>::new(&descriptor).unwrap().compute(&values, true).unwrap();
            for (i, value) in out.iter().enumerate() {
                let segment = &values[(i + 1).saturating_sub(window)..=i];
                let low = segment.iter().copied().fold(f64::INFINITY, f64::min);
                let high = segment.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(*value >= low - 1e-9 && *value <= high + 1e-9);
            }
        }
    }
}

#[test]
fn custom_reducer_chunks_match_whole() {
    let range = || {
        Reducer::custom(|w: &[f64]| {
            w.iter().copied().fold(f64::NAN, f64::max) - w.iter().copied().fold(f64::NAN, f64::min)
        })
    };
    let descriptor = WindowDescriptor::new(3).with_shape(WindowShape::Identity);
    let values = [4.0, 1.0, 7.0, 3.0, 3.0, 9.0, 2.0];

    let whole = RollingWindow::with_reducer(&descriptor, range())
        .unwrap()
        .compute(&values, true)
        .unwrap();

    let mut window = RollingWindow::with_reducer(&descriptor, range()).unwrap();
    let mut chunked = window.compute(&values[..2], true).unwrap();
    chunked.extend(window.compute(&values[2..3], false).unwrap());
    chunked.extend(window.compute(&values[3..], false).unwrap());
    assert_same(&chunked, &whole);
    assert_same(&whole[2..], &[6.0, 6.0, 4.0, 6.0, 7.0]);
}

#[test]
fn continuation_without_carried_state_fails() {
    let descriptor = WindowDescriptor::new(3);
    assert!(compute(&[1.0f64], &descriptor, false, None).unwrap_err().is_state());

    let mut window = RollingWindow::<f64>::new(&descriptor).unwrap();
    assert!(window.compute(&[1.0], false).unwrap_err().is_state());
    window.compute(&[1.0, 2.0], true).unwrap();
    window.reset();
    assert!(!window.is_fitted());
    assert!(window.compute(&[1.0], false).unwrap_err().is_state());
}

// ============================================================================
// Serialization
// ============================================================================

#[cfg(feature = "serde")]
mod serialization {
    use super::*;

    #[test]
    fn descriptor_defaults_from_window_only() {
        let descriptor: WindowDescriptor = serde_json::from_str(r#"{"window": 3}"#).unwrap();
        assert_eq!(descriptor, WindowDescriptor::new(3));
    }

    #[test]
    fn descriptor_round_trip() {
        let descriptor = WindowDescriptor::new(5)
            .with_min_periods(2)
            .with_shape(WindowShape::Kaiser { beta: 14.0 })
            .with_symmetric(true)
            .with_reducer(ReducerKind::Std { ddof: 1 });
        let json = serde_json::to_string(&descriptor).unwrap();
        let back: WindowDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }

    #[test]
    fn shapes_use_tagged_names() {
        let shape: WindowShape =
            serde_json::from_str(r#"{"shape": "gaussian", "std": 1.0}"#).unwrap();
        assert_eq!(shape, WindowShape::Gaussian { std: 1.0 });

        let shape: WindowShape = serde_json::from_str(r#"{"shape": "flattop"}"#).unwrap();
        assert_eq!(shape, WindowShape::FlatTop);

        let shape: WindowShape =
            serde_json::from_str(r#"{"shape": "exponential", "tau": 2.0}"#).unwrap();
        assert_eq!(shape, WindowShape::Exponential { center: None, tau: 2.0 });

        let json = serde_json::to_value(WindowShape::BlackmanHarris).unwrap();
        assert_eq!(json, serde_json::json!({"shape": "blackmanharris"}));
    }

    #[test]
    fn reducers_use_tagged_names() {
        let reducer: ReducerKind = serde_json::from_str(r#"{"op": "quantile", "q": 0.5}"#).unwrap();
        assert_eq!(reducer, ReducerKind::Quantile { q: 0.5 });

        let json = serde_json::to_value(ReducerKind::Var { ddof: 0 }).unwrap();
        assert_eq!(json, serde_json::json!({"op": "var", "ddof": 0}));

        assert!(serde_json::from_str::<ReducerKind>(r#"{"op": "mode"}"#).is_err());
    }

    #[test]
    fn deserialized_descriptor_drives_the_engine() {
        let descriptor: WindowDescriptor = serde_json::from_str(
            r#"{"window": 3, "min_periods": 1, "reducer": {"op": "sum"}}"#,
        )
        .unwrap();
        let out = RollingWindow::<f64>::new(&descriptor)
            .unwrap()
            .compute(&[1.0, 2.0, 3.0, 4.0], true)
            .unwrap();
        assert_same(&out, &[1.0, 3.0, 6.0, 9.0]);
    }
}
