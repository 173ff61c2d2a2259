//! Resumable rolling-window engine.
//!
//! For every position `i` the engine reduces the weighted trailing window
//! ending at `i`:
//!
//! ```text
//! out[i] = reducer(shape_weights(len) ⊙ x[i + 1 - len ..= i]),  len = min(window, i + 1)
//! ```
//!
//! Positions whose window holds fewer than `min_periods` non-missing values
//! produce NaN. Windows never look forward.
//!
//! A continuation call prepends the carried tail of the previous batch (at
//! most `window - 1` raw values), computes over the joined column and returns
//! only the rows of the new batch. Splitting a column anywhere and feeding the
//! pieces through one [`RollingWindow`] therefore yields exactly the output of
//! a single pass over the whole column.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DataError, Result, StateError};
use crate::num::TaFloat;
use crate::reducer::{Reducer, ReducerKind};
use crate::shapes::WindowShape;
use crate::window::TrailingBuffer;

/// Immutable description of a windowed computation.
///
/// # Example
///
/// ```rust
/// use fe_core::{ReducerKind, WindowDescriptor, WindowShape};
///
/// let descriptor = WindowDescriptor::new(5)
///     .with_min_periods(2)
///     .with_shape(WindowShape::Gaussian { std: 1.5 })
///     .with_reducer(ReducerKind::Sum);
/// assert_eq!(descriptor.effective_min_periods(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowDescriptor {
    /// Window length.
    pub window: usize,
    /// Minimum non-missing observations per window; `None` means `window`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_periods: Option<usize>,
    /// Weight vector generator.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shape: WindowShape,
    /// Symmetric (`true`) or periodic (`false`) weights.
    #[cfg_attr(feature = "serde", serde(default))]
    pub symmetric: bool,
    /// Reduction applied to each weighted window.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reducer: ReducerKind,
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self::new(3)
    }
}

impl WindowDescriptor {
    /// Equal-weighted mean over `window` values.
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window,
            min_periods: None,
            shape: WindowShape::Equal,
            symmetric: false,
            reducer: ReducerKind::Mean,
        }
    }

    /// Set the minimum number of observations.
    #[must_use]
    pub fn with_min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = Some(min_periods);
        self
    }

    /// Set the window shape.
    #[must_use]
    pub fn with_shape(mut self, shape: WindowShape) -> Self {
        self.shape = shape;
        self
    }

    /// Select symmetric weights.
    #[must_use]
    pub fn with_symmetric(mut self, symmetric: bool) -> Self {
        self.symmetric = symmetric;
        self
    }

    /// Set the reducer.
    #[must_use]
    pub fn with_reducer(mut self, reducer: ReducerKind) -> Self {
        self.reducer = reducer;
        self
    }

    /// Minimum observations after applying the default.
    #[must_use]
    pub fn effective_min_periods(&self) -> usize {
        self.min_periods.unwrap_or(self.window)
    }

    /// Validate window, threshold, shape and reducer.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `window` is zero, `min_periods` exceeds
    /// `window`, or the shape or reducer parameters are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(ConfigError::InvalidWindow {
                name: "window",
                value: 0,
                min: 1,
            }
            .into());
        }
        if let Some(min_periods) = self.min_periods {
            if min_periods > self.window {
                return Err(ConfigError::InvalidParameter {
                    name: "min_periods",
                    value: min_periods.to_string(),
                    expected: "value <= window",
                }
                .into());
            }
        }
        self.shape.validate(self.symmetric)?;
        self.reducer.validate()
    }
}

/// A validated descriptor with its weight vectors resolved.
///
/// The kernel itself is stateless: carried values are passed in and handed
/// back by [`RollingKernel::compute`].
#[derive(Debug, Clone)]
pub struct RollingKernel<T: TaFloat> {
    window: usize,
    min_periods: usize,
    /// Weights per segment length; index 0 is unused.
    weights: Vec<Option<Vec<T>>>,
    reducer: Reducer<T>,
}

impl<T: TaFloat> RollingKernel<T> {
    /// Resolve `descriptor` with its own reducer.
    ///
    /// # Errors
    ///
    /// See [`WindowDescriptor::validate`].
    pub fn new(descriptor: &WindowDescriptor) -> Result<Self> {
        Self::with_reducer(descriptor, descriptor.reducer.into())
    }

    /// Resolve `descriptor`, replacing its reducer.
    ///
    /// # Errors
    ///
    /// See [`WindowDescriptor::validate`].
    pub fn with_reducer(descriptor: &WindowDescriptor, reducer: Reducer<T>) -> Result<Self> {
        descriptor.validate()?;
        reducer.validate()?;
        let weights = (0..=descriptor.window)
            .map(|len| descriptor.shape.weights(len, descriptor.symmetric))
            .collect();
        Ok(Self {
            window: descriptor.window,
            min_periods: descriptor.effective_min_periods(),
            weights,
            reducer,
        })
    }

    /// Window length.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Resolved minimum number of observations.
    #[must_use]
    pub fn min_periods(&self) -> usize {
        self.min_periods
    }

    /// Compute one batch.
    ///
    /// Returns the outputs aligned with `values` and the new carried state
    /// (the last `window - 1` values of `carried ++ values`).
    ///
    /// # Errors
    ///
    /// Returns [`DataError::EmptyInput`] for an empty batch and
    /// [`StateError::NotFitted`] when continuing without carried state.
    pub fn compute(
        &self,
        values: &[T],
        first_fit: bool,
        carried: Option<&[T]>,
    ) -> Result<(Vec<T>, Vec<T>)> {
        if values.is_empty() {
            return Err(DataError::EmptyInput.into());
        }
        let prefix: &[T] = if first_fit {
            &[]
        } else {
            let carried = carried.ok_or(StateError::NotFitted)?;
            let keep = carried.len().min(self.window - 1);
            &carried[carried.len() - keep..]
        };
        let output = self.reduce_batch(prefix, values);

        let mut next = TrailingBuffer::new(self.window - 1);
        next.extend(prefix);
        next.extend(values);
        Ok((output, next.to_vec()))
    }

    /// Reduce every position of `values`, with `prefix` as history.
    fn reduce_batch(&self, prefix: &[T], values: &[T]) -> Vec<T> {
        let mut full = Vec::with_capacity(prefix.len() + values.len());
        full.extend_from_slice(prefix);
        full.extend_from_slice(values);

        let mut scratch = Vec::with_capacity(self.window);
        (prefix.len()..full.len())
            .map(|i| {
                let start = (i + 1).saturating_sub(self.window);
                let segment = &full[start..=i];
                let observed = segment.iter().filter(|v| !v.is_nan()).count();
                if observed < self.min_periods {
                    return T::NAN;
                }
                scratch.clear();
                match &self.weights[segment.len()] {
                    Some(weights) => {
                        scratch.extend(weights.iter().zip(segment).map(|(&w, &x)| w * x));
                    }
                    None => scratch.extend_from_slice(segment),
                }
                self.reducer.reduce(&scratch)
            })
            .collect()
    }
}

/// One-shot form of the engine: resolve `descriptor` and compute a batch.
///
/// # Errors
///
/// See [`WindowDescriptor::validate`] and [`RollingKernel::compute`].
pub fn compute<T: TaFloat>(
    values: &[T],
    descriptor: &WindowDescriptor,
    first_fit: bool,
    carried: Option<&[T]>,
) -> Result<(Vec<T>, Vec<T>)> {
    RollingKernel::new(descriptor)?.compute(values, first_fit, carried)
}

/// A rolling window that owns its carried state.
///
/// # Example
///
/// ```rust
/// use fe_core::{RollingWindow, WindowDescriptor};
///
/// let mut mean = RollingWindow::<f64>::new(&WindowDescriptor::new(3).with_min_periods(1)).unwrap();
/// let head = mean.compute(&[1.0, 2.0, 3.0], true).unwrap();
/// let tail = mean.compute(&[4.0, 5.0], false).unwrap();
/// assert_eq!(head, vec![1.0, 1.5, 2.0]);
/// assert_eq!(tail, vec![3.0, 4.0]);
/// ```
#[derive(Debug, Clone)]
pub struct RollingWindow<T: TaFloat> {
    kernel: RollingKernel<T>,
    carried: Option<TrailingBuffer<T>>,
}

impl<T: TaFloat> RollingWindow<T> {
    /// Create an unfitted window from `descriptor`.
    ///
    /// # Errors
    ///
    /// See [`WindowDescriptor::validate`].
    pub fn new(descriptor: &WindowDescriptor) -> Result<Self> {
        Ok(Self::from_kernel(RollingKernel::new(descriptor)?))
    }

    /// Create an unfitted window with a custom reducer.
    ///
    /// # Errors
    ///
    /// See [`WindowDescriptor::validate`].
    pub fn with_reducer(descriptor: &WindowDescriptor, reducer: Reducer<T>) -> Result<Self> {
        Ok(Self::from_kernel(RollingKernel::with_reducer(
            descriptor, reducer,
        )?))
    }

    /// Wrap a resolved kernel.
    #[must_use]
    pub fn from_kernel(kernel: RollingKernel<T>) -> Self {
        Self {
            kernel,
            carried: None,
        }
    }

    /// Compute a batch, updating the carried state.
    ///
    /// # Errors
    ///
    /// See [`RollingKernel::compute`].
    pub fn compute(&mut self, values: &[T], first_fit: bool) -> Result<Vec<T>> {
        if values.is_empty() {
            return Err(DataError::EmptyInput.into());
        }
        let window = self.kernel.window;
        let output = if first_fit {
            let mut carried = TrailingBuffer::new(window - 1);
            let output = self.kernel.reduce_batch(&[], values);
            carried.extend(values);
            self.carried = Some(carried);
            output
        } else {
            let carried = self.carried.as_mut().ok_or(StateError::NotFitted)?;
            let output = self.kernel.reduce_batch(&carried.to_vec(), values);
            carried.extend(values);
            output
        };
        tracing::trace!(window, rows = values.len(), first_fit, "rolling window pass");
        Ok(output)
    }

    /// Returns `true` once a first fit has happened.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.carried.is_some()
    }

    /// Carried raw values, oldest first.
    #[must_use]
    pub fn carried(&self) -> Option<Vec<T>> {
        self.carried.as_ref().map(TrailingBuffer::to_vec)
    }

    /// Forget the carried state.
    pub fn reset(&mut self) {
        self.carried = None;
    }

    /// The resolved kernel.
    #[must_use]
    pub fn kernel(&self) -> &RollingKernel<T> {
        &self.kernel
    }
}
