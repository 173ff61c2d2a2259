//! Exponential moving feature.
//!
//! Exponentially weighted mean, variance or standard deviation with the
//! recursive (non-adjusted) weighting
//!
//! ```text
//! y[t] = (1 - α)·y[t-1] + α·x[t]
//! ```
//!
//! The decay is given as exactly one of `alpha`, `com`, `span` or `halflife`.
//! With `initialize_using_operation` the first `initialize_span` inputs are
//! replaced by a single seed, the operation applied to those values, and the
//! recurrence starts from it.

use core::fmt;
use core::str::FromStr;

use fe_core::{
    error::{ConfigError, Result},
    num::TaFloat,
    series::Series,
    traits::{check_batch, ColumnFeature},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Moment computed by the exponential moving feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EwmOperation {
    /// Weighted mean.
    #[default]
    Mean,
    /// Bias-corrected weighted variance.
    Var,
    /// Square root of [`EwmOperation::Var`].
    Std,
}

impl fmt::Display for EwmOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mean => "mean",
            Self::Var => "var",
            Self::Std => "std",
        })
    }
}

impl FromStr for EwmOperation {
    type Err = ConfigError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Self::Mean),
            "var" => Ok(Self::Var),
            "std" => Ok(Self::Std),
            other => Err(ConfigError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// Configuration for the exponential moving feature.
///
/// The default carries no decay parameter; set exactly one of them.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExponentialMovingConfig {
    /// Smoothing factor, `0 < alpha <= 1`.
    pub alpha: Option<f64>,
    /// Center of mass, `alpha = 1 / (1 + com)`.
    pub com: Option<f64>,
    /// Span, `alpha = 2 / (span + 1)`.
    pub span: Option<f64>,
    /// Half-life, `alpha = 1 - exp(-ln 2 / halflife)`.
    pub halflife: Option<f64>,
    /// Moment to compute.
    pub operation: EwmOperation,
    /// Seed the recurrence with the operation over the first values.
    pub initialize_using_operation: bool,
    /// Number of values the seed is computed from; defaults to `span`.
    pub initialize_span: Option<usize>,
    /// Minimum number of observations before output is produced.
    pub min_periods: usize,
    /// Do not decay weights across missing values.
    pub ignore_na: bool,
}

impl ExponentialMovingConfig {
    /// Decay given as a span.
    #[must_use]
    pub fn span(span: f64) -> Self {
        Self {
            span: Some(span),
            ..Self::default()
        }
    }

    /// Decay given as a smoothing factor.
    #[must_use]
    pub fn alpha(alpha: f64) -> Self {
        Self {
            alpha: Some(alpha),
            ..Self::default()
        }
    }

    /// Decay given as a center of mass.
    #[must_use]
    pub fn com(com: f64) -> Self {
        Self {
            com: Some(com),
            ..Self::default()
        }
    }

    /// Decay given as a half-life.
    #[must_use]
    pub fn halflife(halflife: f64) -> Self {
        Self {
            halflife: Some(halflife),
            ..Self::default()
        }
    }

    /// Set the moment to compute.
    #[must_use]
    pub fn with_operation(mut self, operation: EwmOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Seed the recurrence with the operation over the first `span` values
    /// (`None` falls back to the decay span).
    #[must_use]
    pub fn with_initialization(mut self, span: Option<usize>) -> Self {
        self.initialize_using_operation = true;
        self.initialize_span = span;
        self
    }

    /// Set the minimum number of observations.
    #[must_use]
    pub fn with_min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = min_periods;
        self
    }

    /// Set `ignore_na`.
    #[must_use]
    pub fn with_ignore_na(mut self, ignore_na: bool) -> Self {
        self.ignore_na = ignore_na;
        self
    }

    /// Resolve the smoothing factor.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] unless exactly one decay parameter is
    /// supplied and within its valid range.
    pub fn resolve_alpha(&self) -> Result<f64> {
        let supplied = [self.alpha, self.com, self.span, self.halflife]
            .iter()
            .filter(|p| p.is_some())
            .count();
        if supplied != 1 {
            return Err(ConfigError::DecayParameters { supplied }.into());
        }

        let invalid = |name: &'static str, value: f64, expected: &'static str| {
            ConfigError::InvalidParameter {
                name,
                value: value.to_string(),
                expected,
            }
        };
        if let Some(alpha) = self.alpha {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(invalid("alpha", alpha, "0 < alpha <= 1").into());
            }
            return Ok(alpha);
        }
        if let Some(com) = self.com {
            if !(com >= 0.0) {
                return Err(invalid("com", com, "com >= 0").into());
            }
            return Ok(1.0 / (1.0 + com));
        }
        if let Some(span) = self.span {
            if !(span >= 1.0) {
                return Err(invalid("span", span, "span >= 1").into());
            }
            return Ok(2.0 / (span + 1.0));
        }
        match self.halflife {
            Some(halflife) if halflife > 0.0 => {
                Ok(1.0 - (-core::f64::consts::LN_2 / halflife).exp())
            }
            Some(halflife) => Err(invalid("halflife", halflife, "halflife > 0").into()),
            None => Err(ConfigError::DecayParameters { supplied: 0 }.into()),
        }
    }

    /// Resolve the seed length, if seeding is enabled.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `initialize_span` is set without
    /// seeding, or seeding is enabled without any span to take it from.
    pub fn resolve_initialize_span(&self) -> Result<Option<usize>> {
        if !self.initialize_using_operation {
            if let Some(span) = self.initialize_span {
                return Err(ConfigError::InvalidParameter {
                    name: "initialize_span",
                    value: span.to_string(),
                    expected: "unset unless initialize_using_operation is enabled",
                }
                .into());
            }
            return Ok(None);
        }
        let span = match (self.initialize_span, self.span) {
            (Some(span), _) => span,
            (None, Some(span)) if span >= 1.0 => span as usize,
            _ => {
                return Err(ConfigError::InvalidParameter {
                    name: "initialize_span",
                    value: "None".to_string(),
                    expected: "initialize_span or span when initialize_using_operation is enabled",
                }
                .into())
            }
        };
        if span == 0 {
            return Err(ConfigError::InvalidWindow {
                name: "initialize_span",
                value: 0,
                min: 1,
            }
            .into());
        }
        Ok(Some(span))
    }
}

/// Recursive exponentially weighted moments of one column.
#[derive(Debug, Clone)]
struct EwmState<T: TaFloat> {
    /// Inputs collected for the seed, until `initialize_span` are seen.
    seed: Vec<T>,
    seeded: bool,
    mean: T,
    cov: T,
    sum_wt: T,
    sum_wt2: T,
    old_wt: T,
    nobs: usize,
}

impl<T: TaFloat> EwmState<T> {
    fn new(seeded: bool) -> Self {
        Self {
            seed: Vec::new(),
            seeded,
            mean: T::NAN,
            cov: T::ZERO,
            sum_wt: T::ONE,
            sum_wt2: T::ONE,
            old_wt: T::ONE,
            nobs: 0,
        }
    }
}

/// Exponential moving feature over one column.
///
/// # Example
///
/// ```rust
/// use fe_core::prelude::*;
/// use fe_features::moving_average::{ExponentialMovingConfig, ExponentialMovingFeature};
///
/// let config = ExponentialMovingConfig::alpha(0.5);
/// let mut ema = ExponentialMovingFeature::<f64>::new(config).unwrap();
/// let out = ema.fit(&[2.0, 4.0, 8.0], true).unwrap();
/// assert_eq!(out.as_slice(), &[2.0, 3.0, 5.5]);
/// ```
#[derive(Debug, Clone)]
pub struct ExponentialMovingFeature<T: TaFloat> {
    config: ExponentialMovingConfig,
    alpha: T,
    initialize_span: Option<usize>,
    min_periods: usize,
    state: Option<EwmState<T>>,
}

impl<T: TaFloat> ExponentialMovingFeature<T> {
    /// Resolved smoothing factor.
    #[must_use]
    pub fn alpha(&self) -> T {
        self.alpha
    }

    /// Feed one value through the recurrence.
    fn step(&mut self, x: T) -> T {
        let (alpha, min_periods, ignore_na, operation) = (
            self.alpha,
            self.min_periods,
            self.config.ignore_na,
            self.config.operation,
        );
        let Some(state) = self.state.as_mut() else {
            return T::NAN;
        };

        let x = if state.seeded {
            x
        } else {
            state.seed.push(x);
            if Some(state.seed.len()) < self.initialize_span {
                return T::NAN;
            }
            state.seeded = true;
            let seed = core::mem::take(&mut state.seed);
            seed_value(operation, &seed)
        };

        let decay = T::ONE - alpha;
        let is_observation = !x.is_nan();
        state.nobs += usize::from(is_observation);

        if !state.mean.is_nan() {
            if is_observation || !ignore_na {
                state.sum_wt = state.sum_wt * decay;
                state.sum_wt2 = state.sum_wt2 * decay * decay;
                state.old_wt = state.old_wt * decay;
                if is_observation {
                    let old_mean = state.mean;
                    if state.mean != x {
                        state.mean = (state.old_wt * old_mean + alpha * x) / (state.old_wt + alpha);
                    }
                    let spread = old_mean - state.mean;
                    let dev = x - state.mean;
                    state.cov = (state.old_wt * (state.cov + spread * spread) + alpha * dev * dev)
                        / (state.old_wt + alpha);
                    state.sum_wt = state.sum_wt + alpha;
                    state.sum_wt2 = state.sum_wt2 + alpha * alpha;
                    state.old_wt = state.old_wt + alpha;
                    state.sum_wt = state.sum_wt / state.old_wt;
                    state.sum_wt2 = state.sum_wt2 / (state.old_wt * state.old_wt);
                    state.old_wt = T::ONE;
                }
            }
        } else if is_observation {
            state.mean = x;
        }

        if state.nobs < min_periods {
            return T::NAN;
        }
        match operation {
            EwmOperation::Mean => state.mean,
            EwmOperation::Var => bias_corrected(state),
            EwmOperation::Std => bias_corrected(state).max(T::ZERO).sqrt(),
        }
    }
}

fn bias_corrected<T: TaFloat>(state: &EwmState<T>) -> T {
    let numerator = state.sum_wt * state.sum_wt;
    let denominator = numerator - state.sum_wt2;
    if denominator > T::ZERO {
        numerator / denominator * state.cov
    } else {
        T::NAN
    }
}

/// Operation over the seed values; any missing value makes the seed missing.
fn seed_value<T: TaFloat>(operation: EwmOperation, values: &[T]) -> T {
    if values.iter().any(|v| v.is_nan()) {
        return T::NAN;
    }
    let n = <T as TaFloat>::from_usize(values.len());
    let mean = values.iter().fold(T::ZERO, |acc, &v| acc + v) / n;
    if operation == EwmOperation::Mean {
        return mean;
    }
    if values.len() < 2 {
        return T::NAN;
    }
    let sum_sq = values.iter().fold(T::ZERO, |acc, &v| acc + (v - mean) * (v - mean));
    let var = sum_sq / (n - T::ONE);
    match operation {
        EwmOperation::Std => var.sqrt(),
        _ => var,
    }
}

impl<T: TaFloat> ColumnFeature<T> for ExponentialMovingFeature<T> {
    type Config = ExponentialMovingConfig;
    type Output = Series<T>;

    const NAME: &'static str = "exponential_moving_feature";

    fn new(config: Self::Config) -> Result<Self> {
        let alpha = T::from_f64_lossy(config.resolve_alpha()?);
        let initialize_span = config.resolve_initialize_span()?;
        let min_periods = if initialize_span.is_some() {
            1
        } else {
            config.min_periods.max(1)
        };
        Ok(Self {
            config,
            alpha,
            initialize_span,
            min_periods,
            state: None,
        })
    }

    fn fit(&mut self, values: &[T], first_fit: bool) -> Result<Series<T>> {
        check_batch(values.len(), first_fit, self.state.is_some())?;
        if first_fit {
            self.state = Some(EwmState::new(self.initialize_span.is_none()));
        }
        Ok(values.iter().map(|&x| self.step(x)).collect())
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    fn reset(&mut self) {
        self.state = None;
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
