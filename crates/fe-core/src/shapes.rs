//! Window-shape library.
//!
//! A [`WindowShape`] maps a window length to a weight vector which the rolling
//! engine multiplies elementwise into each trailing window before reducing it.
//! The formulas follow the usual signal-processing definitions; `symmetric =
//! false` selects the periodic form, computed on `len + 1` points with the last
//! one dropped.
//!
//! When fewer than `window` values precede a position, the engine asks for
//! weights of the shorter segment length rather than padding the data with
//! zeros, so every weight vector lines up with real observations.

use core::f64::consts::PI;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::num::TaFloat;

/// Named weight-vector generators.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "shape", rename_all = "snake_case"))]
pub enum WindowShape {
    /// Unit weights.
    Equal,
    /// Linearly increasing weights `1..=n`, normalized to sum to one.
    Weighted,
    /// Triangular window without zero endpoints.
    Triang,
    /// Bartlett window (triangular with zero endpoints).
    Bartlett,
    /// Modified Bartlett-Hann window.
    #[cfg_attr(feature = "serde", serde(rename = "barthann"))]
    BartHann,
    /// Blackman window.
    Blackman,
    /// Minimum 4-term Blackman-Harris window.
    #[cfg_attr(feature = "serde", serde(rename = "blackmanharris"))]
    BlackmanHarris,
    /// Bohman window.
    Bohman,
    /// Cosine (sine) window.
    Cosine,
    /// Exponential decay away from `center`.
    Exponential {
        /// Peak position; defaults to the middle of the window.
        #[cfg_attr(feature = "serde", serde(default))]
        center: Option<f64>,
        /// Decay constant.
        tau: f64,
    },
    /// Flat-top window.
    #[cfg_attr(feature = "serde", serde(rename = "flattop"))]
    FlatTop,
    /// Gaussian window.
    Gaussian {
        /// Standard deviation in samples.
        std: f64,
    },
    /// Hamming window.
    Hamming,
    /// Hann window.
    Hann,
    /// Kaiser window.
    Kaiser {
        /// Shape parameter.
        beta: f64,
    },
    /// Parzen (de la Vallée Poussin) window.
    Parzen,
    /// No weighting; the reducer sees raw values.
    Identity,
}

impl Default for WindowShape {
    fn default() -> Self {
        Self::Equal
    }
}

impl WindowShape {
    /// Canonical lowercase name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Weighted => "weighted",
            Self::Triang => "triang",
            Self::Bartlett => "bartlett",
            Self::BartHann => "barthann",
            Self::Blackman => "blackman",
            Self::BlackmanHarris => "blackmanharris",
            Self::Bohman => "bohman",
            Self::Cosine => "cosine",
            Self::Exponential { .. } => "exponential",
            Self::FlatTop => "flattop",
            Self::Gaussian { .. } => "gaussian",
            Self::Hamming => "hamming",
            Self::Hann => "hann",
            Self::Kaiser { .. } => "kaiser",
            Self::Parzen => "parzen",
            Self::Identity => "identity",
        }
    }

    /// Check shape parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for non-positive `tau`/`std`, a non-finite
    /// `beta`, or an explicit exponential center on a symmetric window.
    pub fn validate(&self, symmetric: bool) -> Result<()> {
        match *self {
            Self::Exponential { center, tau } => {
                if !(tau.is_finite() && tau > 0.0) {
                    return Err(invalid("tau", tau, "finite value > 0"));
                }
                if let Some(center) = center {
                    if symmetric {
                        return Err(ConfigError::InvalidParameter {
                            name: "center",
                            value: center.to_string(),
                            expected: "no explicit center on a symmetric window",
                        }
                        .into());
                    }
                    if !center.is_finite() {
                        return Err(invalid("center", center, "finite value"));
                    }
                }
            }
            Self::Gaussian { std } => {
                if !(std.is_finite() && std > 0.0) {
                    return Err(invalid("std", std, "finite value > 0"));
                }
            }
            Self::Kaiser { beta } => {
                if !beta.is_finite() {
                    return Err(invalid("beta", beta, "finite value"));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Weight vector of length `len`, or `None` for [`WindowShape::Identity`].
    ///
    /// Parameters are assumed to have passed [`validate`](Self::validate).
    #[must_use]
    pub fn weights<T: TaFloat>(&self, len: usize, symmetric: bool) -> Option<Vec<T>> {
        let raw = match *self {
            Self::Identity => return None,
            Self::Equal => vec![1.0; len],
            Self::Weighted => {
                let total = (len * (len + 1)) as f64 / 2.0;
                (1..=len).map(|k| k as f64 / total).collect()
            }
            Self::Exponential { center, tau } => exponential(len, center, tau, symmetric),
            other => periodic_or_symmetric(len, symmetric, |m| other.symmetric_weights(m)),
        };
        Some(raw.into_iter().map(T::from_f64_lossy).collect())
    }

    /// Symmetric form on exactly `m` points, for the shapes that have one.
    fn symmetric_weights(&self, m: usize) -> Vec<f64> {
        match *self {
            Self::Hann => general_cosine(m, &[0.5, 0.5]),
            Self::Hamming => general_cosine(m, &[0.54, 0.46]),
            Self::Blackman => general_cosine(m, &[0.42, 0.50, 0.08]),
            Self::BlackmanHarris => general_cosine(m, &[0.35875, 0.48829, 0.14128, 0.01168]),
            Self::FlatTop => general_cosine(
                m,
                &[0.215_578_95, 0.416_631_58, 0.277_263_158, 0.083_578_947, 0.006_947_368],
            ),
            Self::BartHann => {
                let denom = (m - 1) as f64;
                (0..m)
                    .map(|n| {
                        let fac = (n as f64 / denom - 0.5).abs();
                        0.62 - 0.48 * fac + 0.38 * (2.0 * PI * fac).cos()
                    })
                    .collect()
            }
            Self::Bartlett => {
                let denom = (m - 1) as f64;
                (0..m)
                    .map(|n| {
                        let n = n as f64;
                        if n <= denom / 2.0 {
                            2.0 * n / denom
                        } else {
                            2.0 - 2.0 * n / denom
                        }
                    })
                    .collect()
            }
            Self::Bohman => {
                let step = 2.0 / (m - 1) as f64;
                (0..m)
                    .map(|n| {
                        if n == 0 || n == m - 1 {
                            return 0.0;
                        }
                        let fac = (-1.0 + step * n as f64).abs();
                        (1.0 - fac) * (PI * fac).cos() + (PI * fac).sin() / PI
                    })
                    .collect()
            }
            Self::Cosine => (0..m)
                .map(|n| (PI / m as f64 * (n as f64 + 0.5)).sin())
                .collect(),
            Self::Gaussian { std } => {
                let mid = (m - 1) as f64 / 2.0;
                let sig2 = 2.0 * std * std;
                (0..m)
                    .map(|n| {
                        let d = n as f64 - mid;
                        (-d * d / sig2).exp()
                    })
                    .collect()
            }
            Self::Kaiser { beta } => {
                let alpha = (m - 1) as f64 / 2.0;
                let scale = bessel_i0(beta);
                (0..m)
                    .map(|n| {
                        let r = (n as f64 - alpha) / alpha;
                        bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / scale
                    })
                    .collect()
            }
            Self::Parzen => {
                let half = m as f64 / 2.0;
                let quarter = (m - 1) as f64 / 4.0;
                (0..m)
                    .map(|k| {
                        let n = (k as f64 - (m - 1) as f64 / 2.0).abs();
                        let r = n / half;
                        if n <= quarter {
                            1.0 - 6.0 * r * r + 6.0 * r * r * r
                        } else {
                            2.0 * (1.0 - r).powi(3)
                        }
                    })
                    .collect()
            }
            Self::Triang => {
                let half = (m + 1) / 2;
                let mut rising: Vec<f64> = if m % 2 == 0 {
                    (1..=half).map(|n| (2 * n - 1) as f64 / m as f64).collect()
                } else {
                    (1..=half).map(|n| 2.0 * n as f64 / (m + 1) as f64).collect()
                };
                let mirror_from = if m % 2 == 0 { half } else { half - 1 };
                let falling: Vec<f64> = rising[..mirror_from].iter().rev().copied().collect();
                rising.extend(falling);
                rising
            }
            Self::Equal | Self::Weighted | Self::Exponential { .. } | Self::Identity => {
                vec![1.0; m]
            }
        }
    }
}

impl fmt::Display for WindowShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowShape {
    type Err = ConfigError;

    /// Parse a parameter-free shape name.
    ///
    /// Parameterised shapes (`exponential`, `gaussian`, `kaiser`) must be
    /// constructed directly.
    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Ok(match s {
            "equal" => Self::Equal,
            "weighted" => Self::Weighted,
            "triang" => Self::Triang,
            "bartlett" => Self::Bartlett,
            "barthann" => Self::BartHann,
            "blackman" => Self::Blackman,
            "blackmanharris" => Self::BlackmanHarris,
            "bohman" => Self::Bohman,
            "cosine" => Self::Cosine,
            "flattop" => Self::FlatTop,
            "hamming" => Self::Hamming,
            "hann" => Self::Hann,
            "parzen" => Self::Parzen,
            "identity" => Self::Identity,
            other => return Err(ConfigError::UnsupportedOperation(other.to_string())),
        })
    }
}

fn invalid(name: &'static str, value: f64, expected: &'static str) -> crate::error::FeatureError {
    ConfigError::InvalidParameter {
        name,
        value: value.to_string(),
        expected,
    }
    .into()
}

/// Evaluate `f` on `len` points (symmetric) or `len + 1` points truncated
/// (periodic). Lengths of zero or one give unit weights.
fn periodic_or_symmetric<F>(len: usize, symmetric: bool, f: F) -> Vec<f64>
where
    F: Fn(usize) -> Vec<f64>,
{
    if len <= 1 {
        return vec![1.0; len];
    }
    if symmetric {
        f(len)
    } else {
        let mut w = f(len + 1);
        w.truncate(len);
        w
    }
}

fn general_cosine(m: usize, coefficients: &[f64]) -> Vec<f64> {
    let step = 2.0 * PI / (m - 1) as f64;
    (0..m)
        .map(|n| {
            let fac = -PI + step * n as f64;
            coefficients
                .iter()
                .enumerate()
                .map(|(k, a)| a * (k as f64 * fac).cos())
                .sum()
        })
        .collect()
}

fn exponential(len: usize, center: Option<f64>, tau: f64, symmetric: bool) -> Vec<f64> {
    if len <= 1 {
        return vec![1.0; len];
    }
    let m = if symmetric { len } else { len + 1 };
    let center = center.unwrap_or((m - 1) as f64 / 2.0);
    (0..len)
        .map(|n| (-(n as f64 - center).abs() / tau).exp())
        .collect()
}

/// Modified Bessel function of the first kind, order zero.
fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    loop {
        term *= (half / k) * (half / k);
        sum += term;
        if term < sum * 1e-17 {
            return sum;
        }
        k += 1.0;
    }
}
