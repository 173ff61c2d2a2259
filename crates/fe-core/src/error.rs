//! Error types for feature computation.
//!
//! Every fallible operation in the workspace returns [`FeatureError`], which
//! groups failures into three categories: invalid configuration, misuse of the
//! first-fit/continuation lifecycle, and malformed input tables.

use thiserror::Error;

/// Result type alias for feature operations that may fail.
pub type Result<T> = core::result::Result<T, FeatureError>;

/// Errors that can occur while constructing or fitting a feature.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Invalid or contradictory configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Fit lifecycle violation.
    #[error("Invalid fit state: {0}")]
    State(#[from] StateError),

    /// Malformed input data.
    #[error("Invalid input data: {0}")]
    Data(#[from] DataError),
}

/// Configuration errors raised at construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Window length below the minimum a feature accepts.
    #[error("window '{name}' is {value} (must be >= {min})")]
    InvalidWindow {
        /// Name of the window parameter.
        name: &'static str,
        /// Provided value.
        value: usize,
        /// Smallest accepted value.
        min: usize,
    },

    /// Invalid parameter value.
    #[error("parameter '{name}' is {value} (expected {expected})")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Provided value as string.
        value: String,
        /// Description of expected value.
        expected: &'static str,
    },

    /// Exactly one of alpha, com, span or halflife must be supplied.
    #[error("exactly one of alpha, com, span, halflife must be supplied, got {supplied}")]
    DecayParameters {
        /// Number of decay parameters supplied.
        supplied: usize,
    },

    /// Operation or reducer name not recognised.
    #[error("unsupported operation '{0}'")]
    UnsupportedOperation(String),

    /// A plan entry refers to a column the table does not carry.
    #[error("plan refers to unknown column '{0}'")]
    UnknownColumn(String),

    /// Feature plan is inconsistent.
    #[error("invalid feature plan: {0}")]
    InvalidPlan(String),
}

/// Lifecycle errors raised by continuation fits.
#[derive(Debug, Error)]
pub enum StateError {
    /// Continuation fit requested before any first fit.
    #[error("continuation fit requested before first fit")]
    NotFitted,

    /// Continuation batch carries a column that was absent at first fit.
    #[error("no carried state for column '{0}'")]
    UnknownColumn(String),
}

/// Errors caused by the shape or content of input tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// Input batch has no rows.
    #[error("input batch is empty")]
    EmptyInput,

    /// Series length mismatch.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Column count mismatch between paired tables.
    #[error("shape mismatch: expected {expected} columns, got {actual}")]
    ShapeMismatch {
        /// Expected number of columns.
        expected: usize,
        /// Actual number of columns.
        actual: usize,
    },

    /// Required column not found.
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// Column name already present.
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
}

impl FeatureError {
    /// Returns `true` for configuration errors.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns `true` for lifecycle errors.
    #[must_use]
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State(_))
    }

    /// Returns `true` for data errors.
    #[must_use]
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err: FeatureError = ConfigError::InvalidWindow {
            name: "window",
            value: 0,
            min: 1,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: window 'window' is 0 (must be >= 1)"
        );
        assert!(err.is_config());
    }

    #[test]
    fn test_decay_error_display() {
        let err = ConfigError::DecayParameters { supplied: 2 };
        assert!(err.to_string().contains("got 2"));
    }

    #[test]
    fn test_state_error_display() {
        let err: FeatureError = StateError::NotFitted.into();
        assert_eq!(
            err.to_string(),
            "Invalid fit state: continuation fit requested before first fit"
        );
        assert!(err.is_state());
        assert!(!err.is_config());
    }

    #[test]
    fn test_data_error_display() {
        let err: FeatureError = DataError::LengthMismatch {
            expected: 10,
            actual: 5,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid input data: length mismatch: expected 10, got 5"
        );
        assert!(err.is_data());
    }

    #[test]
    fn test_missing_column_display() {
        let err = DataError::MissingColumn("close".to_string());
        assert_eq!(err.to_string(), "missing column 'close'");
    }
}
