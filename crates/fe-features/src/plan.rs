//! Declarative feature plans.
//!
//! A [`FeaturePlan`] lists feature entries, each naming the input columns it
//! reads, an optional label and a [`FeatureSpec`]. Building the plan
//! constructs one feature per entry; the resulting [`FeatureSet`] fits them in
//! order and follows the same first-fit/continuation contract as a single
//! feature.
//!
//! # Example
//!
//! ```rust
//! use fe_core::prelude::*;
//! use fe_features::moving_average::ExponentialMovingConfig;
//! use fe_features::plan::{FeaturePlan, FeatureSpec, PlanEntry};
//!
//! let plan = FeaturePlan::new()
//!     .with_entry(PlanEntry::new(
//!         ["close"],
//!         FeatureSpec::ExponentialMoving(ExponentialMovingConfig::span(3.0)),
//!     ))
//!     .with_entry(
//!         PlanEntry::new(["close"], FeatureSpec::RollingWindow(WindowDescriptor::new(2)))
//!             .with_label("mean2"),
//!     );
//! let mut features = plan.build::<f64>().unwrap();
//!
//! let data = DataFrame::from_series("close", Series::from_vec(vec![1.0, 2.0, 3.0]));
//! let out = features.fit(&data, true).unwrap();
//! assert_eq!(
//!     out.column_names(),
//!     vec!["exponential_moving_feature_close", "mean2_close"]
//! );
//! ```

use std::collections::HashSet;

use fe_core::{
    dataframe::DataFrame,
    error::{ConfigError, Result, StateError},
    num::TaFloat,
    rolling::RollingFeature,
    traits::{ColumnFeature, Feature},
    WindowDescriptor,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::momentum::{
    AbsolutePriceOscillator, AbsolutePriceOscillatorConfig, InverseFisherRsi,
    InverseFisherRsiConfig, KaufmanEfficiency, KaufmanEfficiencyConfig,
    MovingAverageConvergenceDivergence, MovingAverageConvergenceDivergenceConfig,
    PercentageValueOscillator, PercentageValueOscillatorConfig, RelativeStrengthIndex,
    RelativeStrengthIndexConfig, TripleExponentialMovingOscillator,
};
use crate::moving_average::{
    ExponentialMovingConfig, ExponentialMovingFeature, FractalAdaptiveConfig,
    FractalAdaptiveMovingAverage, HullMovingConfig, HullMovingFeature, KaufmanAdaptiveConfig,
    KaufmanAdaptiveMovingAverage, SmoothedMovingAverage, SmoothedMovingAverageConfig,
    TripleExponentialMovingFeature,
};
use crate::trend::{
    AroonOscillator, AroonOscillatorConfig, AverageDirectionalMovementIndex,
    AverageDirectionalMovementIndexConfig, ZeroLagExponentialMovingConfig,
    ZeroLagExponentialMovingFeature,
};
use crate::volatility::{
    AverageTrueRange, AverageTrueRangeConfig, BollingerBands, BollingerBandsConfig,
    KeltnerChannel, KeltnerChannelConfig, TypicalValue, TypicalValueConfig,
};

/// Type-erased table feature, so features with different configuration
/// types can live in one plan.
pub trait ErasedFeature<T: TaFloat>: Send + Sync {
    /// Fit one batch of rows.
    ///
    /// # Errors
    ///
    /// Propagates the feature's own errors.
    fn fit(&mut self, data: &DataFrame<T>, first_fit: bool) -> Result<DataFrame<T>>;

    /// Names of the produced columns for `input_columns`.
    fn output_columns(&self, input_columns: &[String]) -> Vec<String>;

    /// Returns `true` once a first fit has happened.
    fn is_fitted(&self) -> bool;

    /// Forget all carried state.
    fn reset(&mut self);

    /// Short snake_case name.
    fn name(&self) -> &'static str;
}

impl<T: TaFloat, F: Feature<T>> ErasedFeature<T> for F {
    fn fit(&mut self, data: &DataFrame<T>, first_fit: bool) -> Result<DataFrame<T>> {
        Feature::fit(self, data, first_fit)
    }

    fn output_columns(&self, input_columns: &[String]) -> Vec<String> {
        Feature::output_columns(self, input_columns)
    }

    fn is_fitted(&self) -> bool {
        Feature::is_fitted(self)
    }

    fn reset(&mut self) {
        Feature::reset(self)
    }

    fn name(&self) -> &'static str {
        Feature::name(self)
    }
}

/// Feature kind and parameters of one plan entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "feature", content = "params", rename_all = "snake_case")
)]
pub enum FeatureSpec {
    /// Shape-weighted rolling reduction.
    RollingWindow(WindowDescriptor),
    /// Exponential moving feature.
    ExponentialMoving(ExponentialMovingConfig),
    /// Hull moving feature.
    HullMoving(HullMovingConfig),
    /// Triple exponential moving feature.
    TripleExponentialMoving(ExponentialMovingConfig),
    /// Kaufman adaptive moving average.
    KaufmanAdaptive(KaufmanAdaptiveConfig),
    /// Fractal adaptive moving average.
    FractalAdaptive(FractalAdaptiveConfig),
    /// Smoothed moving average.
    SmoothedMoving(SmoothedMovingAverageConfig),
    /// Absolute price oscillator.
    AbsolutePriceOscillator(AbsolutePriceOscillatorConfig),
    /// Percentage value oscillator.
    PercentageValueOscillator(PercentageValueOscillatorConfig),
    /// MACD line or histogram.
    MovingAverageConvergenceDivergence(MovingAverageConvergenceDivergenceConfig),
    /// Kaufman efficiency ratio.
    KaufmanEfficiency(KaufmanEfficiencyConfig),
    /// Relative strength index.
    RelativeStrengthIndex(RelativeStrengthIndexConfig),
    /// Inverse Fisher RSI.
    InverseFisherRsi(InverseFisherRsiConfig),
    /// Rate of change of the triple exponential moving feature.
    TripleExponentialMovingOscillator(ExponentialMovingConfig),
    /// Average true range.
    AverageTrueRange(AverageTrueRangeConfig),
    /// Typical value.
    TypicalValue(TypicalValueConfig),
    /// Bollinger bands.
    BollingerBands(BollingerBandsConfig),
    /// Keltner channel.
    KeltnerChannel(KeltnerChannelConfig),
    /// Average directional movement index.
    AverageDirectionalMovementIndex(AverageDirectionalMovementIndexConfig),
    /// Aroon oscillator.
    AroonOscillator(AroonOscillatorConfig),
    /// Zero lag exponential moving feature.
    ZeroLagExponentialMoving(ZeroLagExponentialMovingConfig),
}

fn erase<T, F>(config: F::Config) -> Result<Box<dyn ErasedFeature<T>>>
where
    T: TaFloat,
    F: ColumnFeature<T> + 'static,
{
    Ok(Box::new(F::per_column(config)?))
}

impl FeatureSpec {
    /// Build the table-level feature this entry describes.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid parameters.
    pub fn build<T: TaFloat>(&self) -> Result<Box<dyn ErasedFeature<T>>> {
        match self.clone() {
            Self::RollingWindow(c) => erase::<T, RollingFeature<T>>(c),
            Self::ExponentialMoving(c) => erase::<T, ExponentialMovingFeature<T>>(c),
            Self::HullMoving(c) => erase::<T, HullMovingFeature<T>>(c),
            Self::TripleExponentialMoving(c) => erase::<T, TripleExponentialMovingFeature<T>>(c),
            Self::KaufmanAdaptive(c) => erase::<T, KaufmanAdaptiveMovingAverage<T>>(c),
            Self::FractalAdaptive(c) => erase::<T, FractalAdaptiveMovingAverage<T>>(c),
            Self::SmoothedMoving(c) => erase::<T, SmoothedMovingAverage<T>>(c),
            Self::AbsolutePriceOscillator(c) => erase::<T, AbsolutePriceOscillator<T>>(c),
            Self::PercentageValueOscillator(c) => erase::<T, PercentageValueOscillator<T>>(c),
            Self::MovingAverageConvergenceDivergence(c) => {
                erase::<T, MovingAverageConvergenceDivergence<T>>(c)
            }
            Self::KaufmanEfficiency(c) => erase::<T, KaufmanEfficiency<T>>(c),
            Self::RelativeStrengthIndex(c) => erase::<T, RelativeStrengthIndex<T>>(c),
            Self::InverseFisherRsi(c) => erase::<T, InverseFisherRsi<T>>(c),
            Self::TripleExponentialMovingOscillator(c) => {
                erase::<T, TripleExponentialMovingOscillator<T>>(c)
            }
            Self::AverageTrueRange(c) => erase::<T, AverageTrueRange<T>>(c),
            Self::TypicalValue(c) => erase::<T, TypicalValue<T>>(c),
            Self::BollingerBands(c) => erase::<T, BollingerBands<T>>(c),
            Self::KeltnerChannel(c) => erase::<T, KeltnerChannel<T>>(c),
            Self::AverageDirectionalMovementIndex(c) => {
                erase::<T, AverageDirectionalMovementIndex<T>>(c)
            }
            Self::AroonOscillator(c) => erase::<T, AroonOscillator<T>>(c),
            Self::ZeroLagExponentialMoving(c) => erase::<T, ZeroLagExponentialMovingFeature<T>>(c),
        }
    }
}

/// One entry of a [`FeaturePlan`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanEntry {
    /// Input columns the feature reads.
    pub columns: Vec<String>,
    /// Prefix of the produced columns; defaults to the feature name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: Option<String>,
    /// Feature kind and parameters.
    pub spec: FeatureSpec,
}

impl PlanEntry {
    /// Create an entry reading `columns`.
    pub fn new<I, S>(columns: I, spec: FeatureSpec) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            label: None,
            spec,
        }
    }

    /// Set the output prefix.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Ordered list of feature entries.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeaturePlan {
    /// Entries, fitted in order.
    pub entries: Vec<PlanEntry>,
}

impl FeaturePlan {
    /// Create an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    #[must_use]
    pub fn with_entry(mut self, entry: PlanEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Validate the plan and construct its features.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPlan`] for an empty plan, an entry
    /// without columns or a repeated prefix, and any configuration error of
    /// the entries themselves.
    pub fn build<T: TaFloat>(&self) -> Result<FeatureSet<T>> {
        if self.entries.is_empty() {
            return Err(ConfigError::InvalidPlan("plan has no entries".to_string()).into());
        }
        let mut prefixes = HashSet::new();
        let mut stages = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.columns.is_empty() {
                return Err(
                    ConfigError::InvalidPlan(format!("entry {index} selects no columns")).into(),
                );
            }
            let feature = entry.spec.build::<T>()?;
            let prefix = entry
                .label
                .clone()
                .unwrap_or_else(|| feature.name().to_string());
            if !prefixes.insert(prefix.clone()) {
                return Err(ConfigError::InvalidPlan(format!(
                    "prefix '{prefix}' is used by more than one entry"
                ))
                .into());
            }
            stages.push(Stage {
                columns: entry.columns.clone(),
                prefix,
                feature,
            });
        }
        info!(entries = stages.len(), "built feature plan");
        Ok(FeatureSet {
            stages,
            fitted: false,
        })
    }
}

struct Stage<T: TaFloat> {
    columns: Vec<String>,
    prefix: String,
    feature: Box<dyn ErasedFeature<T>>,
}

/// Features built from a [`FeaturePlan`].
pub struct FeatureSet<T: TaFloat> {
    stages: Vec<Stage<T>>,
    fitted: bool,
}

impl<T: TaFloat> core::fmt::Debug for FeatureSet<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let prefixes: Vec<&str> = self.stages.iter().map(|s| s.prefix.as_str()).collect();
        f.debug_struct("FeatureSet")
            .field("prefixes", &prefixes)
            .field("fitted", &self.fitted)
            .finish()
    }
}

impl<T: TaFloat> FeatureSet<T> {
    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the set holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Fit every feature on its columns of `data` and join the outputs.
    ///
    /// Output columns are named `{prefix}_{column}`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownColumn`] if `data` lacks a planned
    /// column, [`StateError::NotFitted`] for a continuation before the first
    /// fit, and any error of the features.
    pub fn fit(&mut self, data: &DataFrame<T>, first_fit: bool) -> Result<DataFrame<T>> {
        if !first_fit && !self.fitted {
            return Err(StateError::NotFitted.into());
        }
        if let Some(missing) = self
            .stages
            .iter()
            .flat_map(|stage| stage.columns.iter())
            .find(|column| !data.has_column(column))
        {
            return Err(ConfigError::UnknownColumn(missing.clone()).into());
        }
        debug!(
            features = self.stages.len(),
            rows = data.len(),
            first_fit,
            "fitting feature plan"
        );

        let mut output = DataFrame::new();
        for stage in &mut self.stages {
            let selected = data.select(&stage.columns)?;
            let produced = stage.feature.fit(&selected, first_fit)?;
            for (name, series) in produced.iter() {
                output.add_column(format!("{}_{name}", stage.prefix), series.clone())?;
            }
        }
        self.fitted = true;
        Ok(output)
    }

    /// Names of the columns [`fit`](Self::fit) produces.
    #[must_use]
    pub fn output_columns(&self) -> Vec<String> {
        self.stages
            .iter()
            .flat_map(|stage| {
                stage
                    .feature
                    .output_columns(&stage.columns)
                    .into_iter()
                    .map(move |name| format!("{}_{name}", stage.prefix))
            })
            .collect()
    }

    /// Returns `true` once a first fit has happened.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Forget the carried state of every feature.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.feature.reset();
        }
        self.fitted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fe_core::series::Series;

    fn table() -> DataFrame<f64> {
        DataFrame::from_columns(vec![
            ("a".to_string(), Series::from_vec(vec![1.0, 2.0, 3.0, 4.0])),
            ("b".to_string(), Series::from_vec(vec![4.0, 3.0, 2.0, 1.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_output_names() {
        let plan = FeaturePlan::new()
            .with_entry(PlanEntry::new(
                ["a", "b"],
                FeatureSpec::BollingerBands(BollingerBandsConfig::default()),
            ))
            .with_entry(
                PlanEntry::new(["a"], FeatureSpec::TypicalValue(TypicalValueConfig::new(2)))
                    .with_label("tv"),
            );
        let mut set = plan.build::<f64>().unwrap();
        let expected = vec![
            "bollinger_bands_a_positive_band",
            "bollinger_bands_a_negative_band",
            "bollinger_bands_b_positive_band",
            "bollinger_bands_b_negative_band",
            "tv_a",
        ];
        assert_eq!(set.output_columns(), expected);
        let out = set.fit(&table(), true).unwrap();
        assert_eq!(out.column_names(), expected);
    }

    #[test]
    fn test_invalid_plans() {
        assert!(FeaturePlan::new().build::<f64>().unwrap_err().is_config());

        let no_columns = FeaturePlan::new().with_entry(PlanEntry::new(
            Vec::<String>::new(),
            FeatureSpec::TypicalValue(TypicalValueConfig::default()),
        ));
        assert!(no_columns.build::<f64>().is_err());

        let entry = PlanEntry::new(["a"], FeatureSpec::TypicalValue(TypicalValueConfig::default()));
        let repeated = FeaturePlan::new().with_entry(entry.clone()).with_entry(entry);
        assert!(repeated.build::<f64>().is_err());
    }

    #[test]
    fn test_unknown_column_and_lifecycle() {
        let plan = FeaturePlan::new().with_entry(PlanEntry::new(
            ["missing"],
            FeatureSpec::TypicalValue(TypicalValueConfig::default()),
        ));
        let mut set = plan.build::<f64>().unwrap();
        assert!(set.fit(&table(), false).unwrap_err().is_state());
        assert!(set.fit(&table(), true).unwrap_err().is_config());
    }
}
