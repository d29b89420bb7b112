//! Declarative estimator configuration.
//!
//! An [`EstimatorConfig`] names one aggregate and its columns; a [`SessionConfig`]
//! is a named list of them, usually read from JSON:
//!
//! ```
//! use ironola::SessionConfig;
//!
//! let config = SessionConfig::from_json_str(r#"{
//!     "estimators": [
//!         { "name": "avg",   "kind": "mean",        "mean_column": "value" },
//!         { "name": "sales", "kind": "grouped_sum", "original_rows": 6,
//!           "group_column": "category", "sum_column": "value" }
//!     ]
//! }"#).unwrap();
//! assert_eq!(config.estimators.len(), 2);
//! ```

use crate::error::OlaError;
use crate::estimator::Estimator;
use crate::estimators::{
    FilteredDistinctEstimator, FilteredMeanEstimator, GroupedCountEstimator, GroupedMeanEstimator,
    GroupedSumEstimator, MeanEstimator,
};
use crate::sink::Sink;
use crate::sketch::SketchConfig;
use crate::validation::{
    Validate, ValidationError, ValidationResult, into_result, require_column,
};
use crate::value::Value;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One estimator, tagged by `kind`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorConfig {
    Mean {
        mean_column: String,
    },
    FilteredMean {
        filter_column: String,
        filter_value: Value,
        target_column: String,
    },
    GroupedMean {
        group_column: String,
        target_column: String,
    },
    GroupedSum {
        original_rows: u64,
        group_column: String,
        sum_column: String,
    },
    GroupedCount {
        original_rows: u64,
        group_column: String,
        count_column: String,
    },
    FilteredDistinct {
        filter_column: String,
        filter_value: Value,
        distinct_column: String,
        #[serde(default)]
        sketch: SketchConfig,
    },
}

impl EstimatorConfig {
    /// The `kind` tag, matching [`Estimator::name`] of the built estimator.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Mean { .. } => "mean",
            Self::FilteredMean { .. } => "filtered_mean",
            Self::GroupedMean { .. } => "grouped_mean",
            Self::GroupedSum { .. } => "grouped_sum",
            Self::GroupedCount { .. } => "grouped_count",
            Self::FilteredDistinct { .. } => "filtered_distinct",
        }
    }

    /// Validate, then construct the estimator writing to `sink`.
    ///
    /// # Errors
    /// Fails with [`OlaError::InvalidConfig`] listing every rule violated.
    pub fn build(&self, sink: impl Sink + 'static) -> Result<Box<dyn Estimator>> {
        self.validate().map_err(OlaError::InvalidConfig)?;
        let estimator: Box<dyn Estimator> = match self.clone() {
            Self::Mean { mean_column } => Box::new(MeanEstimator::new(mean_column, sink)),
            Self::FilteredMean {
                filter_column,
                filter_value,
                target_column,
            } => Box::new(FilteredMeanEstimator::new(
                filter_column,
                filter_value,
                target_column,
                sink,
            )),
            Self::GroupedMean {
                group_column,
                target_column,
            } => Box::new(GroupedMeanEstimator::new(group_column, target_column, sink)),
            Self::GroupedSum {
                original_rows,
                group_column,
                sum_column,
            } => Box::new(GroupedSumEstimator::new(
                original_rows,
                group_column,
                sum_column,
                sink,
            )),
            Self::GroupedCount {
                original_rows,
                group_column,
                count_column,
            } => Box::new(GroupedCountEstimator::new(
                original_rows,
                group_column,
                count_column,
                sink,
            )),
            Self::FilteredDistinct {
                filter_column,
                filter_value,
                distinct_column,
                sketch,
            } => Box::new(FilteredDistinctEstimator::with_config(
                filter_column,
                filter_value,
                distinct_column,
                sketch,
                sink,
            )?),
        };
        Ok(estimator)
    }
}

fn require_filter_value(errors: &mut Vec<ValidationError>, value: &Value) {
    if value.is_null() {
        errors.push(ValidationError::field(
            "filter_value",
            "must not be null (null never matches)",
        ));
    }
}

fn require_rows(errors: &mut Vec<ValidationError>, original_rows: u64) {
    if original_rows == 0 {
        errors.push(ValidationError::field(
            "original_rows",
            "must be positive",
        ));
    }
}

impl Validate for EstimatorConfig {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        match self {
            Self::Mean { mean_column } => require_column(&mut errors, "mean_column", mean_column),
            Self::FilteredMean {
                filter_column,
                filter_value,
                target_column,
            } => {
                require_column(&mut errors, "filter_column", filter_column);
                require_filter_value(&mut errors, filter_value);
                require_column(&mut errors, "target_column", target_column);
            }
            Self::GroupedMean {
                group_column,
                target_column,
            } => {
                require_column(&mut errors, "group_column", group_column);
                require_column(&mut errors, "target_column", target_column);
            }
            Self::GroupedSum {
                original_rows,
                group_column,
                sum_column,
            } => {
                require_rows(&mut errors, *original_rows);
                require_column(&mut errors, "group_column", group_column);
                require_column(&mut errors, "sum_column", sum_column);
            }
            Self::GroupedCount {
                original_rows,
                group_column,
                count_column,
            } => {
                require_rows(&mut errors, *original_rows);
                require_column(&mut errors, "group_column", group_column);
                require_column(&mut errors, "count_column", count_column);
            }
            Self::FilteredDistinct {
                filter_column,
                filter_value,
                distinct_column,
                sketch,
            } => {
                require_column(&mut errors, "filter_column", filter_column);
                require_filter_value(&mut errors, filter_value);
                require_column(&mut errors, "distinct_column", distinct_column);
                if let Err(sketch_errors) = sketch.validate() {
                    errors.extend(sketch_errors.into_iter().map(|e| e.within("sketch")));
                }
            }
        }
        into_result(errors)
    }
}

/// A named estimator inside a [`SessionConfig`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimatorEntry {
    pub name: String,
    #[serde(flatten)]
    pub config: EstimatorConfig,
}

impl EstimatorEntry {
    pub fn new(name: impl Into<String>, config: EstimatorConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Every estimator of a session, in processing order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub estimators: Vec<EstimatorEntry>,
}

impl SessionConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    /// Fails on malformed JSON or an invalid configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("parse session config")?;
        config.validate().map_err(OlaError::InvalidConfig)?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    ///
    /// # Errors
    /// Fails when the file cannot be read, or as [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read session config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("load {}", path.display()))
    }

    /// Serialize as pretty JSON.
    ///
    /// # Errors
    /// Fails only if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Validate for SessionConfig {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        if self.estimators.is_empty() {
            errors.push(ValidationError::field(
                "estimators",
                "at least one estimator is required",
            ));
        }
        let mut seen = HashSet::new();
        for (i, entry) in self.estimators.iter().enumerate() {
            let path = format!("estimators[{i}]");
            if entry.name.trim().is_empty() {
                errors.push(ValidationError::field("name", "must not be empty").within(&path));
            } else if !seen.insert(entry.name.as_str()) {
                errors.push(
                    ValidationError::field("name", format!("duplicate estimator name '{}'", entry.name))
                        .within(&path),
                );
            }
            if let Err(entry_errors) = entry.config.validate() {
                errors.extend(entry_errors.into_iter().map(|e| e.within(&path)));
            }
        }
        into_result(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tag_round_trips_through_json() {
        let json = r#"{"kind":"filtered_distinct","filter_column":"category",
                       "filter_value":"A","distinct_column":"value"}"#;
        let cfg: EstimatorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.kind(), "filtered_distinct");
        match cfg {
            EstimatorConfig::FilteredDistinct { sketch, .. } => {
                assert_eq!(sketch, SketchConfig::default());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn every_violation_is_reported() {
        let cfg = EstimatorConfig::GroupedSum {
            original_rows: 0,
            group_column: String::new(),
            sum_column: "v".into(),
        };
        let errors = cfg.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field.as_deref(), Some("original_rows"));
        assert_eq!(errors[1].field.as_deref(), Some("group_column"));
    }

    #[test]
    fn nested_sketch_errors_carry_their_path() {
        let cfg = EstimatorConfig::FilteredDistinct {
            filter_column: "c".into(),
            filter_value: Value::from("A"),
            distinct_column: "v".into(),
            sketch: SketchConfig {
                precision: 30,
                seed: 0,
            },
        };
        let errors = cfg.validate().unwrap_err();
        assert_eq!(errors[0].field.as_deref(), Some("sketch.precision"));
    }
}
