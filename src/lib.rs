//! # Ironola
//!
//! **Online aggregation** for Rust: estimators that refine an aggregate slice by
//! slice while data is still arriving, instead of answering once after a full scan.
//!
//! Each estimator absorbs one [`Slice`] (a batch of rows) at a time, folds it into
//! a running state and immediately pushes the refreshed estimate to a [`Sink`].
//! When slices are drawn uniformly at random from a known dataset, the estimates
//! converge on the exact answer, reaching it once every row has been seen.
//!
//! ## Key Features
//!
//! - **Six estimators** - mean, filtered mean, grouped mean, scaled grouped sum,
//!   scaled grouped count, filtered approximate distinct count
//! - **Stable group order** - groups are reported in first-seen order and never disappear
//! - **Atomic slices** - a slice that fails leaves the estimator untouched
//! - **Pluggable sinks** - record, print a bar chart, write JSON Lines, or call a closure
//! - **Declarative sessions** - build many estimators from JSON and drive them together
//! - **I/O integrations** - CSV and JSON Lines datasets (optional via feature flags)
//!
//! ## Quick Start
//!
//! ```
//! use ironola::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let dataset = testing::category_value_dataset();
//! let sink = RecordingSink::new();
//! let mut sums = GroupedSumEstimator::new(dataset.len() as u64, "category", "value", sink.clone());
//!
//! let mut slices = dataset.slices(3);
//! if let Some(first) = slices.next() {
//!     sums.process_slice(&first)?;
//! }
//! // Half the data seen: raw sums x=3, y=3 projected by a factor of 2.
//! assert_eq!(sums.scaling_factor(), Some(2.0));
//! assert_eq!(sink.last().unwrap().values, vec![6.0, 6.0]);
//!
//! for slice in slices {
//!     sums.process_slice(&slice)?;
//! }
//! assert_eq!(sink.last().unwrap().values, vec![3.0, 12.0, 6.0]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Estimators
//!
//! Every estimator implements [`Estimator`]:
//!
//! | Estimator | Emits |
//! |---|---|
//! | [`MeanEstimator`] | `[mean]` |
//! | [`FilteredMeanEstimator`] | `[mean]` over rows passing an equality filter |
//! | [`GroupedMeanEstimator`] | one mean per group |
//! | [`GroupedSumEstimator`] | one projected sum per group |
//! | [`GroupedCountEstimator`] | one projected count per group |
//! | [`FilteredDistinctEstimator`] | `[approximate distinct count]` |
//!
//! Non-grouped estimates carry a single empty label. Estimates that are still
//! undefined (a mean with no contributing row) are not emitted at all; the
//! [`Emitter`] counts them as suppressed.
//!
//! ### Scaling
//!
//! Sum and count estimators project raw running totals onto the full dataset with
//! [`ScalingFactor`]: `original_rows / rows_processed`.
//!
//! ### Errors
//!
//! Domain failures are [`OlaError`] values inside `anyhow::Error`: a configured
//! column missing from a slice, a filter compared against the wrong kind of value,
//! a non-numeric value in a summed column, or an invalid configuration.
//!
//! ```
//! use ironola::*;
//!
//! let mut est = MeanEstimator::new("price", NullSink);
//! let err = est
//!     .process_slice(&Slice::from_rows(vec![Row::new().with("value", 1)]))
//!     .unwrap_err();
//! assert!(matches!(
//!     err.downcast_ref::<OlaError>(),
//!     Some(OlaError::MissingColumn { .. })
//! ));
//! ```
//!
//! ## Module Overview
//!
//! - [`value`], [`slice`], [`dataset`] - data model
//! - [`combiners`], [`accumulator`], [`filter`], [`sketch`] - building blocks of the estimators
//! - [`estimator`], [`estimators`] - the estimator contract and its implementations
//! - [`sink`] - estimate destinations
//! - [`config`], [`validation`], [`session`] - declarative setup and multi-estimator driving
//! - [`metrics`] - session counters and timings (feature `metrics`)
//! - [`io`] - dataset readers (features `io-csv`, `io-jsonl`)
//! - [`testing`] - fixtures and assertions for user tests

pub mod accumulator;
pub mod combiners;
pub mod config;
pub mod dataset;
pub mod error;
pub mod estimator;
pub mod estimators;
pub mod filter;
pub mod io;
pub mod sampling;
pub mod session;
pub mod sink;
pub mod sketch;
pub mod slice;
pub mod testing;
pub mod validation;
pub mod value;

#[cfg_attr(docsrs, doc(cfg(feature = "metrics")))]
#[cfg(feature = "metrics")]
pub mod metrics;

// Re-exports for convenience
pub use config::{EstimatorConfig, EstimatorEntry, SessionConfig};
pub use dataset::Dataset;
pub use error::OlaError;
pub use estimator::{Emitter, EmitterStats, Estimator};
pub use estimators::{
    FilteredDistinctEstimator, FilteredMeanEstimator, GroupedCountEstimator, GroupedMeanEstimator,
    GroupedSumEstimator, MeanEstimator, ScalingFactor,
};
pub use filter::EqualityFilter;
pub use session::{EstimatorFailure, Session, SliceReport};
pub use sink::{
    ConsoleSink, Emission, FnSink, InspectSink, JsonlSink, NullSink, RecordingSink, Sink,
};
pub use sketch::{CardinalitySketch, HllSketch, KmvSketch, SketchConfig};
pub use slice::{Row, Schema, Slice};
pub use validation::Validate;
pub use value::{Value, ValueKind};

#[cfg(feature = "metrics")]
pub use metrics::MetricsCollector;

#[cfg(feature = "io-csv")]
pub use io::csv::read_csv_dataset;

#[cfg(feature = "io-jsonl")]
pub use io::jsonl::read_jsonl_dataset;
