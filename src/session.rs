//! Driving many estimators over one stream of slices.
//!
//! A [`Session`] owns named estimators and hands every slice to each of them in
//! registration order. A failing estimator does not stop the others: its error is
//! collected in the [`SliceReport`] and its state stays as it was before the slice.
//!
//! ```
//! use ironola::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let sink = RecordingSink::new();
//! let mut session = Session::new();
//! session.add("avg", MeanEstimator::new("value", sink.clone()))?;
//! session.add("broken", MeanEstimator::new("nope", NullSink))?;
//!
//! let reports = session.run_dataset(&testing::category_value_dataset(), 3)?;
//! assert_eq!(reports.len(), 2);
//! assert_eq!(reports[0].failures.len(), 1);
//! assert_eq!(sink.last().unwrap().values, vec![3.5]);
//! # Ok(())
//! # }
//! ```

use crate::config::SessionConfig;
use crate::dataset::Dataset;
use crate::error::OlaError;
use crate::estimator::{EmitterStats, Estimator};
#[cfg(feature = "metrics")]
use crate::metrics::{self, MetricsCollector};
use crate::sink::Sink;
use crate::slice::Slice;
use crate::validation::ValidationError;
use anyhow::Result;
use std::fmt;
#[cfg(feature = "metrics")]
use std::time::Instant;

struct Entry {
    name: String,
    estimator: Box<dyn Estimator>,
}

/// One estimator's failure on one slice.
#[derive(Debug)]
pub struct EstimatorFailure {
    pub name: String,
    pub error: anyhow::Error,
}

impl fmt::Display for EstimatorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:#}", self.name, self.error)
    }
}

/// Outcome of feeding one slice to every estimator of a session.
#[derive(Debug, Default)]
pub struct SliceReport {
    /// 1-based slice number within the session.
    pub sequence: u64,
    pub rows: usize,
    pub failures: Vec<EstimatorFailure>,
}

impl SliceReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// The failure of estimator `name`, if it failed.
    #[must_use]
    pub fn failure(&self, name: &str) -> Option<&EstimatorFailure> {
        self.failures.iter().find(|f| f.name == name)
    }
}

/// A set of named estimators fed from one stream of slices.
#[derive(Default)]
pub struct Session {
    entries: Vec<Entry>,
    slices: u64,
    rows: u64,
    #[cfg(feature = "metrics")]
    metrics: Option<MetricsCollector>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one estimator per configuration entry, asking `sink_for` for each
    /// estimator's sink by name.
    ///
    /// # Errors
    /// Fails with [`OlaError::InvalidConfig`] when the configuration is invalid.
    pub fn from_config<F>(config: &SessionConfig, mut sink_for: F) -> Result<Self>
    where
        F: FnMut(&str) -> Box<dyn Sink>,
    {
        crate::validation::Validate::validate(config).map_err(OlaError::InvalidConfig)?;
        let mut session = Self::new();
        for entry in &config.estimators {
            let estimator = entry.config.build(sink_for(&entry.name))?;
            session.add_boxed(&entry.name, estimator)?;
        }
        Ok(session)
    }

    /// Attach a metrics collector; see [`metrics`](crate::metrics) for what is recorded.
    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[cfg(feature = "metrics")]
    #[must_use]
    pub const fn metrics(&self) -> Option<&MetricsCollector> {
        self.metrics.as_ref()
    }

    /// Register an estimator under a unique name.
    ///
    /// # Errors
    /// Fails with [`OlaError::InvalidConfig`] on an empty or duplicate name.
    pub fn add(&mut self, name: impl Into<String>, estimator: impl Estimator + 'static) -> Result<()> {
        self.add_boxed(name, Box::new(estimator))
    }

    /// [`add`](Self::add) for an already boxed estimator.
    ///
    /// # Errors
    /// Fails with [`OlaError::InvalidConfig`] on an empty or duplicate name.
    pub fn add_boxed(&mut self, name: impl Into<String>, estimator: Box<dyn Estimator>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(OlaError::InvalidConfig(vec![ValidationError::field(
                "name",
                "must not be empty",
            )])
            .into());
        }
        if self.entries.iter().any(|e| e.name == name) {
            return Err(OlaError::InvalidConfig(vec![ValidationError::field(
                "name",
                format!("duplicate estimator name '{name}'"),
            )])
            .into());
        }
        self.entries.push(Entry { name, estimator });
        Ok(())
    }

    /// Feed `slice` to every estimator, collecting failures instead of stopping.
    pub fn process_slice(&mut self, slice: &Slice) -> SliceReport {
        #[cfg(feature = "metrics")]
        let started = Instant::now();
        #[cfg(feature = "metrics")]
        let before = self.emitter_totals();

        self.slices += 1;
        self.rows += slice.len() as u64;
        let mut report = SliceReport {
            sequence: self.slices,
            rows: slice.len(),
            failures: Vec::new(),
        };
        for entry in &mut self.entries {
            if let Err(error) = entry.estimator.process_slice(slice) {
                report.failures.push(EstimatorFailure {
                    name: entry.name.clone(),
                    error,
                });
            }
        }

        #[cfg(feature = "metrics")]
        self.record_metrics(&report, before, started);
        report
    }

    /// Split `dataset` into contiguous slices of `slice_rows` rows and process them
    /// in order.
    ///
    /// # Errors
    /// Fails with [`OlaError::InvalidConfig`] when `slice_rows` is zero. Estimator
    /// failures are reported per slice, not returned.
    pub fn run_dataset(&mut self, dataset: &Dataset, slice_rows: usize) -> Result<Vec<SliceReport>> {
        if slice_rows == 0 {
            return Err(OlaError::InvalidConfig(vec![ValidationError::field(
                "slice_rows",
                "must be positive",
            )])
            .into());
        }
        #[cfg(feature = "metrics")]
        if let Some(m) = &self.metrics {
            m.record_start();
        }
        let reports = dataset
            .slices(slice_rows)
            .map(|slice| self.process_slice(&slice))
            .collect();
        #[cfg(feature = "metrics")]
        if let Some(m) = &self.metrics {
            m.record_end();
        }
        Ok(reports)
    }

    /// Registered names in processing order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn estimator(&self, name: &str) -> Option<&dyn Estimator> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.estimator.as_ref())
    }

    #[must_use]
    pub fn estimator_mut(&mut self, name: &str) -> Option<&mut (dyn Estimator + 'static)> {
        self.entries
            .iter_mut()
            .find(|e| e.name == name)
            .map(|e| e.estimator.as_mut())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn slices_processed(&self) -> u64 {
        self.slices
    }

    #[must_use]
    pub const fn rows_processed(&self) -> u64 {
        self.rows
    }

    /// Emitted and suppressed counts summed over all estimators.
    #[must_use]
    pub fn emitter_totals(&self) -> EmitterStats {
        self.entries
            .iter()
            .map(|e| e.estimator.emitter_stats())
            .fold(EmitterStats::default(), |acc, s| EmitterStats {
                emitted: acc.emitted + s.emitted,
                suppressed: acc.suppressed + s.suppressed,
            })
    }

    #[cfg(feature = "metrics")]
    #[allow(clippy::cast_precision_loss)]
    fn record_metrics(&self, report: &SliceReport, before: EmitterStats, started: Instant) {
        let Some(m) = &self.metrics else {
            return;
        };
        let after = self.emitter_totals();
        m.increment_counter(metrics::SLICES_PROCESSED, 1);
        m.increment_counter(metrics::ROWS_PROCESSED, report.rows as u64);
        m.increment_counter(metrics::EMISSIONS, after.emitted - before.emitted);
        m.increment_counter(
            metrics::SUPPRESSED_EMISSIONS,
            after.suppressed - before.suppressed,
        );
        m.increment_counter(metrics::ESTIMATOR_ERRORS, report.failures.len() as u64);
        m.record_histogram(metrics::SLICE_ROWS, report.rows as f64);
        m.set_gauge(
            metrics::LAST_SLICE_MS,
            started.elapsed().as_secs_f64() * 1000.0,
        );
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("estimators", &self.names().collect::<Vec<_>>())
            .field("slices", &self.slices)
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}
