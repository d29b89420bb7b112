//! Scalar means: `MeanEstimator`, `FilteredMeanEstimator`

use crate::accumulator::RunningAggregate;
use crate::combiners::Mean;
use crate::estimator::{Emitter, EmitterStats, Estimator, scalar_emission};
use crate::filter::EqualityFilter;
use crate::sink::{Emission, Sink};
use crate::slice::Slice;
use crate::value::Value;
use anyhow::Result;

/* ===================== MeanEstimator ===================== */

/// Running mean of one column.
///
/// Emits `[sum / count]` under the empty label after every slice, once at least
/// one non-null value has been seen.
#[derive(Debug)]
pub struct MeanEstimator {
    mean_column: String,
    state: RunningAggregate<Mean>,
    rows_seen: u64,
    slices: u64,
    emitter: Emitter,
}

impl MeanEstimator {
    pub fn new(mean_column: impl Into<String>, sink: impl Sink + 'static) -> Self {
        Self {
            mean_column: mean_column.into(),
            state: RunningAggregate::new(Mean),
            rows_seen: 0,
            slices: 0,
            emitter: Emitter::new(sink),
        }
    }

    /// Running `(sum, count)`.
    #[must_use]
    pub fn totals(&self) -> (f64, u64) {
        let acc = self.state.accumulator();
        (acc.sum, acc.count)
    }
}

impl Estimator for MeanEstimator {
    fn name(&self) -> &'static str {
        "mean"
    }

    fn process_slice(&mut self, slice: &Slice) -> Result<()> {
        slice.require_columns(&[self.mean_column.as_str()])?;
        let partial = self.state.partial(slice.rows(), &self.mean_column)?;
        self.state.absorb(partial);
        self.rows_seen += slice.len() as u64;
        self.slices += 1;
        let snapshot = self.snapshot();
        self.emitter.emit_if_defined(snapshot)
    }

    fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    fn snapshot(&mut self) -> Option<Emission> {
        scalar_emission(self.state.estimate(), self.slices)
    }

    fn emitter_stats(&self) -> EmitterStats {
        self.emitter.stats()
    }
}

/* ===================== FilteredMeanEstimator ===================== */

/// Running mean of `target_column` over rows where `filter_column == filter_value`.
///
/// Rows failing the filter contribute nothing. Comparing the filter value against
/// a column of another kind fails the slice instead of matching nothing.
#[derive(Debug)]
pub struct FilteredMeanEstimator {
    filter: EqualityFilter,
    target_column: String,
    state: RunningAggregate<Mean>,
    rows_seen: u64,
    slices: u64,
    emitter: Emitter,
}

impl FilteredMeanEstimator {
    pub fn new(
        filter_column: impl Into<String>,
        filter_value: impl Into<Value>,
        target_column: impl Into<String>,
        sink: impl Sink + 'static,
    ) -> Self {
        Self {
            filter: EqualityFilter::new(filter_column, filter_value),
            target_column: target_column.into(),
            state: RunningAggregate::new(Mean),
            rows_seen: 0,
            slices: 0,
            emitter: Emitter::new(sink),
        }
    }

    #[must_use]
    pub const fn filter(&self) -> &EqualityFilter {
        &self.filter
    }

    /// Running `(sum, count)` of the filtered population.
    #[must_use]
    pub fn totals(&self) -> (f64, u64) {
        let acc = self.state.accumulator();
        (acc.sum, acc.count)
    }
}

impl Estimator for FilteredMeanEstimator {
    fn name(&self) -> &'static str {
        "filtered_mean"
    }

    fn process_slice(&mut self, slice: &Slice) -> Result<()> {
        slice.require_columns(&[self.filter.column.as_str(), self.target_column.as_str()])?;
        let kept = self.filter.apply(slice)?;
        let partial = self.state.partial(kept, &self.target_column)?;
        self.state.absorb(partial);
        self.rows_seen += slice.len() as u64;
        self.slices += 1;
        let snapshot = self.snapshot();
        self.emitter.emit_if_defined(snapshot)
    }

    fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    fn snapshot(&mut self) -> Option<Emission> {
        scalar_emission(self.state.estimate(), self.slices)
    }

    fn emitter_stats(&self) -> EmitterStats {
        self.emitter.stats()
    }
}
