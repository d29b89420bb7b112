//! Grouped mean: `GroupedMeanEstimator`

use crate::accumulator::GroupedAggregate;
use crate::combiners::{Mean, MeanAcc};
use crate::estimator::{Emitter, EmitterStats, Estimator, grouped_emission};
use crate::sink::{Emission, Sink};
use crate::slice::Slice;
use crate::value::Value;
use anyhow::Result;

/// Running mean of `target_column` per value of `group_column`.
///
/// Groups are reported in the order they were first seen and stay in every
/// later emission. A group is only created once it has a non-null target value,
/// so every reported mean is defined.
#[derive(Debug)]
pub struct GroupedMeanEstimator {
    group_column: String,
    target_column: String,
    state: GroupedAggregate<Mean>,
    rows_seen: u64,
    slices: u64,
    emitter: Emitter,
}

impl GroupedMeanEstimator {
    pub fn new(
        group_column: impl Into<String>,
        target_column: impl Into<String>,
        sink: impl Sink + 'static,
    ) -> Self {
        Self {
            group_column: group_column.into(),
            target_column: target_column.into(),
            state: GroupedAggregate::new(Mean),
            rows_seen: 0,
            slices: 0,
            emitter: Emitter::new(sink),
        }
    }

    /// Known groups in first-seen order.
    #[must_use]
    pub fn groups(&self) -> Vec<Value> {
        self.state.keys().cloned().collect()
    }

    /// Running `(sum, count)` of one group.
    #[must_use]
    pub fn totals(&self, group: &Value) -> Option<(f64, u64)> {
        self.state
            .get(group)
            .map(|MeanAcc { sum, count }| (*sum, *count))
    }
}

impl Estimator for GroupedMeanEstimator {
    fn name(&self) -> &'static str {
        "grouped_mean"
    }

    fn process_slice(&mut self, slice: &Slice) -> Result<()> {
        slice.require_columns(&[self.group_column.as_str(), self.target_column.as_str()])?;
        let partial = self
            .state
            .partial(slice, &self.group_column, &self.target_column)?;
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
        if self.state.is_empty() {
            return None;
        }
        grouped_emission(self.state.estimates(), self.slices)
    }

    fn emitter_stats(&self) -> EmitterStats {
        self.emitter.stats()
    }
}
