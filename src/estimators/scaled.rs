//! Scaled grouped totals: `GroupedSumEstimator`, `GroupedCountEstimator`

use crate::accumulator::GroupedAggregate;
use crate::combiners::{CombineFn, Count, Sum};
use crate::estimator::{Emitter, EmitterStats, Estimator};
use crate::sink::{Emission, Sink};
use crate::slice::Slice;
use crate::value::Value;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Projection of sample totals onto the full dataset.
///
/// `factor = original_rows / rows_processed`, undefined while nothing has been
/// processed. Once every row has been seen exactly once the factor is `1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingFactor {
    pub original_rows: u64,
    pub rows_processed: u64,
}

impl ScalingFactor {
    #[must_use]
    pub const fn new(original_rows: u64) -> Self {
        Self {
            original_rows,
            rows_processed: 0,
        }
    }

    pub const fn record(&mut self, rows: u64) {
        self.rows_processed += rows;
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn factor(&self) -> Option<f64> {
        (self.rows_processed > 0).then(|| self.original_rows as f64 / self.rows_processed as f64)
    }
}

/// Shared state of the scaled estimators: raw per-group totals plus the row tally.
#[derive(Debug)]
struct ScaledGroups<C: CombineFn> {
    group_column: String,
    value_column: String,
    state: GroupedAggregate<C>,
    scaling: ScalingFactor,
    slices: u64,
    emitter: Emitter,
}

impl<C: CombineFn> ScaledGroups<C> {
    fn new(
        combiner: C,
        original_rows: u64,
        group_column: String,
        value_column: String,
        sink: impl Sink + 'static,
    ) -> Self {
        Self {
            group_column,
            value_column,
            state: GroupedAggregate::new(combiner),
            scaling: ScalingFactor::new(original_rows),
            slices: 0,
            emitter: Emitter::new(sink),
        }
    }

    fn process_slice(&mut self, slice: &Slice) -> Result<()> {
        slice.require_columns(&[self.group_column.as_str(), self.value_column.as_str()])?;
        let partial = self
            .state
            .partial(slice, &self.group_column, &self.value_column)?;
        self.state.absorb(partial);
        self.scaling.record(slice.len() as u64);
        self.slices += 1;
        let snapshot = self.snapshot();
        self.emitter.emit_if_defined(snapshot)
    }

    fn snapshot(&self) -> Option<Emission> {
        let factor = self.scaling.factor()?;
        let mut groups = Vec::with_capacity(self.state.len());
        let mut values = Vec::with_capacity(self.state.len());
        for (key, raw) in self.state.estimates() {
            groups.push(key.clone());
            values.push(raw? * factor);
        }
        Some(Emission {
            sequence: self.slices,
            groups,
            values,
        })
    }

    fn raw(&self) -> Vec<(Value, f64)> {
        self.state
            .estimates()
            .filter_map(|(k, v)| v.map(|v| (k.clone(), v)))
            .collect()
    }
}

macro_rules! scaled_estimator_common {
    ($name:literal) => {
        fn name(&self) -> &'static str {
            $name
        }

        fn process_slice(&mut self, slice: &Slice) -> Result<()> {
            self.inner.process_slice(slice)
        }

        fn rows_seen(&self) -> u64 {
            self.inner.scaling.rows_processed
        }

        fn snapshot(&mut self) -> Option<Emission> {
            self.inner.snapshot()
        }

        fn emitter_stats(&self) -> EmitterStats {
            self.inner.emitter.stats()
        }
    };
}

macro_rules! scaled_accessors {
    () => {
        /// Rows absorbed so far.
        #[must_use]
        pub const fn rows_processed(&self) -> u64 {
            self.inner.scaling.rows_processed
        }

        /// Size of the full dataset given at construction.
        #[must_use]
        pub const fn original_rows(&self) -> u64 {
            self.inner.scaling.original_rows
        }

        /// Current projection factor, `None` before the first row.
        #[must_use]
        pub fn scaling_factor(&self) -> Option<f64> {
            self.inner.scaling.factor()
        }

        /// Known groups in first-seen order.
        #[must_use]
        pub fn groups(&self) -> Vec<Value> {
            self.inner.state.keys().cloned().collect()
        }

        /// Unscaled per-group totals in first-seen order.
        #[must_use]
        pub fn raw_totals(&self) -> Vec<(Value, f64)> {
            self.inner.raw()
        }
    };
}

/* ===================== GroupedSumEstimator ===================== */

/// Estimated per-group sum of `sum_column` over the full dataset.
///
/// Each group's raw running sum is multiplied by the global
/// `original_rows / rows_processed`. Nothing is emitted before the first row.
#[derive(Debug)]
pub struct GroupedSumEstimator {
    inner: ScaledGroups<Sum>,
}

impl GroupedSumEstimator {
    pub fn new(
        original_rows: u64,
        group_column: impl Into<String>,
        sum_column: impl Into<String>,
        sink: impl Sink + 'static,
    ) -> Self {
        Self {
            inner: ScaledGroups::new(
                Sum,
                original_rows,
                group_column.into(),
                sum_column.into(),
                sink,
            ),
        }
    }

    scaled_accessors!();
}

impl Estimator for GroupedSumEstimator {
    scaled_estimator_common!("grouped_sum");
}

/* ===================== GroupedCountEstimator ===================== */

/// Estimated per-group count of non-null `count_column` values over the full dataset.
///
/// Same projection as [`GroupedSumEstimator`], applied to counts.
#[derive(Debug)]
pub struct GroupedCountEstimator {
    inner: ScaledGroups<Count>,
}

impl GroupedCountEstimator {
    pub fn new(
        original_rows: u64,
        group_column: impl Into<String>,
        count_column: impl Into<String>,
        sink: impl Sink + 'static,
    ) -> Self {
        Self {
            inner: ScaledGroups::new(
                Count,
                original_rows,
                group_column.into(),
                count_column.into(),
                sink,
            ),
        }
    }

    scaled_accessors!();
}

impl Estimator for GroupedCountEstimator {
    scaled_estimator_common!("grouped_count");
}
