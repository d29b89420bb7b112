//! Filtered approximate distinct count: `FilteredDistinctEstimator`

use crate::estimator::{Emitter, EmitterStats, Estimator, scalar_emission};
use crate::filter::EqualityFilter;
use crate::sink::{Emission, Sink};
use crate::sketch::{CardinalitySketch, HllSketch, SketchConfig};
use crate::slice::Slice;
use crate::value::Value;
use anyhow::Result;

/// Approximate number of distinct `distinct_column` values over rows where
/// `filter_column == filter_value`.
///
/// Every surviving non-null value is rendered to its canonical token and added to
/// the sketch. The estimate covers what has been added so far; it is not
/// projected to the full dataset. Tokens carry the value's kind family, so a
/// column mixing numbers and strings counts `1` and `"1"` as two values.
#[derive(Debug)]
pub struct FilteredDistinctEstimator<S: CardinalitySketch = HllSketch> {
    filter: EqualityFilter,
    distinct_column: String,
    sketch: S,
    tokens_added: u64,
    rows_seen: u64,
    slices: u64,
    emitter: Emitter,
}

impl FilteredDistinctEstimator<HllSketch> {
    /// Estimator backed by a HyperLogLog++ sketch with the default [`SketchConfig`].
    ///
    /// # Errors
    /// Fails only if the default sketch configuration is rejected.
    pub fn new(
        filter_column: impl Into<String>,
        filter_value: impl Into<Value>,
        distinct_column: impl Into<String>,
        sink: impl Sink + 'static,
    ) -> Result<Self> {
        Self::with_config(
            filter_column,
            filter_value,
            distinct_column,
            SketchConfig::default(),
            sink,
        )
    }

    /// Estimator backed by a HyperLogLog++ sketch with explicit precision and seed.
    ///
    /// # Errors
    /// Fails when the precision is out of range.
    pub fn with_config(
        filter_column: impl Into<String>,
        filter_value: impl Into<Value>,
        distinct_column: impl Into<String>,
        config: SketchConfig,
        sink: impl Sink + 'static,
    ) -> Result<Self> {
        Ok(Self::with_sketch(
            filter_column,
            filter_value,
            distinct_column,
            HllSketch::new(config)?,
            sink,
        ))
    }
}

impl<S: CardinalitySketch> FilteredDistinctEstimator<S> {
    /// Estimator over any sketch implementation.
    pub fn with_sketch(
        filter_column: impl Into<String>,
        filter_value: impl Into<Value>,
        distinct_column: impl Into<String>,
        sketch: S,
        sink: impl Sink + 'static,
    ) -> Self {
        Self {
            filter: EqualityFilter::new(filter_column, filter_value),
            distinct_column: distinct_column.into(),
            sketch,
            tokens_added: 0,
            rows_seen: 0,
            slices: 0,
            emitter: Emitter::new(sink),
        }
    }

    #[must_use]
    pub const fn filter(&self) -> &EqualityFilter {
        &self.filter
    }

    /// Tokens handed to the sketch so far, duplicates included.
    #[must_use]
    pub const fn tokens_added(&self) -> u64 {
        self.tokens_added
    }

    /// Canonical tokens of the matching rows' non-null values.
    fn tokens(&self, slice: &Slice) -> Result<Vec<String>> {
        Ok(self
            .filter
            .apply(slice)?
            .into_iter()
            .filter_map(|row| row.get(&self.distinct_column).canonical_token())
            .collect())
    }
}

impl<S: CardinalitySketch> Estimator for FilteredDistinctEstimator<S> {
    fn name(&self) -> &'static str {
        "filtered_distinct"
    }

    fn process_slice(&mut self, slice: &Slice) -> Result<()> {
        slice.require_columns(&[self.filter.column.as_str(), self.distinct_column.as_str()])?;
        let tokens = self.tokens(slice)?;
        for token in &tokens {
            self.sketch.add(token);
        }
        self.tokens_added += tokens.len() as u64;
        self.rows_seen += slice.len() as u64;
        self.slices += 1;
        let snapshot = self.snapshot();
        self.emitter.emit_if_defined(snapshot)
    }

    fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    fn snapshot(&mut self) -> Option<Emission> {
        scalar_emission(Some(self.sketch.cardinality()), self.slices)
    }

    fn emitter_stats(&self) -> EmitterStats {
        self.emitter.stats()
    }
}
