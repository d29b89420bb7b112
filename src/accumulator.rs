//! Running estimator state built on [`CombineFn`].
//!
//! - [`RunningAggregate`] -- one accumulator for the whole (optionally filtered) population.
//! - [`GroupedAggregate`] -- one accumulator per group key, kept in first-seen order.
//!
//! Both separate computing a slice's partial from absorbing it, so a slice that
//! fails half way leaves the running state untouched.

use crate::combiners::CombineFn;
use crate::error::OlaError;
use crate::slice::{Row, Slice};
use crate::value::Value;
use indexmap::IndexMap;

/// Scalar running state.
#[derive(Clone, Debug, Default)]
pub struct RunningAggregate<C: CombineFn> {
    combiner: C,
    acc: C::Acc,
}

impl<C: CombineFn> RunningAggregate<C> {
    pub fn new(combiner: C) -> Self {
        let acc = combiner.create();
        Self { combiner, acc }
    }

    /// Partial accumulator of `column` over `rows`.
    ///
    /// # Errors
    /// Propagates combiner failures.
    pub fn partial<'a, I>(&self, rows: I, column: &str) -> Result<C::Acc, OlaError>
    where
        I: IntoIterator<Item = &'a Row>,
    {
        self.combiner.build_from_rows(rows, column)
    }

    pub fn absorb(&mut self, partial: C::Acc) {
        self.combiner.merge(&mut self.acc, partial);
    }

    #[must_use]
    pub fn estimate(&self) -> Option<f64> {
        self.combiner.finish(&self.acc)
    }

    #[must_use]
    pub const fn accumulator(&self) -> &C::Acc {
        &self.acc
    }
}

/// Per-group running state in first-seen group order.
///
/// Once a key is present it stays present; later slices without rows for it leave
/// its accumulator unchanged.
#[derive(Clone, Debug, Default)]
pub struct GroupedAggregate<C: CombineFn> {
    combiner: C,
    groups: IndexMap<Value, C::Acc>,
}

impl<C: CombineFn> GroupedAggregate<C> {
    pub fn new(combiner: C) -> Self {
        Self {
            combiner,
            groups: IndexMap::new(),
        }
    }

    /// Partial accumulators of `column` for every group present in `slice`.
    ///
    /// # Errors
    /// Propagates combiner failures.
    pub fn partial(
        &self,
        slice: &Slice,
        group_column: &str,
        column: &str,
    ) -> Result<IndexMap<Value, C::Acc>, OlaError> {
        slice
            .group_by(group_column)
            .into_iter()
            .map(|(key, rows)| Ok((key, self.combiner.build_from_rows(rows, column)?)))
            .collect()
    }

    /// Merge per-group partials. New groups are appended in the partial's order;
    /// a new group whose partial is empty is not created.
    pub fn absorb(&mut self, partial: IndexMap<Value, C::Acc>) {
        for (key, acc) in partial {
            if let Some(existing) = self.groups.get_mut(&key) {
                self.combiner.merge(existing, acc);
            } else if !self.combiner.is_empty(&acc) {
                self.groups.insert(key, acc);
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.groups.keys()
    }

    /// `(key, estimate)` for every known group, in first-seen order.
    pub fn estimates(&self) -> impl Iterator<Item = (&Value, Option<f64>)> {
        self.groups
            .iter()
            .map(|(k, acc)| (k, self.combiner.finish(acc)))
    }

    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&C::Acc> {
        self.groups.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
