//! In-memory datasets and slicing.

use crate::sampling::shuffle_in_place;
use crate::slice::{Row, Schema, Slice};
use std::sync::Arc;

/// A full dataset: a schema plus every row.
///
/// This is the input a driver samples from. [`Dataset::slices`] cuts the rows into
/// contiguous batches in their current order; call [`Dataset::shuffled`] first so
/// each batch is a uniform sample of the remainder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    schema: Arc<Schema>,
    rows: Vec<Row>,
}

impl Dataset {
    #[must_use]
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self {
            schema: Arc::new(schema),
            rows,
        }
    }

    /// Dataset whose schema is the first-seen union of the rows' columns.
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut schema = Schema::default();
        for row in &rows {
            for c in row.columns() {
                schema.push(c.to_string());
            }
        }
        Self::new(schema, rows)
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row count; the `original_rows` of scaled estimators fed from this dataset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Same rows in a seeded uniform random order.
    #[must_use]
    pub fn shuffled(mut self, seed: u64) -> Self {
        shuffle_in_place(&mut self.rows, seed);
        self
    }

    /// Contiguous slices of at most `slice_rows` rows (a zero size is treated as one).
    pub fn slices(&self, slice_rows: usize) -> impl Iterator<Item = Slice> + '_ {
        self.rows
            .chunks(slice_rows.max(1))
            .map(|chunk| Slice::new(Arc::clone(&self.schema), chunk.to_vec()))
    }
}
