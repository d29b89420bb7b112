//! Builders for assembling slices in tests.

use crate::slice::{Row, Schema, Slice};
use crate::value::Value;
use std::sync::Arc;

/// A fluent builder for [`Slice`]s with a fixed column list.
///
/// Rows are given positionally in column order. Columns declared but absent from
/// every row still belong to the schema, which is what distinguishes a slice that
/// happens to hold only nulls from one missing the column.
///
/// # Example
///
/// ```
/// use ironola::Value;
/// use ironola::testing::SliceBuilder;
///
/// let slice = SliceBuilder::new(["category", "value"])
///     .row([Value::from("x"), Value::from(1)])
///     .row([Value::from("y"), Value::Null])
///     .build();
///
/// assert_eq!(slice.len(), 2);
/// assert!(slice.schema().contains("value"));
/// ```
#[derive(Clone, Debug)]
pub struct SliceBuilder {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl SliceBuilder {
    /// Start a slice over `columns`.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Add one row, values in column order.
    ///
    /// # Panics
    ///
    /// Panics if the number of values differs from the number of columns.
    #[must_use]
    pub fn row<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let values: Vec<Value> = values.into_iter().collect();
        assert_eq!(
            values.len(),
            self.columns.len(),
            "row has {} values for columns {:?}",
            values.len(),
            self.columns
        );
        self.rows
            .push(self.columns.iter().cloned().zip(values).collect());
        self
    }

    /// Add `n` copies of the same row.
    #[must_use]
    pub fn repeat_row(mut self, values: &[Value], n: usize) -> Self {
        for _ in 0..n {
            self = self.row(values.iter().cloned());
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Slice {
        Slice::new(Arc::new(Schema::new(self.columns)), self.rows)
    }
}

/// A slice with the given columns and no rows.
#[must_use]
pub fn empty_slice(columns: &[&str]) -> Slice {
    SliceBuilder::new(columns.iter().copied()).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_row_copies() {
        let s = SliceBuilder::new(["a"])
            .repeat_row(&[Value::from(1)], 3)
            .build();
        assert_eq!(s.len(), 3);
        assert_eq!(s.rows()[2].get("a"), &Value::Int(1));
    }

    #[test]
    #[should_panic(expected = "row has 1 values")]
    fn arity_is_checked() {
        let _ = SliceBuilder::new(["a", "b"]).row([Value::from(1)]);
    }
}
