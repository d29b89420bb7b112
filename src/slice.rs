//! Rows and slices.
//!
//! A [`Slice`] is one batch of [`Row`]s handed to
//! [`Estimator::process_slice`](crate::Estimator::process_slice). Every slice carries
//! the [`Schema`] of the dataset it was drawn from so estimators can reject a
//! misconfigured column even when the slice happens to be empty.

use crate::error::OlaError;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Ordered list of column names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::default();
        for c in columns {
            schema.push(c.into());
        }
        schema
    }

    /// Append a column unless it is already present.
    pub fn push(&mut self, column: String) {
        if !self.contains(&column) {
            self.columns.push(column);
        }
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Fail with [`OlaError::MissingColumn`] unless `column` is part of the schema.
    ///
    /// # Errors
    /// Returns the missing-column error.
    pub fn require(&self, column: &str) -> Result<(), OlaError> {
        if self.contains(column) {
            Ok(())
        } else {
            Err(OlaError::MissingColumn {
                column: column.to_string(),
                available: self.columns.clone(),
            })
        }
    }
}

/// One record: column name to value. Columns absent from the map read as null.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    values: IndexMap<String, Value>,
}

static NULL: Value = Value::Null;

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    /// Value of `column`; null when the row has no entry for it.
    #[must_use]
    pub fn get(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&NULL)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A batch of rows sharing one schema.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Slice {
    schema: Arc<Schema>,
    rows: Vec<Row>,
}

impl Slice {
    /// Slice over an explicit schema.
    #[must_use]
    pub const fn new(schema: Arc<Schema>, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    /// Slice whose schema is the first-seen union of the rows' columns.
    ///
    /// An empty `rows` yields a slice with an empty schema, which no column check can fail.
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut schema = Schema::default();
        for row in &rows {
            for c in row.columns() {
                schema.push(c.to_string());
            }
        }
        Self::new(Arc::new(schema), rows)
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check that every configured column exists.
    ///
    /// Slices without a schema (built from zero rows) pass trivially.
    ///
    /// # Errors
    /// Returns [`OlaError::MissingColumn`] for the first absent column.
    pub fn require_columns(&self, columns: &[&str]) -> Result<(), OlaError> {
        if self.schema.is_empty() {
            return Ok(());
        }
        columns.iter().try_for_each(|c| self.schema.require(c))
    }

    /// Partition rows by the normalized value of `group_column`, in first-seen order.
    ///
    /// Rows whose group value is null belong to no group.
    #[must_use]
    pub fn group_by(&self, group_column: &str) -> IndexMap<Value, Vec<&Row>> {
        let mut groups: IndexMap<Value, Vec<&Row>> = IndexMap::new();
        for row in &self.rows {
            if let Some(key) = row.get(group_column).group_key() {
                groups.entry(key).or_default().push(row);
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_by_keeps_first_seen_order_and_drops_nulls() {
        let slice = Slice::from_rows(vec![
            Row::new().with("g", "b").with("v", 1),
            Row::new().with("g", "a").with("v", 2),
            Row::new().with("g", Value::Null).with("v", 3),
            Row::new().with("g", "b").with("v", 4),
        ]);
        let groups = slice.group_by("g");
        let keys: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(keys, vec![Value::from("b"), Value::from("a")]);
        assert_eq!(groups[&Value::from("b")].len(), 2);
    }

    #[test]
    fn empty_slice_passes_column_checks() {
        assert!(Slice::from_rows(vec![]).require_columns(&["x"]).is_ok());
        let schema = Arc::new(Schema::new(["a"]));
        let err = Slice::new(schema, vec![]).require_columns(&["x"]).unwrap_err();
        assert!(matches!(err, OlaError::MissingColumn { .. }));
    }
}
