//! Equality predicates over a single column.

use crate::error::OlaError;
use crate::slice::{Row, Slice};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Keeps rows whose `column` equals `value` exactly (no pattern matching).
///
/// Comparison is type-checked: a string filter value against a numeric column
/// is a [`OlaError::TypeMismatch`], not a silent non-match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualityFilter {
    pub column: String,
    pub value: Value,
}

impl EqualityFilter {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// # Errors
    /// Fails on a type mismatch between the row value and the filter value.
    pub fn matches(&self, row: &Row) -> Result<bool, OlaError> {
        row.get(&self.column).checked_eq(&self.value, &self.column)
    }

    /// Rows of `slice` that pass the filter, in slice order.
    ///
    /// # Errors
    /// Fails on the first type mismatch.
    pub fn apply<'a>(&self, slice: &'a Slice) -> Result<Vec<&'a Row>, OlaError> {
        let mut kept = Vec::new();
        for row in slice.rows() {
            if self.matches(row)? {
                kept.push(row);
            }
        }
        Ok(kept)
    }
}
