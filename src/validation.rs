//! Configuration validation.
//!
//! Estimator and session configurations implement [`Validate`]; building from a
//! configuration validates first and reports every problem at once as
//! [`OlaError::InvalidConfig`](crate::OlaError::InvalidConfig).
//!
//! # Example
//!
//! ```
//! use ironola::validation::*;
//!
//! struct Window { rows: usize }
//!
//! impl Validate for Window {
//!     fn validate(&self) -> ValidationResult {
//!         if self.rows == 0 {
//!             return Err(vec![ValidationError::field("rows", "must be positive")]);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! assert!(Window { rows: 0 }.validate().is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for validation operations.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Trait for types that can be validated.
pub trait Validate {
    /// Validate this instance and return a list of errors if invalid.
    ///
    /// # Errors
    /// Returns every rule the instance violates.
    fn validate(&self) -> ValidationResult;
}

/// A single validation error with context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// The field that failed validation (optional)
    pub field: Option<String>,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error with just a message.
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Create a validation error for a specific field.
    pub fn field<S: Into<String>, M: Into<String>>(field: S, message: M) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Prefix the field path, e.g. `sum_column` becomes `estimators[2].sum_column`.
    #[must_use]
    pub fn within(mut self, parent: &str) -> Self {
        self.field = Some(match self.field {
            Some(f) => format!("{parent}.{f}"),
            None => parent.to_string(),
        });
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref field) = self.field {
            write!(f, "[{}] {}", field, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Require a non-blank string field.
pub(crate) fn require_column(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::field(field, "column name must not be empty"));
    }
}

/// Collapse an error list into a [`ValidationResult`].
pub(crate) fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Format a list of errors as a `; `-separated string.
#[must_use]
pub fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
