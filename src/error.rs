//! Error taxonomy for estimators.
//!
//! Operations return `anyhow::Result`; the domain failures below are carried inside
//! and can be recovered with `err.downcast_ref::<OlaError>()`.
//!
//! A division by zero (no contributing row yet) is not an error: estimators simply
//! suppress the emission.

use crate::validation::{ValidationError, format_errors};
use crate::value::ValueKind;
use std::fmt;

/// Failures raised while configuring or feeding an estimator.
#[derive(Debug, Clone, PartialEq)]
pub enum OlaError {
    /// A configured column is absent from the slice schema.
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
    /// A value was compared against a filter value of an incompatible kind.
    TypeMismatch {
        column: String,
        expected: ValueKind,
        found: ValueKind,
    },
    /// A non-numeric value reached a sum or mean.
    NonNumeric { column: String, found: ValueKind },
    /// Construction-time configuration failed validation.
    InvalidConfig(Vec<ValidationError>),
}

impl fmt::Display for OlaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { column, available } => write!(
                f,
                "column `{column}` not found in slice schema (available: {})",
                available.join(", ")
            ),
            Self::TypeMismatch {
                column,
                expected,
                found,
            } => write!(
                f,
                "type mismatch in column `{column}`: cannot compare {found} with {expected}"
            ),
            Self::NonNumeric { column, found } => {
                write!(f, "column `{column}` holds a {found} value where a number is required")
            }
            Self::InvalidConfig(errors) => {
                write!(f, "invalid estimator configuration: {}", format_errors(errors))
            }
        }
    }
}

impl std::error::Error for OlaError {}
