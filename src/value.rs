//! Scalar cell values.
//!
//! A [`Value`] is what a [`Row`](crate::Row) holds for one column: null, boolean,
//! integer, float, or string. Values know how to
//!
//! - report their [`ValueKind`] and the comparable [`KindFamily`],
//! - render the canonical token fed to cardinality sketches ([`Value::canonical_token`]),
//! - normalize themselves into group keys ([`Value::group_key`]),
//! - compare against a filter value with type checking ([`Value::checked_eq`]).

use crate::error::OlaError;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `2^63`, the first float past the `i64` range.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// One cell of a row.
///
/// Floats are wrapped in [`OrderedFloat`] so values can be hashed and used as
/// group keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value. Skipped by every aggregate.
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
}

/// The concrete representation of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

/// Kinds that may be compared with one another.
///
/// Integers and floats share the numeric family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KindFamily {
    Numeric,
    Text,
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
        };
        f.write_str(s)
    }
}

impl ValueKind {
    /// The comparison family, or `None` for null.
    #[must_use]
    pub const fn family(self) -> Option<KindFamily> {
        match self {
            Self::Null => None,
            Self::Bool => Some(KindFamily::Boolean),
            Self::Int | Self::Float => Some(KindFamily::Numeric),
            Self::Str => Some(KindFamily::Text),
        }
    }
}

impl Value {
    /// Shorthand for an empty string value, the label of non-grouped estimates.
    #[must_use]
    pub const fn empty_label() -> Self {
        Self::Str(String::new())
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value. `None` for null, booleans, and strings.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(f.into_inner()),
            _ => None,
        }
    }

    /// Numeric view for aggregation over `column`.
    ///
    /// Returns `Ok(None)` for null and [`OlaError::NonNumeric`] for booleans and strings.
    ///
    /// # Errors
    /// Fails when the value is present but not numeric.
    pub fn numeric(&self, column: &str) -> Result<Option<f64>, OlaError> {
        match self {
            Self::Null => Ok(None),
            Self::Int(_) | Self::Float(_) => Ok(self.as_f64()),
            other => Err(OlaError::NonNumeric {
                column: column.to_string(),
                found: other.kind(),
            }),
        }
    }

    /// String token identifying the logical value, used as sketch input.
    ///
    /// The token carries its kind family (`n:`, `s:` or `b:`), so `1` and `"1"`
    /// never collide. Integral floats in the `i64` range render like integers, so
    /// `3` and `3.0` produce the same token. Null has no token.
    #[must_use]
    pub fn canonical_token(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(format!("b:{b}")),
            Self::Int(i) => Some(format!("n:{i}")),
            Self::Float(f) => Some(match integral(f.into_inner()) {
                Some(i) => format!("n:{i}"),
                None => format!("n:{}", f.into_inner()),
            }),
            Self::Str(s) => Some(format!("s:{s}")),
        }
    }

    /// Normalized group key, or `None` when the value is null.
    ///
    /// Integral floats in the `i64` range become integers so `1` and `1.0` share a
    /// group, following the same rule as [`canonical_token`](Self::canonical_token).
    #[must_use]
    pub fn group_key(&self) -> Option<Self> {
        match self {
            Self::Null => None,
            Self::Float(f) => Some(integral(f.into_inner()).map_or(Self::Float(*f), Self::Int)),
            other => Some(other.clone()),
        }
    }

    /// Type-checked equality against `expected`, evaluated for `column`.
    ///
    /// Null never matches. Numbers compare numerically; strings and booleans
    /// compare exactly. Any other pairing is a [`OlaError::TypeMismatch`].
    ///
    /// # Errors
    /// Fails when the two values belong to different kind families.
    pub fn checked_eq(&self, expected: &Self, column: &str) -> Result<bool, OlaError> {
        let (Some(mine), Some(theirs)) = (self.kind().family(), expected.kind().family()) else {
            return Ok(false);
        };
        if mine != theirs {
            return Err(OlaError::TypeMismatch {
                column: column.to_string(),
                expected: expected.kind(),
                found: self.kind(),
            });
        }
        Ok(match (self, expected) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        })
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integral(f: f64) -> Option<i64> {
    let in_range = (-I64_BOUND..I64_BOUND).contains(&f);
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{}", x.into_inner()),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(OrderedFloat(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = anyhow::Error;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as J;
        Ok(match v {
            J::Null => Self::Null,
            J::Bool(b) => Self::Bool(b),
            J::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n
                    .as_f64()
                    .map(Self::from)
                    .ok_or_else(|| anyhow::anyhow!("number {n} does not fit in f64"))?,
            },
            J::String(s) => Self::Str(s),
            J::Array(_) | J::Object(_) => {
                anyhow::bail!("nested JSON values are not supported as cells: {v}")
            }
        })
    }
}
