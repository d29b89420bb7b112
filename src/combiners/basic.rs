//! Basic arithmetic combiners: Sum, Count

use crate::combiners::CombineFn;
use crate::error::OlaError;
use crate::value::Value;

/* ===================== Sum ===================== */

/// Sum of the numeric values of a column.
///
/// - Accumulator: `f64`
/// - Output: the sum; defined even when nothing was added (`0.0`).
///
/// Strings and booleans fail with [`OlaError::NonNumeric`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Sum;

impl CombineFn for Sum {
    type Acc = f64;

    fn add_input(&self, acc: &mut f64, column: &str, v: &Value) -> Result<(), OlaError> {
        if let Some(x) = v.numeric(column)? {
            *acc += x;
        }
        Ok(())
    }

    fn merge(&self, acc: &mut f64, other: f64) {
        *acc += other;
    }

    fn finish(&self, acc: &f64) -> Option<f64> {
        Some(*acc)
    }
}

/* ===================== Count ===================== */

/// Number of non-null values in a column, of any kind.
///
/// - Accumulator: `u64`
/// - Output: the count as `f64`
#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl CombineFn for Count {
    type Acc = u64;

    fn add_input(&self, acc: &mut u64, _column: &str, v: &Value) -> Result<(), OlaError> {
        if !v.is_null() {
            *acc += 1;
        }
        Ok(())
    }

    fn merge(&self, acc: &mut u64, other: u64) {
        *acc += other;
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(&self, acc: &u64) -> Option<f64> {
        Some(*acc as f64)
    }
}
