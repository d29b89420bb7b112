//! Mergeable accumulators behind the estimators.
//!
//! Online aggregation absorbs a dataset one slice at a time. Every estimator does
//! this the same way: build a partial accumulator from the slice (fallible, touches
//! no running state), then [`merge`](CombineFn::merge) it into the running
//! accumulator (infallible), then [`finish`](CombineFn::finish) to read the estimate.
//!
//! - [`Sum`] -- sum of the numeric values.
//! - [`Count`] -- number of non-null values.
//! - [`Mean`] -- `sum / count` over the numeric values.
//!
//! Null values are skipped by all three.
//!
//! # Example
//! ```
//! use ironola::combiners::{CombineFn, Mean};
//! use ironola::{Row, Value};
//!
//! let rows = vec![Row::new().with("v", 1), Row::new().with("v", 3), Row::new().with("v", Value::Null)];
//! let mut running = Mean.create();
//! let partial = Mean.build_from_rows(rows.iter(), "v")?;
//! Mean.merge(&mut running, partial);
//! assert_eq!(Mean.finish(&running), Some(2.0));
//! # anyhow::Result::<()>::Ok(())
//! ```

mod basic;
mod statistical;

pub use basic::{Count, Sum};
pub use statistical::{Mean, MeanAcc};

use crate::error::OlaError;
use crate::slice::Row;
use crate::value::Value;
use std::fmt::Debug;

/// An associative, commutative accumulation over the values of one column.
pub trait CombineFn {
    type Acc: Clone + Debug + Default;

    fn create(&self) -> Self::Acc {
        Self::Acc::default()
    }

    /// Fold one cell of `column` into `acc`.
    ///
    /// # Errors
    /// Fails when the value cannot take part in this aggregate.
    fn add_input(&self, acc: &mut Self::Acc, column: &str, v: &Value) -> Result<(), OlaError>;

    fn merge(&self, acc: &mut Self::Acc, other: Self::Acc);

    /// Current estimate, or `None` while it is undefined.
    fn finish(&self, acc: &Self::Acc) -> Option<f64>;

    /// Whether `acc` carries no contribution at all.
    ///
    /// Grouped state never creates a group from an empty partial when this is `true`.
    fn is_empty(&self, _acc: &Self::Acc) -> bool {
        false
    }

    /// Partial accumulator for `column` over `rows`.
    ///
    /// # Errors
    /// Propagates the first [`add_input`](Self::add_input) failure.
    fn build_from_rows<'a, I>(&self, rows: I, column: &str) -> Result<Self::Acc, OlaError>
    where
        I: IntoIterator<Item = &'a Row>,
    {
        let mut acc = self.create();
        for row in rows {
            self.add_input(&mut acc, column, row.get(column))?;
        }
        Ok(acc)
    }
}
