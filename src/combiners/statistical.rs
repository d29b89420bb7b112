//! Statistical combiners: `Mean`

use crate::combiners::CombineFn;
use crate::error::OlaError;
use crate::value::Value;

/* ===================== Mean ===================== */

/// Sufficient statistics of a mean.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeanAcc {
    pub sum: f64,
    pub count: u64,
}

/// Mean of the numeric values of a column.
///
/// - Accumulator: [`MeanAcc`] (`sum`, `count` of non-null values)
/// - Output: `sum / count`
///
/// The output is undefined (`None`) until at least one value has been added.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mean;

impl CombineFn for Mean {
    type Acc = MeanAcc;

    fn add_input(&self, acc: &mut MeanAcc, column: &str, v: &Value) -> Result<(), OlaError> {
        if let Some(x) = v.numeric(column)? {
            acc.sum += x;
            acc.count += 1;
        }
        Ok(())
    }

    fn merge(&self, acc: &mut MeanAcc, other: MeanAcc) {
        acc.sum += other.sum;
        acc.count += other.count;
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(&self, acc: &MeanAcc) -> Option<f64> {
        (acc.count > 0).then(|| acc.sum / acc.count as f64)
    }

    fn is_empty(&self, acc: &MeanAcc) -> bool {
        acc.count == 0
    }
}
