//! Pre-built datasets with known exact aggregates.

use crate::dataset::Dataset;
use crate::sampling::SplitMix64;
use crate::slice::{Row, Schema, Slice};
use crate::value::Value;
use std::sync::Arc;

/// The six `(category, value)` rows
/// `(x,1) (x,2) (y,3) (y,4) (y,5) (z,6)`.
///
/// Exact answers: means per category `x=1.5, y=4, z=6`; sums `x=3, y=12, z=6`.
///
/// # Example
///
/// ```
/// use ironola::testing::category_value_rows;
///
/// assert_eq!(category_value_rows().len(), 6);
/// ```
#[must_use]
pub fn category_value_rows() -> Vec<Row> {
    [("x", 1), ("x", 2), ("y", 3), ("y", 4), ("y", 5), ("z", 6)]
        .into_iter()
        .map(|(c, v)| Row::new().with("category", c).with("value", v))
        .collect()
}

/// [`category_value_rows`] as a dataset.
#[must_use]
pub fn category_value_dataset() -> Dataset {
    Dataset::new(category_value_schema(), category_value_rows())
}

/// [`category_value_rows`] cut into `[(x,1),(x,2),(y,3)]` and `[(y,4),(y,5),(z,6)]`.
#[must_use]
pub fn category_value_slices() -> Vec<Slice> {
    category_value_dataset().slices(3).collect()
}

fn category_value_schema() -> Schema {
    Schema::new(["category", "value"])
}

/// Regions used by [`sales_dataset`].
pub const SALES_REGIONS: [&str; 4] = ["north", "south", "east", "west"];

/// A synthetic sales table of `n` rows with columns `region`, `product`, `amount`,
/// `quantity`, deterministic for a given `seed`.
///
/// `amount` is a float in `[1, 100)`, occasionally null; `quantity` an integer in
/// `1..=10`; `product` one of 50 ids `"p0".."p49"`.
///
/// # Example
///
/// ```
/// use ironola::testing::sales_dataset;
///
/// let a = sales_dataset(100, 7);
/// assert_eq!(a.len(), 100);
/// assert_eq!(a, sales_dataset(100, 7));
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sales_dataset(n: usize, seed: u64) -> Dataset {
    let mut rng = SplitMix64::new(seed);
    let rows = (0..n)
        .map(|_| {
            let region = SALES_REGIONS[rng.next_below(SALES_REGIONS.len() as u64) as usize];
            let product = format!("p{}", rng.next_below(50));
            let amount = if rng.next_below(20) == 0 {
                Value::Null
            } else {
                let cents = 100 + rng.next_below(9_900);
                Value::from(cents as f64 / 100.0)
            };
            let quantity = 1 + rng.next_below(10) as i64;
            Row::new()
                .with("region", region)
                .with("product", product)
                .with("amount", amount)
                .with("quantity", quantity)
        })
        .collect();
    Dataset::new(
        Schema::new(["region", "product", "amount", "quantity"]),
        rows,
    )
}

/// Split rows into slices of the given sizes, in order, sharing one schema.
///
/// Rows beyond the sum of `sizes` are dropped.
#[must_use]
pub fn slices_of(dataset: &Dataset, sizes: &[usize]) -> Vec<Slice> {
    let schema = Arc::new(dataset.schema().clone());
    let mut rest = dataset.rows();
    sizes
        .iter()
        .map(|&n| {
            let (head, tail) = rest.split_at(n.min(rest.len()));
            rest = tail;
            Slice::new(Arc::clone(&schema), head.to_vec())
        })
        .collect()
}
