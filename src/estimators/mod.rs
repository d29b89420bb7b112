//! The six online estimators.
//!
//! | Estimator | Estimate | Scaled |
//! |---|---|---|
//! | [`MeanEstimator`] | mean of a column | no |
//! | [`FilteredMeanEstimator`] | mean of a column over rows matching a filter | no |
//! | [`GroupedMeanEstimator`] | mean of a column per group | no |
//! | [`GroupedSumEstimator`] | sum of a column per group, projected to the full dataset | yes |
//! | [`GroupedCountEstimator`] | non-null count per group, projected to the full dataset | yes |
//! | [`FilteredDistinctEstimator`] | approximate distinct count over rows matching a filter | no |
//!
//! Scaled estimators multiply every group's raw total by the same
//! [`ScalingFactor`], `original_rows / rows_processed`. That projection is only
//! unbiased when slices are uniform random samples of the unseen rows.

mod distinct;
mod grouped;
mod mean;
mod scaled;

pub use distinct::FilteredDistinctEstimator;
pub use grouped::GroupedMeanEstimator;
pub use mean::{FilteredMeanEstimator, MeanEstimator};
pub use scaled::{GroupedCountEstimator, GroupedSumEstimator, ScalingFactor};
