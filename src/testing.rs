//! Testing utilities for estimator code.
//!
//! This module gives end-users the pieces they need to test their own aggregation
//! setups:
//!
//! - **Assertions**: compare emissions and estimates with float tolerance
//! - **Builders**: assemble slices row by row
//! - **Fixtures**: small datasets with known exact answers
//! - **Mock I/O**: temporary CSV and JSONL files
//!
//! # Quick Start
//!
//! ```
//! use ironola::*;
//! use ironola::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let sink = RecordingSink::new();
//! let mut est = GroupedMeanEstimator::new("category", "value", sink.clone());
//! for slice in category_value_slices() {
//!     est.process_slice(&slice)?;
//! }
//! assert_emission(
//!     &sink.last().unwrap(),
//!     &[Value::from("x"), Value::from("y"), Value::from("z")],
//!     &[1.5, 4.0, 6.0],
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Inspecting emissions
//!
//! Wrap any sink in an [`InspectSink`](crate::InspectSink) to echo every update to
//! stderr while a test runs:
//!
//! ```
//! use ironola::*;
//!
//! let sink = InspectSink::new("avg", RecordingSink::new());
//! let mut est = MeanEstimator::new("value", sink);
//! for slice in testing::category_value_slices() {
//!     est.process_slice(&slice).unwrap();
//! }
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;

#[cfg(any(feature = "io-csv", feature = "io-jsonl"))]
pub mod mock_io;

// Re-export commonly used items
pub use assertions::*;
pub use builders::*;
pub use fixtures::*;

#[cfg(any(feature = "io-csv", feature = "io-jsonl"))]
pub use mock_io::*;
