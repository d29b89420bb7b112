//! Dataset readers.
//!
//! Each reader turns a file into a [`Dataset`](crate::Dataset) whose slices can be fed
//! to estimators. Formats are feature-gated:
//!
//! - `io-csv` -- [`csv::read_csv_dataset`]
//! - `io-jsonl` -- [`jsonl::read_jsonl_dataset`]

#[cfg_attr(docsrs, doc(cfg(feature = "io-jsonl")))]
#[cfg(feature = "io-jsonl")]
pub mod jsonl;

#[cfg_attr(docsrs, doc(cfg(feature = "io-csv")))]
#[cfg(feature = "io-csv")]
pub mod csv;
