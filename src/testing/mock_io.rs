//! Temporary input files for reader tests.
//!
//! Files live as long as the returned [`TempFilePath`] and are deleted on drop.

use crate::dataset::Dataset;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A temporary file that is automatically deleted when dropped.
pub struct TempFilePath {
    #[allow(dead_code)]
    temp_file: NamedTempFile,
    path: PathBuf,
}

impl TempFilePath {
    /// Create a new temporary file.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let temp_file = NamedTempFile::new()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    /// Create a new temporary file with a specific extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn with_extension(extension: &str) -> std::io::Result<Self> {
        let temp_file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    /// Get the path to the temporary file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write raw text to a temporary file with the given extension.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_temp_text(extension: &str, text: &str) -> Result<TempFilePath> {
    let temp = TempFilePath::with_extension(extension).context("create temp file")?;
    std::fs::write(temp.path(), text)
        .with_context(|| format!("write {}", temp.path().display()))?;
    Ok(temp)
}

/// Write a dataset as headed CSV to a temporary file.
///
/// Nulls become empty cells and floats keep a fractional part, so reading the file
/// back with [`read_csv_dataset`](crate::io::csv::read_csv_dataset) yields the same
/// values.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
///
/// # Example
///
/// ```
/// use ironola::testing::{category_value_dataset, write_temp_csv};
///
/// let file = write_temp_csv(&category_value_dataset()).unwrap();
/// let text = std::fs::read_to_string(file.path()).unwrap();
/// assert!(text.starts_with("category,value\nx,1\n"));
/// ```
#[cfg(feature = "io-csv")]
pub fn write_temp_csv(dataset: &Dataset) -> Result<TempFilePath> {
    use crate::value::Value;

    let temp = TempFilePath::with_extension("csv").context("create temp file")?;
    let mut writer = csv::Writer::from_path(temp.path())
        .with_context(|| format!("create {}", temp.path().display()))?;
    writer.write_record(dataset.schema().columns())?;
    for (i, row) in dataset.rows().iter().enumerate() {
        let cells = dataset.schema().columns().iter().map(|c| match row.get(c) {
            Value::Null => String::new(),
            Value::Float(f) => format!("{:?}", f.into_inner()),
            other => other.to_string(),
        });
        writer
            .write_record(cells)
            .with_context(|| format!("write CSV row #{}", i + 1))?;
    }
    writer.flush()?;
    Ok(temp)
}

/// Write a dataset as JSON Lines (one object per row) to a temporary file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
///
/// # Example
///
/// ```
/// use ironola::testing::{category_value_dataset, write_temp_jsonl};
///
/// let file = write_temp_jsonl(&category_value_dataset()).unwrap();
/// let text = std::fs::read_to_string(file.path()).unwrap();
/// assert_eq!(text.lines().next(), Some(r#"{"category":"x","value":1}"#));
/// ```
#[cfg(feature = "io-jsonl")]
pub fn write_temp_jsonl(dataset: &Dataset) -> Result<TempFilePath> {
    use std::io::Write;

    let temp = TempFilePath::with_extension("jsonl").context("create temp file")?;
    let mut file = std::io::BufWriter::new(
        std::fs::File::create(temp.path())
            .with_context(|| format!("create {}", temp.path().display()))?,
    );
    for row in dataset.rows() {
        serde_json::to_writer(&mut file, row)?;
        writeln!(file)?;
    }
    file.flush()?;
    Ok(temp)
}
