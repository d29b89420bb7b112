//! CSV dataset reader.
//!
//! The header row becomes the [`Schema`]. Cells carry no type information in CSV,
//! so each one is inferred on its own by [`infer_cell`]:
//!
//! | cell text | value |
//! |---|---|
//! | empty | `Null` |
//! | parses as `i64` | `Int` |
//! | parses as `f64` | `Float` |
//! | `true` / `false` | `Bool` |
//! | anything else | `Str` |

use crate::dataset::Dataset;
use crate::slice::{Row, Schema};
use crate::value::Value;
use anyhow::{Context, Result, ensure};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a headed CSV file into a [`Dataset`].
///
/// # Errors
/// Fails when the file cannot be opened, a record is malformed, or a record has a
/// different number of fields than the header.
pub fn read_csv_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_csv_from(f).with_context(|| format!("read CSV {}", path.display()))
}

/// Read headed CSV from any reader into a [`Dataset`].
///
/// # Errors
/// As [`read_csv_dataset`], minus the file handling.
pub fn read_csv_from<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()
        .context("read CSV header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let schema = Schema::new(headers.iter().cloned());
    ensure!(
        schema.columns().len() == headers.len(),
        "duplicate column in CSV header: {headers:?}"
    );

    let mut rows = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("parse CSV record #{}", i + 1))?;
        rows.push(
            headers
                .iter()
                .zip(rec.iter())
                .map(|(h, cell)| (h.clone(), infer_cell(cell)))
                .collect::<Row>(),
        );
    }
    Ok(Dataset::new(schema, rows))
}

/// Infer the [`Value`] a CSV cell denotes.
#[must_use]
pub fn infer_cell(cell: &str) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        return Value::from(f);
    }
    match cell {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Str(cell.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_inferred() {
        assert_eq!(infer_cell(""), Value::Null);
        assert_eq!(infer_cell("42"), Value::Int(42));
        assert_eq!(infer_cell("-1.5"), Value::from(-1.5));
        assert_eq!(infer_cell("true"), Value::Bool(true));
        assert_eq!(infer_cell("A"), Value::from("A"));
    }

    #[test]
    fn ragged_record_is_rejected() {
        let text = "category,value\nA,1\nB\n";
        assert!(read_csv_from(text.as_bytes()).is_err());
    }
}
