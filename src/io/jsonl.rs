//! JSON Lines dataset reader.
//!
//! Each non-empty line holds one flat JSON object mapping column to scalar. The
//! schema is the union of keys in first-seen order; a row missing a key reads as
//! null for that column. Arrays and objects as cell values are rejected.

use crate::dataset::Dataset;
use crate::slice::{Row, Schema};
use crate::value::Value;
use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Read a JSONL file into a [`Dataset`].
///
/// # Errors
/// Fails when the file cannot be read, or a line is not a flat JSON object.
pub fn read_jsonl_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_jsonl_from(f).with_context(|| format!("read JSONL {}", path.display()))
}

/// Read JSON Lines from any reader into a [`Dataset`].
///
/// # Errors
/// As [`read_jsonl_dataset`], minus the file handling.
pub fn read_jsonl_from<R: Read>(reader: R) -> Result<Dataset> {
    let mut schema = Schema::default();
    let mut rows = Vec::new();
    for (i, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.with_context(|| format!("read line {}", i + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: serde_json::Value = serde_json::from_str(&line)
            .with_context(|| format!("parse JSONL line {}: {}", i + 1, line))?;
        let serde_json::Value::Object(fields) = doc else {
            bail!("JSONL line {} is not an object: {}", i + 1, line);
        };
        let mut row = Row::new();
        for (column, cell) in fields {
            let value = Value::try_from(cell)
                .with_context(|| format!("column '{column}' on line {}", i + 1))?;
            schema.push(column.clone());
            row = row.with(column, value);
        }
        rows.push(row);
    }
    Ok(Dataset::new(schema, rows))
}
