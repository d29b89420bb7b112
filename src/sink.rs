//! Destinations for refreshed estimates.
//!
//! Every [`Estimator`](crate::Estimator) pushes each new estimate to a [`Sink`] as two
//! parallel sequences: group labels and values. Non-grouped estimators send a
//! single empty label. A sink is expected to return promptly; rendering happens
//! inside [`Sink::update`].
//!
//! Built-in sinks:
//! - [`RecordingSink`] -- keeps every emission behind a cloneable handle (tests, UIs polling state).
//! - [`ConsoleSink`] -- renders a text bar chart to any `Write`.
//! - [`JsonlSink`] -- writes one JSON object per emission.
//! - [`InspectSink`] -- wraps another sink and echoes emissions to stderr.
//! - [`FnSink`] -- adapts a closure.
//! - [`NullSink`] -- discards everything.
//!
//! # Example
//!
//! ```
//! use ironola::*;
//!
//! let sink = RecordingSink::new();
//! let mut est = MeanEstimator::new("v", sink.clone());
//! est.process_slice(&Slice::from_rows(vec![Row::new().with("v", 2), Row::new().with("v", 4)]))?;
//! assert_eq!(sink.last().unwrap().values, vec![3.0]);
//! # anyhow::Result::<()>::Ok(())
//! ```

use crate::value::Value;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

/// Consumer of estimates.
pub trait Sink {
    /// Receive the latest estimate. `groups` and `values` have equal length.
    ///
    /// # Errors
    /// Implementations fail when they cannot render or persist the update.
    fn update(&mut self, groups: &[Value], values: &[f64]) -> Result<()>;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn update(&mut self, groups: &[Value], values: &[f64]) -> Result<()> {
        (**self).update(groups, values)
    }
}

/// One delivered update, numbered from 1 per sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    pub sequence: u64,
    pub groups: Vec<Value>,
    pub values: Vec<f64>,
}

impl Emission {
    /// Value reported for `group`, if present.
    ///
    /// `None` also when a hand-built or deserialized emission lacks a value at the
    /// group's position.
    #[must_use]
    pub fn value_of(&self, group: &Value) -> Option<f64> {
        self.groups
            .iter()
            .position(|g| g == group)
            .and_then(|i| self.values.get(i).copied())
    }

    /// `(label, value)` pairs in emission order.
    pub fn pairs(&self) -> impl Iterator<Item = (&Value, f64)> {
        self.groups.iter().zip(self.values.iter().copied())
    }
}

pub(crate) fn check_parallel(groups: &[Value], values: &[f64]) -> Result<()> {
    ensure!(
        groups.len() == values.len(),
        "emission has {} groups but {} values",
        groups.len(),
        values.len()
    );
    Ok(())
}

/* ===================== RecordingSink ===================== */

/// Records every emission. Clones share the same history.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<Vec<Emission>>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Emission>> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Every emission received so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Emission> {
        self.lock().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<Emission> {
        self.lock().last().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Sink for RecordingSink {
    fn update(&mut self, groups: &[Value], values: &[f64]) -> Result<()> {
        check_parallel(groups, values)?;
        let mut history = self.lock();
        let sequence = history.len() as u64 + 1;
        history.push(Emission {
            sequence,
            groups: groups.to_vec(),
            values: values.to_vec(),
        });
        Ok(())
    }
}

/* ===================== ConsoleSink ===================== */

/// Text bar chart, redrawn on every update.
///
/// ```text
/// ---- update #2 ----
/// x  |######                          | 1.5
/// y  |################                | 4
/// ```
pub struct ConsoleSink<W: Write> {
    out: W,
    width: usize,
    updates: u64,
}

impl ConsoleSink<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub const fn new(out: W) -> Self {
        Self {
            out,
            width: 32,
            updates: 0,
        }
    }

    /// Bar width in characters.
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn update(&mut self, groups: &[Value], values: &[f64]) -> Result<()> {
        check_parallel(groups, values)?;
        self.updates += 1;
        let labels: Vec<String> = groups.iter().map(ToString::to_string).collect();
        let pad = labels.iter().map(String::len).max().unwrap_or(0);
        let peak = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));

        writeln!(self.out, "---- update #{} ----", self.updates)?;
        for (label, value) in labels.iter().zip(values) {
            let filled = if peak > 0.0 {
                ((value.abs() / peak) * self.width as f64).round() as usize
            } else {
                0
            };
            writeln!(
                self.out,
                "{label:<pad$} |{}{}| {value}",
                "#".repeat(filled),
                " ".repeat(self.width - filled.min(self.width)),
            )?;
        }
        self.out.flush().context("flush console sink")?;
        Ok(())
    }
}

/* ===================== JsonlSink ===================== */

/// Writes each emission as one compact JSON object per line.
pub struct JsonlSink<W: Write> {
    out: W,
    sequence: u64,
}

impl<W: Write> JsonlSink<W> {
    pub const fn new(out: W) -> Self {
        Self { out, sequence: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for JsonlSink<W> {
    fn update(&mut self, groups: &[Value], values: &[f64]) -> Result<()> {
        check_parallel(groups, values)?;
        self.sequence += 1;
        let emission = Emission {
            sequence: self.sequence,
            groups: groups.to_vec(),
            values: values.to_vec(),
        };
        serde_json::to_writer(&mut self.out, &emission)
            .with_context(|| format!("serialize emission #{}", self.sequence))?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/* ===================== InspectSink ===================== */

/// Echoes every emission to stderr before forwarding it.
pub struct InspectSink<S> {
    label: String,
    inner: S,
    seen: u64,
}

impl<S: Sink> InspectSink<S> {
    pub fn new(label: impl Into<String>, inner: S) -> Self {
        Self {
            label: label.into(),
            inner,
            seen: 0,
        }
    }
}

impl<S: Sink> Sink for InspectSink<S> {
    fn update(&mut self, groups: &[Value], values: &[f64]) -> Result<()> {
        self.seen += 1;
        let shown: Vec<String> = groups.iter().take(10).map(ToString::to_string).collect();
        eprintln!(
            "[Inspect: {}] #{} groups={:?} values={:?}{}",
            self.label,
            self.seen,
            shown,
            &values[..values.len().min(10)],
            if groups.len() > 10 {
                format!(" ... ({} more)", groups.len() - 10)
            } else {
                String::new()
            }
        );
        self.inner.update(groups, values)
    }
}

/* ===================== FnSink / NullSink ===================== */

/// Adapts a closure into a [`Sink`].
pub struct FnSink<F>(pub F);

impl<F> Sink for FnSink<F>
where
    F: FnMut(&[Value], &[f64]) -> Result<()>,
{
    fn update(&mut self, groups: &[Value], values: &[f64]) -> Result<()> {
        (self.0)(groups, values)
    }
}

/// Discards every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn update(&mut self, _groups: &[Value], _values: &[f64]) -> Result<()> {
        Ok(())
    }
}
