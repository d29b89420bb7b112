//! The estimator contract shared by all online aggregates.
//!
//! An [`Estimator`] absorbs slices one at a time through
//! [`process_slice`](Estimator::process_slice): it folds the slice into its running
//! state, recomputes the estimate and emits it through its [`Emitter`] to a
//! [`Sink`]. Calls on one instance must be strictly sequential, and a slice must
//! never be submitted twice (it would be counted twice).
//!
//! When the estimate is undefined (no contributing row yet, or nothing processed
//! for a scaled aggregate) the emission is suppressed instead of sending a NaN.

use crate::sink::{Emission, Sink, check_parallel};
use crate::slice::Slice;
use crate::value::Value;
use anyhow::Result;

/// An incremental aggregate over a stream of slices.
pub trait Estimator {
    /// Short identifier of the aggregate kind, e.g. `grouped_sum`.
    fn name(&self) -> &'static str;

    /// Absorb `slice`, recompute the estimate and emit it.
    ///
    /// A missing column or type mismatch leaves the running state exactly as it was
    /// before the call. A sink failure happens after the slice has been absorbed
    /// and counted, so only the update itself is lost.
    ///
    /// # Errors
    /// Fails on a missing column, a type mismatch, or a sink failure.
    fn process_slice(&mut self, slice: &Slice) -> Result<()>;

    /// Rows of every slice absorbed so far, whether or not they passed a filter.
    fn rows_seen(&self) -> u64;

    /// The current estimate, or `None` while it is undefined.
    fn snapshot(&mut self) -> Option<Emission>;

    /// Emitted and suppressed update counts.
    fn emitter_stats(&self) -> EmitterStats;
}

/// Counters kept by an [`Emitter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmitterStats {
    pub emitted: u64,
    pub suppressed: u64,
}

/// Forwards estimates to a sink and counts what was sent or withheld.
pub struct Emitter {
    sink: Box<dyn Sink>,
    stats: EmitterStats,
}

impl Emitter {
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            stats: EmitterStats::default(),
        }
    }

    /// Push one estimate. `groups` and `values` must have equal length.
    ///
    /// # Errors
    /// Fails on a length mismatch or when the sink fails.
    pub fn emit(&mut self, groups: &[Value], values: &[f64]) -> Result<()> {
        check_parallel(groups, values)?;
        self.sink.update(groups, values)?;
        self.stats.emitted += 1;
        Ok(())
    }

    /// Push a single-value estimate under the empty label.
    ///
    /// # Errors
    /// Fails when the sink fails.
    pub fn emit_scalar(&mut self, value: f64) -> Result<()> {
        self.emit(&[Value::empty_label()], &[value])
    }

    /// Emit `estimate` when defined, otherwise record a suppression.
    ///
    /// # Errors
    /// Fails when the sink fails.
    pub fn emit_if_defined(&mut self, estimate: Option<Emission>) -> Result<()> {
        match estimate {
            Some(e) => self.emit(&e.groups, &e.values),
            None => {
                self.stats.suppressed += 1;
                Ok(())
            }
        }
    }

    #[must_use]
    pub const fn stats(&self) -> EmitterStats {
        self.stats
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter").field("stats", &self.stats).finish_non_exhaustive()
    }
}

/// Snapshot helper for single-value estimates.
pub(crate) fn scalar_emission(estimate: Option<f64>, sequence: u64) -> Option<Emission> {
    estimate.map(|v| Emission {
        sequence,
        groups: vec![Value::empty_label()],
        values: vec![v],
    })
}

/// Snapshot helper for grouped estimates. `None` when any group is undefined.
pub(crate) fn grouped_emission<'a, I>(estimates: I, sequence: u64) -> Option<Emission>
where
    I: IntoIterator<Item = (&'a Value, Option<f64>)>,
{
    let (groups, values): (Vec<Value>, Vec<Option<f64>>) = estimates
        .into_iter()
        .map(|(k, v)| (k.clone(), v))
        .unzip();
    let values = values.into_iter().collect::<Option<Vec<f64>>>()?;
    Some(Emission {
        sequence,
        groups,
        values,
    })
}
