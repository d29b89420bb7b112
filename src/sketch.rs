//! Cardinality sketches.
//!
//! The distinct-count estimator treats its sketch as an opaque capability:
//! [`add`](CardinalitySketch::add) a string token, read
//! [`cardinality`](CardinalitySketch::cardinality). Precision and seed are fixed at
//! construction so identical input always yields identical estimates.
//!
//! - [`HllSketch`] -- HyperLogLog++ from the `hyperloglogplus` crate (the default).
//! - [`KmvSketch`] -- K-minimum-values; exact below `k` distinct tokens.
//!
//! Both hash tokens with [`SeededState`], so the seed selects the hash function.

use crate::error::OlaError;
use crate::validation::{Validate, ValidationError, ValidationResult, into_result};
use anyhow::Result;
use hyperloglogplus::{HyperLogLog, HyperLogLogPlus};
use serde::{Deserialize, Serialize};
use std::collections::{BinaryHeap, HashSet};
use std::fmt;
use std::hash::{BuildHasher, DefaultHasher, Hasher};

/// Smallest precision `hyperloglogplus` accepts.
pub const MIN_PRECISION: u8 = 4;
/// Largest precision `hyperloglogplus` accepts.
pub const MAX_PRECISION: u8 = 18;

/// A stateful approximate distinct counter.
pub trait CardinalitySketch {
    /// Add one token. Adding a token already seen leaves the estimate unchanged.
    fn add(&mut self, token: &str);

    /// Current approximate number of distinct tokens added.
    ///
    /// Takes `&mut self` because HyperLogLog++ folds its pending sparse buffer on read.
    fn cardinality(&mut self) -> f64;
}

/// Fixed sketch parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// HyperLogLog precision `p` (2^p registers) or, for KMV, `k = 2^p`.
    pub precision: u8,
    /// Seed mixed into every token hash.
    pub seed: u64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            precision: 14,
            seed: 123_456_789,
        }
    }
}

impl Validate for SketchConfig {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&self.precision) {
            errors.push(ValidationError::field(
                "precision",
                format!(
                    "must be between {MIN_PRECISION} and {MAX_PRECISION}, got {}",
                    self.precision
                ),
            ));
        }
        into_result(errors)
    }
}

/// `BuildHasher` producing SipHash instances keyed by a fixed seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeededState {
    seed: u64,
}

impl SeededState {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BuildHasher for SeededState {
    type Hasher = DefaultHasher;

    fn build_hasher(&self) -> DefaultHasher {
        let mut h = DefaultHasher::new();
        h.write_u64(self.seed);
        h
    }
}

/* ===================== HllSketch ===================== */

/// HyperLogLog++ sketch over string tokens.
///
/// Small cardinalities are counted through the sparse representation and are
/// effectively exact.
pub struct HllSketch {
    config: SketchConfig,
    inner: HyperLogLogPlus<String, SeededState>,
}

impl HllSketch {
    /// # Errors
    /// Fails with [`OlaError::InvalidConfig`] when the precision is out of range.
    pub fn new(config: SketchConfig) -> Result<Self> {
        config.validate().map_err(OlaError::InvalidConfig)?;
        let inner = HyperLogLogPlus::new(config.precision, SeededState::new(config.seed))
            .map_err(|_| {
                OlaError::InvalidConfig(vec![ValidationError::field(
                    "precision",
                    format!("rejected by HyperLogLog++: {}", config.precision),
                )])
            })?;
        Ok(Self { config, inner })
    }

    #[must_use]
    pub const fn config(&self) -> SketchConfig {
        self.config
    }
}

impl fmt::Debug for HllSketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HllSketch")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CardinalitySketch for HllSketch {
    fn add(&mut self, token: &str) {
        self.inner.insert(token);
    }

    fn cardinality(&mut self) -> f64 {
        self.inner.count()
    }
}

/* ===================== KmvSketch ===================== */

/// K-minimum-values sketch.
///
/// Keeps the `k` smallest distinct 64-bit hash ranks in a max-heap. Below `k`
/// distinct tokens the count is exact; above, the estimate is `(k - 1) / r_k` where
/// `r_k` is the largest retained rank scaled into `[0, 1)`.
#[derive(Clone, Debug)]
pub struct KmvSketch {
    k: usize,
    hasher: SeededState,
    heap: BinaryHeap<u64>,
    set: HashSet<u64>,
}

impl KmvSketch {
    /// Sketch with `k = 2^precision` retained ranks.
    ///
    /// # Errors
    /// Fails with [`OlaError::InvalidConfig`] when the precision is out of range.
    pub fn new(config: SketchConfig) -> Result<Self> {
        config.validate().map_err(OlaError::InvalidConfig)?;
        Ok(Self::with_k(1 << config.precision, config.seed))
    }

    /// Sketch keeping `k` ranks (at least 4).
    #[must_use]
    pub fn with_k(k: usize, seed: u64) -> Self {
        Self {
            k: k.max(4),
            hasher: SeededState::new(seed),
            heap: BinaryHeap::new(),
            set: HashSet::new(),
        }
    }

    fn try_insert(&mut self, r: u64) {
        if self.set.contains(&r) {
            return;
        }
        if self.heap.len() < self.k {
            self.heap.push(r);
            self.set.insert(r);
        } else if let Some(&rk) = self.heap.peek()
            && r < rk
        {
            self.heap.pop();
            self.set.remove(&rk);
            self.heap.push(r);
            self.set.insert(r);
        }
        debug_assert!(self.heap.len() <= self.k && self.set.len() == self.heap.len());
    }
}

impl CardinalitySketch for KmvSketch {
    fn add(&mut self, token: &str) {
        let r = self.hasher.hash_one(token);
        self.try_insert(r);
    }

    #[allow(clippy::cast_precision_loss)]
    fn cardinality(&mut self) -> f64 {
        let m = self.heap.len();
        if m < self.k {
            return m as f64;
        }
        self.heap.peek().map_or(0.0, |&rk| {
            let unit = (rk as f64) / ((u64::MAX as f64) + 1.0);
            ((self.k as f64) - 1.0) / unit
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kmv_exact_below_k() {
        let mut s = KmvSketch::with_k(64, 1);
        for t in ["a", "b", "a", "c", "b"] {
            s.add(t);
        }
        assert_eq!(s.cardinality(), 3.0);
    }

    #[test]
    fn kmv_estimates_above_k() {
        let mut s = KmvSketch::with_k(256, 9);
        for n in 0..10_000u32 {
            s.add(&(n % 1234).to_string());
        }
        let est = s.cardinality();
        assert!(est > 900.0 && est < 1600.0, "est={est}");
    }

    #[test]
    fn seeded_state_is_deterministic() {
        let a = SeededState::new(5);
        let b = SeededState::new(5);
        assert_eq!(a.hash_one("x"), b.hash_one("x"));
        assert_ne!(a.hash_one("x"), SeededState::new(6).hash_one("x"));
    }

    #[test]
    fn precision_out_of_range_is_rejected() {
        let cfg = SketchConfig {
            precision: 2,
            seed: 1,
        };
        assert!(HllSketch::new(cfg).is_err());
        assert!(KmvSketch::new(cfg).is_err());
    }
}
