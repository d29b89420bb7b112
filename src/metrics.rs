//! Metrics collection and reporting for aggregation sessions.
//!
//! A [`Session`](crate::Session) with a [`MetricsCollector`] attached records how
//! many slices, rows and emissions went through it, how often an estimate was
//! withheld because it was still undefined, and how many estimator calls failed.
//! Users can register their own metrics next to the built-in ones and print or save
//! everything as JSON at the end of a run.
//!
//! # Example
//!
//! ```no_run
//! use ironola::*;
//! use ironola::metrics::{Metric, MetricsCollector};
//! use serde_json::Value as Json;
//!
//! struct Widgets(usize);
//!
//! impl Metric for Widgets {
//!     fn name(&self) -> &str { "widgets" }
//!     fn value(&self) -> Json { serde_json::json!(self.0) }
//!     fn as_any(&self) -> &dyn std::any::Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut metrics = MetricsCollector::new();
//! metrics.register(Box::new(Widgets(3)));
//!
//! let mut session = Session::new().with_metrics(metrics.clone());
//! session.add("mean", MeanEstimator::new("value", NullSink))?;
//! session.run_dataset(&testing::category_value_dataset(), 3)?;
//!
//! metrics.print();
//! metrics.save_to_file("metrics.json")?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::any::Any;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Counter: slices handed to the session.
pub const SLICES_PROCESSED: &str = "slices_processed";
/// Counter: rows across all slices handed to the session.
pub const ROWS_PROCESSED: &str = "rows_processed";
/// Counter: estimates delivered to sinks.
pub const EMISSIONS: &str = "emissions";
/// Counter: estimates withheld because they were undefined.
pub const SUPPRESSED_EMISSIONS: &str = "suppressed_emissions";
/// Counter: failed `process_slice` calls.
pub const ESTIMATOR_ERRORS: &str = "estimator_errors";
/// Histogram: rows per slice.
pub const SLICE_ROWS: &str = "slice_rows";
/// Gauge: wall time of the last slice across all estimators, in milliseconds.
pub const LAST_SLICE_MS: &str = "last_slice_ms";

/// Trait for custom metrics.
pub trait Metric: Send + Sync + Any {
    /// The name of this metric (e.g., `rows_processed`).
    fn name(&self) -> &str;

    /// The current value of this metric as a JSON value.
    fn value(&self) -> Value;

    /// Optional description of what this metric measures.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Cast to Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable cast to Any, used to update built-in metrics in place.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Thread-safe, cloneable container for session metrics.
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsCollectorInner>>,
}

struct MetricsCollectorInner {
    metrics: HashMap<String, Box<dyn Metric>>,
    start_time: Option<Instant>,
    end_time: Option<Instant>,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsCollectorInner {
                metrics: HashMap::new(),
                start_time: None,
                end_time: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MetricsCollectorInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a custom metric. A metric with the same name is replaced.
    pub fn register(&mut self, metric: Box<dyn Metric>) {
        self.lock()
            .metrics
            .insert(metric.name().to_string(), metric);
    }

    /// Record the start of a run. Only the first call takes effect.
    pub fn record_start(&self) {
        let mut inner = self.lock();
        if inner.start_time.is_none() {
            inner.start_time = Some(Instant::now());
        }
    }

    /// Record the (latest) end of a run.
    pub fn record_end(&self) {
        self.lock().end_time = Some(Instant::now());
    }

    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        let inner = self.lock();
        match (inner.start_time, inner.end_time) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        }
    }

    /// Add `value` to a counter, creating it when absent.
    pub fn increment_counter(&self, name: &str, value: u64) {
        let mut inner = self.lock();
        let metric = inner
            .metrics
            .entry(name.to_string())
            .or_insert_with(|| Box::new(CounterMetric::new(name)) as Box<dyn Metric>);
        if let Some(counter) = metric.as_any_mut().downcast_mut::<CounterMetric>() {
            counter.count += value;
        }
    }

    /// Current value of a counter, if registered.
    #[must_use]
    pub fn counter(&self, name: &str) -> Option<u64> {
        self.lock()
            .metrics
            .get(name)
            .and_then(|m| m.as_any().downcast_ref::<CounterMetric>())
            .map(|c| c.count)
    }

    /// Set a gauge, replacing any previous value.
    pub fn set_gauge(&self, name: &str, value: f64) {
        self.lock()
            .metrics
            .insert(name.to_string(), Box::new(GaugeMetric::new(name, value)));
    }

    /// Append one observation to a histogram, creating it when absent.
    pub fn record_histogram(&self, name: &str, value: f64) {
        let mut inner = self.lock();
        let metric = inner
            .metrics
            .entry(name.to_string())
            .or_insert_with(|| Box::new(HistogramMetric::new(name)) as Box<dyn Metric>);
        if let Some(h) = metric.as_any_mut().downcast_mut::<HistogramMetric>() {
            h.record(value);
        }
    }

    /// Statistics of a histogram, if registered.
    #[must_use]
    pub fn histogram(&self, name: &str) -> Option<HistogramStats> {
        self.lock()
            .metrics
            .get(name)
            .and_then(|m| m.as_any().downcast_ref::<HistogramMetric>())
            .map(HistogramMetric::stats)
    }

    /// All metrics as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let inner = self.lock();
        let mut metrics_json = serde_json::Map::new();

        for (name, metric) in &inner.metrics {
            let mut metric_obj = serde_json::Map::new();
            metric_obj.insert("value".to_string(), metric.value());
            if let Some(desc) = metric.description() {
                metric_obj.insert("description".to_string(), json!(desc));
            }
            metrics_json.insert(name.clone(), Value::Object(metric_obj));
        }

        if let (Some(start), Some(end)) = (inner.start_time, inner.end_time) {
            metrics_json.insert(
                "execution_time_ms".to_string(),
                json!({
                    "value": end.duration_since(start).as_millis(),
                    "description": "Total session time in milliseconds",
                }),
            );
        }
        Value::Object(metrics_json)
    }

    /// Print all metrics to stdout, sorted by name.
    pub fn print(&self) {
        println!("\n========== Session Metrics ==========");

        let inner = self.lock();
        if let (Some(start), Some(end)) = (inner.start_time, inner.end_time) {
            let elapsed = end.duration_since(start);
            println!(
                "Execution Time: {:.3}s ({} ms)",
                elapsed.as_secs_f64(),
                elapsed.as_millis()
            );
            println!("-------------------------------------");
        }

        let mut sorted_metrics: Vec<_> = inner.metrics.iter().collect();
        sorted_metrics.sort_by_key(|(name, _)| *name);
        for (name, metric) in sorted_metrics {
            if let Some(desc) = metric.description() {
                println!("{}: {} ({})", name, metric.value(), desc);
            } else {
                println!("{}: {}", name, metric.value());
            }
        }
        drop(inner);
        println!("=====================================\n");
    }

    /// Save all metrics to a pretty-printed JSON file.
    ///
    /// # Errors
    /// Fails when the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let formatted = serde_json::to_string_pretty(&self.to_json())?;
        let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        file.write_all(formatted.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Snapshot of every metric name and value.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.lock()
            .metrics
            .iter()
            .map(|(name, metric)| (name.clone(), metric.value()))
            .collect()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ========== Built-in Metrics ==========

/// A monotonically increasing counter.
pub struct CounterMetric {
    name: String,
    count: u64,
}

impl CounterMetric {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
        }
    }

    pub fn with_value(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

impl Metric for CounterMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.count)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A gauge metric that holds a single numeric value.
pub struct GaugeMetric {
    name: String,
    value: f64,
    description: Option<String>,
}

impl GaugeMetric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Metric for GaugeMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.value)
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A histogram metric that tracks value distribution.
pub struct HistogramMetric {
    name: String,
    values: Vec<f64>,
}

impl HistogramMetric {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn record(&mut self, value: f64) {
        self.values.push(value);
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> HistogramStats {
        if self.values.is_empty() {
            return HistogramStats::default();
        }

        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let sum: f64 = sorted.iter().sum();
        HistogramStats {
            count,
            sum,
            mean: sum / count as f64,
            min: sorted[0],
            max: sorted[count - 1],
            p50: sorted[count / 2],
            p95: sorted[(count * 95) / 100],
        }
    }
}

impl Metric for HistogramMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        let stats = self.stats();
        json!({
            "count": stats.count,
            "sum": stats.sum,
            "mean": stats.mean,
            "min": stats.min,
            "max": stats.max,
            "p50": stats.p50,
            "p95": stats.p95,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Statistics computed from a histogram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramStats {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub p50: f64,
    pub p95: f64,
}
