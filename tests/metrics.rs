#![cfg(feature = "metrics")]

use ironola::metrics::*;
use ironola::testing::TempFilePath;
use serde_json::json;

struct Constant(u64);

impl Metric for Constant {
    fn name(&self) -> &str {
        "constant"
    }

    fn value(&self) -> serde_json::Value {
        json!(self.0)
    }

    fn description(&self) -> Option<&str> {
        Some("always the same")
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[test]
fn counters_accumulate_across_clones() {
    let a = MetricsCollector::new();
    let b = a.clone();
    a.increment_counter("hits", 2);
    b.increment_counter("hits", 3);
    assert_eq!(a.counter("hits"), Some(5));
    assert_eq!(a.counter("misses"), None);
}

#[test]
fn gauges_are_replaced() {
    let m = MetricsCollector::new();
    m.set_gauge("g", 1.0);
    m.set_gauge("g", 2.5);
    assert_eq!(m.snapshot()["g"], json!(2.5));
}

#[test]
fn histogram_stats() {
    let m = MetricsCollector::new();
    for v in [4.0, 1.0, 3.0, 2.0] {
        m.record_histogram("h", v);
    }
    let stats = m.histogram("h").unwrap();
    assert_eq!(stats.count, 4);
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 4.0);
    assert_eq!(stats.mean, 2.5);
    assert_eq!(stats.p50, 3.0);
}

#[test]
fn custom_metrics_are_exported_with_descriptions() -> anyhow::Result<()> {
    let mut m = MetricsCollector::new();
    m.register(Box::new(Constant(7)));
    m.record_start();
    m.record_end();

    let doc = m.to_json();
    assert_eq!(doc["constant"]["value"], json!(7));
    assert_eq!(doc["constant"]["description"], json!("always the same"));
    assert!(doc.get("execution_time_ms").is_some());

    let file = TempFilePath::with_extension("json")?;
    m.save_to_file(file.path())?;
    let reloaded: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(file.path())?)?;
    assert_eq!(reloaded["constant"]["value"], json!(7));
    Ok(())
}

#[test]
fn counter_name_taken_by_another_metric_is_left_alone() {
    let mut m = MetricsCollector::new();
    m.register(Box::new(Constant(1)));
    m.increment_counter("constant", 5);
    assert_eq!(m.counter("constant"), None);
    assert_eq!(m.snapshot()["constant"], json!(1));
}
