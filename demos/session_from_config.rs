//! Driving several estimators from a JSON configuration.
//!
//! Demonstrates:
//! - Loading a `SessionConfig` from JSON
//! - Reading a CSV dataset
//! - Per-estimator sinks chosen by name
//! - Failure isolation: one misconfigured estimator does not stop the others
//! - Session metrics
//!
//! Run with: cargo run --example session_from_config

use anyhow::Result;
use ironola::metrics::MetricsCollector;
use ironola::*;

const CONFIG: &str = r#"{
    "estimators": [
        { "name": "avg_amount", "kind": "mean", "mean_column": "amount" },
        { "name": "north_amount", "kind": "filtered_mean",
          "filter_column": "region", "filter_value": "north", "target_column": "amount" },
        { "name": "qty_by_region", "kind": "grouped_mean",
          "group_column": "region", "target_column": "quantity" },
        { "name": "orders_by_region", "kind": "grouped_count", "original_rows": 2000,
          "group_column": "region", "count_column": "amount" },
        { "name": "north_products", "kind": "filtered_distinct",
          "filter_column": "region", "filter_value": "north", "distinct_column": "product",
          "sketch": { "precision": 12 } },
        { "name": "typo", "kind": "mean", "mean_column": "amuont" }
    ]
}"#;

fn main() -> Result<()> {
    println!("🧪 Session From Config Example\n");

    // Write a CSV to read back, as a real job would read its input
    let file = testing::write_temp_csv(&testing::sales_dataset(2_000, 11))?;
    let dataset = read_csv_dataset(file.path())?.shuffled(3);
    println!("Loaded {} rows with columns {:?}\n", dataset.len(), dataset.schema().columns());

    let config = SessionConfig::from_json_str(CONFIG)?;
    let recordings: Vec<(String, RecordingSink)> = config
        .estimators
        .iter()
        .map(|e| (e.name.clone(), RecordingSink::new()))
        .collect();

    let metrics = MetricsCollector::new();
    let mut session = Session::from_config(&config, |name| {
        let sink = recordings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.clone())
            .unwrap_or_default();
        let boxed: Box<dyn Sink> = if name == "qty_by_region" {
            Box::new(InspectSink::new(name, sink))
        } else {
            Box::new(sink)
        };
        boxed
    })?
    .with_metrics(metrics.clone());

    for report in session.run_dataset(&dataset, 250)? {
        for failure in &report.failures {
            println!("slice {}: {failure}", report.sequence);
        }
    }

    println!("\n📊 Final estimates");
    for (name, sink) in &recordings {
        match sink.last() {
            Some(e) => {
                let shown: Vec<String> = e
                    .pairs()
                    .map(|(g, v)| {
                        if g.to_string().is_empty() {
                            format!("{v:.3}")
                        } else {
                            format!("{g}={v:.3}")
                        }
                    })
                    .collect();
                println!("  {name:<18} {}", shown.join(" "));
            }
            None => println!("  {name:<18} (no estimate)"),
        }
    }

    metrics.print();
    Ok(())
}
