//! Live aggregation over a shuffled sales table.
//!
//! Demonstrates:
//! - Shuffling a dataset so contiguous slices are uniform samples
//! - Scaled per-group sums converging on the exact totals
//! - A text bar chart redrawn after every slice
//! - Reading suppression counts from an estimator
//!
//! Run with: cargo run --example live_aggregation

use anyhow::Result;
use ironola::*;
use std::collections::BTreeMap;

fn main() -> Result<()> {
    println!("📈 Live Aggregation Example\n");

    let dataset = testing::sales_dataset(10_000, 42).shuffled(7);
    let original_rows = dataset.len() as u64;

    // Exact totals for comparison at the end
    let mut exact: BTreeMap<String, f64> = BTreeMap::new();
    for row in dataset.rows() {
        if let Some(amount) = row.get("amount").as_f64() {
            *exact.entry(row.get("region").to_string()).or_default() += amount;
        }
    }

    // =============================================================================
    // Projected revenue per region, redrawn every slice
    // =============================================================================
    let recording = RecordingSink::new();
    let chart = ConsoleSink::stdout().with_width(40);
    let mut revenue = GroupedSumEstimator::new(
        original_rows,
        "region",
        "amount",
        FnSink({
            let mut chart = chart;
            let mut recording = recording.clone();
            move |groups: &[Value], values: &[f64]| {
                recording.update(groups, values)?;
                chart.update(groups, values)
            }
        }),
    );

    let mut mean_qty = MeanEstimator::new("quantity", NullSink);

    for (i, slice) in dataset.slices(1_000).enumerate() {
        revenue.process_slice(&slice)?;
        mean_qty.process_slice(&slice)?;
        println!(
            "slice {:>2}: rows_processed={} scaling={:.3}\n",
            i + 1,
            revenue.rows_processed(),
            revenue.scaling_factor().unwrap_or(f64::NAN)
        );
    }

    // =============================================================================
    // Compare with the exact answer
    // =============================================================================
    println!("🎯 Final estimate vs exact total");
    if let Some(last) = recording.last() {
        for (region, estimate) in last.pairs() {
            let truth = exact.get(&region.to_string()).copied().unwrap_or_default();
            println!("  {region:<6} estimate={estimate:>12.2} exact={truth:>12.2}");
        }
    }

    let (sum, count) = mean_qty.totals();
    println!("\nMean quantity over {count} rows: {:.3}", sum / count as f64);
    println!("Emitter stats: {:?}", revenue.emitter_stats());

    Ok(())
}
