use ironola::testing::*;
use ironola::*;

#[test]
fn filtered_distinct_scenario() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = FilteredDistinctEstimator::new("category", "y", "value", sink.clone())?;
    for slice in category_value_slices() {
        est.process_slice(&slice)?;
    }
    assert_eq!(est.tokens_added(), 3);

    let history = sink.history();
    assert_eq!(history.len(), 2);
    assert_groups_eq(&history[1].groups, &[Value::empty_label()]);
    assert_values_close(&history[0].values, &[1.0], 0.5);
    assert_values_close(&history[1].values, &[3.0], 0.5);
    Ok(())
}

#[test]
fn repeated_tokens_do_not_inflate_the_estimate() -> anyhow::Result<()> {
    let mut once = HllSketch::new(SketchConfig::default())?;
    let mut many = HllSketch::new(SketchConfig::default())?;
    once.add("token");
    for _ in 0..10_000 {
        many.add("token");
    }
    assert_eq!(once.cardinality(), many.cardinality());
    assert!((many.cardinality() - 1.0).abs() < 0.5);
    Ok(())
}

#[test]
fn hll_estimate_within_error_bound() -> anyhow::Result<()> {
    let mut sketch = HllSketch::new(SketchConfig::default())?;
    for n in 0..50_000u32 {
        sketch.add(&(n % 20_000).to_string());
    }
    // Standard error at precision 14 is about 0.8%.
    assert_relative_close(sketch.cardinality(), 20_000.0, 0.05);
    Ok(())
}

#[test]
fn same_seed_same_estimate() -> anyhow::Result<()> {
    let config = SketchConfig {
        precision: 8,
        seed: 42,
    };
    let mut a = HllSketch::new(config)?;
    let mut b = HllSketch::new(config)?;
    for n in 0..5_000u32 {
        a.add(&n.to_string());
        b.add(&n.to_string());
    }
    assert_eq!(a.cardinality(), b.cardinality());
    Ok(())
}

#[test]
fn integral_floats_and_ints_share_tokens() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = FilteredDistinctEstimator::new("c", "k", "v", sink.clone())?;
    est.process_slice(&SliceBuilder::new(["c", "v"])
        .row([Value::from("k"), Value::from(3)])
        .row([Value::from("k"), Value::from(3.0)])
        .row([Value::from("k"), Value::Null])
        .row([Value::from("other"), Value::from(4)])
        .build())?;
    assert_eq!(est.tokens_added(), 2);
    assert_values_close(&sink.last().unwrap().values, &[1.0], 0.5);
    Ok(())
}

#[test]
fn mixed_kinds_in_distinct_column_count_separately() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = FilteredDistinctEstimator::new("c", "k", "v", sink.clone())?;
    est.process_slice(&SliceBuilder::new(["c", "v"])
        .row([Value::from("k"), Value::from(1)])
        .row([Value::from("k"), Value::from("a")])
        .build())?;
    assert_values_close(&sink.last().unwrap().values, &[2.0], 0.5);

    // "1" is text, so it does not collide with the number 1 already counted.
    est.process_slice(&SliceBuilder::new(["c", "v"])
        .row([Value::from("k"), Value::from("1")])
        .row([Value::from("k"), Value::from(true)])
        .row([Value::from("k"), Value::from(1.0)])
        .build())?;
    assert_eq!(est.tokens_added(), 5);
    assert_eq!(sink.len(), 2);
    assert_values_close(&sink.last().unwrap().values, &[4.0], 0.5);
    Ok(())
}

#[test]
fn no_match_emits_zero() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = FilteredDistinctEstimator::new("category", "nope", "value", sink.clone())?;
    est.process_slice(&category_value_slices()[0])?;
    assert_values_close(&sink.last().unwrap().values, &[0.0], 0.5);
    assert_eq!(est.emitter_stats().suppressed, 0);
    Ok(())
}

#[test]
fn kmv_sketch_plugs_into_the_estimator() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = FilteredDistinctEstimator::with_sketch(
        "category",
        "y",
        "value",
        KmvSketch::with_k(64, 1),
        sink.clone(),
    );
    for slice in category_value_slices() {
        est.process_slice(&slice)?;
    }
    assert_eq!(sink.last().unwrap().values, vec![3.0]);
    Ok(())
}

#[test]
fn invalid_precision_is_rejected() {
    let err = FilteredDistinctEstimator::with_config(
        "c",
        "k",
        "v",
        SketchConfig {
            precision: 2,
            seed: 123_456_789,
        },
        NullSink,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OlaError>(),
        Some(OlaError::InvalidConfig(_))
    ));
}
