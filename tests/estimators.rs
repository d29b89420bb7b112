use ironola::testing::*;
use ironola::*;

fn labels(names: &[&str]) -> Vec<Value> {
    names.iter().map(|n| Value::from(*n)).collect()
}

#[test]
fn grouped_mean_two_slice_scenario() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = GroupedMeanEstimator::new("category", "value", sink.clone());
    let slices = category_value_slices();

    est.process_slice(&slices[0])?;
    assert_emission(&sink.history()[0], &labels(&["x", "y"]), &[1.5, 3.0]);

    est.process_slice(&slices[1])?;
    assert_emission(&sink.history()[1], &labels(&["x", "y", "z"]), &[1.5, 4.0, 6.0]);
    assert_eq!(est.totals(&Value::from("y")), Some((12.0, 3)));
    assert_eq!(est.rows_seen(), 6);
    Ok(())
}

#[test]
fn grouped_sum_two_slice_scenario() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = GroupedSumEstimator::new(6, "category", "value", sink.clone());
    let slices = category_value_slices();

    est.process_slice(&slices[0])?;
    assert_eq!(est.rows_processed(), 3);
    assert_eq!(est.scaling_factor(), Some(2.0));
    assert_emission(&sink.history()[0], &labels(&["x", "y"]), &[6.0, 6.0]);

    est.process_slice(&slices[1])?;
    assert_eq!(est.rows_processed(), 6);
    assert_eq!(est.scaling_factor(), Some(1.0));
    assert_emission(&sink.history()[1], &labels(&["x", "y", "z"]), &[3.0, 12.0, 6.0]);
    assert_eq!(
        est.raw_totals(),
        vec![
            (Value::from("x"), 3.0),
            (Value::from("y"), 12.0),
            (Value::from("z"), 6.0)
        ]
    );
    Ok(())
}

#[test]
fn grouped_count_two_slice_scenario() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = GroupedCountEstimator::new(6, "category", "value", sink.clone());
    for slice in category_value_slices() {
        est.process_slice(&slice)?;
    }
    let history = sink.history();
    assert_emission(&history[0], &labels(&["x", "y"]), &[4.0, 2.0]);
    assert_emission(&history[1], &labels(&["x", "y", "z"]), &[2.0, 3.0, 1.0]);
    Ok(())
}

#[test]
fn mean_and_filtered_mean_scenario() -> anyhow::Result<()> {
    let mean_sink = RecordingSink::new();
    let filtered_sink = RecordingSink::new();
    let mut mean = MeanEstimator::new("value", mean_sink.clone());
    let mut filtered = FilteredMeanEstimator::new("category", "y", "value", filtered_sink.clone());

    for slice in category_value_slices() {
        mean.process_slice(&slice)?;
        filtered.process_slice(&slice)?;
    }

    let empty = labels(&[""]);
    assert_emission(&mean_sink.history()[0], &empty, &[2.0]);
    assert_emission(&mean_sink.history()[1], &empty, &[3.5]);
    assert_emission(&filtered_sink.history()[0], &empty, &[3.0]);
    assert_emission(&filtered_sink.history()[1], &empty, &[4.0]);
    assert_eq!(filtered.totals(), (12.0, 3));
    assert_eq!(filtered.rows_seen(), 6);
    Ok(())
}

#[test]
fn groups_persist_in_first_seen_order() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = GroupedSumEstimator::new(9, "g", "v", sink.clone());

    est.process_slice(&SliceBuilder::new(["g", "v"])
        .row([Value::from("b"), Value::from(1)])
        .row([Value::from("a"), Value::from(1)])
        .build())?;
    // Only "c" shows up here; "b" and "a" must keep their slots.
    est.process_slice(&SliceBuilder::new(["g", "v"])
        .row([Value::from("c"), Value::from(1)])
        .build())?;
    est.process_slice(&SliceBuilder::new(["g", "v"])
        .row([Value::from("a"), Value::from(1)])
        .build())?;

    for (i, e) in sink.history().iter().enumerate() {
        let expected: &[&str] = match i {
            0 => &["b", "a"],
            _ => &["b", "a", "c"],
        };
        assert_groups_eq(&e.groups, &labels(expected));
    }
    assert_eq!(est.groups(), labels(&["b", "a", "c"]));
    Ok(())
}

#[test]
fn integral_float_group_keys_merge_with_ints() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = GroupedMeanEstimator::new("g", "v", sink.clone());
    est.process_slice(&SliceBuilder::new(["g", "v"])
        .row([Value::from(1), Value::from(2)])
        .row([Value::from(1.0), Value::from(4)])
        .build())?;
    assert_emission(&sink.last().unwrap(), &[Value::Int(1)], &[3.0]);
    Ok(())
}

#[test]
fn nulls_are_skipped_but_rows_still_count() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = GroupedSumEstimator::new(8, "g", "v", sink.clone());
    est.process_slice(&SliceBuilder::new(["g", "v"])
        .row([Value::from("a"), Value::from(2)])
        .row([Value::from("a"), Value::Null])
        .row([Value::Null, Value::from(100)])
        .row([Value::from("b"), Value::from(1.5)])
        .build())?;
    assert_eq!(est.rows_processed(), 4);
    assert_emission(&sink.last().unwrap(), &labels(&["a", "b"]), &[4.0, 3.0]);
    Ok(())
}

#[test]
fn undefined_mean_is_suppressed() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = MeanEstimator::new("v", sink.clone());

    est.process_slice(&SliceBuilder::new(["v"]).row([Value::Null]).build())?;
    est.process_slice(&empty_slice(&["v"]))?;
    assert!(sink.is_empty());
    assert_eq!(est.snapshot(), None);
    assert_eq!(
        est.emitter_stats(),
        EmitterStats {
            emitted: 0,
            suppressed: 2
        }
    );

    est.process_slice(&SliceBuilder::new(["v"]).row([Value::from(5)]).build())?;
    assert_eq!(sink.len(), 1);
    assert_eq!(est.emitter_stats().emitted, 1);
    Ok(())
}

#[test]
fn filtered_mean_without_matches_is_suppressed() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = FilteredMeanEstimator::new("category", "nope", "value", sink.clone());
    for slice in category_value_slices() {
        est.process_slice(&slice)?;
    }
    assert!(sink.is_empty());
    assert_eq!(est.emitter_stats().suppressed, 2);
    Ok(())
}

#[test]
fn scaled_estimators_suppress_before_any_row() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = GroupedCountEstimator::new(10, "g", "v", sink.clone());
    assert_eq!(est.snapshot(), None);
    est.process_slice(&empty_slice(&["g", "v"]))?;
    assert!(sink.is_empty());
    assert_eq!(est.scaling_factor(), None);
    Ok(())
}

#[test]
fn empty_slice_reemits_previous_estimate() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = GroupedSumEstimator::new(6, "category", "value", sink.clone());
    est.process_slice(&category_value_slices()[0])?;
    est.process_slice(&empty_slice(&["category", "value"]))?;

    let history = sink.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].groups, history[1].groups);
    assert_eq!(history[0].values, history[1].values);
    assert_eq!(est.rows_processed(), 3);
    Ok(())
}

#[test]
fn estimator_names_match_config_kinds() {
    assert_eq!(MeanEstimator::new("v", NullSink).name(), "mean");
    assert_eq!(
        FilteredMeanEstimator::new("c", "y", "v", NullSink).name(),
        "filtered_mean"
    );
    assert_eq!(GroupedMeanEstimator::new("c", "v", NullSink).name(), "grouped_mean");
    assert_eq!(GroupedSumEstimator::new(1, "c", "v", NullSink).name(), "grouped_sum");
    assert_eq!(GroupedCountEstimator::new(1, "c", "v", NullSink).name(), "grouped_count");
}
