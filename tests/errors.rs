use ironola::testing::*;
use ironola::*;

#[test]
fn missing_column_names_the_column_and_schema() {
    let mut est = MeanEstimator::new("price", NullSink);
    let err = est.process_slice(&category_value_slices()[0]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<OlaError>(),
        Some(&OlaError::MissingColumn {
            column: "price".into(),
            available: vec!["category".into(), "value".into()],
        })
    );
    assert_eq!(est.rows_seen(), 0);
    assert!(err.to_string().contains("price"));
}

#[test]
fn every_estimator_checks_its_columns() {
    let slice = category_value_slices().remove(0);
    let mut estimators: Vec<Box<dyn Estimator>> = vec![
        Box::new(FilteredMeanEstimator::new("kind", "y", "value", NullSink)),
        Box::new(GroupedMeanEstimator::new("category", "amount", NullSink)),
        Box::new(GroupedSumEstimator::new(6, "region", "value", NullSink)),
        Box::new(GroupedCountEstimator::new(6, "category", "qty", NullSink)),
    ];
    for est in &mut estimators {
        let err = est.process_slice(&slice).unwrap_err();
        assert!(
            matches!(err.downcast_ref::<OlaError>(), Some(OlaError::MissingColumn { .. })),
            "{}: {err}",
            est.name()
        );
    }
}

#[test]
fn filter_value_of_another_kind_is_a_type_mismatch() {
    let sink = RecordingSink::new();
    let mut est = FilteredMeanEstimator::new("category", 1, "value", sink.clone());
    let err = est.process_slice(&category_value_slices()[0]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<OlaError>(),
        Some(&OlaError::TypeMismatch {
            column: "category".into(),
            expected: ValueKind::Int,
            found: ValueKind::Str,
        })
    );
    assert!(sink.is_empty());
}

#[test]
fn numeric_filter_matches_across_int_and_float() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = FilteredMeanEstimator::new("k", 2.0, "v", sink.clone());
    est.process_slice(&SliceBuilder::new(["k", "v"])
        .row([Value::from(2), Value::from(10)])
        .row([Value::from(2.0), Value::from(20)])
        .row([Value::from(3), Value::from(99)])
        .build())?;
    assert_eq!(sink.last().unwrap().values, vec![15.0]);
    Ok(())
}

#[test]
fn failed_slice_leaves_state_untouched() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = GroupedSumEstimator::new(6, "category", "value", sink.clone());
    est.process_slice(&category_value_slices()[0])?;
    let groups_before = est.groups();
    let totals_before = est.raw_totals();

    let bad = SliceBuilder::new(["category", "value"])
        .row([Value::from("x"), Value::from(10)])
        .row([Value::from("w"), Value::from("oops")])
        .build();
    let err = est.process_slice(&bad).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OlaError>(),
        Some(OlaError::NonNumeric { found: ValueKind::Str, .. })
    ));

    assert_eq!(est.groups(), groups_before);
    assert_eq!(est.raw_totals(), totals_before);
    assert_eq!(est.rows_processed(), 3);
    assert_eq!(sink.len(), 1);
    Ok(())
}

#[test]
fn mean_over_strings_is_rejected() {
    let mut est = MeanEstimator::new("category", NullSink);
    let err = est.process_slice(&category_value_slices()[0]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OlaError>(),
        Some(OlaError::NonNumeric { .. })
    ));
    assert_eq!(est.totals(), (0.0, 0));
}

#[test]
fn sink_failure_surfaces_from_process_slice() {
    let mut est = MeanEstimator::new(
        "value",
        FnSink(|_: &[Value], _: &[f64]| -> anyhow::Result<()> {
            anyhow::bail!("display closed")
        }),
    );
    let slices = category_value_slices();
    let slice = &slices[0];
    let err = est.process_slice(slice).unwrap_err();
    assert!(err.to_string().contains("display closed"));
    // The slice was absorbed before the sink refused the update.
    assert_eq!(est.rows_seen(), slice.len() as u64);
    assert!(est.snapshot().is_some());
}
