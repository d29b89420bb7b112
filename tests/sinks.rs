use ironola::testing::*;
use ironola::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn recording_sink_numbers_emissions_and_shares_history() -> anyhow::Result<()> {
    let sink = RecordingSink::new();
    let mut est = GroupedMeanEstimator::new("category", "value", sink.clone());
    for slice in category_value_slices() {
        est.process_slice(&slice)?;
    }
    let history = sink.history();
    assert_eq!(history.iter().map(|e| e.sequence).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(history[1].value_of(&Value::from("z")), Some(6.0));
    assert_eq!(history[1].value_of(&Value::from("w")), None);

    sink.clear();
    assert!(sink.is_empty());
    Ok(())
}

#[test]
fn mismatched_lengths_are_rejected() {
    let mut sink = RecordingSink::new();
    assert!(sink.update(&[Value::from("a")], &[1.0, 2.0]).is_err());
    assert!(sink.is_empty());

    let mut emitter = Emitter::new(NullSink);
    assert!(emitter.emit(&[], &[1.0]).is_err());
    assert_eq!(emitter.stats().emitted, 0);
}

#[test]
fn value_of_tolerates_a_short_values_list() -> anyhow::Result<()> {
    let emission: Emission =
        serde_json::from_str(r#"{"sequence":1,"groups":["a","b"],"values":[4.0]}"#)?;
    assert_eq!(emission.value_of(&Value::from("a")), Some(4.0));
    assert_eq!(emission.value_of(&Value::from("b")), None);
    Ok(())
}

#[test]
fn console_sink_draws_bars_scaled_to_the_peak() -> anyhow::Result<()> {
    let mut sink = ConsoleSink::new(Vec::new()).with_width(10);
    sink.update(&[Value::from("x"), Value::from("yy")], &[5.0, 10.0])?;
    let text = String::from_utf8(sink.into_inner())?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "---- update #1 ----");
    assert_eq!(lines[1], "x  |#####     | 5");
    assert_eq!(lines[2], "yy |##########| 10");
    Ok(())
}

#[test]
fn jsonl_sink_writes_one_object_per_emission() -> anyhow::Result<()> {
    let mut sink = JsonlSink::new(Vec::new());
    sink.update(&[Value::empty_label()], &[2.5])?;
    sink.update(&[Value::from("a"), Value::from(1)], &[1.0, 2.0])?;
    let text = String::from_utf8(sink.into_inner())?;

    let parsed: Vec<Emission> = text
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].values, vec![2.5]);
    assert_eq!(parsed[1].sequence, 2);
    assert_eq!(parsed[1].groups, vec![Value::from("a"), Value::Int(1)]);
    Ok(())
}

#[test]
fn fn_sink_receives_parallel_sequences() -> anyhow::Result<()> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let captured = Rc::clone(&seen);
    let mut est = GroupedSumEstimator::new(
        6,
        "category",
        "value",
        FnSink(move |groups: &[Value], values: &[f64]| -> anyhow::Result<()> {
            captured.borrow_mut().push((groups.len(), values.len()));
            Ok(())
        }),
    );
    for slice in category_value_slices() {
        est.process_slice(&slice)?;
    }
    assert_eq!(*seen.borrow(), vec![(2, 2), (3, 3)]);
    Ok(())
}

#[test]
fn inspect_sink_forwards_to_inner() -> anyhow::Result<()> {
    let inner = RecordingSink::new();
    let mut est = MeanEstimator::new("value", InspectSink::new("mean", inner.clone()));
    est.process_slice(&category_value_slices()[0])?;
    assert_eq!(inner.last().unwrap().values, vec![2.0]);
    Ok(())
}
