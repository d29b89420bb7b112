#![cfg(feature = "io-jsonl")]

use ironola::testing::*;
use ironola::*;

#[test]
fn jsonl_dataset_round_trips_through_a_file() -> anyhow::Result<()> {
    let original = category_value_dataset();
    let file = write_temp_jsonl(&original)?;
    let loaded = read_jsonl_dataset(file.path())?;
    assert_eq!(loaded, original);
    Ok(())
}

#[test]
fn sparse_objects_extend_the_schema() -> anyhow::Result<()> {
    let file = write_temp_text(
        "jsonl",
        "{\"region\": \"north\", \"amount\": 2.5}\n\n{\"region\": \"south\", \"coupon\": true}\n",
    )?;
    let ds = read_jsonl_dataset(file.path())?;
    assert_eq!(ds.schema().columns(), ["region", "amount", "coupon"]);
    assert!(ds.rows()[0].get("coupon").is_null());
    assert!(ds.rows()[1].get("amount").is_null());

    let sink = RecordingSink::new();
    let mut est = GroupedCountEstimator::new(2, "region", "amount", sink.clone());
    est.process_slice(&ds.slices(2).next().unwrap())?;
    assert_emission(
        &sink.last().unwrap(),
        &[Value::from("north"), Value::from("south")],
        &[1.0, 0.0],
    );
    Ok(())
}

#[test]
fn non_object_lines_are_rejected() -> anyhow::Result<()> {
    let file = write_temp_text("jsonl", "{\"a\": 1}\n[1, 2]\n")?;
    let err = read_jsonl_dataset(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("line 2"), "{err:#}");
    Ok(())
}
