use ironola::testing::*;
use ironola::*;

#[test]
fn category_value_slices_match_the_documented_split() {
    let slices = category_value_slices();
    assert_eq!(slices.len(), 2);
    let firsts: Vec<&Value> = slices[0].rows().iter().map(|r| r.get("value")).collect();
    assert_eq!(firsts, vec![&Value::Int(1), &Value::Int(2), &Value::Int(3)]);
    assert_eq!(slices[1].rows()[2].get("category"), &Value::from("z"));
}

#[test]
fn sales_dataset_is_seeded() {
    let a = sales_dataset(300, 1);
    assert_eq!(a, sales_dataset(300, 1));
    assert_ne!(a, sales_dataset(300, 2));
    for row in a.rows() {
        assert!(SALES_REGIONS.contains(&row.get("region").to_string().as_str()));
        let q = row.get("quantity").as_f64().unwrap();
        assert!((1.0..=10.0).contains(&q));
        if let Some(amount) = row.get("amount").as_f64() {
            assert!((1.0..100.0).contains(&amount));
        }
    }
}

#[test]
fn shuffle_is_a_seeded_permutation() {
    let base = sales_dataset(100, 8);
    let shuffled = base.clone().shuffled(3);
    assert_eq!(shuffled, base.clone().shuffled(3));
    assert_ne!(shuffled.rows(), base.rows());

    let key = |d: &Dataset| {
        let mut v: Vec<String> = d.rows().iter().map(|r| format!("{r:?}")).collect();
        v.sort();
        v
    };
    assert_eq!(key(&shuffled), key(&base));
}

#[test]
fn slices_of_respects_sizes() {
    let ds = category_value_dataset();
    let parts = slices_of(&ds, &[1, 4, 5]);
    assert_eq!(parts.iter().map(Slice::len).collect::<Vec<_>>(), vec![1, 4, 1]);
}
