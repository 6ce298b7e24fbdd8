use mathnote_core::KeyedVec;

#[test]
fn set_changes_only_the_value_at_the_position() {
    let mut seq = KeyedVec::from_values(vec!["a", "b", "c"]);
    let keys: Vec<_> = (0..3).map(|i| seq.key_at(i).unwrap()).collect();

    seq.set(1, "B").unwrap();

    assert_eq!(seq.get(0), Some(&"a"));
    assert_eq!(seq.get(1), Some(&"B"));
    assert_eq!(seq.get(2), Some(&"c"));
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(seq.key_at(i).unwrap(), *key);
    }
}

#[test]
fn insert_shifts_right_and_keeps_untouched_identities() {
    let mut seq = KeyedVec::from_values(vec!["a", "d"]);
    let head = seq.key_at(0).unwrap();
    let tail = seq.key_at(1).unwrap();

    seq.insert(1, "b").unwrap();
    seq.insert(2, "c").unwrap();

    assert_eq!(seq.len(), 4);
    assert_eq!(seq.key_at(0).unwrap(), head);
    assert_eq!(seq.key_at(3).unwrap(), tail);
    assert_eq!(
        seq.values().copied().collect::<Vec<_>>(),
        vec!["a", "b", "c", "d"]
    );
}

#[test]
fn replace_splices_with_fresh_keys() {
    let mut seq = KeyedVec::from_values(vec!["a", "x", "y", "z", "b"]);
    let head = seq.key_at(0).unwrap();
    let tail = seq.key_at(4).unwrap();
    let replaced = seq.key_at(2).unwrap();

    seq.replace(1, 3, vec!["m", "n"]).unwrap();

    assert_eq!(
        seq.values().copied().collect::<Vec<_>>(),
        vec!["a", "m", "n", "b"]
    );
    assert_eq!(seq.key_at(0).unwrap(), head);
    assert_eq!(seq.key_at(3).unwrap(), tail);
    assert_ne!(seq.key_at(1).unwrap(), replaced);
    assert_ne!(seq.key_at(2).unwrap(), replaced);
}

#[test]
fn remove_returns_the_value_and_keeps_the_rest() {
    let mut seq = KeyedVec::from_values(vec!["a", "b", "c"]);
    let last = seq.key_at(2).unwrap();

    assert_eq!(seq.remove(1).unwrap(), "b");
    assert_eq!(seq.len(), 2);
    assert_eq!(seq.key_at(1).unwrap(), last);
}

#[test]
fn out_of_range_positions_error_instead_of_clamping() {
    let mut seq = KeyedVec::from_values(vec!["a"]);

    let err = seq.insert(5, "b").unwrap_err();
    assert_eq!((err.index, err.len), (5, 1));

    let err = seq.remove(1).unwrap_err();
    assert_eq!((err.index, err.len), (1, 1));

    let err = seq.replace(0, 2, vec!["x"]).unwrap_err();
    assert_eq!(err.len, 1);

    assert_eq!(seq.values().copied().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn equality_ignores_key_identity() {
    let left = KeyedVec::from_values(vec![1, 2, 3]);
    let right = KeyedVec::from_values(vec![1, 2, 3]);
    assert_eq!(left, right);
    assert_ne!(left.key_at(0), right.key_at(0));
}
