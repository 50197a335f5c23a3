use crate::{MemoryStorage, Prefix, StateMap, StateValue, Storage, WorkingSet};

fn test_prefix(name: &str) -> Prefix {
    Prefix::new(format!("tests/{name}/").into_bytes())
}

#[test]
fn test_workset_commit_makes_values_visible() {
    let storage = MemoryStorage::new();
    let value = StateValue::<u64>::new(test_prefix("value"));

    let mut working_set = WorkingSet::new(storage.clone());
    value.set(&11, &mut working_set);
    assert_eq!(value.get(&mut working_set), Some(11));

    let state_update = working_set.checkpoint().freeze();
    storage.validate_and_commit(state_update).unwrap();

    let mut fresh_set = WorkingSet::new(storage);
    assert_eq!(value.get(&mut fresh_set), Some(11));
}

#[test]
fn test_workset_revert_discards_staged_writes() {
    let storage = MemoryStorage::new();
    let value = StateValue::<u64>::new(test_prefix("value"));

    // Commit an initial value.
    let mut working_set = WorkingSet::new(storage.clone());
    value.set(&1, &mut working_set);
    storage
        .validate_and_commit(working_set.checkpoint().freeze())
        .unwrap();

    // Stage an overwrite, then revert it.
    let mut working_set = WorkingSet::new(storage.clone());
    value.set(&2, &mut working_set);
    assert_eq!(value.get(&mut working_set), Some(2));
    let reverted = working_set.revert().freeze();
    storage.validate_and_commit(reverted).unwrap();

    let mut fresh_set = WorkingSet::new(storage);
    assert_eq!(value.get(&mut fresh_set), Some(1));
}

#[test]
fn test_snapshot_is_isolated_from_later_commits() {
    let storage = MemoryStorage::new();
    let value = StateValue::<u64>::new(test_prefix("value"));

    let mut working_set = WorkingSet::new(storage.clone());
    value.set(&1, &mut working_set);
    storage
        .validate_and_commit(working_set.checkpoint().freeze())
        .unwrap();

    let snapshot = storage.snapshot();

    let mut working_set = WorkingSet::new(storage.clone());
    value.set(&2, &mut working_set);
    storage
        .validate_and_commit(working_set.checkpoint().freeze())
        .unwrap();

    let mut snapshot_set = WorkingSet::new(snapshot);
    assert_eq!(value.get(&mut snapshot_set), Some(1));

    let mut head_set = WorkingSet::new(storage);
    assert_eq!(value.get(&mut head_set), Some(2));
}

#[test]
fn test_commit_rejects_stale_reads() {
    let storage = MemoryStorage::new();
    let value = StateValue::<u64>::new(test_prefix("value"));

    // A working set that reads the (absent) value before anyone writes it.
    let mut stale_set = WorkingSet::new(storage.clone());
    assert_eq!(value.get(&mut stale_set), None);
    value.set(&10, &mut stale_set);

    // Someone else commits a conflicting write first.
    let mut other_set = WorkingSet::new(storage.clone());
    value.set(&99, &mut other_set);
    storage
        .validate_and_commit(other_set.checkpoint().freeze())
        .unwrap();

    let result = storage.validate_and_commit(stale_set.checkpoint().freeze());
    assert!(result.is_err());

    let mut fresh_set = WorkingSet::new(storage);
    assert_eq!(value.get(&mut fresh_set), Some(99));
}

#[test]
fn test_map_operations_through_working_set() {
    let storage = MemoryStorage::new();
    let map = StateMap::<String, u64>::new(test_prefix("map"));
    let mut working_set = WorkingSet::new(storage.clone());

    let key = "one".to_owned();
    assert_eq!(map.get(&key, &mut working_set), None);
    assert!(map.get_or_err(&key, &mut working_set).is_err());

    map.set(&key, &1, &mut working_set);
    assert_eq!(map.get(&key, &mut working_set), Some(1));

    assert_eq!(map.remove(&key, &mut working_set), Some(1));
    assert_eq!(map.get(&key, &mut working_set), None);

    // Deletes survive a commit.
    map.set(&key, &2, &mut working_set);
    map.delete(&key, &mut working_set);
    storage
        .validate_and_commit(working_set.checkpoint().freeze())
        .unwrap();

    let mut fresh_set = WorkingSet::new(storage);
    assert_eq!(map.get(&key, &mut fresh_set), None);
}

proptest::proptest! {
    // Committed state agrees with a plain map model for any op sequence.
    #[test]
    fn prop_committed_state_matches_model(
        ops in proptest::collection::vec(
            (0u8..16, proptest::option::of(0u64..1000)),
            0..64,
        ),
    ) {
        let storage = MemoryStorage::new();
        let map = StateMap::<u8, u64>::new(test_prefix("prop_map"));
        let mut model = std::collections::HashMap::new();

        let mut working_set = WorkingSet::new(storage.clone());
        for (key, value) in ops {
            match value {
                Some(value) => {
                    map.set(&key, &value, &mut working_set);
                    model.insert(key, value);
                }
                None => {
                    map.delete(&key, &mut working_set);
                    model.remove(&key);
                }
            }
        }
        storage
            .validate_and_commit(working_set.checkpoint().freeze())
            .unwrap();

        let mut fresh_set = WorkingSet::new(storage);
        for key in 0u8..16 {
            proptest::prop_assert_eq!(map.get(&key, &mut fresh_set), model.get(&key).copied());
        }
    }
}

#[test]
fn test_events_follow_the_working_set() {
    let storage = MemoryStorage::new();
    let mut working_set = WorkingSet::new(storage);

    working_set.add_event("key", "value");
    assert_eq!(working_set.events().len(), 1);

    let events = working_set.take_events();
    assert_eq!(events[0].key(), "key");
    assert_eq!(events[0].value(), "value");
    assert!(working_set.events().is_empty());
}
