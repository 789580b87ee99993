//! End-to-end store usage

use std::collections::HashSet;

use avldb::command::parse_line;
use avldb::{AvlTree, IndexedStore, Record, StoreConfig, StoreError};
mod test_helpers;
use test_helpers::*;

#[test]
fn test_store_lifecycle() {
    let mut store = store_from(&[]);
    assert!(store.is_empty());
    assert_eq!(store.tree_height(), 0);
    assert!(store.search("nobody", 0).is_none());

    for v in 1..=1000 {
        store.insert(record(v));
    }
    assert_eq!(store.len(), 1000);
    assert!(store.tree_height() <= 14, "height {}", store.tree_height());
    assert!(store.search_comparisons("k1000", 1000) <= store.tree_height());

    for v in (1..=1000).step_by(2) {
        store.delete(&format!("k{v}"), v);
    }
    assert_eq!(store.len(), 500);
    assert_eq!(store.range_query(1, 10).len(), 5);
    store.verify().expect("balanced after bulk delete");

    assert_eq!(store.clear(), 500);
    assert!(store.is_empty());
}

#[test]
fn test_shape_is_deterministic() {
    let values: Vec<i64> = (0..64).map(|i| (i * 37) % 101).collect();
    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        let tree: AvlTree = values.iter().copied().map(record).collect();
        fingerprints.insert(tree.fingerprint());
    }
    assert_eq!(fingerprints.len(), 1, "tree shapes diverged across runs");
}

#[test]
fn test_update_through_store() {
    let mut store = store_from(&[10, 20, 30]);
    assert!(store.update("k20", 20, Record::new("k25", 25)));
    assert_eq!(inorder_values(store.tree()), vec![10, 25, 30]);

    // Replacement collides with an existing value: rejected, nothing lost
    assert!(!store.update("k25", 25, Record::new("clash", 10)));
    assert_eq!(inorder_values(store.tree()), vec![10, 25, 30]);
    assert!(store.search("k25", 25).is_some());
    assert!(store.search("k10", 10).is_some());
}

#[test]
fn test_checked_range_and_config_errors() {
    let store = store_from(&[1, 2, 3]);
    assert_eq!(
        store.checked_range_query(3, 1).unwrap_err(),
        StoreError::InvertedRange { start: 3, end: 1 }
    );

    let err = IndexedStore::with_config(StoreConfig::default().with_name("")).unwrap_err();
    assert!(matches!(err, StoreError::InvalidConfiguration(_)));
}

#[test]
fn test_script_session() {
    let script = "\
# build the reference tree
insert k5 5
insert k3 3
insert k8 8
insert k1 1
insert k4 4
insert k7 7
insert k9 9
range 4 8
delete k5 5
height
comparisons k9 9
";
    let mut store = IndexedStore::new();
    let output: Vec<String> = script
        .lines()
        .filter_map(|line| parse_line(line).expect("valid script"))
        .map(|command| command.execute(&mut store))
        .collect();

    assert_eq!(output.len(), 11);
    assert_eq!(output[7], "4 record(s) in [4, 8]\n  k4=4\n  k5=5\n  k7=7\n  k8=8");
    assert_eq!(output[8], "deleted k5=5");
    assert_eq!(output[9], "height=3");
    assert_eq!(output[10], "comparisons=3");
}
