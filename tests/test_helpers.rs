//! Test helper functions for building stores and checking tree shape

#![allow(dead_code)]
use avldb::{AvlNode, AvlTree, IndexedStore, Record, StoreConfig};

/// Record whose key is derived from its value
pub fn record(value: i64) -> Record {
    Record::new(format!("k{value}"), value)
}

/// Store with invariant checking enabled, filled in the given order
pub fn store_from(values: &[i64]) -> IndexedStore {
    let config = StoreConfig::default()
        .with_name("test")
        .with_verify_invariants(true);
    let mut store = IndexedStore::with_config(config).expect("valid config");
    store.extend(values.iter().copied().map(record));
    store
}

/// Walk every node and assert the AVL balance rule and cached heights
///
/// Returns the measured height.
pub fn assert_balanced(node: Option<&AvlNode>) -> usize {
    let Some(node) = node else {
        return 0;
    };
    let left = assert_balanced(node.left());
    let right = assert_balanced(node.right());
    assert!(
        left.abs_diff(right) <= 1,
        "node {} unbalanced: left {} right {}",
        node.value(),
        left,
        right
    );
    assert_eq!(
        node.height(),
        1 + left.max(right),
        "stale cached height at {}",
        node.value()
    );
    1 + left.max(right)
}

/// Values of the tree in ascending order
pub fn inorder_values(tree: &AvlTree) -> Vec<i64> {
    tree.iter().map(|r| r.value).collect()
}
