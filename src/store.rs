//! Indexed record store
//!
//! Thin façade over one [`AvlTree`]. Point operations delegate to the tree;
//! range query, height and clear walk the tree's nodes directly.

use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::record::Record;
use crate::tree::{AvlNode, AvlTree};
use crate::StoreError;

/// Record store indexed by an AVL tree on `Record::value`
#[derive(Debug, Default)]
pub struct IndexedStore {
    tree: AvlTree,
    config: StoreConfig,
}

impl IndexedStore {
    /// Create an empty store with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store after validating `config`
    pub fn with_config(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self {
            tree: AvlTree::new(),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Underlying index
    pub fn tree(&self) -> &AvlTree {
        &self.tree
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// True when the store holds no records
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Insert a record; silently ignored when its value is already present
    pub fn insert(&mut self, record: Record) {
        self.tree.insert(record);
        self.after_mutation("insert");
    }

    /// Find the record matching both `key` and `value`
    pub fn search(&mut self, key: &str, value: i64) -> Option<&Record> {
        self.tree.search(key, value)
    }

    /// Remove the record matching both `key` and `value`; no-op when absent
    pub fn delete(&mut self, key: &str, value: i64) {
        self.tree.delete(key, value);
        self.after_mutation("delete");
    }

    /// Replace the record `(key, value)` with `replacement`
    ///
    /// Returns `false` and leaves the store untouched when the record is
    /// absent, or when the replacement's value already belongs to another
    /// record.
    pub fn update(&mut self, key: &str, value: i64, replacement: Record) -> bool {
        if !self.tree.contains(key, value) {
            debug!(store = %self.config.name, key, value, "update target missing");
            return false;
        }
        if replacement.value != value && self.tree.contains_value(replacement.value) {
            debug!(
                store = %self.config.name,
                key,
                value,
                replacement = replacement.value,
                "update rejected: replacement value taken"
            );
            return false;
        }
        self.tree.delete(key, value);
        self.tree.insert(replacement);
        self.after_mutation("update");
        true
    }

    /// Records with `start <= value <= end`, in ascending value order
    ///
    /// An inverted range (`start > end`) yields an empty result.
    pub fn range_query(&self, start: i64, end: i64) -> Vec<&Record> {
        let mut result = Vec::new();
        if start > end {
            warn!(store = %self.config.name, start, end, "inverted range");
            return result;
        }
        collect_range(self.tree.root(), start, end, &mut result);
        result
    }

    /// Like [`IndexedStore::range_query`] but reports an inverted range as an error
    pub fn checked_range_query(&self, start: i64, end: i64) -> Result<Vec<&Record>, StoreError> {
        if start > end {
            return Err(StoreError::InvertedRange { start, end });
        }
        Ok(self.range_query(start, end))
    }

    /// Height measured by walking every node (cached heights are ignored)
    pub fn tree_height(&self) -> usize {
        measure_height(self.tree.root())
    }

    /// Search for `(key, value)` and return how many nodes it visited
    pub fn search_comparisons(&mut self, key: &str, value: i64) -> usize {
        self.search(key, value);
        self.tree.last_search_comparisons()
    }

    /// Release every record and node; returns how many were released
    pub fn clear(&mut self) -> usize {
        let released = release(self.tree.take_root());
        info!(store = %self.config.name, released, "store cleared");
        released
    }

    /// Run the full invariant check on the index
    pub fn verify(&self) -> Result<(), StoreError> {
        self.tree.validate().map_err(StoreError::from)
    }

    /// O(n) walk when `verify_invariants` is set; logs rather than fails
    fn after_mutation(&self, operation: &'static str) {
        if !self.config.verify_invariants {
            return;
        }
        if let Err(violation) = self.tree.validate() {
            error!(store = %self.config.name, operation, %violation, "index invariant broken");
        }
    }
}

impl Extend<Record> for IndexedStore {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, records: I) {
        for record in records {
            self.insert(record);
        }
    }
}

/// Inorder walk that skips subtrees which cannot hold in-range values
fn collect_range<'a>(node: Option<&'a AvlNode>, start: i64, end: i64, out: &mut Vec<&'a Record>) {
    let Some(node) = node else {
        return;
    };
    let value = node.value();

    if value > start {
        collect_range(node.left(), start, end, out);
    }
    if start <= value && value <= end {
        out.push(node.record());
    }
    if value < end {
        collect_range(node.right(), start, end, out);
    }
}

fn measure_height(node: Option<&AvlNode>) -> usize {
    node.map_or(0, |node| {
        1 + measure_height(node.left()).max(measure_height(node.right()))
    })
}

/// Post-order release: children first, then the node and its record
fn release(link: Option<Box<AvlNode>>) -> usize {
    let Some(node) = link else {
        return 0;
    };
    let AvlNode {
        record,
        left,
        right,
        ..
    } = *node;

    let released = release(left) + release(right);
    drop(record);
    released + 1
}
