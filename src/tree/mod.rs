//! Height-balanced (AVL) search tree keyed on `Record::value`
//!
//! Every mutation is a recursive descent that takes a subtree by value and
//! hands back its (possibly rotated) replacement, so balance is restored one
//! ancestor at a time on the way back up.
//!
//! Uniqueness is on `value` alone: a second record with an existing value is
//! dropped even if its key differs.

mod balance;
mod node;
mod traversal;

pub use node::AvlNode;
pub use traversal::{InvariantViolation, Iter};

use std::cmp::Ordering;
use std::mem;

use tracing::{debug, trace};

use crate::record::Record;
use node::Link;

/// Outcome of a point lookup together with its cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup<'a> {
    /// Matching record, if any
    pub record: Option<&'a Record>,

    /// Nodes visited, including the matching one
    pub comparisons: usize,
}

/// AVL tree owning all of its nodes
#[derive(Debug, Default, Clone)]
pub struct AvlTree {
    root: Link,
    len: usize,
    last_comparisons: usize,
}

impl AvlTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Root node, if any
    pub fn root(&self) -> Option<&AvlNode> {
        self.root.as_deref()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the tree holds no records
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Comparisons made by the most recent [`AvlTree::search`]
    pub fn last_search_comparisons(&self) -> usize {
        self.last_comparisons
    }

    /// Cached height of the root (0 when empty)
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// Insert `record`; a record with an already present value is ignored
    pub fn insert(&mut self, record: Record) {
        let root = self.root.take();
        self.root = Some(Self::insert_node(root, record, &mut self.len));
    }

    fn insert_node(link: Link, record: Record, len: &mut usize) -> Box<AvlNode> {
        let Some(mut node) = link else {
            *len += 1;
            debug!(key = %record.key, value = record.value, "insert leaf");
            return AvlNode::leaf(record);
        };

        let value = record.value;
        match value.cmp(&node.record.value) {
            Ordering::Less => {
                node.left = Some(Self::insert_node(node.left.take(), record, len));
            }
            Ordering::Greater => {
                node.right = Some(Self::insert_node(node.right.take(), record, len));
            }
            Ordering::Equal => {
                debug!(key = %record.key, value, "duplicate value ignored");
                return node;
            }
        }

        node.update_height();
        balance::after_insert(node, value)
    }

    /// Look up the record matching both `key` and `value`
    ///
    /// Resets and then records the comparison count, readable afterwards via
    /// [`AvlTree::last_search_comparisons`].
    pub fn search(&mut self, key: &str, value: i64) -> Option<&Record> {
        self.last_comparisons = 0;
        let mut comparisons = 0;
        let found = Self::search_node(self.root.as_deref(), key, value, &mut comparisons);
        self.last_comparisons = comparisons;
        found
    }

    /// Same descent as [`AvlTree::search`], reporting the cost in the result
    /// instead of storing it
    pub fn find(&self, key: &str, value: i64) -> Lookup<'_> {
        let mut comparisons = 0;
        let record = Self::search_node(self.root.as_deref(), key, value, &mut comparisons);
        Lookup {
            record,
            comparisons,
        }
    }

    fn search_node<'a>(
        node: Option<&'a AvlNode>,
        key: &str,
        value: i64,
        comparisons: &mut usize,
    ) -> Option<&'a Record> {
        let node = node?;
        *comparisons += 1;
        trace!(visited = node.value(), comparisons = *comparisons, "search step");

        if node.record.matches(key, value) {
            return Some(&node.record);
        }

        if value < node.value() {
            Self::search_node(node.left(), key, value, comparisons)
        } else {
            Self::search_node(node.right(), key, value, comparisons)
        }
    }

    /// True when a record matching both fields is present
    pub fn contains(&self, key: &str, value: i64) -> bool {
        self.find(key, value).record.is_some()
    }

    /// True when some record, whatever its key, holds `value`
    ///
    /// Does not touch the search counter.
    pub fn contains_value(&self, value: i64) -> bool {
        let mut node = self.root();
        while let Some(current) = node {
            node = match value.cmp(&current.value()) {
                Ordering::Less => current.left(),
                Ordering::Greater => current.right(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Remove the record matching both `key` and `value`; no-op when absent
    pub fn delete(&mut self, key: &str, value: i64) {
        let root = self.root.take();
        self.root = Self::delete_node(root, key, value, &mut self.len);
    }

    fn delete_node(link: Link, key: &str, value: i64, len: &mut usize) -> Link {
        let mut node = link?;

        match value.cmp(&node.record.value) {
            Ordering::Less => {
                node.left = Self::delete_node(node.left.take(), key, value, len);
            }
            Ordering::Greater => {
                node.right = Self::delete_node(node.right.take(), key, value, len);
            }
            Ordering::Equal if node.record.key != key => return Some(node),
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, None) => {
                    *len -= 1;
                    debug!(key, value, "delete leaf");
                    return None;
                }
                (Some(child), None) | (None, Some(child)) => {
                    *len -= 1;
                    debug!(key, value, spliced = child.value(), "delete single-child node");
                    return Some(child);
                }
                (left, Some(right)) => {
                    // Keep this node, adopt the inorder successor's record
                    let (rest, successor) = Self::take_min(right);
                    node.left = left;
                    node.right = rest;
                    let removed = mem::replace(&mut node.record, successor);
                    *len -= 1;
                    debug!(
                        key = %removed.key,
                        value = removed.value,
                        successor = node.record.value,
                        "delete two-child node"
                    );
                }
            },
        }

        node.update_height();
        Some(balance::after_delete(node))
    }

    /// Detach the leftmost node of `node`, rebalancing on the way back up
    fn take_min(mut node: Box<AvlNode>) -> (Link, Record) {
        match node.left.take() {
            None => {
                let AvlNode { record, right, .. } = *node;
                (right, record)
            }
            Some(left) => {
                let (rest, min) = Self::take_min(left);
                node.left = rest;
                node.update_height();
                (Some(balance::after_delete(node)), min)
            }
        }
    }

    /// Record with the smallest value
    pub fn min(&self) -> Option<&Record> {
        let mut current = self.root()?;
        while let Some(left) = current.left() {
            current = left;
        }
        Some(current.record())
    }

    /// Record with the largest value
    pub fn max(&self) -> Option<&Record> {
        let mut current = self.root()?;
        while let Some(right) = current.right() {
            current = right;
        }
        Some(current.record())
    }

    /// Records in ascending value order
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root())
    }

    /// Verify ordering, balance, cached heights and the node counter
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let (_, actual) = traversal::check_subtree(self.root(), None, None)?;
        if actual != self.len {
            return Err(InvariantViolation::CountMismatch {
                reported: self.len,
                actual,
            });
        }
        Ok(())
    }

    /// Digest of the tree's shape and contents
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        traversal::hash_shape(self.root(), &mut hasher);
        hasher.finalize()
    }

    /// Detach every node, leaving the tree empty
    pub(crate) fn take_root(&mut self) -> Option<Box<AvlNode>> {
        self.len = 0;
        self.last_comparisons = 0;
        self.root.take()
    }
}

impl<'a> IntoIterator for &'a AvlTree {
    type Item = &'a Record;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Record> for AvlTree {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, records: I) {
        for record in records {
            self.insert(record);
        }
    }
}

impl FromIterator<Record> for AvlTree {
    fn from_iter<I: IntoIterator<Item = Record>>(records: I) -> Self {
        let mut tree = Self::new();
        tree.extend(records);
        tree
    }
}
