//! Read-only walks over the tree: inorder iteration, invariant checking and
//! structural fingerprints

use thiserror::Error;

use super::node::AvlNode;
use crate::record::Record;

/// Structural invariant that a tree failed to uphold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A value sits on the wrong side of an ancestor
    #[error("value {value} out of order (allowed range {lower:?}..{upper:?})")]
    OutOfOrder {
        /// Offending value
        value: i64,
        /// Exclusive lower bound inherited from ancestors
        lower: Option<i64>,
        /// Exclusive upper bound inherited from ancestors
        upper: Option<i64>,
    },

    /// Subtree heights differ by more than one
    #[error("node {value} unbalanced: balance factor {balance}")]
    Unbalanced {
        /// Value at the unbalanced node
        value: i64,
        /// `height(left) - height(right)`
        balance: isize,
    },

    /// Cached height disagrees with the recomputed one
    #[error("node {value} caches height {cached} but measures {actual}")]
    StaleHeight {
        /// Value at the node
        value: i64,
        /// Height stored in the node
        cached: usize,
        /// Height recomputed from children
        actual: usize,
    },

    /// Node counter disagrees with the number of reachable nodes
    #[error("tree reports {reported} nodes but holds {actual}")]
    CountMismatch {
        /// Counter value
        reported: usize,
        /// Reachable nodes
        actual: usize,
    },
}

/// Inorder (ascending value) iterator over records
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<&'a AvlNode>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(root: Option<&'a AvlNode>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a AvlNode>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node.record())
    }
}

/// Check ordering, balance and cached heights below `node`
///
/// Returns `(height, node_count)` of the subtree on success.
pub(crate) fn check_subtree(
    node: Option<&AvlNode>,
    lower: Option<i64>,
    upper: Option<i64>,
) -> Result<(usize, usize), InvariantViolation> {
    let Some(node) = node else {
        return Ok((0, 0));
    };

    let value = node.value();
    if lower.is_some_and(|bound| value <= bound) || upper.is_some_and(|bound| value >= bound) {
        return Err(InvariantViolation::OutOfOrder {
            value,
            lower,
            upper,
        });
    }

    let (left_height, left_count) = check_subtree(node.left(), lower, Some(value))?;
    let (right_height, right_count) = check_subtree(node.right(), Some(value), upper)?;

    let actual = 1 + left_height.max(right_height);
    if node.height() != actual {
        return Err(InvariantViolation::StaleHeight {
            value,
            cached: node.height(),
            actual,
        });
    }

    let balance = left_height as isize - right_height as isize;
    if balance.abs() > 1 {
        return Err(InvariantViolation::Unbalanced { value, balance });
    }

    Ok((actual, left_count + right_count + 1))
}

/// Feed the preorder shape of the subtree into `hasher`
///
/// Empty slots are hashed too, so two trees with the same records but
/// different shapes produce different digests.
pub(crate) fn hash_shape(node: Option<&AvlNode>, hasher: &mut blake3::Hasher) {
    match node {
        None => {
            hasher.update(&[0]);
        }
        Some(node) => {
            hasher.update(&[1]);
            hasher.update(&node.value().to_le_bytes());
            hasher.update(&(node.record().key.len() as u64).to_le_bytes());
            hasher.update(node.record().key.as_bytes());
            hasher.update(&(node.height() as u64).to_le_bytes());
            hash_shape(node.left(), hasher);
            hash_shape(node.right(), hasher);
        }
    }
}
