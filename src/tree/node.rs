//! Owned AVL node
//!
//! Each node exclusively owns its children through `Box`, so rotations are
//! plain moves: the caller hands over a subtree root and gets back the new one.
//!
//! Height convention: absent subtree = 0, leaf = 1.

use std::fmt;

use tracing::trace;

use crate::record::Record;

/// Child slot: an owned subtree or nothing
pub(crate) type Link = Option<Box<AvlNode>>;

/// Tree node holding exactly one record
#[derive(Debug, Clone)]
pub struct AvlNode {
    pub(crate) record: Record,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) height: usize,
}

impl AvlNode {
    /// Fresh leaf (height 1)
    pub(crate) fn leaf(record: Record) -> Box<Self> {
        Box::new(Self {
            record,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// Assemble a node from existing subtrees, computing its height
    #[cfg(test)]
    pub(crate) fn from_parts(record: Record, left: Link, right: Link) -> Box<Self> {
        let mut node = Box::new(Self {
            record,
            left,
            right,
            height: 0,
        });
        node.update_height();
        node
    }

    /// Record stored at this node
    #[inline]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Ordering value of the stored record
    #[inline]
    pub fn value(&self) -> i64 {
        self.record.value
    }

    /// Left subtree
    #[inline]
    pub fn left(&self) -> Option<&AvlNode> {
        self.left.as_deref()
    }

    /// Right subtree
    #[inline]
    pub fn right(&self) -> Option<&AvlNode> {
        self.right.as_deref()
    }

    /// Cached subtree height
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `height(left) - height(right)`
    pub fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    /// Recompute the cached height from the children's cached heights
    #[inline]
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// Left rotation: the right child becomes the subtree root
    ///
    /// ```text
    ///     x                y
    ///    / \              / \
    ///   a   y     =>     x   c
    ///      / \          / \
    ///     b   c        a   b
    /// ```
    ///
    /// Only `x` and `y` get new heights; `a`, `b`, `c` are untouched.
    pub(crate) fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let Some(mut pivot) = self.right.take() else {
            return self;
        };
        trace!(at = self.record.value, pivot = pivot.record.value, "rotate left");

        self.right = pivot.left.take();
        self.update_height();

        pivot.left = Some(self);
        pivot.update_height();
        pivot
    }

    /// Right rotation: mirror image of [`AvlNode::rotate_left`]
    pub(crate) fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let Some(mut pivot) = self.left.take() else {
            return self;
        };
        trace!(at = self.record.value, pivot = pivot.record.value, "rotate right");

        self.left = pivot.right.take();
        self.update_height();

        pivot.right = Some(self);
        pivot.update_height();
        pivot
    }
}

/// Cached height of a child slot (0 when empty)
#[inline]
pub(crate) fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

/// Balance factor of a child slot (0 when empty)
#[inline]
pub(crate) fn balance_of(link: &Link) -> isize {
    link.as_ref().map_or(0, |node| node.balance_factor())
}

impl fmt::Display for AvlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} h={}", self.record, self.height)?;
        match self.left() {
            Some(left) => write!(f, " {}", left)?,
            None => f.write_str(" .")?,
        }
        match self.right() {
            Some(right) => write!(f, " {}", right)?,
            None => f.write_str(" .")?,
        }
        f.write_str(")")
    }
}
