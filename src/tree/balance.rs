//! Rebalancing rules applied while unwinding a mutation
//!
//! Insert and delete pick the rotation differently. After an insert the
//! inserted value tells which grandchild grew. After a delete that value is
//! gone, so the heavy child's own balance factor decides.

use super::node::{balance_of, AvlNode};

/// Restore balance at `node` after inserting `inserted` somewhere below it
///
/// `node` must already carry an up-to-date height.
pub(crate) fn after_insert(mut node: Box<AvlNode>, inserted: i64) -> Box<AvlNode> {
    let balance = node.balance_factor();

    if balance > 1 {
        if let Some(left_value) = node.left.as_ref().map(|left| left.value()) {
            if inserted < left_value {
                return node.rotate_right();
            }
            if inserted > left_value {
                node.left = node.left.take().map(AvlNode::rotate_left);
                return node.rotate_right();
            }
        }
    } else if balance < -1 {
        if let Some(right_value) = node.right.as_ref().map(|right| right.value()) {
            if inserted > right_value {
                return node.rotate_left();
            }
            if inserted < right_value {
                node.right = node.right.take().map(AvlNode::rotate_right);
                return node.rotate_left();
            }
        }
    }

    node
}

/// Restore balance at `node` after a removal somewhere below it
///
/// `node` must already carry an up-to-date height.
pub(crate) fn after_delete(mut node: Box<AvlNode>) -> Box<AvlNode> {
    let balance = node.balance_factor();

    if balance > 1 {
        if balance_of(&node.left) < 0 {
            node.left = node.left.take().map(AvlNode::rotate_left);
        }
        return node.rotate_right();
    }

    if balance < -1 {
        if balance_of(&node.right) > 0 {
            node.right = node.right.take().map(AvlNode::rotate_right);
        }
        return node.rotate_left();
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn rec(value: i64) -> Record {
        Record::new(format!("k{value}"), value)
    }

    fn leaf(value: i64) -> Option<Box<AvlNode>> {
        Some(AvlNode::leaf(rec(value)))
    }

    fn shape(node: &AvlNode) -> (i64, Option<i64>, Option<i64>) {
        (
            node.value(),
            node.left().map(AvlNode::value),
            node.right().map(AvlNode::value),
        )
    }

    #[test]
    fn test_insert_left_left() {
        let mid = AvlNode::from_parts(rec(20), leaf(10), None);
        let top = AvlNode::from_parts(rec(30), Some(mid), None);
        let fixed = after_insert(top, 10);
        assert_eq!(shape(&fixed), (20, Some(10), Some(30)));
        assert_eq!(fixed.height(), 2);
    }

    #[test]
    fn test_insert_left_right() {
        let mid = AvlNode::from_parts(rec(10), None, leaf(20));
        let top = AvlNode::from_parts(rec(30), Some(mid), None);
        let fixed = after_insert(top, 20);
        assert_eq!(shape(&fixed), (20, Some(10), Some(30)));
    }

    #[test]
    fn test_insert_right_right() {
        let mid = AvlNode::from_parts(rec(20), None, leaf(30));
        let top = AvlNode::from_parts(rec(10), None, Some(mid));
        let fixed = after_insert(top, 30);
        assert_eq!(shape(&fixed), (20, Some(10), Some(30)));
    }

    #[test]
    fn test_insert_right_left() {
        let mid = AvlNode::from_parts(rec(30), leaf(20), None);
        let top = AvlNode::from_parts(rec(10), None, Some(mid));
        let fixed = after_insert(top, 20);
        assert_eq!(shape(&fixed), (20, Some(10), Some(30)));
    }

    #[test]
    fn test_insert_balanced_node_untouched() {
        let top = AvlNode::from_parts(rec(2), leaf(1), leaf(3));
        let fixed = after_insert(top, 3);
        assert_eq!(shape(&fixed), (2, Some(1), Some(3)));
    }

    #[test]
    fn test_delete_left_heavy_even_child_single_rotation() {
        // Right side emptied; left child has balance 0
        let left = AvlNode::from_parts(rec(20), leaf(10), leaf(25));
        let top = AvlNode::from_parts(rec(30), Some(left), None);
        let fixed = after_delete(top);
        assert_eq!(shape(&fixed), (20, Some(10), Some(30)));
        assert_eq!(fixed.right().and_then(AvlNode::left).map(AvlNode::value), Some(25));
        assert_eq!(fixed.height(), 3);
        assert_eq!(fixed.balance_factor(), -1);
    }

    #[test]
    fn test_delete_left_heavy_right_leaning_child_double_rotation() {
        let left = AvlNode::from_parts(rec(10), None, leaf(20));
        let top = AvlNode::from_parts(rec(30), Some(left), None);
        let fixed = after_delete(top);
        assert_eq!(shape(&fixed), (20, Some(10), Some(30)));
        assert_eq!(fixed.height(), 2);
    }

    #[test]
    fn test_delete_right_heavy_cases() {
        let right = AvlNode::from_parts(rec(20), None, leaf(30));
        let top = AvlNode::from_parts(rec(10), None, Some(right));
        assert_eq!(shape(&after_delete(top)), (20, Some(10), Some(30)));

        let right = AvlNode::from_parts(rec(30), leaf(20), None);
        let top = AvlNode::from_parts(rec(10), None, Some(right));
        assert_eq!(shape(&after_delete(top)), (20, Some(10), Some(30)));
    }
}
