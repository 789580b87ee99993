//! # avldb: in-memory record store indexed by an AVL tree
//!
//! Records carry a string `key` and an integer `value`. The index orders
//! records by `value` and keeps itself height-balanced, so point lookups,
//! inserts and deletes cost O(log n) node visits.
//!
//! ## Layers
//!
//! 1. **[`tree`]**: the balanced-tree engine (rotations, insert, search,
//!    delete, comparison counting)
//! 2. **[`store`]**: a façade owning one tree, adding range queries, measured
//!    height and clearing
//! 3. **[`command`]**: a line-oriented script format driving a store
//!
//! ## Usage Example
//!
//! ```
//! use avldb::{IndexedStore, Record};
//!
//! let mut store = IndexedStore::new();
//! for (key, value) in [("a", 10), ("b", 20), ("c", 30)] {
//!     store.insert(Record::new(key, value));
//! }
//!
//! assert_eq!(store.tree_height(), 2);
//! assert_eq!(store.search_comparisons("c", 30), 2);
//! let in_range: Vec<i64> = store.range_query(15, 30).iter().map(|r| r.value).collect();
//! assert_eq!(in_range, vec![20, 30]);
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod command;
pub mod config;
pub mod record;
pub mod store;
pub mod tree;

// Re-exports for convenience
pub use command::{Command, CommandError};
pub use config::StoreConfig;
pub use record::Record;
pub use store::IndexedStore;
pub use tree::{AvlNode, AvlTree, InvariantViolation, Lookup};

use thiserror::Error;

/// Errors surfaced by the store
///
/// Lookups and deletes that miss are not errors; they return `None` or do
/// nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Range whose start lies above its end
    #[error("inverted range: start {start} > end {end}")]
    InvertedRange {
        /// Requested lower bound
        start: i64,
        /// Requested upper bound
        end: i64,
    },

    /// Index failed its structural check
    #[error("index invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    /// Configuration rejected by [`StoreConfig::validate`]
    #[error("invalid store configuration: {0}")]
    InvalidConfiguration(String),
}

/// Upper bound on AVL height for `n` nodes: `1.45 * log2(n + 2)`
pub fn height_bound(n: usize) -> f64 {
    1.45 * ((n + 2) as f64).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_bound_small_trees() {
        assert!(height_bound(0) >= 1.0);
        assert!(height_bound(1) >= 2.0);
        assert!(height_bound(7) >= 3.0);
    }

    #[test]
    fn test_error_messages() {
        let err = StoreError::InvertedRange { start: 5, end: 1 };
        assert_eq!(err.to_string(), "inverted range: start 5 > end 1");

        let err = StoreError::from(InvariantViolation::CountMismatch {
            reported: 2,
            actual: 3,
        });
        assert!(err.to_string().contains("reports 2 nodes but holds 3"));
    }
}
