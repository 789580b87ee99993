//! Record payload stored in the index
//!
//! Records are ordered by `value` alone. The `key` only participates in
//! exact-match lookups and deletes.

use std::fmt;

/// Keyed record with an integer ordering field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    /// String identifier
    pub key: String,

    /// Ordering field (unique within a tree)
    pub value: i64,
}

impl Record {
    /// Create a record
    pub fn new(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Exact match on both fields
    #[inline]
    pub fn matches(&self, key: &str, value: i64) -> bool {
        self.value == value && self.key == key
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
