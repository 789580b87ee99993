//! Store configuration

use crate::StoreError;

/// Configuration parameters for an [`IndexedStore`](crate::IndexedStore)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreConfig {
    /// Name attached to log spans
    pub name: String,

    /// Run the full invariant check after every mutation
    ///
    /// The check walks the whole tree, so each insert, delete and update
    /// costs O(n) while this is set. On by default only in debug builds.
    /// Violations are logged at `error` level; call
    /// [`IndexedStore::verify`](crate::IndexedStore::verify) to get them as
    /// an error value.
    pub verify_invariants: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "avldb".to_string(),
            verify_invariants: cfg!(debug_assertions),
        }
    }
}

impl StoreConfig {
    /// Set the store name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enable or disable post-mutation invariant checks
    pub fn with_verify_invariants(mut self, enabled: bool) -> Self {
        self.verify_invariants = enabled;
        self
    }

    /// Reject unusable settings
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::InvalidConfiguration(
                "store name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
