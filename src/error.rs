//! Error types for TreeKV
//!
//! Provides a unified error type for all operations.
//!
//! Absence is never an error: a missing key is `Ok(None)` and an exhausted
//! iterator simply reports no current entry.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for TreeKV operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Ordered Map Errors
    // -------------------------------------------------------------------------
    /// The ordered map has no first entry to position a cursor on
    #[error("Ordered map is empty")]
    EmptyMap,

    #[error("Ordered map failure: {0}")]
    Map(String),

    // -------------------------------------------------------------------------
    // Batch Errors
    // -------------------------------------------------------------------------
    #[error("Merge failed for key {key:?}: {reason}")]
    Merge { key: Vec<u8>, reason: String },
}

impl StoreError {
    /// Build a merge failure for `key`
    pub fn merge(key: &[u8], reason: impl Into<String>) -> Self {
        StoreError::Merge {
            key: key.to_vec(),
            reason: reason.into(),
        }
    }
}
