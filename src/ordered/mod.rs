//! Ordered Map Module
//!
//! The ordered byte-key/byte-value container the store is built on.
//!
//! ## Responsibilities
//! - Unique keys in strict byte-wise lexicographic order
//! - Insert-or-replace, delete, point lookup
//! - Cursors seeked to the first key >= a given key
//!
//! ## Cursor Model
//! A cursor never borrows the map. Each `next` call is handed the map
//! explicitly, so the store can release its lock between steps and
//! concurrent writes become visible to an in-flight cursor.

mod btree;

pub use btree::{BTreeCursor, BTreeOrderedMap};

use crate::error::Result;

/// Outcome of advancing a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The next key/value pair in order
    Entry(Vec<u8>, Vec<u8>),

    /// No key remains at or after the cursor position
    Exhausted,
}

/// Ordered byte-key/byte-value container
///
/// Implementations are not synchronized; the store guards the whole map
/// behind its single lock.
pub trait OrderedMap: Send {
    type Cursor: Cursor<Self>;

    /// Insert `key`, replacing any existing value
    fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()>;

    /// Remove `key`; removing a missing key is a no-op
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    fn get(&self, key: &[u8]) -> Option<&[u8]>;

    /// Cursor positioned before the first key >= `key`
    fn seek(&self, key: &[u8]) -> Result<Self::Cursor>;

    /// Cursor positioned before the smallest key
    ///
    /// Fails with [`StoreError::EmptyMap`](crate::StoreError::EmptyMap)
    /// when there is nothing to position on.
    fn seek_first(&self) -> Result<Self::Cursor>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Forward-only position within an [`OrderedMap`]
pub trait Cursor<M: ?Sized>: Send {
    /// Yield the entry at the cursor and move past it
    fn next(&mut self, map: &M) -> Result<Step>;

    /// Release the position; later `next` calls report `Exhausted`
    fn close(&mut self);
}
