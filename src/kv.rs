//! Storage Capability Contract
//!
//! The traits a host indexing engine programs against. Every backend plays
//! all four roles; TreeKV's [`Store`](crate::Store) is both the reader and
//! the writer, which is why readers see no snapshot.

use crate::error::Result;
use crate::merge::MergeOperator;

/// Point reads and ordered iteration
pub trait KvReader {
    type Iter<'a>: KvIterator
    where
        Self: 'a;

    /// `Ok(None)` when the key is missing
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Iterator positioned at the first key >= `start`
    fn iterator(&self, start: &[u8]) -> Self::Iter<'_>;
}

/// Point writes and batch creation
pub trait KvWriter {
    type Batch<'a>: KvBatch
    where
        Self: 'a;

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Deleting a missing key is not an error
    fn delete(&self, key: &[u8]) -> Result<()>;

    fn new_batch(&self) -> Self::Batch<'_>;
}

/// Buffered writes committed in one pass
///
/// Buffering never fails; only `execute` can report an error.
pub trait KvBatch {
    fn set(&self, key: &[u8], value: &[u8]);

    fn delete(&self, key: &[u8]);

    /// Append `op` to the merge chain for `key`
    fn merge<O>(&self, key: &[u8], op: O)
    where
        O: MergeOperator + 'static;

    fn execute(&self) -> Result<()>;

    /// Drop everything buffered without committing
    fn close(&self);
}

/// Forward-only cursor used by a single caller
pub trait KvIterator {
    fn seek_first(&mut self);

    fn seek(&mut self, key: &[u8]);

    fn next(&mut self);

    fn current(&self) -> Option<(&[u8], &[u8])>;

    fn key(&self) -> Option<&[u8]> {
        self.current().map(|(key, _)| key)
    }

    fn value(&self) -> Option<&[u8]> {
        self.current().map(|(_, value)| value)
    }

    fn valid(&self) -> bool {
        self.current().is_some()
    }

    fn close(&mut self);
}

/// A complete backend: reader and writer views plus lifecycle
pub trait KvStore: KvReader + KvWriter {
    /// Reader view; the backend itself, no snapshot is taken
    fn reader(&self) -> &Self {
        self
    }

    /// Writer view; the backend itself
    fn writer(&self) -> &Self {
        self
    }

    fn close(&self) -> Result<()>;
}
