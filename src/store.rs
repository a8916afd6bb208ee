//! Store Module
//!
//! The in-memory backend that owns the ordered map.
//!
//! ## Responsibilities
//! - Serialize every lookup and mutation behind one exclusive lock
//! - Hand out iterators and batches bound to this store
//! - Act as both the reader and the writer view (no snapshots)

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use crate::batch::Batch;
use crate::config::Config;
use crate::error::Result;
use crate::iterator::StoreIterator;
use crate::kv::{KvReader, KvStore, KvWriter};
use crate::ordered::{BTreeOrderedMap, OrderedMap};

/// Registry name of this backend
pub const NAME: &str = "treekv";

/// Shared construction entry point for the host's backend registry
pub fn store_constructor(config: &Config) -> Result<Store> {
    Store::open(config)
}

/// Mutex-serialized ordered key-value store
///
/// ## Concurrency Model: One Exclusive Lock
///
/// - `get`/`set`/`delete` hold `map` for exactly one map operation
/// - Iterators take the lock once per seek or step, never across steps
/// - `Batch::execute` holds it for the whole commit
///
/// There is deliberately no reader/writer split: an iterator in progress
/// observes concurrent writes between its steps.
pub struct Store<M: OrderedMap = BTreeOrderedMap> {
    map: Mutex<M>,
}

impl Store<BTreeOrderedMap> {
    /// Create an empty store over the default ordered map
    pub fn new() -> Self {
        Self::with_map(BTreeOrderedMap::new())
    }

    /// Construct from the host's option map
    ///
    /// Nothing is configurable for an in-memory map, so every option is
    /// accepted and ignored.
    pub fn open(config: &Config) -> Result<Self> {
        for (name, value) in &config.options {
            debug!(backend = NAME, option = %name, value = %value, "ignoring store option");
        }
        debug!(backend = NAME, "opened in-memory store");
        Ok(Self::new())
    }
}

impl Default for Store<BTreeOrderedMap> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: OrderedMap> Store<M> {
    /// Wrap an existing ordered map
    pub fn with_map(map: M) -> Self {
        Self {
            map: Mutex::new(map),
        }
    }

    /// Get a value by key
    ///
    /// Returns `Ok(None)` for a missing key.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let map = self.lock();
        Ok(map.get(key).map(<[u8]>::to_vec))
    }

    /// Insert or replace a key-value pair
    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.lock().insert(key.to_vec(), value.to_vec())
    }

    /// Delete a key; a missing key is a no-op
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.lock().delete(key)
    }

    /// Iterator positioned at the first key >= `start`
    ///
    /// The lock is taken for the seek only.
    pub fn iterator(&self, start: &[u8]) -> StoreIterator<'_, M> {
        let mut iter = StoreIterator::new(self);
        iter.seek(start);
        iter
    }

    /// Allocate an empty batch bound to this store
    pub fn new_batch(&self) -> Batch<'_, M> {
        Batch::new(self)
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Nothing to release for an in-memory map; always succeeds
    pub fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Acquire the store's exclusive lock
    pub(crate) fn lock(&self) -> MutexGuard<'_, M> {
        self.map.lock()
    }
}

// =============================================================================
// Capability Contract
// =============================================================================

impl<M: OrderedMap> KvReader for Store<M> {
    type Iter<'a> = StoreIterator<'a, M> where Self: 'a;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Store::get(self, key)
    }

    fn iterator(&self, start: &[u8]) -> StoreIterator<'_, M> {
        Store::iterator(self, start)
    }
}

impl<M: OrderedMap> KvWriter for Store<M> {
    type Batch<'a> = Batch<'a, M> where Self: 'a;

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        Store::set(self, key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        Store::delete(self, key)
    }

    fn new_batch(&self) -> Batch<'_, M> {
        Store::new_batch(self)
    }
}

impl<M: OrderedMap> KvStore for Store<M> {
    fn close(&self) -> Result<()> {
        Store::close(self)
    }
}
