//! Write Batch
//!
//! Buffers point writes and per-key merge chains, then commits them in one
//! pass under the store lock.
//!
//! ## Commit Order
//! 1. Drain the buffers under the batch lock, then release it
//! 2. Take the store lock for the rest of the commit
//! 3. Fold every merge chain over the key's pre-batch value
//! 4. Replay plain writes in append order (last write for a key wins)
//!
//! Plain writes therefore override a merge result for the same key. A
//! failing merge operator aborts the commit; anything already applied
//! stays applied.

use std::collections::BTreeMap;
use std::mem;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::kv::KvBatch;
use crate::merge::{fold_chain, MergeChain, MergeOperator};
use crate::ordered::{BTreeOrderedMap, OrderedMap};
use crate::store::Store;

/// Everything a batch has buffered so far
#[derive(Default)]
struct Pending {
    /// (key, value); `None` is a tombstone. Duplicates are kept.
    writes: Vec<(Vec<u8>, Option<Vec<u8>>)>,

    /// Merge chains, applied in ascending key order at commit
    merges: BTreeMap<Vec<u8>, MergeChain>,
}

/// Buffered writes and merges bound to one [`Store`]
///
/// Buffering methods take `&self` and may be called from several threads;
/// they only touch the batch's own lock.
pub struct Batch<'a, M: OrderedMap = BTreeOrderedMap> {
    store: &'a Store<M>,
    pending: Mutex<Pending>,
}

impl<'a, M: OrderedMap> Batch<'a, M> {
    pub(crate) fn new(store: &'a Store<M>) -> Self {
        Self {
            store,
            pending: Mutex::new(Pending::default()),
        }
    }

    /// Buffer an insert-or-replace
    pub fn set(&self, key: &[u8], value: &[u8]) {
        self.pending
            .lock()
            .writes
            .push((key.to_vec(), Some(value.to_vec())));
    }

    /// Buffer a tombstone for `key`
    pub fn delete(&self, key: &[u8]) {
        self.pending.lock().writes.push((key.to_vec(), None));
    }

    /// Append `op` to the merge chain for `key`
    pub fn merge<O>(&self, key: &[u8], op: O)
    where
        O: MergeOperator + 'static,
    {
        self.pending
            .lock()
            .merges
            .entry(key.to_vec())
            .or_default()
            .push(Box::new(op));
    }

    /// Commit everything buffered so far
    ///
    /// The buffers are emptied whether or not the commit succeeds.
    pub fn execute(&self) -> Result<()> {
        let Pending { writes, merges } = mem::take(&mut *self.pending.lock());

        let merge_keys = merges.len();
        let plain_writes = writes.len();

        let mut map = self.store.lock();

        for (key, chain) in merges {
            let existing = map.get(&key).map(<[u8]>::to_vec);
            let merged = fold_chain(&chain, &key, existing).map_err(|e| {
                warn!(key = ?key, error = %e, "merge operator failed, aborting batch");
                e
            })?;

            match merged {
                Some(value) => map.insert(key, value)?,
                None => map.delete(&key)?,
            }
        }

        for (key, value) in writes {
            match value {
                Some(value) => map.insert(key, value)?,
                None => map.delete(&key)?,
            }
        }

        debug!(merge_keys, plain_writes, "batch committed");
        Ok(())
    }

    /// Discard everything buffered without committing
    ///
    /// The batch stays usable afterwards.
    pub fn close(&self) {
        *self.pending.lock() = Pending::default();
    }

    /// Number of buffered plain writes (sets and deletes)
    pub fn pending_writes(&self) -> usize {
        self.pending.lock().writes.len()
    }

    /// Number of keys with a buffered merge chain
    pub fn pending_merges(&self) -> usize {
        self.pending.lock().merges.len()
    }

    pub fn is_empty(&self) -> bool {
        let pending = self.pending.lock();
        pending.writes.is_empty() && pending.merges.is_empty()
    }
}

impl<M: OrderedMap> KvBatch for Batch<'_, M> {
    fn set(&self, key: &[u8], value: &[u8]) {
        Batch::set(self, key, value)
    }

    fn delete(&self, key: &[u8]) {
        Batch::delete(self, key)
    }

    fn merge<O>(&self, key: &[u8], op: O)
    where
        O: MergeOperator + 'static,
    {
        Batch::merge(self, key, op)
    }

    fn execute(&self) -> Result<()> {
        Batch::execute(self)
    }

    fn close(&self) {
        Batch::close(self)
    }
}
