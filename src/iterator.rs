//! Store Iterator
//!
//! Forward-only cursor over a [`Store`], stepped by a single caller.
//!
//! ## State Machine
//! ```text
//!   Unpositioned ──seek/next──► Positioned(key, value) ──next──► ...
//!        │                              │
//!        └──────────────┬───────────────┘
//!                       ▼
//!            Exhausted / Failed (terminal until re-seeked)
//! ```
//!
//! The store lock is held for one seek or one step at a time, never across
//! steps. Writes from other callers that land between two steps are
//! visible to the next step.

use tracing::trace;

use crate::error::{Result, StoreError};
use crate::kv::KvIterator;
use crate::ordered::{BTreeOrderedMap, Cursor, OrderedMap, Step};
use crate::store::Store;

/// Where the iterator currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// Reset by a seek, no entry read yet
    Unpositioned,

    Positioned { key: Vec<u8>, value: Vec<u8> },

    /// Ran off the end of the map, or was closed
    Exhausted,

    /// The cursor reported a genuine fault
    Failed(StoreError),
}

impl State {
    fn is_terminal(&self) -> bool {
        matches!(self, State::Exhausted | State::Failed(_))
    }
}

/// Per-step locked iterator over a [`Store`]
///
/// Not meant to be shared between callers; all stepping methods take
/// `&mut self`.
pub struct StoreIterator<'a, M: OrderedMap = BTreeOrderedMap> {
    store: &'a Store<M>,
    cursor: Option<M::Cursor>,
    state: State,
}

impl<'a, M: OrderedMap> StoreIterator<'a, M> {
    /// Unpositioned iterator; call `seek` or `seek_first` before reading
    pub(crate) fn new(store: &'a Store<M>) -> Self {
        Self {
            store,
            cursor: None,
            state: State::Unpositioned,
        }
    }

    /// Position at the smallest key
    ///
    /// An empty map leaves the iterator exhausted.
    pub fn seek_first(&mut self) {
        self.reset();

        let cursor = self.store.lock().seek_first();

        match cursor {
            Ok(cursor) => self.cursor = Some(cursor),
            Err(StoreError::EmptyMap) => self.state = State::Exhausted,
            Err(e) => {
                trace!(error = %e, "seek_first failed");
                self.state = State::Failed(e);
            }
        }

        self.next();
    }

    /// Position at the first key >= `key`
    ///
    /// A failed seek is indistinguishable from "nothing at or after `key`"
    /// and leaves the iterator exhausted.
    pub fn seek(&mut self, key: &[u8]) {
        self.reset();

        let cursor = self.store.lock().seek(key);

        match cursor {
            Ok(cursor) => self.cursor = Some(cursor),
            Err(e) => trace!(error = %e, "seek found nothing"),
        }

        self.next();
    }

    /// Advance to the next entry
    ///
    /// Once terminal, stays terminal: a failed iterator becomes exhausted
    /// and nothing is re-read.
    pub fn next(&mut self) {
        if self.state.is_terminal() {
            self.state = State::Exhausted;
            return;
        }

        let Some(cursor) = self.cursor.as_mut() else {
            self.state = State::Exhausted;
            return;
        };

        let step = cursor.next(&self.store.lock());

        self.state = match step {
            Ok(Step::Entry(key, value)) => State::Positioned { key, value },
            Ok(Step::Exhausted) => State::Exhausted,
            Err(e) => {
                trace!(error = %e, "cursor step failed");
                State::Failed(e)
            }
        };
    }

    /// Current pair, or `None` once exhausted
    pub fn current(&self) -> Option<(&[u8], &[u8])> {
        match &self.state {
            State::Positioned { key, value } => Some((key.as_slice(), value.as_slice())),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&[u8]> {
        self.current().map(|(key, _)| key)
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.current().map(|(_, value)| value)
    }

    pub fn valid(&self) -> bool {
        self.current().is_some()
    }

    /// The fault that ended iteration, if it was not plain exhaustion
    pub fn error(&self) -> Option<&StoreError> {
        match &self.state {
            State::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Release the cursor; safe to call more than once
    pub fn close(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            cursor.close();
        }
        self.state = State::Exhausted;
    }

    /// Drain the remaining entries into a vector
    ///
    /// Each step still takes the lock on its own.
    pub fn collect_remaining(&mut self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut entries = Vec::new();
        while let Some((key, value)) = self.current() {
            entries.push((key.to_vec(), value.to_vec()));
            self.next();
        }
        match self.state.clone() {
            State::Failed(e) => Err(e),
            _ => Ok(entries),
        }
    }

    fn reset(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            cursor.close();
        }
        self.state = State::Unpositioned;
    }
}

impl<M: OrderedMap> KvIterator for StoreIterator<'_, M> {
    fn seek_first(&mut self) {
        StoreIterator::seek_first(self)
    }

    fn seek(&mut self, key: &[u8]) {
        StoreIterator::seek(self, key)
    }

    fn next(&mut self) {
        StoreIterator::next(self)
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        StoreIterator::current(self)
    }

    fn close(&mut self) {
        StoreIterator::close(self)
    }
}
