//! BTreeMap-backed ordered map
//!
//! `Vec<u8>`'s `Ord` is byte-wise lexicographic, which is exactly the key
//! order the store promises.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::error::{Result, StoreError};

use super::{Cursor, OrderedMap, Step};

/// Default ordered map: O(log n) insert, delete and seek
#[derive(Debug, Default, Clone)]
pub struct BTreeOrderedMap {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl BTreeOrderedMap {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderedMap for BTreeOrderedMap {
    type Cursor = BTreeCursor;

    fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    fn seek(&self, key: &[u8]) -> Result<BTreeCursor> {
        Ok(BTreeCursor::new(Bound::Included(key.to_vec())))
    }

    fn seek_first(&self) -> Result<BTreeCursor> {
        if self.entries.is_empty() {
            return Err(StoreError::EmptyMap);
        }
        Ok(BTreeCursor::new(Bound::Unbounded))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Cursor over a [`BTreeOrderedMap`]
///
/// Remembers only the lower bound of the remaining range, so every step
/// re-seeks against whatever the map holds at that moment.
#[derive(Debug, Clone)]
pub struct BTreeCursor {
    /// Lower bound for the next entry
    position: Bound<Vec<u8>>,

    /// Sticky once the end has been reached or the cursor closed
    done: bool,
}

impl BTreeCursor {
    fn new(position: Bound<Vec<u8>>) -> Self {
        Self {
            position,
            done: false,
        }
    }
}

impl Cursor<BTreeOrderedMap> for BTreeCursor {
    fn next(&mut self, map: &BTreeOrderedMap) -> Result<Step> {
        if self.done {
            return Ok(Step::Exhausted);
        }

        let lower: Bound<&[u8]> = match &self.position {
            Bound::Included(key) => Bound::Included(key.as_slice()),
            Bound::Excluded(key) => Bound::Excluded(key.as_slice()),
            Bound::Unbounded => Bound::Unbounded,
        };

        match map
            .entries
            .range::<[u8], _>((lower, Bound::Unbounded))
            .next()
        {
            Some((key, value)) => {
                self.position = Bound::Excluded(key.clone());
                Ok(Step::Entry(key.clone(), value.clone()))
            }
            None => {
                self.done = true;
                Ok(Step::Exhausted)
            }
        }
    }

    fn close(&mut self) {
        self.done = true;
        self.position = Bound::Unbounded;
    }
}
