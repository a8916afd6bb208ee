//! Merge Operators
//!
//! A merge operator combines a key's existing value with new input and
//! produces either a replacement value or a tombstone (`None`). Batches keep
//! an ordered chain of operators per key and fold them at commit time.

use crate::error::{Result, StoreError};

/// User-supplied read-modify-write step for one key
pub trait MergeOperator: Send + Sync {
    /// Combine `existing` (absent = `None`) into the new value for `key`
    ///
    /// Returning `Ok(None)` deletes the key.
    fn merge(&self, key: &[u8], existing: Option<&[u8]>) -> Result<Option<Vec<u8>>>;
}

impl<F> MergeOperator for F
where
    F: Fn(&[u8], Option<&[u8]>) -> Result<Option<Vec<u8>>> + Send + Sync,
{
    fn merge(&self, key: &[u8], existing: Option<&[u8]>) -> Result<Option<Vec<u8>>> {
        self(key, existing)
    }
}

/// Ordered operators registered against one key
pub(crate) type MergeChain = Vec<Box<dyn MergeOperator>>;

/// Fold `chain` over the key's current value in registration order
pub(crate) fn fold_chain(
    chain: &[Box<dyn MergeOperator>],
    key: &[u8],
    existing: Option<Vec<u8>>,
) -> Result<Option<Vec<u8>>> {
    chain
        .iter()
        .try_fold(existing, |current, op| op.merge(key, current.as_deref()))
}

// =============================================================================
// Built-in Operators
// =============================================================================

/// Concatenate bytes onto the existing value (absent = empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Append(pub Vec<u8>);

impl MergeOperator for Append {
    fn merge(&self, _key: &[u8], existing: Option<&[u8]>) -> Result<Option<Vec<u8>>> {
        let mut value = existing.map(<[u8]>::to_vec).unwrap_or_default();
        value.extend_from_slice(&self.0);
        Ok(Some(value))
    }
}

/// Add a signed delta to a little-endian u64 counter
///
/// An absent key counts as zero. A result of zero or below deletes the key,
/// which is how reference counts (e.g. term dictionary rows) disappear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter(pub i64);

impl Counter {
    pub const WIDTH: usize = 8;

    /// Decode a stored counter value
    pub fn decode(key: &[u8], value: &[u8]) -> Result<u64> {
        let bytes: [u8; Self::WIDTH] = value.try_into().map_err(|_| {
            StoreError::merge(
                key,
                format!("counter value must be {} bytes, got {}", Self::WIDTH, value.len()),
            )
        })?;
        Ok(u64::from_le_bytes(bytes))
    }

    pub fn encode(count: u64) -> Vec<u8> {
        count.to_le_bytes().to_vec()
    }
}

impl MergeOperator for Counter {
    fn merge(&self, key: &[u8], existing: Option<&[u8]>) -> Result<Option<Vec<u8>>> {
        let current = match existing {
            Some(value) => Self::decode(key, value)?,
            None => 0,
        };

        let next = i128::from(current) + i128::from(self.0);
        if next <= 0 {
            return Ok(None);
        }

        let next = u64::try_from(next)
            .map_err(|_| StoreError::merge(key, "counter overflow"))?;
        Ok(Some(Self::encode(next)))
    }
}
