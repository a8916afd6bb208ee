//! Tests for Batch
//!
//! These tests verify:
//! - Buffered sets/deletes are invisible until execute
//! - Append-order, last-write-wins replay of plain writes
//! - Merge chains apply before plain writes and see pre-batch values
//! - Merge failure aborts without rolling back applied merges
//! - Close discards buffered work

use std::sync::Arc;
use std::thread;

use treekv::{Append, KvBatch, KvWriter, Result, Store, StoreError};

// =============================================================================
// Helper Functions
// =============================================================================

/// Operator that replaces whatever is stored with a fixed value
fn replace_with(value: &'static [u8]) -> impl Fn(&[u8], Option<&[u8]>) -> Result<Option<Vec<u8>>> {
    move |_key: &[u8], _existing: Option<&[u8]>| Ok(Some(value.to_vec()))
}

fn failing(reason: &'static str) -> impl Fn(&[u8], Option<&[u8]>) -> Result<Option<Vec<u8>>> {
    move |key: &[u8], _existing: Option<&[u8]>| Err(StoreError::merge(key, reason))
}

fn delete_key(_key: &[u8], _existing: Option<&[u8]>) -> Result<Option<Vec<u8>>> {
    Ok(None)
}

// =============================================================================
// Plain Write Tests
// =============================================================================

#[test]
fn test_batch_writes_invisible_until_execute() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.set(b"a", b"1");
    batch.delete(b"b");

    assert_eq!(store.get(b"a").unwrap(), None);
    assert_eq!(batch.pending_writes(), 2);

    batch.execute().unwrap();

    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert!(batch.is_empty());
}

#[test]
fn test_batch_last_write_wins() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.set(b"k", b"1");
    batch.set(b"k", b"2");
    batch.set(b"k", b"3");
    batch.execute().unwrap();

    assert_eq!(store.get(b"k").unwrap(), Some(b"3".to_vec()));
}

#[test]
fn test_batch_set_after_delete_resurrects() {
    let store = Store::new();
    store.set(b"k", b"old").unwrap();
    let batch = store.new_batch();

    batch.delete(b"k");
    batch.set(b"k", b"new");
    batch.execute().unwrap();

    assert_eq!(store.get(b"k").unwrap(), Some(b"new".to_vec()));
}

#[test]
fn test_batch_delete_after_set_removes() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.set(b"k", b"v");
    batch.delete(b"k");
    batch.execute().unwrap();

    assert_eq!(store.get(b"k").unwrap(), None);
}

#[test]
fn test_batch_delete_missing_key_is_noop() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.delete(b"missing");

    assert!(batch.execute().is_ok());
    assert!(store.is_empty());
}

#[test]
fn test_empty_batch_execute() {
    let store = Store::new();
    store.set(b"k", b"v").unwrap();

    store.new_batch().execute().unwrap();

    assert_eq!(store.len(), 1);
}

#[test]
fn test_execute_twice_applies_once() {
    let store = Store::new();
    let batch = store.new_batch();
    batch.merge(b"log", Append(b"x".to_vec()));

    batch.execute().unwrap();
    batch.execute().unwrap();

    assert_eq!(store.get(b"log").unwrap(), Some(b"x".to_vec()));
}

#[test]
fn test_batch_reusable_after_execute() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.set(b"a", b"1");
    batch.execute().unwrap();
    batch.set(b"b", b"2");
    batch.execute().unwrap();

    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
}

// =============================================================================
// Merge Tests
// =============================================================================

#[test]
fn test_plain_write_overrides_merge_for_same_key() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.set(b"A", b"1");
    batch.merge(b"A", Append(b"x".to_vec()));
    batch.set(b"A", b"2");
    batch.execute().unwrap();

    assert_eq!(store.get(b"A").unwrap(), Some(b"2".to_vec()));
}

#[test]
fn test_merge_on_absent_key() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.merge(b"B", replace_with(b"y"));
    batch.execute().unwrap();

    assert_eq!(store.get(b"B").unwrap(), Some(b"y".to_vec()));
}

#[test]
fn test_merge_sees_pre_batch_value() {
    let store = Store::new();
    store.set(b"k", b"base").unwrap();
    let batch = store.new_batch();

    batch.set(b"other", b"ignored-by-merge");
    batch.merge(b"k", Append(b"+1".to_vec()));
    batch.execute().unwrap();

    assert_eq!(store.get(b"k").unwrap(), Some(b"base+1".to_vec()));
}

#[test]
fn test_merge_ignores_buffered_set_for_same_key() {
    let store = Store::new();
    store.set(b"k", b"pre").unwrap();
    let batch = store.new_batch();

    batch.set(b"k", b"buffered");
    batch.merge(b"k", |_key: &[u8], existing: Option<&[u8]>| -> Result<Option<Vec<u8>>> {
        assert_eq!(existing, Some(&b"pre"[..]));
        Ok(Some(b"merged".to_vec()))
    });
    batch.execute().unwrap();

    assert_eq!(store.get(b"k").unwrap(), Some(b"buffered".to_vec()));
}

#[test]
fn test_merge_chain_folds_in_registration_order() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.merge(b"k", Append(b"a".to_vec()));
    batch.merge(b"k", Append(b"b".to_vec()));
    batch.merge(b"k", Append(b"c".to_vec()));
    assert_eq!(batch.pending_merges(), 1);
    batch.execute().unwrap();

    assert_eq!(store.get(b"k").unwrap(), Some(b"abc".to_vec()));
}

#[test]
fn test_merge_returning_tombstone_deletes_key() {
    let store = Store::new();
    store.set(b"k", b"v").unwrap();
    let batch = store.new_batch();

    batch.merge(b"k", delete_key);
    batch.execute().unwrap();

    assert_eq!(store.get(b"k").unwrap(), None);
}

#[test]
fn test_merge_chain_can_recreate_after_tombstone() {
    let store = Store::new();
    store.set(b"k", b"v").unwrap();
    let batch = store.new_batch();

    batch.merge(b"k", delete_key);
    batch.merge(b"k", Append(b"fresh".to_vec()));
    batch.execute().unwrap();

    assert_eq!(store.get(b"k").unwrap(), Some(b"fresh".to_vec()));
}

// =============================================================================
// Merge Failure Tests
// =============================================================================

#[test]
fn test_merge_failure_is_returned_verbatim() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.merge(b"C", failing("bad input"));
    let err = batch.execute().unwrap_err();

    assert_eq!(err, StoreError::merge(b"C", "bad input"));
}

#[test]
fn test_merge_failure_keeps_earlier_merges_and_skips_rest() {
    let store = Store::new();
    let batch = store.new_batch();

    // Merge chains run in ascending key order: A, B, C, D
    batch.merge(b"A", replace_with(b"applied"));
    batch.merge(b"B", replace_with(b"applied"));
    batch.merge(b"C", failing("boom"));
    batch.merge(b"D", replace_with(b"never"));
    batch.set(b"E", b"never");

    assert!(batch.execute().is_err());

    assert_eq!(store.get(b"A").unwrap(), Some(b"applied".to_vec()));
    assert_eq!(store.get(b"B").unwrap(), Some(b"applied".to_vec()));
    assert_eq!(store.get(b"C").unwrap(), None);
    assert_eq!(store.get(b"D").unwrap(), None);
    assert_eq!(store.get(b"E").unwrap(), None);
}

#[test]
fn test_failed_execute_still_drains_buffers() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.merge(b"C", failing("boom"));
    batch.set(b"E", b"v");
    assert!(batch.execute().is_err());

    assert!(batch.is_empty());
    batch.execute().unwrap();
    assert_eq!(store.get(b"E").unwrap(), None);
}

// =============================================================================
// Close Tests
// =============================================================================

#[test]
fn test_close_discards_without_commit() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.set(b"a", b"1");
    batch.merge(b"b", Append(b"x".to_vec()));
    batch.close();
    batch.execute().unwrap();

    assert!(store.is_empty());
}

#[test]
fn test_close_after_execute_is_harmless() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.set(b"a", b"1");
    batch.execute().unwrap();
    batch.close();
    batch.close();

    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
}

#[test]
fn test_batch_usable_after_close() {
    let store = Store::new();
    let batch = store.new_batch();

    batch.close();
    batch.merge(b"k", Append(b"v".to_vec()));
    batch.execute().unwrap();

    assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
}

// =============================================================================
// Concurrent Buffering Tests
// =============================================================================

#[test]
fn test_concurrent_buffering_into_one_batch() {
    let store = Arc::new(Store::new());
    let batch = store.new_batch();

    thread::scope(|scope| {
        for t in 0..4u8 {
            let batch = &batch;
            scope.spawn(move || {
                for i in 0..50u8 {
                    batch.set(&[t, i], &[i]);
                    batch.merge(b"count", Append(vec![t]));
                }
            });
        }
    });

    assert_eq!(batch.pending_writes(), 200);
    batch.execute().unwrap();

    assert_eq!(store.len(), 201);
    assert_eq!(store.get(b"count").unwrap().map(|v| v.len()), Some(200));
}

// =============================================================================
// Capability Contract Tests
// =============================================================================

fn commit_through<W: KvWriter>(writer: &W) -> Result<()> {
    let batch = writer.new_batch();
    KvBatch::set(&batch, b"x", b"1");
    KvBatch::merge(&batch, b"y", Append(b"2".to_vec()));
    KvBatch::delete(&batch, b"z");
    KvBatch::execute(&batch)?;
    KvBatch::close(&batch);
    Ok(())
}

#[test]
fn test_batch_through_writer_contract() {
    let store = Store::new();
    store.set(b"z", b"gone").unwrap();

    commit_through(&store).unwrap();

    assert_eq!(store.get(b"x").unwrap(), Some(b"1".to_vec()));
    assert_eq!(store.get(b"y").unwrap(), Some(b"2".to_vec()));
    assert_eq!(store.get(b"z").unwrap(), None);
}
