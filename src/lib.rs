//! # TreeKV
//!
//! An in-memory ordered key-value backend for an indexing engine:
//! - Byte keys in strict lexicographic order
//! - One exclusive lock serializing every read and write
//! - Per-step locked iterators (no snapshot isolation)
//! - Batched writes with per-key merge operator chains
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Host Indexing Engine                       │
//! │        (KvReader / KvWriter / KvBatch / KvIterator)         │
//! └──────────┬──────────────────┬───────────────────┬───────────┘
//!            │                  │                   │
//!            ▼                  ▼                   ▼
//!   ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//!   │    Store    │     │  Iterator   │     │    Batch    │
//!   │ get/set/del │     │ lock / step │     │ own Mutex   │
//!   └──────┬──────┘     └──────┬──────┘     └──────┬──────┘
//!          │                   │                   │ execute
//!          └───────────────────┼───────────────────┘
//!                              ▼
//!                      ┌───────────────┐
//!                      │ Mutex<Ordered │
//!                      │     Map>      │
//!                      └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod ordered;
pub mod merge;
pub mod kv;
pub mod store;
pub mod iterator;
pub mod batch;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::Config;
pub use kv::{KvBatch, KvIterator, KvReader, KvStore, KvWriter};
pub use merge::{Append, Counter, MergeOperator};
pub use store::{store_constructor, Store, NAME};
pub use iterator::StoreIterator;
pub use batch::Batch;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TreeKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
