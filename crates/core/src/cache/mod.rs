//! Key-value cache stores for query results.
//!
//! The cache is a flat keyspace of string keys to JSON payloads. Entries have
//! no expiry and no eviction; the only way to remove them is a full flush.
//!
//! - [`CacheDb`]: persistent store backed by SQLite via tokio-rusqlite
//! - [`MemoryCache`]: process-local store for tests and throwaway runs

pub mod connection;
pub mod entries;
pub mod key;
pub mod memory;

pub use crate::Error;

pub use connection::CacheDb;
pub use key::{cache_key, canonical_filter};
pub use memory::MemoryCache;

use async_trait::async_trait;

/// A key-value cache with existence checks and whole-keyspace flushes.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Whether an entry exists for `key`, regardless of its contents.
    async fn exists(&self, key: &str) -> Result<bool, Error>;

    /// Fetch the payload stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove every entry. Returns how many were removed.
    async fn flush_all(&self) -> Result<u64, Error>;
}
