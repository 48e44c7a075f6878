//! Process-local cache store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::CacheStore;
use crate::Error;

/// In-memory [`CacheStore`] backed by a `HashMap`.
///
/// Contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> Error {
    Error::Cache("memory cache lock poisoned".into())
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn exists(&self, key: &str) -> Result<bool, Error> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn flush_all(&self) -> Result<u64, Error> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }
}
