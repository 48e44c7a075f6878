//! Whole-cache invalidation.

use std::sync::Arc;

use crate::Error;
use crate::cache::CacheStore;

/// Flushes the entire cache keyspace.
///
/// There is no selective invalidation: any mutation of the underlying data
/// invalidates every cached query.
#[derive(Clone)]
pub struct Invalidator {
    cache: Arc<dyn CacheStore>,
}

impl Invalidator {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }

    /// Remove every cached entry. Succeeds on an already empty cache.
    ///
    /// Returns the number of entries removed.
    pub async fn invalidate_cache(&self) -> Result<u64, Error> {
        let removed = self.cache.flush_all().await?;
        tracing::info!(removed, "cache invalidated");
        Ok(removed)
    }
}
