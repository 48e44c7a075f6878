//! Cache-aside retrieval.
//!
//! A filter is turned into a cache key; an existing entry is served as-is,
//! otherwise the document store answers and the result is written back.
//!
//! Failure policy:
//! - errors from the existence check or the document store propagate
//!   (no retry, no stale fallback)
//! - a failed write-back is logged and swallowed; the fresh result is still
//!   returned and the key simply stays cold
//! - a cached payload that vanished or no longer decodes is treated as a miss
//!
//! Concurrent misses on the same key are not coalesced; both callers query
//! the store and the last write wins.

use std::sync::Arc;

use crate::Error;
use crate::cache::{CacheStore, cache_key};
use crate::document::ResultDocument;
use crate::filter::Filter;
use crate::invalidate::Invalidator;
use crate::store::DocumentStore;

/// Outcome of a single retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub key: String,
    pub document: ResultDocument,
    pub cache_hit: bool,
}

/// Read-through cache in front of one collection of a document store.
#[derive(Clone)]
pub struct CacheAside {
    cache: Arc<dyn CacheStore>,
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl CacheAside {
    pub fn new(cache: Arc<dyn CacheStore>, store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self { cache, store, collection: collection.into() }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// An invalidator sharing this retriever's cache.
    pub fn invalidator(&self) -> Invalidator {
        Invalidator::new(Arc::clone(&self.cache))
    }

    /// Return the result for `filter`, from the cache when present.
    pub async fn get_cached_or_retrieve(&self, filter: &Filter) -> Result<ResultDocument, Error> {
        Ok(self.retrieve(filter).await?.document)
    }

    /// Like [`get_cached_or_retrieve`](Self::get_cached_or_retrieve), also
    /// reporting the key and whether the cache answered.
    pub async fn retrieve(&self, filter: &Filter) -> Result<Lookup, Error> {
        let key = cache_key(&self.collection, filter);

        if self.cache.exists(&key).await?
            && let Some(document) = self.read_cached(&key).await?
        {
            tracing::debug!(key = %key, results = document.len(), "cache hit");
            return Ok(Lookup { key, document, cache_hit: true });
        }

        tracing::debug!(key = %key, "cache miss, querying store");
        let results = self.store.find(&self.collection, filter).await?;
        let document = ResultDocument::new(results);

        self.write_back(&key, &document).await;

        Ok(Lookup { key, document, cache_hit: false })
    }

    async fn read_cached(&self, key: &str) -> Result<Option<ResultDocument>, Error> {
        let Some(payload) = self.cache.get(key).await? else {
            tracing::warn!(key = %key, "cache entry disappeared after existence check");
            return Ok(None);
        };

        match ResultDocument::from_json(&payload) {
            Ok(document) => Ok(Some(document)),
            Err(e) => {
                tracing::warn!(key = %key, "ignoring undecodable cache entry: {}", e);
                Ok(None)
            }
        }
    }

    async fn write_back(&self, key: &str, document: &ResultDocument) {
        let payload = match document.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(key = %key, "failed to encode query result: {}", e);
                return;
            }
        };

        if let Err(e) = self.cache.set(key, &payload).await {
            tracing::warn!(key = %key, "failed to cache query result: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::document::Document;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct VecStore {
        docs: Mutex<Vec<Document>>,
        finds: AtomicUsize,
        fail: bool,
    }

    impl VecStore {
        fn with(docs: Vec<serde_json::Value>) -> Self {
            let docs = docs
                .into_iter()
                .filter_map(|v| match v {
                    serde_json::Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect();
            Self { docs: Mutex::new(docs), ..Default::default() }
        }

        fn finds(&self) -> usize {
            self.finds.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentStore for VecStore {
        async fn find(&self, _collection: &str, filter: &Filter) -> Result<Vec<Document>, Error> {
            self.finds.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Store("store unreachable".into()));
            }
            let docs = self.docs.lock().unwrap();
            Ok(docs.iter().filter(|d| filter.matches(d)).cloned().collect())
        }

        async fn delete_all(&self, _collection: &str) -> Result<u64, Error> {
            let mut docs = self.docs.lock().unwrap();
            let n = docs.len() as u64;
            docs.clear();
            Ok(n)
        }

        async fn insert_one(&self, _collection: &str, document: Document) -> Result<i64, Error> {
            let mut docs = self.docs.lock().unwrap();
            docs.push(document);
            Ok(docs.len() as i64)
        }
    }

    /// Cache whose writes always fail.
    #[derive(Default)]
    struct ReadOnlyCache(MemoryCache);

    #[async_trait]
    impl CacheStore for ReadOnlyCache {
        async fn exists(&self, key: &str) -> Result<bool, Error> {
            self.0.exists(key).await
        }
        async fn get(&self, key: &str) -> Result<Option<String>, Error> {
            self.0.get(key).await
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<(), Error> {
            Err(Error::Cache("read-only".into()))
        }
        async fn flush_all(&self) -> Result<u64, Error> {
            self.0.flush_all().await
        }
    }

    fn seasons() -> VecStore {
        VecStore::with(vec![json!({"Season": 0, "Fixtures": []}), json!({"Season": 1, "Fixtures": []})])
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = Arc::new(MemoryCache::new());
        let store = Arc::new(seasons());
        let retriever = CacheAside::new(cache.clone(), store.clone(), "results");
        let filter = Filter::eq("Season", 1);

        let first = retriever.retrieve(&filter).await.unwrap();
        assert!(!first.cache_hit);
        assert_eq!(first.document.len(), 1);
        assert_eq!(store.finds(), 1);
        assert!(cache.exists(&first.key).await.unwrap());

        let second = retriever.retrieve(&filter).await.unwrap();
        assert!(second.cache_hit);
        assert_eq!(second.document, first.document);
        assert_eq!(store.finds(), 1);
    }

    #[tokio::test]
    async fn test_empty_result_is_cached() {
        let store = Arc::new(seasons());
        let retriever = CacheAside::new(Arc::new(MemoryCache::new()), store.clone(), "results");
        let filter = Filter::eq("Season", 999);

        let first = retriever.get_cached_or_retrieve(&filter).await.unwrap();
        assert!(first.is_empty());

        let second = retriever.retrieve(&filter).await.unwrap();
        assert!(second.cache_hit);
        assert!(second.document.is_empty());
        assert_eq!(store.finds(), 1);
    }

    #[tokio::test]
    async fn test_invalidation_forces_store_access() {
        let store = Arc::new(seasons());
        let retriever = CacheAside::new(Arc::new(MemoryCache::new()), store.clone(), "results");
        let filter = Filter::eq("Season", 0);

        retriever.retrieve(&filter).await.unwrap();
        retriever.retrieve(&filter).await.unwrap();
        assert_eq!(store.finds(), 1);

        retriever.invalidator().invalidate_cache().await.unwrap();

        let after = retriever.retrieve(&filter).await.unwrap();
        assert!(!after.cache_hit);
        assert_eq!(store.finds(), 2);
    }

    #[tokio::test]
    async fn test_stale_until_invalidated() {
        let store = Arc::new(seasons());
        let retriever = CacheAside::new(Arc::new(MemoryCache::new()), store.clone(), "results");
        let filter = Filter::eq("Season", 5);

        assert!(retriever.get_cached_or_retrieve(&filter).await.unwrap().is_empty());

        let mut doc = Document::new();
        doc.insert("Season".into(), json!(5));
        store.insert_one("results", doc).await.unwrap();

        assert!(retriever.get_cached_or_retrieve(&filter).await.unwrap().is_empty());

        retriever.invalidator().invalidate_cache().await.unwrap();
        assert_eq!(retriever.get_cached_or_retrieve(&filter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let cache = Arc::new(MemoryCache::new());
        let store = Arc::new(VecStore { fail: true, ..Default::default() });
        let retriever = CacheAside::new(cache.clone(), store, "results");

        let result = retriever.retrieve(&Filter::eq("Season", 0)).await;
        assert!(matches!(result, Err(Error::Store(_))));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_write_back_failure_is_swallowed() {
        let store = Arc::new(seasons());
        let retriever = CacheAside::new(Arc::new(ReadOnlyCache::default()), store.clone(), "results");
        let filter = Filter::eq("Season", 0);

        let first = retriever.retrieve(&filter).await.unwrap();
        assert_eq!(first.document.len(), 1);

        let second = retriever.retrieve(&filter).await.unwrap();
        assert!(!second.cache_hit);
        assert_eq!(store.finds(), 2);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_refreshed() {
        let cache = Arc::new(MemoryCache::new());
        let store = Arc::new(seasons());
        let retriever = CacheAside::new(cache.clone(), store.clone(), "results");
        let filter = Filter::eq("Season", 0);
        let key = cache_key("results", &filter);

        cache.set(&key, "garbage").await.unwrap();

        let lookup = retriever.retrieve(&filter).await.unwrap();
        assert!(!lookup.cache_hit);
        assert_eq!(lookup.document.len(), 1);

        let payload = cache.get(&key).await.unwrap().unwrap();
        assert_eq!(ResultDocument::from_json(&payload).unwrap(), lookup.document);
    }

    #[tokio::test]
    async fn test_nested_float_filter_shares_entry_with_integer_twin() {
        let store = Arc::new(VecStore::with(vec![json!({"tags": [2]}), json!({"tags": [3]})]));
        let retriever = CacheAside::new(Arc::new(MemoryCache::new()), store.clone(), "results");
        let int_filter = Filter::eq("tags", json!([2]));
        let float_filter = Filter::eq("tags", json!([2.0]));

        let cold = retriever.retrieve(&float_filter).await.unwrap();
        assert!(!cold.cache_hit);
        assert_eq!(cold.document.len(), 1);

        let warm = retriever.retrieve(&int_filter).await.unwrap();
        assert!(warm.cache_hit);
        assert_eq!(warm.key, cold.key);
        assert_eq!(warm.document, cold.document);

        retriever.invalidator().invalidate_cache().await.unwrap();
        let fresh = retriever.retrieve(&int_filter).await.unwrap();
        assert!(!fresh.cache_hit);
        assert_eq!(fresh.document, cold.document);
        assert_eq!(store.finds(), 2);
    }

    #[tokio::test]
    async fn test_serves_cached_payload_verbatim() {
        let cache = Arc::new(MemoryCache::new());
        let store = Arc::new(seasons());
        let retriever = CacheAside::new(cache.clone(), store.clone(), "results");
        let filter = Filter::eq("Season", 0);

        cache
            .set(&cache_key("results", &filter), r#"{"results":[{"Season":0,"from":"cache"}]}"#)
            .await
            .unwrap();

        let document = retriever.get_cached_or_retrieve(&filter).await.unwrap();
        assert_eq!(document.results[0].get("from"), Some(&json!("cache")));
        assert_eq!(store.finds(), 0);
    }
}
