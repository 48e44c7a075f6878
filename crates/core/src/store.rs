//! The document store seen from the cache layer.

use async_trait::async_trait;

use crate::Error;
use crate::document::Document;
use crate::filter::Filter;

/// A collection-oriented source of truth queried by filter.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in `collection` matching `filter`, in insertion order.
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, Error>;

    /// Remove every document in `collection`. Returns how many were removed.
    async fn delete_all(&self, collection: &str) -> Result<u64, Error>;

    /// Insert one document and return its id.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<i64, Error>;
}
