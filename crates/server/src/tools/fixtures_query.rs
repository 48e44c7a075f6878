//! fixtures_query tool implementation.
//!
//! Runs a filter through the cache-aside retriever.

use readthru_core::{CacheAside, Document, Error, Filter};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the fixtures_query tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FixturesQueryParams {
    /// Filter to evaluate, e.g. `{"eq": {"field": "Season", "value": 2}}`.
    pub filter: Filter,
}

/// Output from the fixtures_query tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturesQueryOutput {
    /// Cache key the filter maps to.
    pub key: String,
    /// Whether the cache answered.
    pub cache_hit: bool,
    /// Matching documents.
    pub results: Vec<Document>,
}

/// Implementation of the fixtures_query tool.
pub async fn query_impl(retriever: &CacheAside, params: FixturesQueryParams) -> Result<CallToolResult, McpError> {
    let lookup = retriever.retrieve(&params.filter).await?;

    let output = FixturesQueryOutput { key: lookup.key, cache_hit: lookup.cache_hit, results: lookup.document.results };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::Encode(format!("Failed to serialize results: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use readthru_client::DocumentDb;
    use readthru_core::{DocumentStore, MemoryCache};
    use serde_json::json;
    use std::sync::Arc;

    fn output_of(result: &CallToolResult) -> FixturesQueryOutput {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_query_miss_then_hit() {
        let store = DocumentDb::open_in_memory().await.unwrap();
        let mut doc = Document::new();
        doc.insert("Season".into(), json!(2));
        store.insert_one("results", doc).await.unwrap();

        let retriever = CacheAside::new(Arc::new(MemoryCache::new()), Arc::new(store), "results");
        let params = FixturesQueryParams { filter: Filter::eq("Season", 2) };

        let first = output_of(&query_impl(&retriever, params.clone()).await.unwrap());
        assert!(!first.cache_hit);
        assert_eq!(first.results.len(), 1);

        let second = output_of(&query_impl(&retriever, params).await.unwrap());
        assert!(second.cache_hit);
        assert_eq!(second.key, first.key);
    }

    #[test]
    fn test_params_from_json() {
        let params: FixturesQueryParams =
            serde_json::from_value(json!({"filter": {"eq": {"field": "Season", "value": 2}}})).unwrap();
        assert_eq!(params.filter, Filter::eq("Season", 2));
    }
}
