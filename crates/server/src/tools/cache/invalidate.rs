//! cache_invalidate tool implementation.
//!
//! Flushes every cached query result.

use readthru_core::{Error, Invalidator};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_invalidate tool. The flush is unconditional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateParams {}

/// Output from the cache_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateOutput {
    /// Number of entries removed.
    pub removed: u64,
}

/// Implementation of the cache_invalidate tool.
pub async fn invalidate_impl(
    invalidator: &Invalidator, _params: CacheInvalidateParams,
) -> Result<CallToolResult, McpError> {
    let removed = invalidator.invalidate_cache().await?;

    let output = CacheInvalidateOutput { removed };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::Encode(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
