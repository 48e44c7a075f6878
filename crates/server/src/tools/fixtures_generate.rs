//! fixtures_generate tool implementation.
//!
//! Replaces the collection with synthetic seasons and invalidates the cache.

use readthru_client::Services;
use readthru_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the fixtures_generate tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FixturesGenerateParams {
    /// Number of seasons to generate (1-1000, default from configuration).
    #[serde(default)]
    pub seasons: Option<u32>,
}

/// Output from the fixtures_generate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FixturesGenerateOutput {
    /// Documents removed from the collection.
    pub deleted: u64,
    /// Season documents inserted.
    pub inserted: usize,
    /// Cache entries invalidated.
    pub invalidated: u64,
}

/// Implementation of the fixtures_generate tool.
pub async fn generate_impl(services: &Services, params: FixturesGenerateParams) -> Result<CallToolResult, McpError> {
    let seasons = params.seasons.unwrap_or(services.config.seasons);
    if seasons == 0 || seasons > 1000 {
        return Err(Error::InvalidInput(format!("seasons must be between 1 and 1000, got {seasons}")).into());
    }

    let report = services.regenerate(seasons).await?;

    let output =
        FixturesGenerateOutput { deleted: report.deleted, inserted: report.inserted, invalidated: report.invalidated };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::Encode(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
