//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::cache::{CacheInvalidateParams, invalidate_impl};
use crate::tools::{FixturesGenerateParams, FixturesQueryParams, generate_impl, query_impl};

use readthru_client::Services;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for readthru.
#[derive(Clone)]
pub struct ReadthruServer {
    services: Services,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl ReadthruServer {
    /// Create a new server handler over already opened stores.
    pub fn new(services: Services) -> Self {
        Self { services, tool_router: Self::tool_router() }
    }

    /// Query the fixtures collection through the cache.
    #[tool(description = "Query season fixtures by filter. Served from the cache when present, otherwise from the store.")]
    async fn fixtures_query(&self, params: Parameters<FixturesQueryParams>) -> Result<CallToolResult, McpError> {
        query_impl(&self.services.retriever, params.0).await
    }

    /// Flush the whole cache.
    #[tool(description = "Invalidate every cached query result.")]
    async fn cache_invalidate(&self, params: Parameters<CacheInvalidateParams>) -> Result<CallToolResult, McpError> {
        invalidate_impl(&self.services.invalidator, params.0).await
    }

    /// Regenerate synthetic seasons, then invalidate the cache.
    #[tool(description = "Replace the fixtures collection with freshly generated seasons and invalidate the cache.")]
    async fn fixtures_generate(&self, params: Parameters<FixturesGenerateParams>) -> Result<CallToolResult, McpError> {
        generate_impl(&self.services, params.0).await
    }
}

impl ServerHandler for ReadthruServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "readthru".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
