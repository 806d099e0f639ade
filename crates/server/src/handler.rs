//! MCP server handler implementation.
//!
//! Routes tool calls to the shared [`Interscriber`] for one serving host.
use std::sync::Arc;

use crate::tools::{ResolveParams, persist_impl, resolve_impl, status_impl};

use interscribe_core::Interscriber;
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

/// The main MCP server handler for interscribe.
#[derive(Clone)]
pub struct InterscribeServer {
    interscriber: Arc<Interscriber>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl InterscribeServer {
    pub fn new(interscriber: Arc<Interscriber>) -> Self {
        Self { interscriber, tool_router: Self::tool_router() }
    }

    /// Resolve a request against the rotation cache.
    ///
    /// Creates or refreshes the cached copy when needed and reports where the
    /// host should serve the request from.
    #[tool(
        description = "Resolve a resource path. Returns the cache decision (used, created, recreated, not_applicable, failed) and, when served from cache, the cache root and proxy path."
    )]
    async fn interscribe_resolve(&self, params: Parameters<ResolveParams>) -> Result<CallToolResult, McpError> {
        resolve_impl(&self.interscriber, params.0).await
    }

    #[tool(description = "Report pool size, reference counts, rotation cursor and whether the cache is enabled.")]
    async fn interscribe_status(&self) -> Result<CallToolResult, McpError> {
        status_impl(&self.interscriber).await
    }

    #[tool(description = "Write the current rotation index to the restart file.")]
    async fn interscribe_persist(&self) -> Result<CallToolResult, McpError> {
        persist_impl(&self.interscriber).await
    }
}

impl ServerHandler for InterscribeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "interscribe".into(),
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
