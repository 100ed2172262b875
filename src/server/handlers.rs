//! MCP tool handlers for the topology cells server.
//!
//! This module implements the MCP tools using the rmcp SDK's tool_router pattern.

use crate::cache::VersionedSnapshotCache;
use crate::client::ClientMetrics;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use std::borrow::Cow;
use std::sync::Arc;

/// The MCP server exposing the known cells cache.
#[derive(Clone)]
pub struct TopoCellsServer {
    cache: Arc<VersionedSnapshotCache>,
    client_metrics: Option<ClientMetrics>,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for TopoCellsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "topo-cells-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("Serves the versioned list of known topology cells. Unchanged Version means unchanged Cells.".into()),
        }
    }
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

#[tool_router]
impl TopoCellsServer {
    /// Create a new server around a shared cache.
    pub fn new(cache: Arc<VersionedSnapshotCache>) -> Self {
        Self {
            cache,
            client_metrics: None,
            tool_router: Self::tool_router(),
        }
    }

    /// Attach the topology client's request counters to the status report.
    pub fn with_client_metrics(mut self, metrics: ClientMetrics) -> Self {
        self.client_metrics = Some(metrics);
        self
    }

    /// Return the cached, versioned list of known cells.
    #[tool(
        description = "Get the known cells of the topology as JSON {Version, Cells}. The Version only changes when the cell list changes. Served from a cache refreshed at most every few minutes."
    )]
    async fn get_known_cells(&self) -> Result<CallToolResult, McpError> {
        let payload = self.cache.get().await.map_err(|e| {
            tracing::error!("Failed to get known cells: {}", e);
            to_mcp_error(e)
        })?;

        let text = String::from_utf8(payload.to_vec()).map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Force the next read of the known cells to go to the topology service.
    #[tool(
        description = "Flush the known cells cache. The next get_known_cells call refetches from the topology service and reports a new Version."
    )]
    async fn flush_known_cells(&self) -> Result<CallToolResult, McpError> {
        tracing::info!("MCP Handler: flush_known_cells called");
        self.cache.flush().await;

        Ok(CallToolResult::success(vec![Content::text("flushed")]))
    }

    /// Report cache state and counters.
    #[tool(
        description = "Get the state of the known cells cache, its hit/miss counters and upstream request failures by kind"
    )]
    async fn get_cache_status(&self) -> Result<CallToolResult, McpError> {
        let status = self.cache.status().await;

        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "status": status,
            "cache_metrics": self.cache.metrics().summary(),
            "upstream_requests": self.client_metrics.as_ref().map(ClientMetrics::summary),
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }
}
