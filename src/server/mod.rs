//! MCP server exposing the known cells cache.
//!
//! Transport and framing live here; the cache itself knows nothing about MCP.

pub mod handlers;

pub use handlers::TopoCellsServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the server with stdio transport until the client disconnects.
pub async fn run_server(server: TopoCellsServer) -> Result<()> {
    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    Ok(())
}
