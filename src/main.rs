//! Topology cells server - main entry point.

use anyhow::Result;
use std::sync::Arc;
use topo_cells_server::client::{AsyncTopoClient, AsyncTopoClientImpl};
use topo_cells_server::repositories::{CellRepository, TopoCellRepository};
use topo_cells_server::{Config, TopoCellsServer, TopoClient, VersionedSnapshotCache};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration before logging so LOG_LEVEL can seed the filter
    let config = Config::from_env();
    let fallback_level = config
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());

    // stderr only, stdout carries the MCP protocol
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting topology cells server with API URL: {}",
        config.topo_api_url
    );

    let sync_client = TopoClient::new(&config);
    let client_metrics = sync_client.metrics().clone();
    let client = Arc::new(AsyncTopoClientImpl::new(sync_client)) as Arc<dyn AsyncTopoClient>;

    let cell_repo = Arc::new(TopoCellRepository::new(client)) as Arc<dyn CellRepository>;

    let cache = Arc::new(VersionedSnapshotCache::from_config(cell_repo, &config));
    info!(
        "Known cells cache: freshness window {}s, upstream timeout {:?}",
        config.cells_cache_ttl_secs,
        config.upstream_timeout()
    );

    let server = TopoCellsServer::new(cache).with_client_metrics(client_metrics);

    info!("Starting MCP server with stdio transport");
    topo_cells_server::server::run_server(server).await?;

    info!("Topology cells server shutdown complete");
    Ok(())
}
