//! Async wrapper around the synchronous TopoClient.
//!
//! Runs HTTP operations on tokio's blocking pool via
//! `tokio::task::spawn_blocking` so the async runtime is never blocked.

use crate::client::TopoClient;
use crate::error::{TopoApiError, TopoApiResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Async interface to the topology service.
#[async_trait]
pub trait AsyncTopoClient: Send + Sync {
    async fn get_known_cells(&self) -> TopoApiResult<Vec<String>>;
}

/// Async wrapper around synchronous TopoClient.
#[derive(Clone)]
pub struct AsyncTopoClientImpl {
    client: Arc<TopoClient>,
}

impl AsyncTopoClientImpl {
    pub fn new(client: TopoClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl AsyncTopoClient for AsyncTopoClientImpl {
    async fn get_known_cells(&self) -> TopoApiResult<Vec<String>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.get_known_cells())
            .await
            .map_err(|e| TopoApiError::HttpError(format!("Task join error: {}", e)))?
    }
}
