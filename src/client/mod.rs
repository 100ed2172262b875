//! HTTP client for the topology service.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. The client handles authentication and error
//! mapping for the topology API.

mod async_wrapper;
mod metrics;
pub use async_wrapper::{AsyncTopoClient, AsyncTopoClientImpl};
pub use metrics::{ClientMetrics, ClientMetricsSummary, FailureCounts};

use crate::config::Config;
use crate::error::{TopoApiError, TopoApiResult};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Response wrapper for the `/cells` endpoint.
#[derive(Debug, Deserialize)]
pub struct CellsResponse {
    /// Known cell names, in topology order
    pub cells: Vec<String>,
}

/// HTTP client for the topology service.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct TopoClient {
    /// Base URL for the topology API
    base_url: String,

    /// Optional API key for authentication
    api_key: Option<String>,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Request and failure counters
    metrics: ClientMetrics,
}

impl TopoClient {
    /// Create a new TopoClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.topo_api_url.clone(),
            api_key: config.topo_api_key.clone(),
            agent: Arc::new(agent),
            metrics: ClientMetrics::new(),
        }
    }

    /// Create a TopoClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, api_key: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            api_key,
            agent: Arc::new(agent),
            metrics: ClientMetrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &ClientMetrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Execute a GET request, with the API key header when one is configured.
    fn get(&self, path: &str) -> Result<ureq::Response, TopoApiError> {
        let started = Instant::now();
        let url = self.build_url(path);

        tracing::debug!("GET {}", url);

        let mut request = self.agent.get(&url).set("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.set("x-topo-api-key", key);
        }

        let result = request.call().map_err(|e| self.map_error(e));
        self.metrics.record_request(started.elapsed());

        result
    }

    /// Map a ureq error to a TopoApiError.
    fn map_error(&self, error: ureq::Error) -> TopoApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match code {
                    401 => TopoApiError::Unauthorized,
                    404 => TopoApiError::NotFound(message),
                    429 => TopoApiError::RateLimitExceeded,
                    _ => TopoApiError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    TopoApiError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    TopoApiError::Timeout
                } else {
                    TopoApiError::HttpError(transport.to_string())
                }
            }
        }
    }

    /// Get the known cells of the topology.
    ///
    /// Accepts both `{"cells": [...]}` and a bare JSON array. Order is kept
    /// exactly as the service returned it.
    pub fn get_known_cells(&self) -> TopoApiResult<Vec<String>> {
        let result = self.fetch_cells();
        match &result {
            Ok(cells) => self.metrics.record_cells_fetched(cells.len()),
            Err(e) => self.metrics.record_failure(e),
        }
        result
    }

    fn fetch_cells(&self) -> TopoApiResult<Vec<String>> {
        let response = self.get("/cells")?;
        let body = response
            .into_string()
            .map_err(|e| TopoApiError::HttpError(e.to_string()))?;

        let cells = if let Ok(wrapped) = serde_json::from_str::<CellsResponse>(&body) {
            wrapped.cells
        } else {
            serde_json::from_str::<Vec<String>>(&body).map_err(TopoApiError::JsonError)?
        };

        Ok(cells)
    }
}
