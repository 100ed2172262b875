//! Request counters for the topology client.
//!
//! Failures are counted per kind so the cache status report can tell an
//! expired key apart from a flapping topology server.

use crate::error::TopoApiError;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    latency_total_ms: AtomicU64,
    latency_max_ms: AtomicU64,
    cells_fetched: AtomicU64,
    last_cell_count: AtomicU64,
    unauthorized: AtomicU64,
    not_found: AtomicU64,
    rate_limited: AtomicU64,
    server: AtomicU64,
    transport: AtomicU64,
    decode: AtomicU64,
}

/// Shared request counters. Clones observe the same values.
#[derive(Debug, Clone, Default)]
pub struct ClientMetrics {
    counters: Arc<Counters>,
}

/// Failure counts broken down by how the request failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FailureCounts {
    pub unauthorized: u64,
    pub not_found: u64,
    pub rate_limited: u64,
    /// Any other non-2xx status
    pub server: u64,
    /// Connection failures and I/O timeouts
    pub transport: u64,
    /// Body was not a cell list
    pub decode: u64,
}

impl FailureCounts {
    pub fn total(&self) -> u64 {
        self.unauthorized
            + self.not_found
            + self.rate_limited
            + self.server
            + self.transport
            + self.decode
    }
}

/// Point-in-time copy of [`ClientMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientMetricsSummary {
    pub requests_total: u64,
    pub failures_total: u64,
    pub failures: FailureCounts,
    pub latency_avg_ms: f64,
    pub latency_max_ms: u64,
    pub cells_fetched_total: u64,
    /// Size of the most recent successful cell list
    pub last_cell_count: u64,
}

impl ClientMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one round trip to the topology service, successful or not.
    pub fn record_request(&self, latency: Duration) {
        let ms = latency.as_millis() as u64;
        let c = &self.counters;
        c.requests.fetch_add(1, Ordering::Relaxed);
        c.latency_total_ms.fetch_add(ms, Ordering::Relaxed);
        c.latency_max_ms.fetch_max(ms, Ordering::Relaxed);
    }

    /// Count a failed lookup under the bucket matching `error`.
    pub fn record_failure(&self, error: &TopoApiError) {
        let c = &self.counters;
        let bucket = match error {
            TopoApiError::Unauthorized => &c.unauthorized,
            TopoApiError::NotFound(_) => &c.not_found,
            TopoApiError::RateLimitExceeded => &c.rate_limited,
            TopoApiError::ApiError { .. } => &c.server,
            TopoApiError::HttpError(_) | TopoApiError::Timeout => &c.transport,
            TopoApiError::JsonError(_) => &c.decode,
        };
        bucket.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successfully decoded cell list of `count` names.
    pub fn record_cells_fetched(&self, count: usize) {
        let c = &self.counters;
        c.cells_fetched.fetch_add(count as u64, Ordering::Relaxed);
        c.last_cell_count.store(count as u64, Ordering::Relaxed);
    }

    pub fn requests_total(&self) -> u64 {
        self.counters.requests.load(Ordering::Relaxed)
    }

    pub fn cells_fetched_total(&self) -> u64 {
        self.counters.cells_fetched.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> FailureCounts {
        let c = &self.counters;
        FailureCounts {
            unauthorized: c.unauthorized.load(Ordering::Relaxed),
            not_found: c.not_found.load(Ordering::Relaxed),
            rate_limited: c.rate_limited.load(Ordering::Relaxed),
            server: c.server.load(Ordering::Relaxed),
            transport: c.transport.load(Ordering::Relaxed),
            decode: c.decode.load(Ordering::Relaxed),
        }
    }

    pub fn summary(&self) -> ClientMetricsSummary {
        let requests_total = self.requests_total();
        let latency_total = self.counters.latency_total_ms.load(Ordering::Relaxed);
        let failures = self.failures();

        ClientMetricsSummary {
            requests_total,
            failures_total: failures.total(),
            failures,
            latency_avg_ms: if requests_total == 0 {
                0.0
            } else {
                latency_total as f64 / requests_total as f64
            },
            latency_max_ms: self.counters.latency_max_ms.load(Ordering::Relaxed),
            cells_fetched_total: self.cells_fetched_total(),
            last_cell_count: self.counters.last_cell_count.load(Ordering::Relaxed),
        }
    }
}
