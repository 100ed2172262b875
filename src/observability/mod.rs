//! Observability module for monitoring the known cells cache.

pub mod metrics;

pub use metrics::{CacheMetricsSummary, MetricsTracker, Timer};
