//! Cache-level metrics tracking.
//!
//! Counters for hits, misses and upstream refreshes of the known cells
//! cache. Counters are shared between clones.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Metrics tracker for the known cells cache.
#[derive(Debug, Clone)]
pub struct MetricsTracker {
    cache_hits_total: Arc<AtomicU64>,
    cache_misses_total: Arc<AtomicU64>,
    upstream_fetches_total: Arc<AtomicU64>,
    upstream_failures_total: Arc<AtomicU64>,
    flushes_total: Arc<AtomicU64>,
    version_bumps_total: Arc<AtomicU64>,
}

/// Point-in-time copy of the tracker's counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheMetricsSummary {
    pub cache_hits_total: u64,
    pub cache_misses_total: u64,
    pub cache_hit_rate: f64,
    pub upstream_fetches_total: u64,
    pub upstream_failures_total: u64,
    pub flushes_total: u64,
    pub version_bumps_total: u64,
}

impl MetricsTracker {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            cache_hits_total: Arc::new(AtomicU64::new(0)),
            cache_misses_total: Arc::new(AtomicU64::new(0)),
            upstream_fetches_total: Arc::new(AtomicU64::new(0)),
            upstream_failures_total: Arc::new(AtomicU64::new(0)),
            flushes_total: Arc::new(AtomicU64::new(0)),
            version_bumps_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Track a cache access.
    pub fn track_cache_access(&self, cache_type: &str, hit: bool) {
        if hit {
            self.cache_hits_total.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(cache_type = %cache_type, "Cache hit");
        } else {
            self.cache_misses_total.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(cache_type = %cache_type, "Cache miss");
        }
    }

    /// Track one upstream fetch and whether it succeeded.
    pub fn track_upstream_fetch(&self, success: bool) {
        self.upstream_fetches_total.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.upstream_failures_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Track an explicit flush.
    pub fn track_flush(&self) {
        self.flushes_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Track a content change that produced a new version.
    pub fn track_version_bump(&self, version: u64) {
        self.version_bumps_total.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(version = version, "Known cells version bumped");
    }

    pub fn cache_hits_total(&self) -> u64 {
        self.cache_hits_total.load(Ordering::Relaxed)
    }

    pub fn cache_misses_total(&self) -> u64 {
        self.cache_misses_total.load(Ordering::Relaxed)
    }

    pub fn upstream_fetches_total(&self) -> u64 {
        self.upstream_fetches_total.load(Ordering::Relaxed)
    }

    pub fn upstream_failures_total(&self) -> u64 {
        self.upstream_failures_total.load(Ordering::Relaxed)
    }

    pub fn flushes_total(&self) -> u64 {
        self.flushes_total.load(Ordering::Relaxed)
    }

    pub fn version_bumps_total(&self) -> u64 {
        self.version_bumps_total.load(Ordering::Relaxed)
    }

    /// Get the cache hit rate (0.0 to 1.0).
    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.cache_hits_total() as f64;
        let total = (self.cache_hits_total() + self.cache_misses_total()) as f64;

        if total == 0.0 {
            0.0
        } else {
            hits / total
        }
    }

    /// Get a summary of all counters.
    pub fn summary(&self) -> CacheMetricsSummary {
        CacheMetricsSummary {
            cache_hits_total: self.cache_hits_total(),
            cache_misses_total: self.cache_misses_total(),
            cache_hit_rate: self.cache_hit_rate(),
            upstream_fetches_total: self.upstream_fetches_total(),
            upstream_failures_total: self.upstream_failures_total(),
            flushes_total: self.flushes_total(),
            version_bumps_total: self.version_bumps_total(),
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// A timer for tracking operation duration.
pub struct Timer {
    start: Instant,
    operation: String,
}

impl Timer {
    /// Start a new timer for the given operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.into(),
        }
    }

    /// Finish the timer and return the elapsed time in milliseconds.
    pub fn finish(self) -> u128 {
        let duration_ms = self.start.elapsed().as_millis();

        tracing::debug!(
            operation = %self.operation,
            duration_ms = duration_ms,
            "Operation completed"
        );

        duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_tracker_starts_empty() {
        let tracker = MetricsTracker::new();
        assert_eq!(tracker.cache_hits_total(), 0);
        assert_eq!(tracker.cache_misses_total(), 0);
        assert_eq!(tracker.cache_hit_rate(), 0.0);
    }

    #[test]
    fn test_cache_hit_rate() {
        let tracker = MetricsTracker::new();
        tracker.track_cache_access("known_cells", true);
        tracker.track_cache_access("known_cells", true);
        tracker.track_cache_access("known_cells", true);
        tracker.track_cache_access("known_cells", false);

        assert_eq!(tracker.cache_hits_total(), 3);
        assert_eq!(tracker.cache_misses_total(), 1);
        assert_eq!(tracker.cache_hit_rate(), 0.75);
    }

    #[test]
    fn test_upstream_failures_counted_separately() {
        let tracker = MetricsTracker::new();
        tracker.track_upstream_fetch(true);
        tracker.track_upstream_fetch(false);

        assert_eq!(tracker.upstream_fetches_total(), 2);
        assert_eq!(tracker.upstream_failures_total(), 1);
    }

    #[test]
    fn test_summary() {
        let tracker = MetricsTracker::new();
        tracker.track_cache_access("known_cells", false);
        tracker.track_upstream_fetch(true);
        tracker.track_version_bump(1);
        tracker.track_flush();

        let summary = tracker.summary();
        assert_eq!(summary.cache_misses_total, 1);
        assert_eq!(summary.upstream_fetches_total, 1);
        assert_eq!(summary.version_bumps_total, 1);
        assert_eq!(summary.flushes_total, 1);
    }

    #[test]
    fn test_clones_share_counters() {
        let tracker = MetricsTracker::new();
        let clone = tracker.clone();

        let handle = thread::spawn(move || {
            for _ in 0..100 {
                clone.track_cache_access("known_cells", true);
            }
        });
        for _ in 0..100 {
            tracker.track_cache_access("known_cells", true);
        }
        handle.join().unwrap();

        assert_eq!(tracker.cache_hits_total(), 200);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new("refresh");
        thread::sleep(Duration::from_millis(10));
        assert!(timer.finish() >= 10);
    }
}
