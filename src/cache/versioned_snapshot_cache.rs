//! Versioned, pre-serialized snapshot of the known cells.
//!
//! The cell list is expensive to enumerate, so it is fetched at most once
//! per freshness window and handed out as the same serialized bytes to
//! every caller until the window expires or the cache is flushed.
//!
//! One async mutex guards the whole state and is held across the upstream
//! call. Callers that queue up behind a refresh find a fresh cache once
//! they get the lock, so a burst of misses results in a single upstream
//! call.
//!
//! The upstream call runs as its own task whose handle lives in the cache
//! state. A caller that gives up on it (fetch timeout, dropped future)
//! leaves the handle behind, and the next miss waits on that same call
//! instead of starting another one.

use crate::config::Config;
use crate::error::{CacheError, CacheResult, TopoApiError, TopoApiResult};
use crate::models::KnownCells;
use crate::observability::{MetricsTracker, Timer};
use crate::repositories::CellRepository;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// How long a refreshed snapshot is served before asking upstream again.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60);

const CACHE_TYPE: &str = "known_cells";

/// Serialized snapshot bytes, shared between all callers that received them.
pub type Payload = Arc<[u8]>;

struct CacheState {
    /// `None` means never refreshed, or flushed since.
    refreshed_at: Option<Instant>,
    refreshed_at_utc: Option<DateTime<Utc>>,
    known_cells: KnownCells,
    payload: Payload,
    /// Upstream call started by an earlier miss and not yet consumed.
    in_flight: Option<JoinHandle<TopoApiResult<Vec<String>>>>,
}

impl CacheState {
    fn is_fresh(&self, now: Instant, window: Duration) -> bool {
        self.refreshed_at
            .is_some_and(|at| now.saturating_duration_since(at) < window)
    }
}

/// Read-only view of the cache for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatus {
    pub version: u64,
    pub cell_count: usize,
    pub fresh: bool,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub freshness_window_secs: u64,
}

/// Time-bounded cache of the known cells, served as versioned JSON.
pub struct VersionedSnapshotCache {
    repository: Arc<dyn CellRepository>,
    freshness_window: Duration,
    fetch_timeout: Option<Duration>,
    state: Mutex<CacheState>,
    metrics: MetricsTracker,
}

impl VersionedSnapshotCache {
    /// Create a cache in front of `repository` with the default freshness window.
    pub fn new(repository: Arc<dyn CellRepository>) -> Self {
        Self {
            repository,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            fetch_timeout: None,
            state: Mutex::new(CacheState {
                refreshed_at: None,
                refreshed_at_utc: None,
                known_cells: KnownCells::default(),
                payload: Arc::from(Vec::new()),
                in_flight: None,
            }),
            metrics: MetricsTracker::new(),
        }
    }

    /// Create a cache using the window and timeout from `config`.
    pub fn from_config(repository: Arc<dyn CellRepository>, config: &Config) -> Self {
        let cache = Self::new(repository).with_freshness_window(config.cells_cache_ttl());
        match config.upstream_timeout() {
            Some(limit) => cache.with_fetch_timeout(limit),
            None => cache,
        }
    }

    /// Override the freshness window.
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    /// Bound how long a caller waits on upstream. A wait that runs over fails
    /// with [`CacheError::UpstreamTimeout`] and leaves the cache as it was;
    /// the upstream call keeps running and the next miss picks it up.
    pub fn with_fetch_timeout(mut self, limit: Duration) -> Self {
        self.fetch_timeout = Some(limit);
        self
    }

    /// Metrics recorded by this cache.
    pub fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    /// Return the serialized snapshot, refreshing it from upstream if stale.
    ///
    /// On a hit the stored bytes are returned as-is. On a miss the cell list
    /// is fetched, compared element-wise with the stored one, the version is
    /// bumped only if it differs, and the snapshot is re-serialized. If the
    /// fetch or the encoding fails the error is returned and nothing is
    /// stored, so the next call retries.
    pub async fn get(&self) -> CacheResult<Payload> {
        let mut state = self.state.lock().await;

        let now = Instant::now();
        if state.is_fresh(now, self.freshness_window) {
            self.metrics.track_cache_access(CACHE_TYPE, true);
            return Ok(state.payload.clone());
        }
        self.metrics.track_cache_access(CACHE_TYPE, false);

        let timer = Timer::new("known_cells_refresh");
        let fetched = self.fetch(&mut state).await;
        self.metrics.track_upstream_fetch(fetched.is_ok());
        let cells = fetched?;

        // Staged on a copy so a failed encode cannot leave the state half-updated.
        let mut known_cells = state.known_cells.clone();
        let bumped = known_cells.apply(cells);
        let payload: Payload = known_cells
            .to_pretty_json()
            .map_err(CacheError::Serialization)?
            .into();

        if bumped {
            self.metrics.track_version_bump(known_cells.version);
        }
        state.known_cells = known_cells;
        state.payload = payload.clone();
        state.refreshed_at = Some(now);
        state.refreshed_at_utc = Some(Utc::now());
        timer.finish();

        Ok(payload)
    }

    /// Force the next [`get`](Self::get) to refresh from upstream.
    ///
    /// The stored cell list is cleared while the version is kept, so the
    /// refresh bumps the version whenever upstream returns any cells, even
    /// the same ones as before.
    pub async fn flush(&self) {
        let mut state = self.state.lock().await;
        state.refreshed_at = None;
        state.refreshed_at_utc = None;
        state.known_cells.reset_cells();
        self.metrics.track_flush();
    }

    /// Inspect the cache without contacting upstream.
    pub async fn status(&self) -> CacheStatus {
        let state = self.state.lock().await;
        CacheStatus {
            version: state.known_cells.version,
            cell_count: state.known_cells.cells.len(),
            fresh: state.is_fresh(Instant::now(), self.freshness_window),
            refreshed_at: state.refreshed_at_utc,
            freshness_window_secs: self.freshness_window.as_secs(),
        }
    }

    /// Wait on the pending upstream call, starting one if none is pending.
    ///
    /// Must be called with the state lock held.
    async fn fetch(&self, state: &mut CacheState) -> CacheResult<Vec<String>> {
        let call = state.in_flight.get_or_insert_with(|| {
            let repository = self.repository.clone();
            tokio::spawn(async move { repository.known_cells().await })
        });

        let joined = match self.fetch_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(joined) => joined,
                Err(_) => return Err(CacheError::UpstreamTimeout(limit)),
            },
            None => call.await,
        };
        state.in_flight = None;

        let cells = joined
            .map_err(|e| TopoApiError::HttpError(format!("Upstream task failed: {}", e)))??;
        Ok(cells)
    }
}

impl std::fmt::Debug for VersionedSnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionedSnapshotCache")
            .field("freshness_window", &self.freshness_window)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}
