//! Caching for the topology cells server.
//!
//! This module provides the versioned snapshot cache that fronts the
//! known cells lookup.

pub mod versioned_snapshot_cache;

pub use versioned_snapshot_cache::{
    CacheStatus, Payload, VersionedSnapshotCache, DEFAULT_FRESHNESS_WINDOW,
};
