//! Topology cells server - serves the known cells of a topology over MCP.
//!
//! Enumerating cells is an expensive upstream lookup, so the result is kept
//! in a versioned snapshot cache and handed to every caller as the same
//! pre-serialized JSON until it goes stale or is flushed.
//!
//! # Architecture
//!
//! - **cache**: Versioned snapshot cache in front of the cell lookup
//! - **client**: HTTP client for the topology service and its request counters
//! - **config**: Configuration management from environment variables
//! - **error**: Custom error types for precise error handling
//! - **models**: The `KnownCells` snapshot
//! - **observability**: Cache hit/miss counters
//! - **repositories**: Upstream cell source abstraction
//! - **server**: MCP protocol server

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod server;

pub use cache::{CacheStatus, VersionedSnapshotCache};
pub use client::{ClientMetrics, ClientMetricsSummary, TopoClient};
pub use config::Config;
pub use error::{CacheError, ConfigError, TopoApiError};
pub use models::KnownCells;
pub use server::TopoCellsServer;
