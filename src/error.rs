//! Error types for the topology cells server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the topology service.
#[derive(Error, Debug)]
pub enum TopoApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Errors returned by the known cells cache.
///
/// None of these are cached: the state from before the failed refresh is
/// kept and the next call retries.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The upstream topology lookup failed during a refresh
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetchFailed(#[from] TopoApiError),

    /// The upstream lookup did not finish within the configured bound
    #[error("Upstream fetch timed out after {0:?}")]
    UpstreamTimeout(Duration),

    /// The snapshot could not be encoded
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with TopoApiError
pub type TopoApiResult<T> = Result<T, TopoApiError>;

/// Convenience type alias for Results with CacheError
pub type CacheResult<T> = Result<T, CacheError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
