//! Configuration management for the topology cells server.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file. Nothing here writes to stdout, which MCP uses for communication.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::time::Duration;

/// Configuration for the topology cells server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Topology service base URL
    pub topo_api_url: String,

    /// Optional API key sent to the topology service
    pub topo_api_key: Option<String>,

    /// Freshness window of the known cells cache in seconds (default: 300)
    pub cells_cache_ttl_secs: u64,

    /// Upper bound on a single upstream refresh in seconds (default: 0, disabled)
    pub upstream_timeout_secs: u64,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `TOPO_API_BASE_URL`: Base URL for the topology service
    ///
    /// Optional environment variables:
    /// - `TOPO_API_KEY`: API key for the topology service
    /// - `CELLS_CACHE_TTL_SECS`: Cache freshness window in seconds (default: 300)
    /// - `UPSTREAM_TIMEOUT_SECS`: Refresh timeout in seconds, 0 disables (default: 0)
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // dotenvy::dotenv() doesn't print to stdout
        let _ = dotenvy::dotenv();

        let topo_api_url = env::var("TOPO_API_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("TOPO_API_BASE_URL".to_string()))?;

        if !topo_api_url.starts_with("http://") && !topo_api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "TOPO_API_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let topo_api_key = env::var("TOPO_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let cells_cache_ttl_secs = Self::parse_env_u64("CELLS_CACHE_TTL_SECS", 300)?;
        if cells_cache_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: "CELLS_CACHE_TTL_SECS".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let upstream_timeout_secs = Self::parse_env_u64("UPSTREAM_TIMEOUT_SECS", 0)?;
        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            topo_api_url,
            topo_api_key,
            cells_cache_ttl_secs,
            upstream_timeout_secs,
            request_timeout,
            log_level,
        })
    }

    /// Freshness window of the known cells cache.
    pub fn cells_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cells_cache_ttl_secs)
    }

    /// Refresh timeout, or `None` when disabled.
    pub fn upstream_timeout(&self) -> Option<Duration> {
        (self.upstream_timeout_secs > 0).then(|| Duration::from_secs(self.upstream_timeout_secs))
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            topo_api_url: String::new(),
            topo_api_key: None,
            cells_cache_ttl_secs: 300,
            upstream_timeout_secs: 0,
            request_timeout: 10,
            log_level: "error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    // Sets env vars for one test and removes them on drop
    struct EnvGuard {
        vars: Vec<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            EnvGuard { vars: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.vars.push(key.to_string());
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cells_cache_ttl_secs, 300);
        assert_eq!(config.cells_cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.request_timeout, 10);
        assert_eq!(config.upstream_timeout(), None);
        assert!(config.topo_api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_config_from_env_invalid_url() {
        let mut guard = EnvGuard::new();
        guard.set("TOPO_API_BASE_URL", "not-a-url");

        let result = Config::from_env();
        match result {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "TOPO_API_BASE_URL"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_valid() {
        let mut guard = EnvGuard::new();
        guard.set("TOPO_API_BASE_URL", "http://topo.internal:15000");
        guard.set("TOPO_API_KEY", "secret");
        guard.set("CELLS_CACHE_TTL_SECS", "60");
        guard.set("UPSTREAM_TIMEOUT_SECS", "5");

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.topo_api_url, "http://topo.internal:15000");
        assert_eq!(config.topo_api_key.as_deref(), Some("secret"));
        assert_eq!(config.cells_cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.upstream_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    #[serial]
    fn test_config_blank_api_key_is_none() {
        let mut guard = EnvGuard::new();
        guard.set("TOPO_API_BASE_URL", "https://topo.example.com");
        guard.set("TOPO_API_KEY", "   ");

        let config = Config::from_env().expect("config should load");
        assert!(config.topo_api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_config_zero_ttl_rejected() {
        let mut guard = EnvGuard::new();
        guard.set("TOPO_API_BASE_URL", "https://topo.example.com");
        guard.set("CELLS_CACHE_TTL_SECS", "0");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "CELLS_CACHE_TTL_SECS"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_parse_env_u64() {
        let mut guard = EnvGuard::new();
        guard.set("TEST_U64", "42");

        let result = Config::parse_env_u64("TEST_U64", 10);
        assert_eq!(result.unwrap(), 42);

        let result = Config::parse_env_u64("NONEXISTENT", 10);
        assert_eq!(result.unwrap(), 10);
    }

    #[test]
    #[serial]
    fn test_parse_env_u64_invalid() {
        let mut guard = EnvGuard::new();
        guard.set("TEST_U64_INVALID", "not-a-number");

        let result = Config::parse_env_u64("TEST_U64_INVALID", 10);
        assert!(result.is_err());
    }
}
