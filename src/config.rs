//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::fetch::DEFAULT_PAGE_TTL;

/// Which key-value store backs the instrumentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process store, lost on restart
    Memory,
    /// Redis server at `Config::redis_url`
    Redis,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key-value store backend
    pub store_backend: StoreBackend,
    /// Redis connection URL, used with `StoreBackend::Redis`
    pub redis_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Lifetime of cached pages in seconds
    pub page_ttl: u64,
    /// Background cleanup task interval in seconds (memory backend)
    pub cleanup_interval: u64,
    /// Timeout for page fetches in seconds
    pub fetch_timeout: u64,
}

/// Reads and parses `name`, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Like `env_or`, but zero also falls back to `default`.
fn env_or_positive(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` - Redis connection URL (default: redis://127.0.0.1:6379/)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PAGE_TTL` - Cached page lifetime in seconds (default: 10)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `FETCH_TIMEOUT` - Page fetch timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            store_backend: env_or("STORE_BACKEND", defaults.store_backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            page_ttl: env_or_positive("PAGE_TTL", defaults.page_ttl),
            cleanup_interval: env_or_positive("CLEANUP_INTERVAL", defaults.cleanup_interval),
            fetch_timeout: env_or("FETCH_TIMEOUT", defaults.fetch_timeout),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            redis_url: "redis://127.0.0.1:6379/".to_string(),
            server_port: 3000,
            page_ttl: DEFAULT_PAGE_TTL,
            cleanup_interval: 1,
            fetch_timeout: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379/");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.page_ttl, 10);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.fetch_timeout, 30);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("STORE_BACKEND");
        env::remove_var("REDIS_URL");
        env::remove_var("SERVER_PORT");
        env::remove_var("PAGE_TTL");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("FETCH_TIMEOUT");

        let config = Config::from_env();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.page_ttl, 10);
        assert_eq!(config.fetch_timeout, 30);
    }

    #[test]
    fn test_config_zero_ttl_and_interval_fall_back() {
        env::set_var("PAGE_TTL", "0");
        env::set_var("CLEANUP_INTERVAL", "0");

        let config = Config::from_env();

        env::remove_var("PAGE_TTL");
        env::remove_var("CLEANUP_INTERVAL");
        assert_eq!(config.page_ttl, DEFAULT_PAGE_TTL);
        assert_eq!(config.cleanup_interval, 1);
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert_eq!(" Redis ".parse::<StoreBackend>(), Ok(StoreBackend::Redis));
        assert!("postgres".parse::<StoreBackend>().is_err());
    }
}
