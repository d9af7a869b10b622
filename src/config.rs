//! Configuration Module
//!
//! Handles loading runtime configuration from environment variables.

use std::env;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds for pages held by the fetch cache
    pub fetch_cache_ttl: u64,
    /// Timeout in seconds for a single page fetch
    pub fetch_timeout: u64,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Optional page fetched by the demo binary
    pub fetch_url: Option<String>,
    /// Redis server to use; the in-memory store is used when unset
    pub redis_url: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `FETCH_CACHE_TTL` - Page cache TTL in seconds (default: 10)
    /// - `FETCH_TIMEOUT` - Fetch timeout in seconds (default: 30)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    /// - `FETCH_URL` - Page to fetch in the demo (default: unset)
    /// - `REDIS_URL` - Redis server, e.g. `redis://127.0.0.1:6379` (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            fetch_cache_ttl: parse_var("FETCH_CACHE_TTL").unwrap_or(defaults.fetch_cache_ttl),
            fetch_timeout: parse_var("FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            fetch_url: non_empty_var("FETCH_URL"),
            redis_url: non_empty_var("REDIS_URL"),
        }
    }
}

fn parse_var(name: &str) -> Option<u64> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v| *v > 0)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_cache_ttl: 10,
            fetch_timeout: 30,
            cleanup_interval: 1,
            fetch_url: None,
            redis_url: None,
        }
    }
}
