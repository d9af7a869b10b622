//! Page Cache Module
//!
//! Counts every access to a resource and keeps its fetched content in the
//! store for a fixed TTL.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::fetch::Fetcher;
use crate::store::KeyValueStore;

// == Key Prefixes ==
/// Prefix of the per-resource access counter.
pub const COUNT_PREFIX: &str = "count:";

/// Prefix of the cached content.
pub const CACHED_PREFIX: &str = "cached:";

/// Default TTL in seconds for cached content.
pub const DEFAULT_TTL: u64 = 10;

/// Key of the access counter for `resource`.
pub fn access_key(resource: &str) -> String {
    format!("{}{}", COUNT_PREFIX, resource)
}

/// Key of the cached content for `resource`.
pub fn cached_key(resource: &str) -> String {
    format!("{}{}", CACHED_PREFIX, resource)
}

// == Fetch Cache ==
/// Read-through cache in front of a [`Fetcher`].
///
/// Expiry is left to the store; nothing is invalidated explicitly. A failed
/// fetch caches nothing, but the access it counted stays counted.
#[derive(Debug)]
pub struct FetchCache<S, F> {
    store: Arc<S>,
    fetcher: F,
    ttl_secs: u64,
}

impl<S: KeyValueStore, F: Fetcher> FetchCache<S, F> {
    // == Constructors ==
    /// Creates a cache holding pages for [`DEFAULT_TTL`] seconds.
    pub fn new(store: Arc<S>, fetcher: F) -> Self {
        Self {
            store,
            fetcher,
            ttl_secs: DEFAULT_TTL,
        }
    }

    /// Creates a cache holding pages for `ttl_secs` seconds.
    pub fn with_ttl(store: Arc<S>, fetcher: F, ttl_secs: u64) -> Result<Self> {
        if ttl_secs == 0 {
            return Err(CacheError::InvalidRequest(
                "Fetch cache TTL must be at least 1 second".to_string(),
            ));
        }
        Ok(Self {
            store,
            fetcher,
            ttl_secs,
        })
    }

    /// TTL in seconds applied to fetched content.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    // == Get ==
    /// Returns the content of `resource`, fetching it on a cache miss.
    pub async fn get(&self, resource: &str) -> Result<String> {
        let accesses = self.store.incr(&access_key(resource)).await?;

        let key = cached_key(resource);
        if let Some(raw) = self.store.get(&key).await? {
            debug!("Cache hit for {} (access #{})", resource, accesses);
            return String::from_utf8(raw)
                .map_err(|e| CacheError::Decode(format!("cached page is not UTF-8: {}", e)));
        }

        info!("Cache miss for {} (access #{}), fetching", resource, accesses);
        let content = self.fetcher.fetch(resource).await?;
        self.store
            .set_with_expiry(&key, content.clone().into_bytes(), self.ttl_secs)
            .await?;

        Ok(content)
    }

    // == Access Count ==
    /// Number of `get` calls made for `resource`, hits and misses alike.
    pub async fn access_count(&self, resource: &str) -> Result<u64> {
        let raw = self.store.get(&access_key(resource)).await?;
        Ok(raw
            .and_then(|raw| String::from_utf8(raw).ok())
            .and_then(|text| text.parse().ok())
            .unwrap_or(0))
    }
}
