//! Fetch Module
//!
//! Page fetching and the TTL cache that sits in front of it.

mod http;
mod page_cache;

use async_trait::async_trait;

use crate::error::Result;

pub use http::HttpFetcher;
pub use page_cache::{access_key, cached_key, FetchCache, CACHED_PREFIX, COUNT_PREFIX, DEFAULT_TTL};

// == Fetcher ==
/// Retrieves the content of a remote resource.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `resource`, failing with [`crate::error::CacheError::Fetch`]
    /// on transport errors.
    async fn fetch(&self, resource: &str) -> Result<String>;
}
