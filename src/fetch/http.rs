//! HTTP Fetcher
//!
//! [`Fetcher`] backed by a reqwest client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::fetch::Fetcher;

/// Fetches pages over HTTP(S) and returns the body text.
///
/// Error statuses are not failures: their body is returned like any other.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout_secs`.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, resource: &str) -> Result<String> {
        let response = self.client.get(resource).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("GET {} -> {} ({} bytes)", resource, status, body.len());
        Ok(body)
    }
}
