//! Error types for the ledger cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the store, cache, recorder and fetch layers.
///
/// A missing key is never an error: lookups return `Ok(None)` instead.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The key-value store rejected or failed an operation
    #[error("Store error: {0}")]
    Store(String),

    /// Stored bytes could not be decoded into the requested type
    #[error("Decode error: {0}")]
    Decode(String),

    /// The external fetch failed
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Arguments or results could not be serialized for the call log
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Invalid configuration or request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Builds the store error Redis reports for type mismatches.
    pub fn wrong_type() -> Self {
        CacheError::Store(
            "WRONGTYPE Operation against a key holding the wrong kind of value".to_string(),
        )
    }
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Fetch(err.to_string())
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Store(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the ledger cache.
pub type Result<T> = std::result::Result<T, CacheError>;
