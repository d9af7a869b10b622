//! Store Module
//!
//! The key-value store contract every component talks to, a Redis-backed
//! implementation, and an in-memory one with the same semantics and TTL
//! expiration.

mod entry;
mod memory;
mod redis;

use async_trait::async_trait;

use crate::error::Result;

pub use entry::{current_timestamp_ms, EntryData, StoreEntry};
pub use memory::MemoryStore;
pub use self::redis::RedisStore;

// == Key Value Store ==
/// Byte-string key-value store with Redis-like commands.
///
/// Every operation is atomic for the single key it touches. There are no
/// multi-key transactions. Failures surface as [`crate::error::CacheError::Store`]
/// and are never retried.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the bytes stored at `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` at `key`, clearing any previous expiry.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Stores `value` at `key` and expires it after `ttl_secs` seconds.
    async fn set_with_expiry(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()>;

    /// Increments the integer at `key` by one, starting from zero, and
    /// returns the new value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Appends `item` to the list at `key` and returns the new length.
    async fn rpush(&self, key: &str, item: Vec<u8>) -> Result<usize>;

    /// Reads the list at `key` between `start` and `stop` inclusive.
    ///
    /// Negative indices count from the end, so `(0, -1)` reads everything.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>>;

    /// Removes `key`, returning whether it existed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Removes every key.
    async fn flush(&self) -> Result<()>;
}
