//! Redis Store Module
//!
//! [`KeyValueStore`] backed by a real Redis server. Expiry is enforced by the
//! server, so no sweep task is needed.

use async_trait::async_trait;
use ::redis::aio::ConnectionManager;
use ::redis::AsyncCommands;
use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

// == Redis Store ==
/// Store talking to Redis through a reconnecting connection manager.
///
/// Cloning is cheap: clones share the same multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

impl RedisStore {
    /// Connects to the server at `url` (e.g. `redis://127.0.0.1:6379/0`).
    ///
    /// Fails with [`CacheError::Store`] if the URL is malformed or the
    /// server cannot be reached.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = ::redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        info!("Connected to Redis at {}", url);
        Ok(Self { manager })
    }

    fn conn(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value: Option<Vec<u8>> = self.conn().get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let _: () = self.conn().set(key, value).await?;
        debug!("SET {}", key);
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()> {
        if ttl_secs == 0 {
            return Err(CacheError::Store(
                "invalid expire time in 'setex' command".to_string(),
            ));
        }
        let _: () = self.conn().set_ex(key, value, ttl_secs).await?;
        debug!("SETEX {} {}s", key, ttl_secs);
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let value: i64 = self.conn().incr(key, 1).await?;
        Ok(value)
    }

    async fn rpush(&self, key: &str, item: Vec<u8>) -> Result<usize> {
        let len: usize = self.conn().rpush(key, item).await?;
        Ok(len)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        let items: Vec<Vec<u8>> = self
            .conn()
            .lrange(key, start as isize, stop as isize)
            .await?;
        Ok(items)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let removed: usize = self.conn().del(key).await?;
        Ok(removed > 0)
    }

    async fn flush(&self) -> Result<()> {
        let mut conn = self.conn();
        let _: () = ::redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        info!("Flushed Redis database");
        Ok(())
    }
}
