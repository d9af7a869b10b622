//! Memory Store Module
//!
//! In-process key-value store with Redis semantics for strings, counters,
//! lists and TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::{EntryData, KeyValueStore, StoreEntry};

// == Memory Store ==
/// Shared in-memory store.
///
/// Cloning is cheap and every clone sees the same keyspace. A single
/// `RwLock` serialises writers, which makes each command atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, StoreEntry>>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of keys held, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remaining TTL of `key` in milliseconds, `None` if absent or persistent.
    pub async fn ttl_remaining_ms(&self, key: &str) -> Option<u64> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(StoreEntry::ttl_remaining_ms)
    }
}

/// Drops `key` if it has expired.
fn purge_if_expired(entries: &mut HashMap<String, StoreEntry>, key: &str) {
    if entries.get(key).is_some_and(StoreEntry::is_expired) {
        entries.remove(key);
        debug!("Expired key removed on access: {}", key);
    }
}

/// Returns the live entry for `key`, if any.
fn live_entry<'a>(
    entries: &'a mut HashMap<String, StoreEntry>,
    key: &str,
) -> Option<&'a mut StoreEntry> {
    purge_if_expired(entries, key);
    entries.get_mut(key)
}

/// Resolves Redis-style inclusive, possibly negative, bounds against `len`.
fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (start + len).max(0) } else { start };
    let stop = if stop < 0 { stop + len } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    // == Get ==
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(StoreEntry {
                data: EntryData::Bytes(value),
                ..
            }) => Ok(Some(value.clone())),
            Some(_) => Err(CacheError::wrong_type()),
            None => Ok(None),
        }
    }

    // == Set ==
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoreEntry::bytes(value));
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()> {
        if ttl_secs == 0 {
            return Err(CacheError::Store(
                "invalid expire time in 'setex' command".to_string(),
            ));
        }

        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            StoreEntry::new(EntryData::Bytes(value), Some(ttl_secs)),
        );
        Ok(())
    }

    // == Increment ==
    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;
        purge_if_expired(&mut entries, key);
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| StoreEntry::bytes(b"0".to_vec()));

        let EntryData::Bytes(raw) = &mut entry.data else {
            return Err(CacheError::wrong_type());
        };
        let current: i64 = std::str::from_utf8(raw)
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| {
                CacheError::Store("value is not an integer or out of range".to_string())
            })?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::Store("increment would overflow".to_string()))?;

        *raw = next.to_string().into_bytes();
        Ok(next)
    }

    // == List Append ==
    async fn rpush(&self, key: &str, item: Vec<u8>) -> Result<usize> {
        let mut entries = self.entries.write().await;
        purge_if_expired(&mut entries, key);
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(StoreEntry::empty_list);

        match &mut entry.data {
            EntryData::List(items) => {
                items.push(item);
                Ok(items.len())
            }
            EntryData::Bytes(_) => Err(CacheError::wrong_type()),
        }
    }

    // == List Range ==
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key).map(|entry| &entry.data) {
            Some(EntryData::List(items)) => Ok(resolve_range(items.len(), start, stop)
                .map(|(from, to)| items[from..=to].to_vec())
                .unwrap_or_default()),
            Some(EntryData::Bytes(_)) => Err(CacheError::wrong_type()),
            None => Ok(Vec::new()),
        }
    }

    // == Delete ==
    async fn delete(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        purge_if_expired(&mut entries, key);
        Ok(entries.remove(key).is_some())
    }

    // == Flush ==
    async fn flush(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        debug!("Store flushed, {} keys removed", removed);
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.len().await, 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_set_and_get() {
        let store = MemoryStore::new();

        store.set("key1", b"value1".to_vec()).await.unwrap();
        let value = store.get("key1").await.unwrap();

        assert_eq!(value, Some(b"value1".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_get_nonexistent() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_overwrite_clears_expiry() {
        let store = MemoryStore::new();

        store.set_with_expiry("key1", b"value1".to_vec(), 60).await.unwrap();
        assert!(store.ttl_remaining_ms("key1").await.is_some());

        store.set("key1", b"value2".to_vec()).await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), Some(b"value2".to_vec()));
        assert!(store.ttl_remaining_ms("key1").await.is_none());
    }

    #[tokio::test]
    async fn test_store_delete() {
        let store = MemoryStore::new();

        store.set("key1", b"value1".to_vec()).await.unwrap();
        assert!(store.delete("key1").await.unwrap());
        assert!(!store.delete("key1").await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_ttl_expiration() {
        let store = MemoryStore::new();

        store.set_with_expiry("key1", b"value1".to_vec(), 1).await.unwrap();
        assert!(store.get("key1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.get("key1").await.unwrap(), None);
        assert_eq!(store.len().await, 0, "Expired key should be dropped on read");
    }

    #[tokio::test]
    async fn test_store_zero_ttl_rejected() {
        let store = MemoryStore::new();
        let result = store.set_with_expiry("key1", b"v".to_vec(), 0).await;
        assert!(matches!(result, Err(CacheError::Store(_))));
    }

    #[tokio::test]
    async fn test_incr_starts_from_zero() {
        let store = MemoryStore::new();

        assert_eq!(store.incr("counter").await.unwrap(), 1);
        assert_eq!(store.incr("counter").await.unwrap(), 2);
        assert_eq!(store.get("counter").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn test_incr_existing_integer_text() {
        let store = MemoryStore::new();

        store.set("counter", b"41".to_vec()).await.unwrap();
        assert_eq!(store.incr("counter").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_incr_non_integer_fails() {
        let store = MemoryStore::new();

        store.set("counter", b"abc".to_vec()).await.unwrap();
        let result = store.incr("counter").await;
        assert!(matches!(result, Err(CacheError::Store(_))));
        assert_eq!(store.get("counter").await.unwrap(), Some(b"abc".to_vec()));
    }

    #[tokio::test]
    async fn test_rpush_and_lrange() {
        let store = MemoryStore::new();

        assert_eq!(store.rpush("list", b"a".to_vec()).await.unwrap(), 1);
        assert_eq!(store.rpush("list", b"b".to_vec()).await.unwrap(), 2);
        assert_eq!(store.rpush("list", b"c".to_vec()).await.unwrap(), 3);

        let all = store.lrange("list", 0, -1).await.unwrap();
        assert_eq!(all, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);

        let tail = store.lrange("list", -2, -1).await.unwrap();
        assert_eq!(tail, vec![b"b".to_vec(), b"c".to_vec()]);

        let clamped = store.lrange("list", 1, 100).await.unwrap();
        assert_eq!(clamped, vec![b"b".to_vec(), b"c".to_vec()]);

        assert!(store.lrange("list", 2, 1).await.unwrap().is_empty());
        assert!(store.lrange("list", 5, 10).await.unwrap().is_empty());
        assert!(store.lrange("missing", 0, -1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_type_operations() {
        let store = MemoryStore::new();

        store.set("text", b"v".to_vec()).await.unwrap();
        store.rpush("list", b"v".to_vec()).await.unwrap();

        assert!(store.rpush("text", b"x".to_vec()).await.is_err());
        assert!(store.lrange("text", 0, -1).await.is_err());
        assert!(store.get("list").await.is_err());
        assert!(store.incr("list").await.is_err());
    }

    #[tokio::test]
    async fn test_store_cleanup_expired() {
        let store = MemoryStore::new();

        store.set_with_expiry("key1", b"v1".to_vec(), 1).await.unwrap();
        store.set_with_expiry("key2", b"v2".to_vec(), 10).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.cleanup_expired().await, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get("key2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_flush() {
        let store = MemoryStore::new();
        let other_handle = store.clone();

        store.set("a", b"1".to_vec()).await.unwrap();
        store.rpush("b", b"2".to_vec()).await.unwrap();

        other_handle.flush().await.unwrap();
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_resolve_range() {
        assert_eq!(resolve_range(3, 0, -1), Some((0, 2)));
        assert_eq!(resolve_range(3, -10, 1), Some((0, 1)));
        assert_eq!(resolve_range(3, 0, -4), None);
        assert_eq!(resolve_range(0, 0, -1), None);
    }
}
