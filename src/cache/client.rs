//! Cache Client Module
//!
//! Stores values under fresh random keys and reads them back with a chosen
//! decoder. Every `store` call is recorded under [`STORE_IDENTITY`].

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::{Decode, Value};
use crate::error::{CacheError, Result};
use crate::history::{CallRecorder, StoreHandle};
use crate::store::KeyValueStore;

/// Operation identity under which `Cache::store` calls are recorded.
pub const STORE_IDENTITY: &str = "Cache.store";

// == Cache ==
/// Store-and-retrieve cache over a shared key-value store.
///
/// Values are never held locally; the store owns them.
#[derive(Debug)]
pub struct Cache<S> {
    store: Arc<S>,
    recorder: CallRecorder<S>,
}

impl<S> StoreHandle for Cache<S>
where
    S: KeyValueStore,
{
    type Store = S;

    fn store_handle(&self) -> &Arc<S> {
        &self.store
    }
}

impl<S: KeyValueStore> Cache<S> {
    // == Constructors ==
    /// Creates a cache bound to `store`.
    pub fn new(store: Arc<S>) -> Self {
        let recorder = CallRecorder::new(Arc::clone(&store), STORE_IDENTITY);
        Self { store, recorder }
    }

    /// Flushes `store`, then binds a cache to it.
    pub async fn new_flushed(store: Arc<S>) -> Result<Self> {
        store.flush().await?;
        info!("Store flushed for a fresh cache");
        Ok(Self::new(store))
    }

    /// The recorder wrapping `store`.
    pub fn recorder(&self) -> &CallRecorder<S> {
        &self.recorder
    }

    // == Store ==
    /// Writes `value` under a new UUID v4 key and returns that key.
    pub async fn store(&self, value: impl Into<Value>) -> Result<String> {
        let value = value.into();
        let op = async {
            let key = Uuid::new_v4().to_string();
            self.store.set(&key, value.to_bytes()).await?;
            debug!("Stored {:?} under {}", value, key);
            Ok::<_, CacheError>(key)
        };
        self.recorder.record(&(&value,), op).await
    }

    // == Retrieve ==
    /// Returns the raw bytes under `key`, or `None` if absent.
    pub async fn retrieve_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    /// Returns the value under `key` decoded as `T`, or `None` if absent.
    pub async fn retrieve<T: Decode>(&self, key: &str) -> Result<Option<T>> {
        self.retrieve_raw(key).await?.map(T::decode).transpose()
    }

    /// Returns the value under `key` run through `decode`, or `None` if absent.
    pub async fn retrieve_with<T, F>(&self, key: &str, decode: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        self.retrieve_raw(key).await?.map(decode).transpose()
    }

    /// Returns the value under `key` as UTF-8 text.
    pub async fn retrieve_str(&self, key: &str) -> Result<Option<String>> {
        self.retrieve(key).await
    }

    /// Returns the value under `key` parsed as a base-10 integer.
    pub async fn retrieve_int(&self, key: &str) -> Result<Option<i64>> {
        self.retrieve(key).await
    }

    // == Flush ==
    /// Removes every key from the underlying store.
    pub async fn flush(&self) -> Result<()> {
        self.store.flush().await
    }
}
