//! Integration Tests against a live Redis server
//!
//! Only run when `REDIS_URL` is set (e.g. `REDIS_URL=redis://127.0.0.1:6379`);
//! otherwise each test returns immediately. Keys are namespaced per test so
//! runs never flush or collide with each other.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use redis_ledger::history::{inputs_key, outputs_key};
use redis_ledger::{
    CacheError, CallRecorder, FetchCache, Fetcher, KeyValueStore, RedisStore, ReplayReporter,
    Result,
};

// == Helper Functions ==

async fn connect() -> Option<Arc<RedisStore>> {
    let url = std::env::var("REDIS_URL").ok().filter(|u| !u.is_empty())?;
    Some(Arc::new(RedisStore::connect(&url).await.unwrap()))
}

fn unique(name: &str) -> String {
    format!("ledger-test:{}:{}", name, uuid::Uuid::new_v4())
}

struct CountingFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, resource: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("{} #{}", resource, n))
    }
}

// == Store Tests ==

#[tokio::test]
async fn test_redis_commands() {
    let Some(store) = connect().await else { return };
    let key = unique("bytes");
    let list = unique("list");
    let counter = unique("counter");

    assert_eq!(store.get(&key).await.unwrap(), None);
    store.set(&key, b"\x00raw\xff".to_vec()).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap(), Some(b"\x00raw\xff".to_vec()));

    assert_eq!(store.incr(&counter).await.unwrap(), 1);
    assert_eq!(store.incr(&counter).await.unwrap(), 2);
    assert!(matches!(store.incr(&key).await, Err(CacheError::Store(_))));

    for item in ["a", "b", "c"] {
        store.rpush(&list, item.as_bytes().to_vec()).await.unwrap();
    }
    assert_eq!(
        store.lrange(&list, -2, -1).await.unwrap(),
        vec![b"b".to_vec(), b"c".to_vec()]
    );
    assert!(matches!(store.rpush(&key, b"x".to_vec()).await, Err(CacheError::Store(_))));

    assert!(matches!(
        store.set_with_expiry(&key, b"v".to_vec(), 0).await,
        Err(CacheError::Store(_))
    ));

    for k in [&key, &list, &counter] {
        assert!(store.delete(k).await.unwrap());
    }
    assert!(!store.delete(&key).await.unwrap());
}

#[tokio::test]
async fn test_redis_expiry() {
    let Some(store) = connect().await else { return };
    let key = unique("expiring");

    store.set_with_expiry(&key, b"soon gone".to_vec(), 1).await.unwrap();
    assert!(store.get(&key).await.unwrap().is_some());

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
    assert_eq!(store.get(&key).await.unwrap(), None);
}

// == Recorder and Fetch Tests ==

#[tokio::test]
async fn test_redis_recorder_and_replay() {
    let Some(store) = connect().await else { return };
    let identity = unique("Math.double");
    let double = CallRecorder::new(Arc::clone(&store), identity.clone())
        .wrap(|n: i64| async move { Ok(n * 2) });

    assert_eq!(double.call(4).await.unwrap(), 8);
    assert_eq!(double.call(-1).await.unwrap(), -2);

    let history = ReplayReporter::new(Arc::clone(&store))
        .replay(&identity)
        .await
        .unwrap();
    assert_eq!(history.count, 2);
    assert_eq!(history.calls[0].input, "[4]");
    assert_eq!(history.calls[1].output, "-2");

    for k in [identity.clone(), inputs_key(&identity), outputs_key(&identity)] {
        store.delete(&k).await.unwrap();
    }
}

#[tokio::test]
async fn test_redis_fetch_cache_counts_and_caches() {
    let Some(store) = connect().await else { return };
    let fetcher = CountingFetcher {
        calls: AtomicUsize::new(0),
    };
    let pages = FetchCache::with_ttl(Arc::clone(&store), fetcher, 5).unwrap();
    let url = unique("http://page");

    let first = pages.get(&url).await.unwrap();
    let second = pages.get(&url).await.unwrap();

    assert_eq!(first, format!("{} #1", url));
    assert_eq!(second, first);
    assert_eq!(pages.access_count(&url).await.unwrap(), 2);

    store.delete(&format!("count:{}", url)).await.unwrap();
    store.delete(&format!("cached:{}", url)).await.unwrap();
}
