//! Redis Ledger - a key-value cache that keeps a ledger of its own calls
//!
//! Typed store/retrieve with pluggable decoding, invocation counting and
//! argument/result logging, read-only replay reports, and a TTL page cache
//! in front of an HTTP fetcher.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod history;
pub mod store;
pub mod tasks;

pub use cache::{Cache, Value};
pub use config::Config;
pub use error::{CacheError, Result};
pub use fetch::{FetchCache, Fetcher, HttpFetcher};
pub use history::{CallRecorder, ReplayReporter};
pub use store::{KeyValueStore, MemoryStore, RedisStore};
pub use tasks::spawn_expiry_task;
