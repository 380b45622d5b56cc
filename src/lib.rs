//! Instrumented Cache - call counting, call history and expiring page cache
//!
//! Stores payloads under random keys in a key-value store, counts and records
//! every call for replay, and caches fetched pages for a fixed window while
//! counting accesses per URL.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{replay, InstrumentedCache, StoredValue};
pub use config::Config;
pub use error::{CacheError, Result};
pub use fetch::{ExpiringFetchCache, HttpFetcher, PageFetcher};
pub use store::{KeyValueStore, MemoryStore, RedisStore};
pub use tasks::spawn_cleanup_task;
