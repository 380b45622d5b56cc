//! Store Module
//!
//! The key-value protocol the instrumentation layer is written against, plus
//! an in-process backend and a Redis backend.

mod entry;
mod memory;
mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::{EntryValue, StoreEntry};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Store handle shared between components.
pub type SharedStore = Arc<dyn KeyValueStore>;

// == Key Value Store ==
/// Minimal key-value protocol consumed by the instrumentation layer.
///
/// Values are byte strings. Counters are stored as decimal strings and
/// incremented atomically. List indices follow Redis `LRANGE` rules: both
/// ends inclusive, negative indices count from the tail.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Writes `value` under `key`, clearing any TTL.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Reads the value under `key`, `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes `value` under `key` expiring after `ttl_seconds`.
    async fn setex(&self, key: &str, ttl_seconds: u64, value: &[u8]) -> Result<()>;

    /// Atomically increments the counter under `key` and returns the new value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Appends `value` to the list under `key` and returns the new length.
    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize>;

    /// Returns the list elements between `start` and `stop`.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// Removes every key.
    async fn flush_all(&self) -> Result<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn setex(&self, key: &str, ttl_seconds: u64, value: &[u8]) -> Result<()> {
        (**self).setex(key, ttl_seconds, value).await
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        (**self).incr(key).await
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize> {
        (**self).rpush(key, value).await
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        (**self).lrange(key, start, stop).await
    }

    async fn flush_all(&self) -> Result<()> {
        (**self).flush_all().await
    }
}
