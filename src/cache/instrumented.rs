//! Instrumented Cache Module
//!
//! Stores payloads under random keys while counting calls and recording call
//! history, and reads them back with typed conversions.

use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::{load_history, read_counter, CallRecorder, Replay, StoredValue};
use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

/// Operation identity of `InstrumentedCache::store`.
pub const STORE_OPERATION: &str = "Cache.store";

// == Instrumented Cache ==
/// Random-key storage over a key-value store with call instrumentation.
#[derive(Debug)]
pub struct InstrumentedCache<S> {
    store: S,
    store_calls: CallRecorder,
}

impl<S: KeyValueStore> InstrumentedCache<S> {
    // == Constructor ==
    /// Takes ownership of `store` and flushes it.
    ///
    /// Every key in the store is removed, so nothing written before
    /// construction survives.
    pub async fn new(store: S) -> Result<Self> {
        store.flush_all().await?;
        info!("Backing store flushed");

        Ok(Self {
            store,
            store_calls: CallRecorder::new(STORE_OPERATION),
        })
    }

    /// The underlying store.
    pub fn store_handle(&self) -> &S {
        &self.store
    }

    // == Store ==
    /// Writes `data` under a fresh UUID v4 key and returns the key.
    ///
    /// The call is counted under `Cache.store:calls` and its argument and
    /// returned key are appended to `Cache.store:inputs` / `Cache.store:outputs`.
    pub async fn store(&self, data: impl Into<StoredValue>) -> Result<String> {
        let data = data.into();

        self.store_calls.count_call(&self.store).await?;
        self.store_calls
            .record_input(&self.store, &format!("({},)", data.repr()))
            .await?;

        let key = Uuid::new_v4().to_string();
        let payload = data.encode();
        self.store.set(&key, &payload).await?;
        debug!("Stored {} bytes under {}", payload.len(), key);

        self.store_calls.record_output(&self.store, &key).await?;
        Ok(key)
    }

    // == Get ==
    /// Returns the raw bytes under `key`, or None if absent.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    // == Get With ==
    /// Returns the value under `key` passed through `convert`, or None if absent.
    pub async fn get_with<T, F>(&self, key: &str, convert: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        self.store.get(key).await?.map(convert).transpose()
    }

    /// Returns the value under `key` decoded as UTF-8.
    pub async fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, |raw| {
            String::from_utf8(raw).map_err(|e| CacheError::Conversion(e.to_string()))
        })
        .await
    }

    /// Returns the value under `key` parsed as a decimal integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |raw| parse_number(&raw)).await
    }

    /// Returns the value under `key` parsed as a float.
    pub async fn get_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_with(key, |raw| parse_number(&raw)).await
    }

    // == Instrumentation ==
    /// Number of recorded calls of `operation`.
    pub async fn call_count(&self, operation: &str) -> Result<u64> {
        read_counter(&self.store, &format!("{}:calls", operation)).await
    }

    /// Recorded history of `operation`.
    pub async fn history(&self, operation: &str) -> Result<Replay> {
        load_history(&self.store, operation).await
    }
}

/// Parses stored bytes as a number, tolerating surrounding whitespace.
fn parse_number<T>(raw: &[u8]) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let text = std::str::from_utf8(raw).map_err(|e| CacheError::Conversion(e.to_string()))?;
    text.trim()
        .parse::<T>()
        .map_err(|e| CacheError::Conversion(format!("{:?}: {}", text, e)))
}
