//! Memory Store Module
//!
//! In-process key-value backend with Redis-compatible semantics for the
//! commands the instrumentation layer uses.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CacheError, Result};
use crate::store::{EntryValue, KeyValueStore, StoreEntry};

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

// == Memory Store ==
/// Shared in-memory store. Clones share the same underlying map.
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
    /// Returns the number of live (unexpired) keys.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|entry| !entry.is_expired()).count()
    }

    // == Is Empty ==
    /// Returns true if no live keys remain.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == TTL ==
    /// Remaining time to live of `key` in milliseconds.
    pub async fn ttl_ms(&self, key: &str) -> Option<u64> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(StoreEntry::ttl_remaining_ms)
    }
}

/// Drops `key` if it has expired, so later lookups see it as absent.
fn evict_if_expired(entries: &mut HashMap<String, StoreEntry>, key: &str) {
    if entries.get(key).is_some_and(StoreEntry::is_expired) {
        entries.remove(key);
    }
}

/// Resolves Redis `LRANGE` indices against a list of `len` elements.
///
/// Returns the half-open range to slice, or None when the range is empty.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize + 1))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            StoreEntry::new(EntryValue::Bytes(value.to_vec()), None),
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key);

        match entries.get(key).map(|entry| &entry.value) {
            Some(EntryValue::Bytes(bytes)) => Ok(Some(bytes.clone())),
            Some(EntryValue::List(_)) => Err(CacheError::StoreCommand(WRONG_TYPE.to_string())),
            None => Ok(None),
        }
    }

    async fn setex(&self, key: &str, ttl_seconds: u64, value: &[u8]) -> Result<()> {
        if ttl_seconds == 0 {
            return Err(CacheError::StoreCommand(
                "invalid expire time in 'setex' command".to_string(),
            ));
        }

        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            StoreEntry::new(EntryValue::Bytes(value.to_vec()), Some(ttl_seconds)),
        );
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key);

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| StoreEntry::new(EntryValue::Bytes(b"0".to_vec()), None));

        let EntryValue::Bytes(bytes) = &mut entry.value else {
            return Err(CacheError::StoreCommand(WRONG_TYPE.to_string()));
        };

        let next = std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| {
                CacheError::StoreCommand("value is not an integer or out of range".to_string())
            })?;

        // Existing TTL is kept, matching INCR.
        *bytes = next.to_string().into_bytes();
        Ok(next)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize> {
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key);

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| StoreEntry::new(EntryValue::List(Vec::new()), None));

        match &mut entry.value {
            EntryValue::List(items) => {
                items.push(value.to_vec());
                Ok(items.len())
            }
            EntryValue::Bytes(_) => Err(CacheError::StoreCommand(WRONG_TYPE.to_string())),
        }
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        evict_if_expired(&mut entries, key);

        match entries.get(key).map(|entry| &entry.value) {
            Some(EntryValue::List(items)) => Ok(resolve_range(items.len(), start, stop)
                .map(|(from, to)| items[from..to].to_vec())
                .unwrap_or_default()),
            Some(EntryValue::Bytes(_)) => Err(CacheError::StoreCommand(WRONG_TYPE.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn flush_all(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}
