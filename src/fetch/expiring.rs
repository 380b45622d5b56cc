//! Expiring Fetch Cache
//!
//! Caches fetched pages under `cache:{url}` with a TTL and counts every
//! access under `count:{url}`, hit or miss.

use tracing::{debug, info};

use crate::cache::read_counter;
use crate::error::{CacheError, Result};
use crate::fetch::PageFetcher;
use crate::store::KeyValueStore;

/// Default page lifetime in seconds.
pub const DEFAULT_PAGE_TTL: u64 = 10;

fn cache_key(url: &str) -> String {
    format!("cache:{}", url)
}

fn count_key(url: &str) -> String {
    format!("count:{}", url)
}

// == Expiring Fetch Cache ==
/// Page fetcher with a time-bounded cache and per-URL access counter.
#[derive(Debug)]
pub struct ExpiringFetchCache<S, F> {
    store: S,
    fetcher: F,
    ttl_seconds: u64,
}

impl<S: KeyValueStore, F: PageFetcher> ExpiringFetchCache<S, F> {
    /// Creates a cache keeping pages for `DEFAULT_PAGE_TTL` seconds.
    pub fn new(store: S, fetcher: F) -> Self {
        Self::with_ttl(store, fetcher, DEFAULT_PAGE_TTL)
    }

    /// Creates a cache keeping pages for `ttl_seconds`, raised to at least one.
    pub fn with_ttl(store: S, fetcher: F, ttl_seconds: u64) -> Self {
        Self {
            store,
            fetcher,
            ttl_seconds: ttl_seconds.max(1),
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    // == Get Page ==
    /// Returns the content of `url`, fetching it only when no cached copy is live.
    ///
    /// The access counter is incremented before the cache lookup, so it counts
    /// hits, misses and failed fetches alike. A failed fetch caches nothing.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        let (content, _) = self.get_page_counted(url).await?;
        Ok(content)
    }

    /// Same as `get_page`, also returning the access count this call produced.
    ///
    /// A cached page that is not valid UTF-8 is a `Conversion` error.
    pub async fn get_page_counted(&self, url: &str) -> Result<(String, u64)> {
        let accesses = self.store.incr(&count_key(url)).await?;
        let accesses = u64::try_from(accesses)
            .map_err(|_| CacheError::Conversion(format!("negative access count {}", accesses)))?;

        let key = cache_key(url);
        if let Some(cached) = self.store.get(&key).await? {
            debug!("Cache hit for {} (access #{})", url, accesses);
            let content =
                String::from_utf8(cached).map_err(|e| CacheError::Conversion(e.to_string()))?;
            return Ok((content, accesses));
        }

        info!("Cache miss for {} (access #{}), fetching", url, accesses);
        let content = self.fetcher.fetch(url).await?;
        self.store
            .setex(&key, self.ttl_seconds, content.as_bytes())
            .await?;
        Ok((content, accesses))
    }

    // == Access Count ==
    /// Number of `get_page` calls made for `url`.
    pub async fn access_count(&self, url: &str) -> Result<u64> {
        read_counter(&self.store, &count_key(url)).await
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::store::MemoryStore;

    /// Returns a numbered body per fetch and counts fetches.
    #[derive(Default)]
    struct CountingFetcher {
        fetches: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PageFetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(CacheError::Fetch(format!("{} unreachable", url)));
            }
            Ok(format!("<html>{} #{}</html>", url, n))
        }
    }

    fn new_cache(
        ttl: u64,
    ) -> (
        ExpiringFetchCache<MemoryStore, Arc<CountingFetcher>>,
        MemoryStore,
        Arc<CountingFetcher>,
    ) {
        let store = MemoryStore::new();
        let fetcher = Arc::new(CountingFetcher::default());
        let cache = ExpiringFetchCache::with_ttl(store.clone(), fetcher.clone(), ttl);
        (cache, store, fetcher)
    }

    #[tokio::test]
    async fn test_second_call_is_cache_hit() {
        let (cache, store, fetcher) = new_cache(DEFAULT_PAGE_TTL);
        let url = "http://example.com";

        let first = cache.get_page(url).await.unwrap();
        let second = cache.get_page(url).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.get("count:http://example.com").await.unwrap(),
            Some(b"2".to_vec())
        );
        assert_eq!(cache.access_count(url).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_page_cached_with_ttl() {
        let (cache, store, _) = new_cache(DEFAULT_PAGE_TTL);

        let content = cache.get_page("http://example.com").await.unwrap();

        assert_eq!(
            store.get("cache:http://example.com").await.unwrap(),
            Some(content.into_bytes())
        );
        let ttl = store.ttl_ms("cache:http://example.com").await.unwrap();
        assert!(ttl <= 10_000 && ttl >= 9_000);
    }

    #[tokio::test]
    async fn test_refetch_after_expiry() {
        let (cache, _, fetcher) = new_cache(1);
        let url = "http://example.com/short";

        let first = cache.get_page(url).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        let second = cache.get_page(url).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 2);
        assert_eq!(cache.access_count(url).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_urls_are_independent() {
        let (cache, _, fetcher) = new_cache(DEFAULT_PAGE_TTL);

        cache.get_page("http://a.example").await.unwrap();
        cache.get_page("http://b.example").await.unwrap();
        cache.get_page("http://a.example").await.unwrap();

        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 2);
        assert_eq!(cache.access_count("http://a.example").await.unwrap(), 2);
        assert_eq!(cache.access_count("http://b.example").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_and_still_counts() {
        let store = MemoryStore::new();
        let fetcher = CountingFetcher {
            fail: true,
            ..Default::default()
        };
        let cache = ExpiringFetchCache::new(store.clone(), fetcher);

        let result = cache.get_page("http://down.example").await;

        assert!(matches!(result, Err(CacheError::Fetch(_))));
        assert_eq!(cache.access_count("http://down.example").await.unwrap(), 1);
        assert_eq!(store.get("cache:http://down.example").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_cached_page_is_hit() {
        let (cache, store, fetcher) = new_cache(DEFAULT_PAGE_TTL);
        store.setex("cache:http://empty.example", 10, b"").await.unwrap();

        let content = cache.get_page("http://empty.example").await.unwrap();

        assert_eq!(content, "");
        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_access_count_unseen_url() {
        let (cache, _, _) = new_cache(DEFAULT_PAGE_TTL);
        assert_eq!(cache.access_count("http://never.example").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_zero_ttl_is_raised_to_one_second() {
        let (cache, store, fetcher) = new_cache(0);
        let url = "http://zero.example";

        let first = cache.get_page(url).await.unwrap();
        let second = cache.get_page(url).await.unwrap();

        assert_eq!(cache.ttl_seconds(), 1);
        assert_eq!(first, second);
        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 1);
        let ttl = store.ttl_ms("cache:http://zero.example").await.unwrap();
        assert!(ttl <= 1_000);
    }

    #[tokio::test]
    async fn test_get_page_counted_returns_own_count() {
        let (cache, _, _) = new_cache(DEFAULT_PAGE_TTL);
        let url = "http://example.com";

        let (first, n1) = cache.get_page_counted(url).await.unwrap();
        let (second, n2) = cache.get_page_counted(url).await.unwrap();

        assert_eq!(first, second);
        assert_eq!((n1, n2), (1, 2));
    }

    #[tokio::test]
    async fn test_invalid_utf8_cached_page_is_conversion_error() {
        let (cache, store, fetcher) = new_cache(DEFAULT_PAGE_TTL);
        store
            .setex("cache:http://binary.example", 10, &[0xff, 0xfe])
            .await
            .unwrap();

        let result = cache.get_page("http://binary.example").await;

        assert!(matches!(result, Err(CacheError::Conversion(_))));
        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(cache.access_count("http://binary.example").await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_get_page_counts_every_access() {
        let (cache, _, fetcher) = new_cache(DEFAULT_PAGE_TTL);
        let cache = Arc::new(cache);
        let url = "http://busy.example";
        let n = 50;

        let handles: Vec<_> = (0..n)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get_page_counted(url).await.unwrap().1 })
            })
            .collect();
        let mut counts = Vec::new();
        for handle in handles {
            counts.push(handle.await.unwrap());
        }
        counts.sort_unstable();

        assert_eq!(counts, (1..=n).collect::<Vec<u64>>());
        assert_eq!(cache.access_count(url).await.unwrap(), n);
        assert!(fetcher.fetches.load(Ordering::SeqCst) >= 1);
    }
}
