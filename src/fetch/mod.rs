//! Fetch Module
//!
//! Fetches remote pages through an HTTP client and caches them in the store
//! for a fixed time window, counting every access per URL.

mod expiring;
mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use expiring::{ExpiringFetchCache, DEFAULT_PAGE_TTL};
pub use http::HttpFetcher;

/// Fetcher handle shared between components.
pub type SharedFetcher = Arc<dyn PageFetcher>;

// == Page Fetcher ==
/// Retrieves the body of a page by URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Performs the GET and returns the body, failing with `Fetch` on network
    /// errors and non-success statuses.
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url).await
    }
}
