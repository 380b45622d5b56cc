//! API Handlers
//!
//! HTTP request handlers exposing the instrumentation layer for inspection.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::InstrumentedCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::{ExpiringFetchCache, HttpFetcher, SharedFetcher};
use crate::models::{
    CallsResponse, GetIntResponse, GetResponse, HealthResponse, PageQuery, PageResponse,
    ReplayResponse, StoreRequest, StoreResponse,
};
use crate::store::SharedStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Random-key storage with call instrumentation
    pub cache: Arc<InstrumentedCache<SharedStore>>,
    /// Expiring page cache
    pub pages: Arc<ExpiringFetchCache<SharedStore, SharedFetcher>>,
}

impl AppState {
    /// Builds the state over `store`, flushing it.
    pub async fn new(store: SharedStore, fetcher: SharedFetcher, page_ttl: u64) -> Result<Self> {
        let cache = InstrumentedCache::new(store.clone()).await?;
        let pages = ExpiringFetchCache::with_ttl(store, fetcher, page_ttl);
        Ok(Self {
            cache: Arc::new(cache),
            pages: Arc::new(pages),
        })
    }

    /// Builds the state with an HTTP fetcher configured from `config`.
    pub async fn from_config(store: SharedStore, config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(std::time::Duration::from_secs(config.fetch_timeout))?;
        Self::new(store, Arc::new(fetcher), config.page_ttl).await
    }
}

/// Handler for PUT /store
///
/// Stores the payload under a generated key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let key = state.cache.store(req.data).await?;
    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// Returns the stored value as UTF-8 text.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .cache
        .get_string(&key)
        .await?
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for GET /get/:key/int
///
/// Returns the stored value parsed as an integer.
pub async fn get_int_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetIntResponse>> {
    let value = state
        .cache
        .get_int(&key)
        .await?
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetIntResponse::new(key, value)))
}

/// Handler for GET /calls/:operation
pub async fn calls_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<CallsResponse>> {
    let calls = state.cache.call_count(&operation).await?;
    Ok(Json(CallsResponse::new(operation, calls)))
}

/// Handler for GET /replay/:operation
///
/// Returns the recorded history and its rendered trace.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<ReplayResponse>> {
    let history = state.cache.history(&operation).await?;
    Ok(Json(ReplayResponse::from(history)))
}

/// Handler for GET /page?url=...
///
/// Returns the page content, fetched or cached.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let (content, access_count) = state.pages.get_page_counted(&query.url).await?;

    Ok(Json(PageResponse {
        url: query.url,
        content,
        access_count,
    }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
