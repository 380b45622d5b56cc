//! API Routes
//!
//! Configures the Axum router with all inspection endpoints.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    calls_handler, get_handler, get_int_handler, health_handler, page_handler, replay_handler,
    store_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /store` - Store a payload under a generated key
/// - `GET /get/:key` - Retrieve a value as text
/// - `GET /get/:key/int` - Retrieve a value as an integer
/// - `GET /calls/:operation` - Call count of an operation
/// - `GET /replay/:operation` - Recorded call history of an operation
/// - `GET /page?url=...` - Fetch a page through the expiring cache
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/store", put(store_handler))
        .route("/get/:key", get(get_handler))
        .route("/get/:key/int", get(get_int_handler))
        .route("/calls/:operation", get(calls_handler))
        .route("/replay/:operation", get(replay_handler))
        .route("/page", get(page_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
