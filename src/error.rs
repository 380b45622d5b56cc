//! Error types for the instrumentation layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the instrumentation layer and its HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Stored bytes could not be converted to the requested type
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// Remote page could not be fetched
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Backing store cannot be reached
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Backing store rejected a command
    #[error("Store command failed: {0}")]
    StoreCommand(String),

    /// Key not found (HTTP surface only, the library returns `None`)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// HTTP status reported for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Conversion(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Fetch(_) => StatusCode::BAD_GATEWAY,
            CacheError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::StoreCommand(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the instrumentation layer.
pub type Result<T> = std::result::Result<T, CacheError>;
