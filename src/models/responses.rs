//! Response DTOs for the inspection API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{Replay, ReplayEntry};

/// Response body for PUT /store
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// Generated key the payload was stored under
    pub key: String,
}

impl StoreResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value decoded as UTF-8
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for GET /get/:key/int
#[derive(Debug, Clone, Serialize)]
pub struct GetIntResponse {
    pub key: String,
    pub value: i64,
}

impl GetIntResponse {
    pub fn new(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for GET /calls/:operation
#[derive(Debug, Clone, Serialize)]
pub struct CallsResponse {
    pub operation: String,
    pub calls: u64,
}

impl CallsResponse {
    pub fn new(operation: impl Into<String>, calls: u64) -> Self {
        Self {
            operation: operation.into(),
            calls,
        }
    }
}

/// Response body for GET /replay/:operation
#[derive(Debug, Clone, Serialize)]
pub struct ReplayResponse {
    pub operation: String,
    /// Number of recorded calls
    pub calls: usize,
    /// Input/output pairs in call order
    pub entries: Vec<ReplayEntry>,
    /// The rendered replay trace
    pub trace: String,
}

impl From<Replay> for ReplayResponse {
    fn from(replay: Replay) -> Self {
        let trace = replay.to_string();
        Self {
            operation: replay.operation,
            calls: replay.calls,
            entries: replay.entries,
            trace,
        }
    }
}

/// Response body for GET /page
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub url: String,
    pub content: String,
    /// Accesses of this URL so far, including this one
    pub access_count: u64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
