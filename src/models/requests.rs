//! Request DTOs for the inspection API
//!
//! Defines the structure of incoming HTTP request bodies and queries.

use serde::Deserialize;

use crate::cache::StoredValue;

/// Request body for PUT /store
///
/// `data` is a JSON string, integer, float or array of bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    pub data: StoredValue,
}

/// Query string for GET /page
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub url: String,
}

impl PageQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("url cannot be empty".to_string());
        }
        None
    }
}
