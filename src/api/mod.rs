//! API Module
//!
//! HTTP handlers and routing for the inspection API.
//!
//! # Endpoints
//! - `PUT /store` - Store a payload under a generated key
//! - `GET /get/:key` - Retrieve a value as text
//! - `GET /get/:key/int` - Retrieve a value as an integer
//! - `GET /calls/:operation` - Call count of an operation
//! - `GET /replay/:operation` - Recorded call history
//! - `GET /page?url=...` - Fetch a page through the expiring cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
