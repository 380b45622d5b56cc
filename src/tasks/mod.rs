//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: Purges expired keys from the in-process store

mod cleanup;

pub use cleanup::spawn_cleanup_task;
