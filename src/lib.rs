//! TTL Cache - A process-local expiring key/value cache
//!
//! Provides a generic in-memory cache with per-entry TTL, an explicitly
//! managed cleanup task, and a read-through prayer-times service built on top.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod prayer;
pub mod tasks;

pub use api::AppState;
pub use cache::TtlCache;
pub use config::Config;
pub use tasks::{spawn_cleanup_task, CleanupHandle};
