//! Cache Module
//!
//! Provides a generic in-memory cache with per-entry TTL expiration.

use std::time::Duration;

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::TtlCache;

// == Public Constants ==
/// TTL applied when neither the caller nor the constructor picks one
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed serialized value size in bytes for values set over HTTP
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Sweep ==
/// Something a background task can periodically purge of expired entries.
///
/// Lets one cleanup task serve caches with different payload types.
pub trait Sweep: Send + Sync {
    /// Label used in logs.
    fn name(&self) -> &str;

    /// Removes expired entries and returns how many were dropped.
    fn sweep(&self) -> usize;
}
