//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with per-entry TTL.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value with the time it was written and its TTL.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was written
    pub stored_at: Instant,
    /// How long the entry stays fresh, fixed at write time
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self::written_at(value, ttl, Instant::now())
    }

    /// Creates an entry with an explicit write time.
    pub fn written_at(value: V, ttl: Duration, stored_at: Instant) -> Self {
        Self {
            value,
            stored_at,
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is stale at `now`.
    ///
    /// Boundary condition: the entry expires once `now - stored_at > ttl`.
    /// At exactly `ttl` elapsed it is still fresh. An instant earlier than
    /// `stored_at` counts as zero elapsed.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }

    /// Checks whether the entry is stale right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the freshness left at `now`, `Duration::ZERO` once expired.
    pub fn ttl_remaining_at(&self, now: Instant) -> Duration {
        self.ttl
            .saturating_sub(now.saturating_duration_since(self.stored_at))
    }
}
