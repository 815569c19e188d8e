//! Cache Store Module
//!
//! Main cache engine: a shared HashMap of entries with per-entry TTL,
//! lazy eviction on read and an explicit sweep for memory reclamation.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Sweep, DEFAULT_TTL};

// == Inner State ==
#[derive(Debug)]
struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    stats: CacheStats,
}

impl<V> Inner<V> {
    fn sync_len(&mut self) {
        let len = self.entries.len();
        self.stats.set_total_entries(len);
    }
}

// == TTL Cache ==
/// Process-local key/value cache where every entry carries its own TTL.
///
/// Cloning is cheap and yields a handle to the same storage, so one instance
/// is built at startup and handed to whoever needs it. There is no capacity
/// bound: growth is limited only by expiry and [`TtlCache::cleanup`]. That is
/// fine for one key per logical resource but not for keys derived from
/// unbounded input such as user ids or request paths.
///
/// Concurrent misses on the same key are not coalesced. Each caller
/// recomputes and the last `set` wins.
#[derive(Debug)]
pub struct TtlCache<V> {
    inner: Arc<RwLock<Inner<V>>>,
    default_ttl: Duration,
    name: Arc<str>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            default_ttl: self.default_ttl,
            name: Arc::clone(&self.name),
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache whose `set` calls without a TTL use `default_ttl`.
    pub fn new(default_ttl: Duration) -> Self {
        Self::named("cache", default_ttl)
    }

    /// Creates an empty cache with a name used in logs and sweep reports.
    pub fn named(name: &str, default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                entries: HashMap::new(),
                stats: CacheStats::new(),
            })),
            default_ttl,
            name: Arc::from(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any existing entry outright.
    ///
    /// The new entry's freshness is measured from now using `ttl`, or the
    /// cache default when `ttl` is `None`. Nothing of the previous entry
    /// survives the overwrite.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));

        let mut inner = self.inner.write();
        inner.entries.insert(key, entry);
        inner.sync_len();
    }

    // == Get ==
    /// Returns a clone of the value under `key` if it exists and is fresh.
    ///
    /// A stale entry found here is removed before `None` is returned, so it
    /// can never come back without a new `set`.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_with_ttl(key).map(|(value, _)| value)
    }

    /// Like [`TtlCache::get`], also returning the freshness left on the hit.
    ///
    /// Value and remaining TTL come from the same entry under one lock.
    pub fn get_with_ttl(&self, key: &str) -> Option<(V, Duration)> {
        let now = Instant::now();
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let expired = match inner.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let hit = (entry.value.clone(), entry.ttl_remaining_at(now));
                inner.stats.record_hit();
                return Some(hit);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            inner.entries.remove(key);
            inner.stats.record_expirations(1);
            inner.sync_len();
            debug!(cache = %self.name, key, "Lazily evicted expired entry");
        }
        inner.stats.record_miss();
        None
    }

    // == Read Through ==
    /// Returns the cached value for `key`, or awaits `fetch` on a miss and
    /// stores its result with `ttl`.
    ///
    /// A failed fetch stores nothing and hands the error back. The lock is
    /// released before `fetch` runs, so concurrent misses each fetch.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = fetch().await?;
        self.set(key, value.clone(), ttl);
        Ok(value)
    }

    // == Delete ==
    /// Removes the entry under `key`. Returns whether anything was removed;
    /// deleting an absent key is not an error.
    pub fn delete(&self, key: &str) -> bool {
        let mut inner = self.inner.write();
        let removed = inner.entries.remove(key).is_some();
        if removed {
            inner.sync_len();
        }
        removed
    }

    // == Clear ==
    /// Drops every entry and returns how many there were.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.write();
        let count = inner.entries.len();
        inner.entries.clear();
        inner.sync_len();
        count
    }

    // == Cleanup Expired ==
    /// Removes every entry that is stale right now and returns the count.
    ///
    /// Uses the same expiry rule as [`TtlCache::get`]; fresh entries are left
    /// untouched.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.inner.write();

        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - inner.entries.len();

        inner.stats.record_expirations(removed);
        inner.sync_len();
        removed
    }

    /// Whether a fresh entry exists for `key`. Does not evict or count.
    pub fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        self.inner
            .read()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Freshness left for `key`, or `None` if absent or already stale.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.inner
            .read()
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.ttl_remaining_at(now))
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats.clone()
    }

    /// Number of entries held, including stale ones not yet evicted.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

impl<V: Clone + Send + Sync> Sweep for TtlCache<V> {
    fn name(&self) -> &str {
        TtlCache::name(self)
    }

    fn sweep(&self) -> usize {
        self.cleanup()
    }
}
