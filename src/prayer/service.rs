//! Read-through prayer-times lookup.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::prayer::{LookupSource, PrayerTimes, PrayerTimesLookup, PrayerTimesSource};

/// TTL for cached schedules: one day.
pub const PRAYER_TIMES_TTL: Duration = Duration::from_secs(86_400);

/// Serves prayer times from cache, fetching from the provider on a miss and
/// degrading to a static schedule when the provider fails.
pub struct PrayerTimesService {
    cache: TtlCache<PrayerTimes>,
    source: Arc<dyn PrayerTimesSource>,
    ttl: Duration,
}

impl PrayerTimesService {
    pub fn new(source: Arc<dyn PrayerTimesSource>, ttl: Duration) -> Self {
        Self {
            cache: TtlCache::named("prayer_times", ttl),
            source,
            ttl,
        }
    }

    /// The underlying cache, for registering with the cleanup task.
    pub fn cache(&self) -> &TtlCache<PrayerTimes> {
        &self.cache
    }

    /// Cache key for `date`. The date is part of the key so a new day
    /// naturally starts on a fresh entry.
    pub fn cache_key(&self, date: NaiveDate) -> String {
        format!("prayer_times:{}:{}", self.source.location(), date.format("%Y-%m-%d"))
    }

    /// Looks up the schedule for `date`.
    ///
    /// A provider failure is not cached, so the next call retries upstream.
    pub async fn times_for(&self, date: NaiveDate) -> PrayerTimesLookup {
        let key = self.cache_key(date);
        let mut fetched = false;

        let result = self
            .cache
            .get_or_try_insert_with(&key, Some(self.ttl), || {
                fetched = true;
                self.source.fetch(date)
            })
            .await;

        match result {
            Ok(times) => {
                let source = if fetched {
                    LookupSource::Upstream
                } else {
                    LookupSource::Cache
                };
                debug!(key = %key, ?source, "Prayer times lookup");
                PrayerTimesLookup {
                    times,
                    source,
                    error: None,
                }
            }
            Err(err) => {
                warn!(key = %key, "Prayer times provider failed, serving fallback: {}", err);
                PrayerTimesLookup {
                    times: PrayerTimes::fallback(date),
                    source: LookupSource::Fallback,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CacheError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Counts fetches and fails on demand.
    struct StubSource {
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    impl StubSource {
        fn new(failing: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                failing: AtomicBool::new(failing),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PrayerTimesSource for StubSource {
        fn location(&self) -> &str {
            "testville"
        }

        async fn fetch(&self, date: NaiveDate) -> Result<PrayerTimes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(CacheError::Upstream("provider unreachable".to_string()));
            }
            Ok(PrayerTimes {
                fajr: "04:44".to_string(),
                ..PrayerTimes::fallback(date)
            })
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    #[test]
    fn test_cache_key_embeds_location_and_date() {
        let service = PrayerTimesService::new(StubSource::new(false), PRAYER_TIMES_TTL);
        assert_eq!(service.cache_key(date(16)), "prayer_times:testville:2026-10-16");
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let source = StubSource::new(false);
        let service = PrayerTimesService::new(source.clone(), PRAYER_TIMES_TTL);

        let first = service.times_for(date(16)).await;
        let second = service.times_for(date(16)).await;

        assert_eq!(first.source, LookupSource::Upstream);
        assert_eq!(second.source, LookupSource::Cache);
        assert_eq!(second.times.fajr, "04:44");
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_new_day_uses_new_key() {
        let source = StubSource::new(false);
        let service = PrayerTimesService::new(source.clone(), PRAYER_TIMES_TTL);

        service.times_for(date(16)).await;
        let next_day = service.times_for(date(17)).await;

        assert_eq!(next_day.source, LookupSource::Upstream);
        assert_eq!(next_day.times.date, date(17));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_fallback() {
        let source = StubSource::new(true);
        let service = PrayerTimesService::new(source.clone(), PRAYER_TIMES_TTL);

        let lookup = service.times_for(date(16)).await;

        assert!(lookup.is_fallback());
        assert_eq!(lookup.times, PrayerTimes::fallback(date(16)));
        assert!(lookup.error.unwrap().contains("provider unreachable"));
        assert!(service.cache().is_empty(), "Failures must not be cached");
    }

    #[tokio::test]
    async fn test_recovers_after_provider_comes_back() {
        let source = StubSource::new(true);
        let service = PrayerTimesService::new(source.clone(), PRAYER_TIMES_TTL);

        assert!(service.times_for(date(16)).await.is_fallback());

        source.failing.store(false, Ordering::SeqCst);
        let lookup = service.times_for(date(16)).await;

        assert_eq!(lookup.source, LookupSource::Upstream);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let source = StubSource::new(false);
        let service = PrayerTimesService::new(source.clone(), Duration::from_millis(30));

        service.times_for(date(16)).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        let lookup = service.times_for(date(16)).await;

        assert_eq!(lookup.source, LookupSource::Upstream);
        assert_eq!(source.calls(), 2);
    }
}
