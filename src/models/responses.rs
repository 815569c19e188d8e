//! Response DTOs for the cache service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::prayer::{LookupSource, PrayerTimes, PrayerTimesLookup};

/// Response body for GET /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: serde_json::Value,
    /// Whole seconds of freshness left
    pub ttl_remaining: u64,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: serde_json::Value, ttl_remaining: u64) -> Self {
        Self {
            key: key.into(),
            value,
            ttl_remaining,
        }
    }
}

/// Response body for PUT /cache
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// TTL applied, in seconds
    pub ttl: u64,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, ttl: u64) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
            ttl,
        }
    }
}

/// Response body for DELETE /cache/:key
///
/// Deleting an absent key is not an error, so this is always returned with
/// `removed` telling whether an entry existed.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    pub removed: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        Self {
            key: key.into(),
            removed,
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

/// Response body for POST /cache/cleanup
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    pub removed: usize,
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for GET /prayer-times
#[derive(Debug, Clone, Serialize)]
pub struct PrayerTimesResponse {
    #[serde(flatten)]
    pub times: PrayerTimes,
    /// Where the schedule came from
    pub source: LookupSource,
    /// True when the static schedule is served because the provider failed
    pub fallback: bool,
    /// Provider error behind a fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<PrayerTimesLookup> for PrayerTimesResponse {
    fn from(lookup: PrayerTimesLookup) -> Self {
        Self {
            fallback: lookup.is_fallback(),
            times: lookup.times,
            source: lookup.source,
            error: lookup.error,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("events", serde_json::json!([1, 2]), 42);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["key"], "events");
        assert_eq!(json["value"], serde_json::json!([1, 2]));
        assert_eq!(json["ttl_remaining"], 42);
    }

    #[test]
    fn test_set_response_serialize() {
        let resp = SetResponse::new("my_key", 300);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_stats_response_from_stats() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            expirations: 5,
            total_entries: 10,
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.expirations, 5);
    }

    #[test]
    fn test_prayer_times_response_flattens_times() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let lookup = PrayerTimesLookup {
            times: PrayerTimes::fallback(date),
            source: LookupSource::Fallback,
            error: Some("timeout".to_string()),
        };

        let json = serde_json::to_value(PrayerTimesResponse::from(lookup)).unwrap();
        assert_eq!(json["fajr"], "05:00");
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["fallback"], true);
        assert_eq!(json["error"], "timeout");
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
