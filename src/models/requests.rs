//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::cache::{MAX_KEY_LENGTH, MAX_VALUE_SIZE};

/// How far from today a prayer-times lookup may reach, in days. Bounds the
/// number of distinct cache keys and upstream calls clients can trigger.
pub const MAX_DATE_OFFSET_DAYS: i64 = 31;

/// Request body for the SET operation (PUT /cache)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value, stored verbatim
/// - `ttl`: Optional TTL in seconds (uses the cache default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: serde_json::Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(msg) = validate_key(&self.key) {
            return Some(msg);
        }
        if self.ttl == Some(0) {
            return Some("TTL must be greater than zero".to_string());
        }
        let size = serde_json::to_vec(&self.value).map(|v| v.len()).unwrap_or(0);
        if size > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        None
    }
}

/// Checks a key taken from a body or a path segment.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Query string for GET /prayer-times
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrayerTimesQuery {
    /// `YYYY-MM-DD`; today (UTC) when absent
    #[serde(default)]
    pub date: Option<String>,
}

impl PrayerTimesQuery {
    /// Parses the requested date, defaulting to `today`.
    ///
    /// Dates more than [`MAX_DATE_OFFSET_DAYS`] away from `today` are rejected.
    pub fn resolve_date(&self, today: NaiveDate) -> Result<NaiveDate, String> {
        let date = match self.date.as_deref() {
            None | Some("") => return Ok(today),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", raw))?,
        };

        if (date - today).num_days().abs() > MAX_DATE_OFFSET_DAYS {
            return Err(format!(
                "Date {} is more than {} days from today",
                date, MAX_DATE_OFFSET_DAYS
            ));
        }
        Ok(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "announcements", "value": [{"id": 1, "title": "Iftar"}]}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "announcements");
        assert_eq!(req.value[0]["title"], "Iftar");
        assert!(req.ttl.is_none());
    }

    #[test]
    fn test_set_request_with_ttl() {
        let json = r#"{"key": "test", "value": "hello", "ttl": 300}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl, Some(300));
    }

    #[test]
    fn test_validate_empty_key() {
        let req = SetRequest {
            key: "".to_string(),
            value: serde_json::json!("test"),
            ttl: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_long_key() {
        let req = SetRequest {
            key: "x".repeat(MAX_KEY_LENGTH + 1),
            value: serde_json::json!(1),
            ttl: None,
        };
        assert!(req.validate().unwrap().contains("maximum length"));
    }

    #[test]
    fn test_validate_zero_ttl() {
        let req = SetRequest {
            key: "k".to_string(),
            value: serde_json::json!(1),
            ttl: Some(0),
        };
        assert!(req.validate().unwrap().contains("TTL"));
    }

    #[test]
    fn test_validate_value_too_large() {
        let req = SetRequest {
            key: "k".to_string(),
            value: serde_json::json!("x".repeat(MAX_VALUE_SIZE)),
            ttl: None,
        };
        assert!(req.validate().unwrap().contains("maximum size"));
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SetRequest {
            key: "valid_key".to_string(),
            value: serde_json::json!({"n": 1}),
            ttl: Some(60),
        };
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_prayer_query_resolve_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        assert_eq!(PrayerTimesQuery::default().resolve_date(today), Ok(today));

        let query = PrayerTimesQuery {
            date: Some("2026-11-01".to_string()),
        };
        assert_eq!(
            query.resolve_date(today),
            Ok(NaiveDate::from_ymd_opt(2026, 11, 1).unwrap())
        );

        let bad = PrayerTimesQuery {
            date: Some("25/12/2026".to_string()),
        };
        assert!(bad.resolve_date(today).is_err());
    }

    #[test]
    fn test_prayer_query_date_window() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let query = |raw: &str| PrayerTimesQuery {
            date: Some(raw.to_string()),
        };

        // Exactly MAX_DATE_OFFSET_DAYS away on either side is still accepted
        assert!(query("2026-11-16").resolve_date(today).is_ok());
        assert!(query("2026-09-15").resolve_date(today).is_ok());

        let far_future = query("2026-11-17").resolve_date(today);
        assert!(far_future.unwrap_err().contains("days from today"));
        assert!(query("2026-09-14").resolve_date(today).is_err());
        assert!(query("1900-01-01").resolve_date(today).is_err());
    }
}
