//! Prayer-times data types and the static fallback schedule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily prayer schedule for one location. Times are local `HH:MM` strings
/// exactly as the provider reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerTimes {
    pub date: NaiveDate,
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
    /// Islamic calendar date, e.g. `"14 Rabi al-Thani 1448"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hijri_date: Option<String>,
}

impl PrayerTimes {
    /// Static schedule served when the provider cannot be reached.
    pub fn fallback(date: NaiveDate) -> Self {
        Self {
            date,
            fajr: "05:00".to_string(),
            sunrise: "06:30".to_string(),
            dhuhr: "13:00".to_string(),
            asr: "16:30".to_string(),
            maghrib: "19:00".to_string(),
            isha: "20:30".to_string(),
            hijri_date: None,
        }
    }
}

/// Where a looked-up schedule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupSource {
    Cache,
    Upstream,
    Fallback,
}

/// Result of a prayer-times lookup. Never an error: provider failures are
/// reported through `error` alongside the fallback schedule.
#[derive(Debug, Clone)]
pub struct PrayerTimesLookup {
    pub times: PrayerTimes,
    pub source: LookupSource,
    pub error: Option<String>,
}

impl PrayerTimesLookup {
    pub fn is_fallback(&self) -> bool {
        self.source == LookupSource::Fallback
    }
}
