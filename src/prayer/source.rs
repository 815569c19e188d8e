//! Upstream prayer-times providers.
//!
//! [`AladhanClient`] talks to the public Aladhan API; tests plug in their own
//! [`PrayerTimesSource`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::prayer::PrayerTimes;

/// A provider of daily prayer schedules for a fixed location.
#[async_trait]
pub trait PrayerTimesSource: Send + Sync {
    /// Identifies the location; becomes part of the cache key.
    fn location(&self) -> &str;

    /// Fetches the schedule for `date`.
    async fn fetch(&self, date: NaiveDate) -> Result<PrayerTimes>;
}

/// Aladhan client settings.
#[derive(Debug, Clone)]
pub struct AladhanConfig {
    pub base_url: String,
    pub city: String,
    pub country: String,
    pub method: u8,
    pub timeout: Duration,
}

impl From<&Config> for AladhanConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.prayer_api_url.trim_end_matches('/').to_string(),
            city: config.prayer_city.clone(),
            country: config.prayer_country.clone(),
            method: config.prayer_method,
            timeout: Duration::from_secs(config.prayer_timeout),
        }
    }
}

/// Client for the `timingsByCity` endpoint of the Aladhan API.
pub struct AladhanClient {
    config: AladhanConfig,
    location: String,
    http_client: reqwest::Client,
}

impl AladhanClient {
    pub fn new(config: AladhanConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            location: format!("{},{}", config.city, config.country).to_lowercase(),
            config,
            http_client,
        })
    }
}

#[async_trait]
impl PrayerTimesSource for AladhanClient {
    fn location(&self) -> &str {
        &self.location
    }

    #[instrument(skip(self), fields(location = %self.location))]
    async fn fetch(&self, date: NaiveDate) -> Result<PrayerTimes> {
        let url = format!(
            "{}/timingsByCity/{}",
            self.config.base_url,
            date.format("%d-%m-%Y")
        );
        let method = self.config.method.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("city", self.config.city.as_str()),
                ("country", self.config.country.as_str()),
                ("method", method.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Upstream(format!(
                "Prayer times provider returned status {}",
                status
            )));
        }

        let body = response.text().await?;
        let times = parse_timings(&body, date)?;
        debug!("Fetched prayer times from provider");
        Ok(times)
    }
}

// == Response Parsing ==
#[derive(Debug, Deserialize)]
struct AladhanResponse {
    code: u16,
    data: AladhanData,
}

#[derive(Debug, Deserialize)]
struct AladhanData {
    timings: AladhanTimings,
    #[serde(default)]
    date: Option<AladhanDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AladhanTimings {
    fajr: String,
    sunrise: String,
    dhuhr: String,
    asr: String,
    maghrib: String,
    isha: String,
}

#[derive(Debug, Deserialize)]
struct AladhanDate {
    hijri: Option<AladhanHijri>,
}

#[derive(Debug, Deserialize)]
struct AladhanHijri {
    day: String,
    month: AladhanMonth,
    year: String,
}

#[derive(Debug, Deserialize)]
struct AladhanMonth {
    en: String,
}

/// Converts an Aladhan JSON body into [`PrayerTimes`].
pub fn parse_timings(body: &str, date: NaiveDate) -> Result<PrayerTimes> {
    let parsed: AladhanResponse = serde_json::from_str(body)
        .map_err(|e| CacheError::Upstream(format!("Malformed prayer times response: {}", e)))?;

    if parsed.code != 200 {
        return Err(CacheError::Upstream(format!(
            "Prayer times provider reported code {}",
            parsed.code
        )));
    }

    let t = parsed.data.timings;
    let hijri_date = parsed
        .data
        .date
        .and_then(|d| d.hijri)
        .map(|h| format!("{} {} {}", h.day, h.month.en, h.year));

    Ok(PrayerTimes {
        date,
        fajr: clean_time(&t.fajr),
        sunrise: clean_time(&t.sunrise),
        dhuhr: clean_time(&t.dhuhr),
        asr: clean_time(&t.asr),
        maghrib: clean_time(&t.maghrib),
        isha: clean_time(&t.isha),
        hijri_date,
    })
}

/// Drops a trailing timezone tag such as `"05:12 (BST)"`.
fn clean_time(raw: &str) -> String {
    raw.split_whitespace().next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": {
            "timings": {
                "Fajr": "05:41",
                "Sunrise": "07:23 (BST)",
                "Dhuhr": "12:50",
                "Asr": "15:46",
                "Sunset": "18:15",
                "Maghrib": "18:15",
                "Isha": "19:52",
                "Imsak": "05:31",
                "Midnight": "00:50"
            },
            "date": {
                "readable": "16 Oct 2026",
                "hijri": {
                    "date": "05-05-1448",
                    "day": "05",
                    "month": { "number": 5, "en": "Jumādá al-ūlá" },
                    "year": "1448"
                }
            }
        }
    }"#;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_parse_timings() {
        let times = parse_timings(SAMPLE, date()).unwrap();

        assert_eq!(times.date, date());
        assert_eq!(times.fajr, "05:41");
        assert_eq!(times.sunrise, "07:23");
        assert_eq!(times.maghrib, "18:15");
        assert_eq!(times.isha, "19:52");
        assert_eq!(times.hijri_date.as_deref(), Some("05 Jumādá al-ūlá 1448"));
    }

    #[test]
    fn test_parse_timings_without_hijri() {
        let body = r#"{"code":200,"data":{"timings":{
            "Fajr":"05:00","Sunrise":"06:00","Dhuhr":"12:00",
            "Asr":"15:00","Maghrib":"18:00","Isha":"19:30"}}}"#;

        let times = parse_timings(body, date()).unwrap();
        assert!(times.hijri_date.is_none());
    }

    #[test]
    fn test_parse_timings_rejects_error_code() {
        let body = r#"{"code":400,"data":{"timings":{
            "Fajr":"","Sunrise":"","Dhuhr":"","Asr":"","Maghrib":"","Isha":""}}}"#;

        let result = parse_timings(body, date());
        assert!(matches!(result, Err(CacheError::Upstream(_))));
    }

    #[test]
    fn test_parse_timings_rejects_malformed_body() {
        let result = parse_timings("<html>rate limited</html>", date());
        assert!(matches!(result, Err(CacheError::Upstream(_))));
    }

    #[test]
    fn test_client_location_from_config() {
        let client = AladhanClient::new(AladhanConfig::from(&Config::default())).unwrap();
        assert_eq!(client.location(), "london,united kingdom");
    }
}
