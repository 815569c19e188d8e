//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in seconds for entries stored without an explicit TTL
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Base URL of the prayer-times provider
    pub prayer_api_url: String,
    /// City used for prayer-time lookups
    pub prayer_city: String,
    /// Country used for prayer-time lookups
    pub prayer_country: String,
    /// Calculation method id understood by the provider
    pub prayer_method: u8,
    /// TTL in seconds for cached prayer times
    pub prayer_ttl: u64,
    /// Upstream request timeout in seconds
    pub prayer_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 3600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `PRAYER_API_URL` - Provider base URL (default: `https://api.aladhan.com/v1`)
    /// - `PRAYER_CITY` / `PRAYER_COUNTRY` - Location (default: London, United Kingdom)
    /// - `PRAYER_METHOD` - Calculation method (default: 2)
    /// - `PRAYER_TTL` - Prayer-times TTL in seconds (default: 86400)
    /// - `PRAYER_TIMEOUT` - Upstream timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: parse_ttl("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            prayer_api_url: env::var("PRAYER_API_URL").unwrap_or(defaults.prayer_api_url),
            prayer_city: env::var("PRAYER_CITY").unwrap_or(defaults.prayer_city),
            prayer_country: env::var("PRAYER_COUNTRY").unwrap_or(defaults.prayer_country),
            prayer_method: parse_var("PRAYER_METHOD").unwrap_or(defaults.prayer_method),
            prayer_ttl: parse_ttl("PRAYER_TTL").unwrap_or(defaults.prayer_ttl),
            prayer_timeout: parse_var("PRAYER_TIMEOUT").unwrap_or(defaults.prayer_timeout),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }

    pub fn prayer_ttl(&self) -> Duration {
        Duration::from_secs(self.prayer_ttl)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// A TTL of zero would store entries that are never served, so it is
/// treated like an unparseable value.
fn parse_ttl(name: &str) -> Option<u64> {
    let ttl = parse_var(name)?;
    if ttl == 0 {
        warn!("{} must be greater than zero, using default", name);
        return None;
    }
    Some(ttl)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: 3600,
            server_port: 3000,
            cleanup_interval: 60,
            prayer_api_url: "https://api.aladhan.com/v1".to_string(),
            prayer_city: "London".to_string(),
            prayer_country: "United Kingdom".to_string(),
            prayer_method: 2,
            prayer_ttl: 86_400,
            prayer_timeout: 10,
        }
    }
}
