//! Prayer Times Module
//!
//! Daily prayer schedules fetched from an external provider and cached for a
//! day, with a static fallback when the provider is down.

mod service;
mod source;
mod types;

pub use service::{PrayerTimesService, PRAYER_TIMES_TTL};
pub use source::{parse_timings, AladhanClient, AladhanConfig, PrayerTimesSource};
pub use types::{LookupSource, PrayerTimes, PrayerTimesLookup};
