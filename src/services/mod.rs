//! Remote services: daily prayer timings and approximate location
//!
//! - `prayer_times`: AlAdhan timings API client
//! - `location`: location resolution with IP-geolocation fallback
//! - `error`: error type shared by both clients

mod error;
mod location;
mod prayer_times;

pub use location::{DEFAULT_IP_LOOKUP_URL, LocationResolver};
pub use prayer_times::{DEFAULT_API_BASE, DEFAULT_METHOD, PrayerTimesClient};
