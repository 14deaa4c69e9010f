//! Command-line configuration

use std::path::PathBuf;

use chrono::TimeDelta;
use clap::Parser;

use crate::model::{DEFAULT_PLAYLIST_FILE, DEFAULT_PRE_ALARM, Location};
use crate::services::{DEFAULT_API_BASE, DEFAULT_IP_LOOKUP_URL, DEFAULT_METHOD};

#[derive(Parser, Debug, Clone)]
#[command(name = "chronodeck")]
#[command(about = "Terminal music player with prayer-time reminders", long_about = None)]
pub struct Config {
    /// Latitude to use instead of IP geolocation
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude to use instead of IP geolocation
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Prayer time calculation method (AlAdhan method id)
    #[arg(long, default_value_t = DEFAULT_METHOD)]
    pub method: u8,

    /// Base URL of the prayer timings API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// IP geolocation endpoint
    #[arg(long, default_value = DEFAULT_IP_LOOKUP_URL)]
    pub ip_lookup_url: String,

    /// Where the playlist is saved
    #[arg(long, default_value = DEFAULT_PLAYLIST_FILE)]
    pub playlist_file: PathBuf,

    /// Sound played before each prayer
    #[arg(long, default_value = "sound/alarm.mp3")]
    pub alarm_sound: PathBuf,

    /// Sound played at prayer time
    #[arg(long, default_value = "sound/adzan.mp3")]
    pub adhan_sound: PathBuf,

    /// Minutes between the reminder alarm and the adhan
    #[arg(long, default_value_t = DEFAULT_PRE_ALARM.num_minutes() as u32, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub pre_alarm_minutes: u32,

    /// Do not start playing the saved playlist on launch
    #[arg(long)]
    pub no_autoplay: bool,
}

impl Config {
    pub fn configured_location(&self) -> Option<Location> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Location { lat, lon }),
            _ => None,
        }
    }

    pub fn pre_alarm(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.pre_alarm_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_public_endpoints() {
        let config = Config::parse_from(["chronodeck"]);
        assert_eq!(config.configured_location(), None);
        assert_eq!(config.method, 2);
        assert_eq!(config.api_base, "https://api.aladhan.com");
        assert_eq!(config.pre_alarm(), DEFAULT_PRE_ALARM);
        assert_eq!(config.playlist_file, PathBuf::from(".cache/playlist.json"));
        assert!(!config.no_autoplay);
    }

    #[test]
    fn coordinates_come_in_pairs() {
        let config = Config::parse_from(["chronodeck", "--lat", "-6.2", "--lon", "106.8"]);
        assert_eq!(config.configured_location(), Some(Location { lat: -6.2, lon: 106.8 }));
        assert!(Config::try_parse_from(["chronodeck", "--lat", "1.0"]).is_err());
    }

    #[test]
    fn pre_alarm_must_be_positive() {
        assert!(Config::try_parse_from(["chronodeck", "--pre-alarm-minutes", "0"]).is_err());
    }
}
