//! Core type definitions for the application

use std::fmt;
use std::time::Instant;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Coordinates used when neither the command line nor IP lookup yields a position
pub const FALLBACK_LOCATION: Location = Location {
    lat: -6.4025,
    lon: 106.7942,
};

/// Geographic position used to look up prayer timings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Default for Location {
    fn default() -> Self {
        FALLBACK_LOCATION
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Where a track's audio comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioSource {
    /// `data:<mime>;base64,<payload>` URL holding the whole file
    Embedded(String),
    /// Path, `file://` URL or remote URL
    Url(String),
}

/// A playlist entry. Identity is its position in the playlist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    pub source: AudioSource,
}

/// On-disk representation of a track
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTrack {
    pub name: String,
    #[serde(rename = "dataURL", default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Track {
    pub fn to_stored(&self) -> StoredTrack {
        match &self.source {
            AudioSource::Embedded(data) => StoredTrack {
                name: self.name.clone(),
                data_url: Some(data.clone()),
                url: None,
            },
            AudioSource::Url(url) => StoredTrack {
                name: self.name.clone(),
                data_url: None,
                url: Some(url.clone()),
            },
        }
    }

    /// Rebuild a track from storage; `None` when the record has no playable source.
    pub fn from_stored(stored: StoredTrack) -> Option<Self> {
        let source = match (stored.data_url, stored.url) {
            (Some(data), _) => AudioSource::Embedded(data),
            (None, Some(url)) => AudioSource::Url(url),
            (None, None) => return None,
        };
        Some(Self {
            name: stored.name,
            source,
        })
    }
}

/// What the now-playing bar shows
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackStatus {
    Idle,
    Track(String),
    Ended,
}

/// Severity of a transient on-screen message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    /// Pre-alarm before a prayer
    Reminder,
    /// Adhan at prayer time
    Prayer,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn reminder(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Reminder,
            message: message.into(),
        }
    }

    pub fn prayer(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Prayer,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// What the footer prompt is collecting
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    AddFiles { buffer: String },
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub selected: usize,
    pub input_mode: InputMode,
    pub notification: Option<Notification>,
    pub notification_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected: 0,
            input_mode: InputMode::Normal,
            notification: None,
            notification_timestamp: None,
            show_help_popup: false,
        }
    }
}

/// Header contents derived from the prayer schedule
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrayerDisplay {
    Loading,
    Unavailable,
    Next {
        name: String,
        at: NaiveDateTime,
        hours: i64,
        minutes: i64,
    },
}
