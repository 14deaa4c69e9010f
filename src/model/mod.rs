//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (tracks, location, UI state, notifications)
//! - `storage`: Durable playlist storage
//! - `player`: Music player state machine
//! - `schedule`: Prayer timings and the timed event list derived from them
//! - `coordinator`: Alarm/adhan interruptions of the music
//! - `clock`: Wall-clock source
//! - `app_model`: Main application model tying the above together

mod types;
mod storage;
mod player;
mod schedule;
mod coordinator;
mod clock;
mod app_model;

// Re-export all public types for convenient access
pub use types::{
    AudioSource, FALLBACK_LOCATION, InputMode, Location, NoticeLevel, Notification,
    PrayerDisplay, Track, TrackStatus, UiState,
};

pub use storage::{DEFAULT_PLAYLIST_FILE, JsonFileStore};

pub use player::{MusicPlayer, PlaybackInfo};

pub use schedule::{DEFAULT_PRE_ALARM, Prayer, PrayerScheduler, PrayerTimings};

pub use coordinator::{AlertKind, Coordinator};

pub use clock::{Clock, SystemClock};

pub use app_model::{AppModel, TickAction};
