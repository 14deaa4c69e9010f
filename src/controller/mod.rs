//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! drives the periodic tick, and runs the network and file work that feeds the model.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Playlist and playback commands, adding files
//! - `prayer`: Location and prayer schedule refresh, timer tick

mod input;
mod playback;
mod prayer;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{AppModel, Clock};
use crate::services::{LocationResolver, PrayerTimesClient};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    clock: Arc<dyn Clock>,
    prayer_times: PrayerTimesClient,
    locator: LocationResolver,
}

impl AppController {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        clock: Arc<dyn Clock>,
        prayer_times: PrayerTimesClient,
        locator: LocationResolver,
    ) -> Self {
        Self {
            model,
            clock,
            prayer_times,
            locator,
        }
    }
}
