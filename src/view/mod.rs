//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, truncation)
//! - `layout`: Header with the next prayer and location
//! - `playlist`: Playlist panel
//! - `status`: Now-playing bar and key hints
//! - `overlays`: Notification, help popup, add-files prompt

mod utils;
mod layout;
mod playlist;
mod status;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{InputMode, Location, PlaybackInfo, PrayerDisplay, UiState};

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        playback: &PlaybackInfo,
        ui_state: &UiState,
        prayer: &PrayerDisplay,
        location: Location,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Next prayer + location
                Constraint::Min(0),    // Playlist
                Constraint::Length(3), // Now playing
            ])
            .split(frame.area());

        layout::render_header(frame, chunks[0], prayer, location);
        playlist::render_playlist(frame, chunks[1], playback, ui_state);
        status::render_status_bar(frame, chunks[2], playback);

        if let InputMode::AddFiles { buffer } = &ui_state.input_mode {
            overlays::render_add_files_prompt(frame, buffer);
        }

        if ui_state.notification.is_some() {
            overlays::render_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
