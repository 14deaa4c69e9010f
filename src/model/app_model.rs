//! Main application model with state management

use std::time::Instant;

use anyhow::Result;
use chrono::NaiveDateTime;

use super::coordinator::{AlertKind, Coordinator};
use super::player::{MusicPlayer, PlaybackInfo};
use super::schedule::{EventKind, PrayerScheduler, ScheduledEvent};
use super::types::{InputMode, Location, Notification, PrayerDisplay, Track, UiState};

/// How long a notification stays on screen
const NOTIFICATION_TTL_SECS: u64 = 5;

/// Follow-up work a tick asks the controller to do outside the model lock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickAction {
    RefreshSchedule,
}

/// Main application model containing all state
pub struct AppModel {
    pub player: MusicPlayer,
    pub scheduler: PrayerScheduler,
    pub coordinator: Coordinator,
    location: Location,
    ui_state: UiState,
    should_quit: bool,
}

impl AppModel {
    pub fn new(player: MusicPlayer, scheduler: PrayerScheduler, coordinator: Coordinator, location: Location) -> Self {
        Self {
            player,
            scheduler,
            coordinator,
            location,
            ui_state: UiState::default(),
            should_quit: false,
        }
    }

    // ========================================================================
    // Timers & alerts
    // ========================================================================

    /// Advance everything time-driven: audio completion, then due prayer events.
    pub fn tick(&mut self, now: NaiveDateTime) -> Vec<TickAction> {
        self.player.poll_output();
        self.coordinator.poll(&mut self.player);

        let mut actions = Vec::new();
        for event in self.scheduler.pop_due(now) {
            if let Some(action) = self.handle_event(&event, now) {
                if !actions.contains(&action) {
                    actions.push(action);
                }
            }
        }
        self.sync_player();
        actions
    }

    fn handle_event(&mut self, event: &ScheduledEvent, now: NaiveDateTime) -> Option<TickAction> {
        tracing::debug!(kind = ?event.kind, prayer = ?event.prayer, fires_at = %event.fires_at, "Prayer event due");
        match event.kind {
            EventKind::PreAlarm => {
                let message = format!("alarm • {}", now.format("%H:%M"));
                let note = self.coordinator.fire(AlertKind::Alarm, &mut self.player, message);
                self.set_notification(note);
                None
            }
            EventKind::Adhan => {
                let message = event.prayer.map(|p| p.name().to_string()).unwrap_or_default();
                let note = self.coordinator.fire(AlertKind::Adhan, &mut self.player, message);
                self.set_notification(note);
                None
            }
            EventKind::DailyReschedule => Some(TickAction::RefreshSchedule),
        }
    }

    pub fn prayer_display(&self, now: NaiveDateTime) -> PrayerDisplay {
        self.scheduler.display(now)
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn set_location(&mut self, location: Location) {
        tracing::info!(lat = location.lat, lon = location.lon, "Location updated");
        self.location = location;
    }

    // ========================================================================
    // Player operations
    // ========================================================================

    pub fn get_playback_info(&self) -> PlaybackInfo {
        self.player.playback_info()
    }

    pub fn toggle_play_pause(&mut self) {
        self.player.toggle_play_pause();
        self.sync_player();
    }

    pub fn next_track(&mut self) {
        self.player.next();
        self.sync_player();
    }

    pub fn previous_track(&mut self) {
        self.player.previous();
        self.sync_player();
    }

    pub fn play_selected(&mut self) {
        self.player.play(self.ui_state.selected);
        self.sync_player();
    }

    pub fn delete_selected(&mut self) {
        self.player.delete(self.ui_state.selected);
        self.sync_player();
    }

    pub fn clear_playlist(&mut self) {
        self.player.clear();
        self.sync_player();
    }

    pub fn add_tracks(&mut self, decoded: Vec<Result<Track>>) {
        self.player.add_tracks(decoded);
        self.sync_player();
    }

    /// Surface the player's queued notifications and keep the selection in range.
    fn sync_player(&mut self) {
        for note in self.player.drain_notifications() {
            self.set_notification(note);
        }
        let len = self.player.len();
        if self.ui_state.selected >= len {
            self.ui_state.selected = len.saturating_sub(1);
        }
    }

    // ========================================================================
    // UI state
    // ========================================================================

    pub fn get_ui_state(&self) -> UiState {
        self.ui_state.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_should_quit(&mut self, quit: bool) {
        self.should_quit = quit;
    }

    pub fn move_selection_up(&mut self) {
        self.ui_state.selected = self.ui_state.selected.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if self.ui_state.selected < self.player.len().saturating_sub(1) {
            self.ui_state.selected += 1;
        }
    }

    pub fn set_notification(&mut self, notification: Notification) {
        self.ui_state.notification = Some(notification);
        self.ui_state.notification_timestamp = Some(Instant::now());
    }

    pub fn clear_notification(&mut self) {
        self.ui_state.notification = None;
        self.ui_state.notification_timestamp = None;
    }

    pub fn auto_clear_old_notifications(&mut self) {
        if let Some(timestamp) = self.ui_state.notification_timestamp {
            if timestamp.elapsed().as_secs() > NOTIFICATION_TTL_SECS {
                self.clear_notification();
            }
        }
    }

    pub fn show_help_popup(&mut self) {
        self.ui_state.show_help_popup = true;
    }

    pub fn hide_help_popup(&mut self) {
        self.ui_state.show_help_popup = false;
    }

    pub fn is_help_popup_open(&self) -> bool {
        self.ui_state.show_help_popup
    }

    pub fn input_mode(&self) -> &InputMode {
        &self.ui_state.input_mode
    }

    pub fn begin_add_files(&mut self) {
        self.ui_state.input_mode = InputMode::AddFiles { buffer: String::new() };
    }

    pub fn append_to_input(&mut self, c: char) {
        if let InputMode::AddFiles { buffer } = &mut self.ui_state.input_mode {
            buffer.push(c);
        }
    }

    pub fn backspace_input(&mut self) {
        if let InputMode::AddFiles { buffer } = &mut self.ui_state.input_mode {
            buffer.pop();
        }
    }

    /// Leave the prompt, handing back what was typed.
    pub fn finish_input(&mut self) -> Option<String> {
        match std::mem::take(&mut self.ui_state.input_mode) {
            InputMode::AddFiles { buffer } => Some(buffer),
            InputMode::Normal => None,
        }
    }
}
