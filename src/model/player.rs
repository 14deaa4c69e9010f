//! Music player: ordered playlist, track cursor and the music output channel

use anyhow::Result;

use crate::audio::AudioOutput;
use super::storage::PlaylistStore;
use super::types::{Notification, StoredTrack, Track, TrackStatus};

/// Everything the view needs to draw the playlist and now-playing bar
#[derive(Clone, Debug)]
pub struct PlaybackInfo {
    pub track_names: Vec<String>,
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub status: TrackStatus,
}

pub struct MusicPlayer {
    playlist: Vec<Track>,
    current: Option<usize>,
    is_playing: bool,
    status: TrackStatus,
    output: Box<dyn AudioOutput>,
    store: Box<dyn PlaylistStore>,
    notifications: Vec<Notification>,
}

impl MusicPlayer {
    pub fn new(output: Box<dyn AudioOutput>, store: Box<dyn PlaylistStore>) -> Self {
        Self {
            playlist: Vec::new(),
            current: None,
            is_playing: false,
            status: TrackStatus::Idle,
            output,
            store,
            notifications: Vec::new(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    #[cfg(test)]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn playback_info(&self) -> PlaybackInfo {
        PlaybackInfo {
            track_names: self.playlist.iter().map(|t| t.name.clone()).collect(),
            current_index: self.current,
            is_playing: self.is_playing,
            status: self.status.clone(),
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Load the saved playlist. Missing or unreadable storage leaves the playlist empty.
    pub fn restore(&mut self) {
        match self.store.load() {
            Ok(Some(records)) if !records.is_empty() => {
                let stored = records.len();
                self.playlist = records.into_iter().filter_map(Track::from_stored).collect();
                let dropped = stored - self.playlist.len();
                if dropped > 0 {
                    tracing::warn!(dropped, "Skipped stored tracks without an audio source");
                }
                tracing::info!(tracks = self.playlist.len(), "Playlist restored from storage");
            }
            Ok(_) => tracing::debug!("No saved playlist"),
            Err(e) => tracing::warn!(error = %e, "Invalid playlist storage, starting empty"),
        }
    }

    fn persist(&mut self) {
        let records: Vec<StoredTrack> = self.playlist.iter().map(Track::to_stored).collect();
        if let Err(e) = self.store.save(&records) {
            tracing::warn!(error = %e, "Failed to save playlist");
            self.notify(Notification::error("local storage is full"));
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    // ========================================================================
    // Playlist operations
    // ========================================================================

    /// Append decoded uploads. Per-file failures are only logged; the user
    /// hears about it when nothing in the batch could be read.
    pub fn add_tracks(&mut self, decoded: Vec<Result<Track>>) {
        if decoded.is_empty() {
            return;
        }
        let was_empty = self.playlist.is_empty();
        let mut added = 0usize;
        for result in decoded {
            match result {
                Ok(track) => {
                    tracing::debug!(track = %track.name, "Track added");
                    self.playlist.push(track);
                    added += 1;
                }
                Err(e) => tracing::warn!(error = %e, "Failed to read file"),
            }
        }

        if added == 0 {
            self.notify(Notification::error("failed to read files"));
            return;
        }

        self.persist();
        if was_empty && !self.is_playing && !self.output.has_source() {
            self.play(0);
        }
        let noun = if added == 1 { "track" } else { "tracks" };
        self.notify(Notification::info(format!("{added} {noun} added")));
    }

    /// Start the track at `index`. Out-of-range indices are ignored.
    pub fn play(&mut self, index: usize) {
        let Some(track) = self.playlist.get(index) else {
            return;
        };
        let source = track.source.clone();
        let name = track.name.clone();
        self.current = Some(index);

        self.is_playing = false;
        if let Err(e) = self.output.load(&source) {
            tracing::warn!(index, track = %name, error = %e, "Could not decode track");
            self.notify(Notification::error("unsupported audio format"));
            return;
        }
        match self.output.play() {
            Ok(()) => {
                tracing::info!(index, track = %name, "Playing track");
                self.is_playing = true;
                self.status = TrackStatus::Track(name);
            }
            Err(e) => {
                tracing::warn!(index, track = %name, error = %e, "Play failed");
                self.notify(Notification::error("failed to play track"));
            }
        }
    }

    pub fn toggle_play_pause(&mut self) {
        if self.playlist.is_empty() {
            self.notify(Notification::info("no songs in the playlist"));
            return;
        }
        if self.is_playing {
            self.output.pause();
            self.is_playing = false;
            tracing::debug!("Playback paused");
        } else if let (TrackStatus::Ended, Some(current)) = (&self.status, self.current) {
            self.play(current);
        } else if self.output.has_source() && self.current.is_some() {
            match self.output.play() {
                Ok(()) => self.is_playing = true,
                Err(e) => tracing::warn!(error = %e, "Resume failed"),
            }
        } else {
            self.play(0);
        }
    }

    pub fn next(&mut self) {
        let next = self.current.map_or(0, |i| i + 1);
        if next < self.playlist.len() {
            self.play(next);
        }
    }

    pub fn previous(&mut self) {
        if let Some(i) = self.current.filter(|&i| i > 0) {
            self.play(i - 1);
        }
    }

    pub fn delete(&mut self, index: usize) {
        if index >= self.playlist.len() {
            return;
        }
        let was_current = self.current == Some(index);
        let removed = self.playlist.remove(index);
        tracing::info!(index, track = %removed.name, "Track deleted");

        if self.playlist.is_empty() {
            self.current = None;
            self.stop();
        } else if was_current {
            self.play(index.min(self.playlist.len() - 1));
        } else if let Some(current) = self.current.filter(|&c| c > index) {
            self.current = Some(current - 1);
        }

        self.persist();
        self.notify(Notification::info("track deleted"));
    }

    pub fn clear(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.playlist.clear();
        self.current = None;
        self.stop();
        self.persist();
        self.notify(Notification::info("playlist cleared"));
        tracing::info!("Playlist cleared");
    }

    fn stop(&mut self) {
        self.output.unload();
        self.is_playing = false;
        self.status = TrackStatus::Idle;
    }

    // ========================================================================
    // Output events and interruptions
    // ========================================================================

    /// Poll the music channel; advances the playlist when the track ran out.
    pub fn poll_output(&mut self) {
        if self.output.take_finished() {
            self.on_track_ended();
        }
    }

    pub fn on_track_ended(&mut self) {
        match self.current {
            Some(i) if i + 1 < self.playlist.len() => self.play(i + 1),
            _ => {
                tracing::debug!("Reached end of playlist");
                self.is_playing = false;
                self.status = TrackStatus::Ended;
            }
        }
    }

    /// Pause for an alert, without touching the playlist.
    pub fn suspend(&mut self) {
        if self.is_playing || !self.output.is_paused() {
            self.output.pause();
            self.is_playing = false;
        }
    }

    pub fn resume(&mut self) {
        if !self.output.has_source() || self.current.is_none() || self.playlist.is_empty() {
            return;
        }
        match self.output.play() {
            Ok(()) => self.is_playing = true,
            Err(e) => tracing::warn!(error = %e, "Resume failed"),
        }
    }
}
