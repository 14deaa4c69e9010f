//! Alert interruptions: pause the music for an alarm or adhan, resume it after

use crate::audio::AudioOutput;
use super::player::MusicPlayer;
use super::types::Notification;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Alarm,
    Adhan,
}

/// One alert sound plus its own memory of whether music was playing.
pub struct InterruptChannel {
    kind: AlertKind,
    output: Box<dyn AudioOutput>,
    was_playing: bool,
}

impl InterruptChannel {
    pub fn new(kind: AlertKind, output: Box<dyn AudioOutput>) -> Self {
        Self {
            kind,
            output,
            was_playing: false,
        }
    }

    #[cfg(test)]
    pub fn was_playing(&self) -> bool {
        self.was_playing
    }

    fn fire(&mut self, player: &mut MusicPlayer) {
        self.was_playing = player.is_playing();
        player.suspend();
        if let Err(e) = self.output.replay() {
            tracing::warn!(alert = ?self.kind, error = %e, "Alert sound failed to play");
        }
        tracing::info!(alert = ?self.kind, music_was_playing = self.was_playing, "Alert fired");
    }

    fn poll(&mut self, player: &mut MusicPlayer) {
        if !self.output.take_finished() {
            return;
        }
        if self.was_playing {
            tracing::debug!(alert = ?self.kind, "Alert finished, resuming music");
            player.resume();
        }
        self.was_playing = false;
    }
}

pub struct Coordinator {
    alarm: InterruptChannel,
    adhan: InterruptChannel,
}

impl Coordinator {
    pub fn new(alarm: Box<dyn AudioOutput>, adhan: Box<dyn AudioOutput>) -> Self {
        Self {
            alarm: InterruptChannel::new(AlertKind::Alarm, alarm),
            adhan: InterruptChannel::new(AlertKind::Adhan, adhan),
        }
    }

    #[cfg(test)]
    pub fn channel(&self, kind: AlertKind) -> &InterruptChannel {
        match kind {
            AlertKind::Alarm => &self.alarm,
            AlertKind::Adhan => &self.adhan,
        }
    }

    fn channel_mut(&mut self, kind: AlertKind) -> &mut InterruptChannel {
        match kind {
            AlertKind::Alarm => &mut self.alarm,
            AlertKind::Adhan => &mut self.adhan,
        }
    }

    /// Interrupt the music with the alert for `kind`; returns the message to show.
    pub fn fire(&mut self, kind: AlertKind, player: &mut MusicPlayer, message: String) -> Notification {
        self.channel_mut(kind).fire(player);
        match kind {
            AlertKind::Alarm => Notification::reminder(message),
            AlertKind::Adhan => Notification::prayer(message),
        }
    }

    /// Resume music for every alert whose sound has finished.
    pub fn poll(&mut self, player: &mut MusicPlayer) {
        self.alarm.poll(player);
        self.adhan.poll(player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::FakeOutput;
    use crate::model::player::tests::player_with;

    fn coordinator() -> (Coordinator, FakeOutput, FakeOutput) {
        let alarm = FakeOutput::default();
        let adhan = FakeOutput::default();
        (
            Coordinator::new(Box::new(alarm.clone()), Box::new(adhan.clone())),
            alarm,
            adhan,
        )
    }

    #[test]
    fn alarm_pauses_and_resumes_exactly_when_sound_ends() {
        let (mut coord, alarm, _) = coordinator();
        let (mut player, music, store) = player_with(&["a", "b"]);
        player.play(1);
        let saves = store.save_count();

        coord.fire(AlertKind::Alarm, &mut player, "alarm • 04:20".into());
        assert!(!player.is_playing());
        assert!(!music.playing());
        assert_eq!(alarm.log.lock().unwrap().replays, 1);

        coord.poll(&mut player);
        assert!(!player.is_playing(), "must wait for the alert to finish");

        alarm.finish();
        coord.poll(&mut player);
        assert!(player.is_playing());
        assert_eq!(player.current_index(), Some(1));
        assert_eq!(player.len(), 2);
        assert_eq!(store.save_count(), saves);
        assert!(!coord.channel(AlertKind::Alarm).was_playing());
    }

    #[test]
    fn paused_music_stays_paused_after_alert() {
        let (mut coord, _, adhan) = coordinator();
        let (mut player, _, _) = player_with(&["a"]);
        player.play(0);
        player.toggle_play_pause();

        coord.fire(AlertKind::Adhan, &mut player, "Maghrib".into());
        adhan.finish();
        coord.poll(&mut player);
        assert!(!player.is_playing());
    }

    #[test]
    fn flag_is_one_shot() {
        let (mut coord, alarm, _) = coordinator();
        let (mut player, _, _) = player_with(&["a"]);
        player.play(0);

        coord.fire(AlertKind::Alarm, &mut player, "alarm".into());
        alarm.finish();
        coord.poll(&mut player);
        player.toggle_play_pause();
        assert!(!player.is_playing());

        coord.fire(AlertKind::Alarm, &mut player, "alarm".into());
        alarm.finish();
        coord.poll(&mut player);
        assert!(!player.is_playing());
    }

    #[test]
    fn overlapping_channels_keep_separate_flags() {
        let (mut coord, alarm, adhan) = coordinator();
        let (mut player, _, _) = player_with(&["a"]);
        player.play(0);

        coord.fire(AlertKind::Alarm, &mut player, "alarm".into());
        // Adhan fires while the alarm still holds the music paused
        coord.fire(AlertKind::Adhan, &mut player, "Isha".into());
        assert!(coord.channel(AlertKind::Alarm).was_playing());
        assert!(!coord.channel(AlertKind::Adhan).was_playing());

        adhan.finish();
        coord.poll(&mut player);
        assert!(!player.is_playing());

        alarm.finish();
        coord.poll(&mut player);
        assert!(player.is_playing());
    }

    #[test]
    fn fire_returns_alert_notification() {
        let (mut coord, _, _) = coordinator();
        let (mut player, _, _) = player_with(&[]);
        let note = coord.fire(AlertKind::Adhan, &mut player, "Fajr".into());
        assert_eq!(note, Notification::prayer("Fajr"));
        let note = coord.fire(AlertKind::Alarm, &mut player, "alarm • 04:20".into());
        assert_eq!(note, Notification::reminder("alarm • 04:20"));
    }
}
