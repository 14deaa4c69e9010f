//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::InputMode;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let mut model = self.model.lock().await;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            model.set_should_quit(true);
            return Ok(());
        }

        // Handle help popup
        if model.is_help_popup_open() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup();
            }
            return Ok(());
        }

        // Add-files prompt captures all typing
        if matches!(model.input_mode(), InputMode::AddFiles { .. }) {
            match key.code {
                KeyCode::Enter => {
                    let input = model.finish_input().unwrap_or_default();
                    drop(model);
                    let controller = self.clone();
                    tokio::spawn(async move {
                        controller.add_files(&input).await;
                    });
                }
                KeyCode::Esc => {
                    model.finish_input();
                }
                KeyCode::Backspace => model.backspace_input(),
                KeyCode::Char(c) => model.append_to_input(c),
                _ => {}
            }
            return Ok(());
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true);
            }
            KeyCode::Esc => {
                model.clear_notification();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                model.move_selection_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                model.move_selection_down();
            }
            // Play the highlighted track
            KeyCode::Enter => {
                drop(model);
                self.play_selected().await;
            }
            // Play/Pause toggle
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                drop(model);
                self.next_track().await;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                drop(model);
                self.previous_track().await;
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                drop(model);
                self.delete_selected().await;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                drop(model);
                self.clear_playlist().await;
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                model.begin_add_files();
            }
            // Re-resolve location and refetch prayer times
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                self.spawn_refresh_location();
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup();
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyEventState;
    use tokio::sync::Mutex;

    use super::*;
    use crate::model::testing::{ManualClock, at, harness};
    use crate::model::{Clock, Location};
    use crate::services::{LocationResolver, PrayerTimesClient};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn controller(names: &[&str]) -> AppController {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(at(10, 12, 0)));
        let here = Location { lat: 0.5, lon: 0.5 };
        AppController::new(
            Arc::new(Mutex::new(harness(names).model)),
            clock,
            PrayerTimesClient::new("http://127.0.0.1:9", 2).unwrap(),
            LocationResolver::new(Some(here), "http://127.0.0.1:9/").unwrap(),
        )
    }

    #[tokio::test]
    async fn space_enter_and_navigation_drive_the_player() {
        let controller = controller(&["a", "b", "c"]);
        controller.handle_key_event(press(KeyCode::Down)).await.unwrap();
        controller.handle_key_event(press(KeyCode::Enter)).await.unwrap();
        {
            let model = controller.model.lock().await;
            assert_eq!(model.player.current_index(), Some(1));
            assert!(model.player.is_playing());
        }

        controller.handle_key_event(press(KeyCode::Char(' '))).await.unwrap();
        assert!(!controller.model.lock().await.player.is_playing());

        controller.handle_key_event(press(KeyCode::Char('n'))).await.unwrap();
        assert_eq!(controller.model.lock().await.player.current_index(), Some(2));
    }

    #[tokio::test]
    async fn delete_and_clear_keys() {
        let controller = controller(&["a", "b"]);
        controller.handle_key_event(press(KeyCode::Char('d'))).await.unwrap();
        assert_eq!(controller.model.lock().await.player.len(), 1);
        controller.handle_key_event(press(KeyCode::Char('c'))).await.unwrap();
        assert!(controller.model.lock().await.player.is_empty());
    }

    #[tokio::test]
    async fn prompt_swallows_keys_until_escape() {
        let controller = controller(&["a"]);
        controller.handle_key_event(press(KeyCode::Char('a'))).await.unwrap();
        controller.handle_key_event(press(KeyCode::Char('q'))).await.unwrap();
        {
            let model = controller.model.lock().await;
            assert!(!model.should_quit());
            assert_eq!(model.input_mode(), &InputMode::AddFiles { buffer: "q".into() });
        }
        controller.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        controller.handle_key_event(press(KeyCode::Char('q'))).await.unwrap();
        assert!(controller.model.lock().await.should_quit());
    }

    #[tokio::test]
    async fn help_popup_blocks_other_keys() {
        let controller = controller(&["a"]);
        controller.handle_key_event(press(KeyCode::Char('h'))).await.unwrap();
        controller.handle_key_event(press(KeyCode::Char('d'))).await.unwrap();
        assert_eq!(controller.model.lock().await.player.len(), 1);
        controller.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert!(!controller.model.lock().await.is_help_popup_open());
    }
}
