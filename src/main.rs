mod audio;
mod config;
mod controller;
mod logging;
mod model;
mod services;
mod view;

use std::io;
use std::path::Path;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use clap::Parser;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use audio::{AudioBackend, AudioOutput, SilentOutput};
use config::Config;
use controller::AppController;
use model::{
    AppModel, AudioSource, Clock, Coordinator, FALLBACK_LOCATION, JsonFileStore, MusicPlayer,
    PrayerScheduler, SystemClock,
};
use services::{LocationResolver, PrayerTimesClient};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== chronodeck starting ===");

    // No output device is not fatal: the playlist and schedule still work
    let audio_backend = match AudioBackend::new() {
        Ok(backend) => Some(backend),
        Err(e) => {
            tracing::warn!(error = %e, "Audio unavailable, running silent");
            None
        }
    };

    let music: Box<dyn AudioOutput> = match &audio_backend {
        Some(backend) => Box::new(backend.channel("music")),
        None => Box::new(SilentOutput::holding()),
    };
    let alarm = alert_channel(audio_backend.as_ref(), "alarm", &config.alarm_sound);
    let adhan = alert_channel(audio_backend.as_ref(), "adhan", &config.adhan_sound);

    let store = JsonFileStore::new(&config.playlist_file);
    tracing::debug!(path = %store.path().display(), "Playlist storage");
    let mut player = MusicPlayer::new(music, Box::new(store));
    player.restore();
    if !config.no_autoplay && !player.is_empty() {
        player.play(0);
    }

    let app_model = AppModel::new(
        player,
        PrayerScheduler::new(config.pre_alarm()),
        Coordinator::new(alarm, adhan),
        FALLBACK_LOCATION,
    );
    let model = Arc::new(Mutex::new(app_model));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let prayer_times = PrayerTimesClient::new(config.api_base.clone(), config.method)?;
    let locator = LocationResolver::new(config.configured_location(), config.ip_lookup_url.clone())?;
    let controller = AppController::new(model.clone(), clock.clone(), prayer_times, locator);

    // Resolves the location, then fetches and arms today's schedule
    controller.spawn_refresh_location();

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller, clock).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    drop(audio_backend);
    tracing::info!("chronodeck shutting down");
    Ok(())
}

/// Build an alert channel with its sound preloaded, or a silent one if the sound is unusable.
fn alert_channel(backend: Option<&AudioBackend>, label: &'static str, sound: &Path) -> Box<dyn AudioOutput> {
    let source = AudioSource::Url(sound.display().to_string());
    let Some(backend) = backend else {
        return Box::new(SilentOutput::default());
    };

    let mut channel = backend.channel(label);
    match channel.load(&source) {
        Ok(()) => Box::new(channel),
        Err(e) => {
            tracing::warn!(channel = label, path = %sound.display(), error = %e, "Alert sound unavailable, using silence");
            Box::new(SilentOutput::default())
        }
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
    clock: Arc<dyn Clock>,
) -> io::Result<()> {
    loop {
        // Audio completion, due prayer events, notification expiry
        controller.tick().await;

        // Get current state
        let (playback, ui_state, prayer, location, should_quit) = {
            let model_guard = model.lock().await;
            (
                model_guard.get_playback_info(),
                model_guard.get_ui_state(),
                model_guard.prayer_display(clock.now()),
                model_guard.location(),
                model_guard.should_quit(),
            )
        };

        if should_quit {
            break;
        }

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state, &prayer, location);
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }
    }

    Ok(())
}
