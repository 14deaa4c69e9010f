//! Now-playing bar

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::{PlaybackInfo, TrackStatus};

const KEY_HINTS: &str = " Space play/pause | N/P next/prev | A add | D delete | C clear | R refresh | H help ";

pub fn status_text(playback: &PlaybackInfo) -> String {
    match &playback.status {
        TrackStatus::Idle => "— no music —".to_string(),
        TrackStatus::Ended => "— finished —".to_string(),
        TrackStatus::Track(name) if playback.is_playing => format!("▶ {}", name),
        TrackStatus::Track(name) => format!("⏸ {}", name),
    }
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let color = if playback.is_playing { Color::Green } else { Color::White };
    let bar = Paragraph::new(status_text(playback))
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Now playing ")
                .title_bottom(Line::from(KEY_HINTS).right_aligned()),
        );
    frame.render_widget(bar, area);
}
