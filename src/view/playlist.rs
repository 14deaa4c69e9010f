//! Playlist panel rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

use crate::model::{PlaybackInfo, UiState};
use super::utils::truncate_string;

pub fn render_playlist(frame: &mut Frame, area: Rect, playback: &PlaybackInfo, ui_state: &UiState) {
    let title = format!(" Playlist ({}) ", playback.track_names.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Green));

    if playback.track_names.is_empty() {
        let empty = Paragraph::new("Playlist is empty. Press A to add files.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let name_width = area.width.saturating_sub(10) as usize;
    let items: Vec<ListItem> = playback
        .track_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let is_current = playback.current_index == Some(i);
            let marker = match (is_current, playback.is_playing) {
                (true, true) => "▶",
                (true, false) => "⏸",
                _ => " ",
            };
            let text = format!("{} {:>3}. {}", marker, i + 1, truncate_string(name, name_width));

            let style = if i == ui_state.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(ui_state.selected));

    frame.render_stateful_widget(list, area, &mut list_state);
}
