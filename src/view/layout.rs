//! Header rendering (next prayer, countdown, location)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{Location, PrayerDisplay};
use super::utils::prayer_header_text;

pub fn render_header(frame: &mut Frame, area: Rect, prayer: &PrayerDisplay, location: Location) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Next prayer
            Constraint::Length(24), // Location
        ])
        .split(area);

    let (next, countdown) = prayer_header_text(prayer);
    let next_style = match prayer {
        PrayerDisplay::Next { .. } => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        PrayerDisplay::Loading => Style::default().fg(Color::DarkGray),
        PrayerDisplay::Unavailable => Style::default().fg(Color::Red),
    };

    let line = Line::from(vec![
        Span::styled(next, next_style),
        Span::raw("   "),
        Span::styled(countdown, Style::default().fg(Color::Yellow)),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Next prayer ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(header, chunks[0]);

    let location = Paragraph::new(format!("📍 {}", location))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Location "));
    frame.render_widget(location, chunks[1]);
}
