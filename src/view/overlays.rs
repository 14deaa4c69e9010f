//! Overlay rendering (notification, help popup, add-files prompt)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::{NoticeLevel, UiState};

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn notification_style(level: NoticeLevel) -> (Color, &'static str) {
    match level {
        NoticeLevel::Info => (Color::Cyan, " Info "),
        NoticeLevel::Reminder => (Color::Yellow, " ⏰ Reminder (Esc to dismiss) "),
        NoticeLevel::Prayer => (Color::Yellow, " 🕌 Prayer time (Esc to dismiss) "),
        NoticeLevel::Error => (Color::Red, " Error (Esc to dismiss) "),
    }
}

pub fn render_notification(frame: &mut Frame, ui_state: &UiState) {
    let Some(ref notification) = ui_state.notification else {
        return;
    };
    let area = frame.area();

    let popup_width = 52.min(area.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(4).max(1) as usize;

    // Wrapped line count of the message
    let line_count = notification.message.chars().count().div_ceil(inner_width) as u16;
    let popup_height = (2 + line_count.max(1)).min(area.height.saturating_sub(4));

    let popup_area = centered(area, popup_width, popup_height);
    frame.render_widget(Clear, popup_area);

    let (color, title) = notification_style(notification.level);

    let widget = Paragraph::new(notification.message.clone())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title)
                .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(widget, popup_area);
}

pub fn render_add_files_prompt(frame: &mut Frame, buffer: &str) {
    let area = frame.area();
    let popup_area = centered(area, 70.min(area.width.saturating_sub(4)), 3);

    frame.render_widget(Clear, popup_area);

    let line = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(buffer.to_string()),
        Span::styled("█", Style::default().fg(Color::Green)),
    ]);

    let prompt = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Add files (space separated, quote paths with spaces; Enter/Esc) ")
            .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(prompt, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    let keybindings = vec![
        ("", "── Playlist ──"),
        ("↑ / ↓  (k / j)", "Move selection"),
        ("Enter", "Play selected track"),
        ("A", "Add audio files"),
        ("D / Delete", "Delete selected track"),
        ("C", "Clear playlist"),
        ("", ""),
        ("", "── Playback ──"),
        ("Space", "Play / Pause"),
        ("N", "Next track"),
        ("P", "Previous track"),
        ("", ""),
        ("", "── Prayer times ──"),
        ("R", "Refresh location and schedule"),
        ("", ""),
        ("", "── General ──"),
        ("Esc", "Dismiss notification"),
        ("H", "Toggle this help"),
        ("Q / Ctrl+C", "Quit"),
    ];

    let popup_height = (keybindings.len() as u16 + 2).min(area.height.saturating_sub(4));
    let popup_area = centered(area, 62, popup_height);

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
