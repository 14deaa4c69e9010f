//! Utility functions for rendering UI components

use crate::model::PrayerDisplay;

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Countdown as shown in the header, e.g. `2h 54m`
pub fn format_countdown(hours: i64, minutes: i64) -> String {
    format!("{}h {}m", hours, minutes)
}

/// Left and right halves of the header line
pub fn prayer_header_text(prayer: &PrayerDisplay) -> (String, String) {
    match prayer {
        PrayerDisplay::Loading => ("loading schedule...".to_string(), String::new()),
        PrayerDisplay::Unavailable => ("schedule unavailable".to_string(), String::new()),
        PrayerDisplay::Next { name, at, hours, minutes } => (
            format!("{} • {}", name, at.format("%H:%M")),
            format_countdown(*hours, *minutes),
        ),
    }
}
