// Centralized theme for the messaging panel

use ratatui::style::{Color, Modifier, Style};

/// App background
pub const BG_APP: Color = Color::Rgb(0, 0, 0);

/// Panel background - subtle lift from the page
pub const BG_PANEL: Color = Color::Rgb(18, 18, 18);

/// Selected row background
pub const BG_SELECTED: Color = Color::Rgb(32, 32, 32);

/// Outgoing message bubble
pub const BG_MINE: Color = Color::Rgb(28, 40, 52);

/// Composer background
pub const BG_INPUT: Color = Color::Rgb(23, 23, 23);

pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 220);
pub const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);
pub const TEXT_DIM: Color = Color::Rgb(90, 90, 90);

/// Primary accent - muted teal, the site's brand colour
pub const ACCENT_PRIMARY: Color = Color::Rgb(78, 154, 154);
pub const ACCENT_SUCCESS: Color = Color::Rgb(106, 153, 85);
pub const ACCENT_ERROR: Color = Color::Rgb(244, 112, 112);

/// Unread badge
pub const ACCENT_BADGE: Color = Color::Rgb(206, 145, 120);

pub const BORDER_ACTIVE: Color = Color::Rgb(100, 100, 100);
pub const BORDER_INACTIVE: Color = Color::Rgb(60, 60, 60);

pub fn text_primary() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn text_dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn title() -> Style {
    Style::default()
        .fg(ACCENT_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn badge() -> Style {
    Style::default()
        .fg(BG_APP)
        .bg(ACCENT_BADGE)
        .add_modifier(Modifier::BOLD)
}

pub fn error() -> Style {
    Style::default().fg(ACCENT_ERROR)
}

pub fn selected() -> Style {
    Style::default().bg(BG_SELECTED)
}
