//! Palette for the drummer TUI: warm greys with a snare-red accent.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(16, 14, 14);
pub const C_ACCENT: Color = Color::Rgb(232, 86, 60);
pub const C_PROGRESS: Color = Color::Rgb(96, 196, 140);
pub const C_BUSY: Color = Color::Rgb(240, 176, 64);
pub const C_MUTED: Color = Color::Rgb(84, 76, 76);
pub const C_SECONDARY: Color = Color::Rgb(140, 128, 124);
pub const C_PRIMARY: Color = Color::Rgb(226, 218, 210);
pub const C_SELECTION_BG: Color = Color::Rgb(38, 30, 30);
pub const C_PANEL_BORDER: Color = Color::Rgb(52, 44, 44);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(232, 86, 60);
pub const C_INPUT_BG: Color = Color::Rgb(26, 22, 22);
pub const C_INPUT_FG: Color = Color::Rgb(240, 200, 120);
pub const C_TOAST_INFO: Color = Color::Rgb(110, 160, 210);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(96, 196, 140);
pub const C_TOAST_ERROR: Color = Color::Rgb(232, 86, 60);
pub const C_MODE_NORMAL: Color = Color::Rgb(140, 128, 124);
pub const C_MODE_EDIT: Color = Color::Rgb(240, 176, 64);
pub const C_MODE_CONFIRM: Color = Color::Rgb(232, 86, 60);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_selected_focused() -> Style {
    Style::default()
        .bg(C_SELECTION_BG)
        .fg(C_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn style_selected() -> Style {
    Style::default().bg(C_SELECTION_BG).fg(C_PRIMARY)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}
