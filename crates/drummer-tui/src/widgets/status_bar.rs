//! Status bar: bottom line with input mode and keybindings.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::ComponentId;
use crate::theme::{C_MODE_CONFIRM, C_MODE_EDIT, C_MODE_NORMAL, C_MUTED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Keys go to a text field.
    Editing,
    /// Waiting for y/n on a delete.
    Confirm,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Editing => "EDIT",
            Self::Confirm => "CONFIRM",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Editing => C_MODE_EDIT,
            Self::Confirm => C_MODE_CONFIRM,
        }
    }
}

pub fn key_hints(mode: InputMode, focused: Option<ComponentId>, busy: bool) -> &'static str {
    match (mode, focused) {
        (InputMode::Confirm, _) => " y delete  n/Esc keep",
        (InputMode::Editing, Some(ComponentId::SongList)) => " Enter save  Esc cancel",
        (InputMode::Editing, _) if busy => " processing…  Tab songs  Ctrl-C quit",
        (InputMode::Editing, _) => {
            " ↑↓ field  Enter submit  Esc clear  paste a file path to upload  Tab songs  Ctrl-C quit"
        }
        (InputMode::Normal, _) => {
            " ↑↓/jk select  r rename  d delete  D download  O original  Tab upload  q quit"
        }
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(
    frame: &mut Frame,
    area: Rect,
    mode: InputMode,
    focused: Option<ComponentId>,
    busy: bool,
) {
    let spans = vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(key_hints(mode, focused, busy), Style::default().fg(C_MUTED)),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
