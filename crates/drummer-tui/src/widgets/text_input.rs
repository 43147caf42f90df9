//! TextInput: single-line field on top of tui-input, used for the upload
//! path, the video URL, and inline rename.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input, InputRequest};

use crate::theme::{C_INPUT_BG, C_INPUT_FG, C_MUTED, C_SECONDARY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Changed(String),
    Submitted(String),
    Cancelled,
    None,
}

pub struct TextInput {
    input: Input,
    prompt: &'static str,
    placeholder: String,
}

impl TextInput {
    pub fn new(prompt: &'static str, placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            prompt,
            placeholder: placeholder.into(),
        }
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn is_empty(&self) -> bool {
        self.input.value().is_empty()
    }

    /// Insert pasted text at the cursor. Newlines are dropped.
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.input.handle(InputRequest::InsertChar(c));
        }
    }

    /// Enter submits, Esc cancels, anything else edits.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        match key.code {
            KeyCode::Enter => InputAction::Submitted(self.input.value().to_string()),
            KeyCode::Esc => InputAction::Cancelled,
            _ => match self.input.handle_event(&Event::Key(key)) {
                Some(change) if change.value => InputAction::Changed(self.input.value().to_string()),
                _ => InputAction::None,
            },
        }
    }

    /// Render `prompt value` into one row; the cursor is placed when `active`.
    pub fn draw(&self, frame: &mut Frame, area: Rect, active: bool, disabled: bool) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let prompt_w = self.prompt.chars().count() as u16 + 1;
        let text_w = area.width.saturating_sub(prompt_w + 1) as usize;
        let scroll = self.input.visual_scroll(text_w);
        let value = self.input.value();

        let prompt = Span::styled(format!("{} ", self.prompt), Style::default().fg(C_SECONDARY));
        let body = if value.is_empty() {
            Span::styled(self.placeholder.clone(), Style::default().fg(C_MUTED))
        } else {
            let shown: String = value.chars().skip(scroll).collect();
            let fg = if disabled { C_MUTED } else { C_INPUT_FG };
            Span::styled(shown, Style::default().fg(fg))
        };

        let bg = if active && !disabled {
            Style::default().bg(C_INPUT_BG)
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(Line::from(vec![prompt, body])).style(bg), area);

        if active && !disabled {
            let cursor_x = area.x + prompt_w + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_submit() {
        let mut input = TextInput::new("url", "https://…");
        assert_eq!(input.handle_key(key(KeyCode::Char('a'))), InputAction::Changed("a".into()));
        input.handle_key(key(KeyCode::Char('b')));
        assert_eq!(input.handle_key(key(KeyCode::Backspace)), InputAction::Changed("a".into()));
        assert_eq!(input.handle_key(key(KeyCode::Enter)), InputAction::Submitted("a".into()));
        assert_eq!(input.handle_key(key(KeyCode::Esc)), InputAction::Cancelled);
        // Esc leaves the text alone; callers decide.
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn test_insert_str_drops_newlines() {
        let mut input = TextInput::new("file", "");
        input.set_value("x");
        input.insert_str("y\nz\r\n");
        assert_eq!(input.text(), "xyz");
        input.clear();
        assert!(input.is_empty());
    }
}
