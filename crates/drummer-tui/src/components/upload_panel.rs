//! Upload panel: a file-path field, a video-URL field, and the progress of
//! the running submission.
//!
//! Terminals deliver a drag-and-dropped file as a bracketed paste of its
//! path, so a paste into the file field submits straight away.

use std::path::PathBuf;

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    component::Component,
    core::LibraryCore,
    submit::JobKind,
    theme::{C_BUSY, C_MUTED, C_SECONDARY},
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        progress_bar::draw_progress,
        text_input::{InputAction, TextInput},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    File,
    Url,
}

pub struct UploadPanel {
    file_input: TextInput,
    url_input: TextInput,
    field: Field,
}

impl UploadPanel {
    pub fn new() -> Self {
        Self {
            file_input: TextInput::new("MP3 file ", "drop a file here or type its path"),
            url_input: TextInput::new("YouTube ", "https://www.youtube.com/watch?v=…"),
            field: Field::File,
        }
    }

    pub fn clear_url(&mut self) {
        self.url_input.clear();
    }

    fn input_mut(&mut self) -> &mut TextInput {
        match self.field {
            Field::File => &mut self.file_input,
            Field::Url => &mut self.url_input,
        }
    }

    /// A paste while this panel has focus.
    pub fn handle_paste(&mut self, text: &str, core: &LibraryCore) -> Vec<Action> {
        if core.is_busy() {
            return Vec::new();
        }
        match self.field {
            Field::File => dropped_path(text)
                .map(|p| vec![Action::SubmitFile(p)])
                .unwrap_or_default(),
            Field::Url => {
                self.url_input.insert_str(text.trim());
                Vec::new()
            }
        }
    }
}

impl Default for UploadPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn pasted text into a file path: first non-empty line, surrounding
/// quotes and a `file://` prefix removed, `\ ` unescaped.
pub fn dropped_path(text: &str) -> Option<PathBuf> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let unquoted = ['\'', '"']
        .iter()
        .find_map(|q| {
            line.strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(line);
    let path = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    let path = path.replace("\\ ", " ");
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

impl Component for UploadPanel {
    fn id(&self) -> ComponentId {
        ComponentId::UploadPanel
    }

    fn handle_key(&mut self, key: KeyEvent, core: &LibraryCore) -> Vec<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.field = match self.field {
                    Field::File => Field::Url,
                    Field::Url => Field::File,
                };
                return Vec::new();
            }
            _ => {}
        }
        // Disabled while a submission runs.
        if core.is_busy() {
            return Vec::new();
        }

        let field = self.field;
        match self.input_mut().handle_key(key) {
            InputAction::Submitted(text) => match field {
                Field::File => dropped_path(&text)
                    .map(|p| vec![Action::SubmitFile(p)])
                    .unwrap_or_default(),
                Field::Url => vec![Action::SubmitUrl(text)],
            },
            InputAction::Cancelled => {
                let input = self.input_mut();
                if input.is_empty() {
                    vec![Action::FocusPane(ComponentId::SongList)]
                } else {
                    input.clear();
                    Vec::new()
                }
            }
            InputAction::Changed(_) | InputAction::None => Vec::new(),
        }
    }

    fn on_action(&mut self, action: &Action, core: &LibraryCore) -> Vec<Action> {
        if let Action::SubmitFile(_) = action {
            if core.job().is_some_and(|j| j.kind == JobKind::File) {
                self.file_input.clear();
            }
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, core: &LibraryCore) {
        let busy = core.is_busy();
        let badge = busy.then_some(Badge {
            text: "Processing...",
            color: C_BUSY,
        });
        let block = pane_chrome("upload", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let hint = if busy {
            Span::styled(
                "Processing...",
                Style::default().fg(C_BUSY).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                "Drag and drop an MP3 file here, or paste a YouTube link",
                Style::default().fg(C_SECONDARY),
            )
        };
        frame.render_widget(Paragraph::new(hint), rows[0]);

        self.file_input
            .draw(frame, rows[1], focused && self.field == Field::File, busy);
        self.url_input
            .draw(frame, rows[2], focused && self.field == Field::Url, busy);

        match core.job() {
            Some(job) => draw_progress(
                frame,
                rows[3],
                job.progress(),
                job.phase(),
                Some(job.elapsed()),
            ),
            None => frame.render_widget(
                Paragraph::new(Span::styled("idle", Style::default().fg(C_MUTED))),
                rows[3],
            ),
        }
    }

    fn min_height(&self) -> u16 {
        6
    }
}
