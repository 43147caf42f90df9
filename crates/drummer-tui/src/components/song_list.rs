//! Song list: the catalog as a two-column list with inline rename and a
//! delete confirmation prompt on the selected row.

use drummer_proto::protocol::{DownloadVariant, Song, SongId};
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::{
    action::{Action, ComponentId},
    component::Component,
    components::upload_panel::dropped_path,
    core::LibraryCore,
    theme::{
        style_default, style_muted, style_secondary, style_selected, style_selected_focused,
        C_ACCENT, C_BUSY, C_MUTED, C_PROGRESS,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        text_input::{InputAction, TextInput},
    },
};

pub const EMPTY_MESSAGE: &str = "No songs uploaded yet. Upload your first MP3 file above!";

const DATE_W: u16 = 16;

pub struct SongList {
    selected: usize,
    offset: usize,
    list_state: ListState,
    rename_input: TextInput,
}

impl SongList {
    pub fn new() -> Self {
        Self {
            selected: 0,
            offset: 0,
            list_state: ListState::default(),
            rename_input: TextInput::new("›", ""),
        }
    }

    pub fn selected_song<'a>(&self, core: &'a LibraryCore) -> Option<&'a Song> {
        core.songs().get(self.selected)
    }

    fn selected_id(&self, core: &LibraryCore) -> Option<SongId> {
        self.selected_song(core).map(|s| s.id.clone())
    }

    fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// A paste while the list has focus: rename text when editing,
    /// otherwise a dropped file.
    pub fn handle_paste(&mut self, text: &str, core: &LibraryCore) -> Vec<Action> {
        if core.editing().is_some() {
            self.rename_input.insert_str(text.trim());
            return vec![Action::DraftChanged(self.rename_input.text().to_string())];
        }
        if core.is_busy() {
            return Vec::new();
        }
        dropped_path(text)
            .map(|p| vec![Action::SubmitFile(p)])
            .unwrap_or_default()
    }

    fn row_item(
        &self,
        song: &Song,
        is_selected: bool,
        focused: bool,
        name_w: usize,
        core: &LibraryCore,
    ) -> ListItem<'static> {
        let base = match (is_selected, focused) {
            (true, true) => style_selected_focused(),
            (true, false) => style_selected(),
            _ => style_default(),
        };
        let marker = if is_selected { "▸ " } else { "  " };
        let mut spans = vec![
            Span::styled(marker, base.fg(C_ACCENT)),
            Span::styled(fit(&song.name, name_w), base),
            Span::styled(
                song.created_at.format("%Y-%m-%d %H:%M").to_string(),
                base.patch(style_secondary()),
            ),
        ];

        if core.pending_delete() == Some(song.id.as_str()) {
            spans.push(Span::styled(
                "  delete? y/n",
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            ));
        } else if core.is_deleting(&song.id) {
            spans.push(Span::styled("  deleting…", style_muted()));
        }
        for variant in [DownloadVariant::Processed, DownloadVariant::Original] {
            if core.is_downloading(&song.id, variant) {
                spans.push(Span::styled(
                    format!("  ↓ {}", variant.label()),
                    Style::default().fg(C_PROGRESS),
                ));
            }
        }
        ListItem::new(Line::from(spans))
    }
}

impl Default for SongList {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate or pad `s` to exactly `width` terminal cells.
fn fit(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    let budget = if total > width {
        width.saturating_sub(1)
    } else {
        width
    };
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    if total > width && width > 0 {
        out.push('…');
        used += 1;
    }
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

impl Component for SongList {
    fn id(&self) -> ComponentId {
        ComponentId::SongList
    }

    fn handle_key(&mut self, key: KeyEvent, core: &LibraryCore) -> Vec<Action> {
        if let Some(session) = core.editing() {
            // The draft is frozen until the save resolves.
            if session.saving {
                return match key.code {
                    KeyCode::Esc => vec![Action::CancelRename],
                    _ => Vec::new(),
                };
            }
            return match self.rename_input.handle_key(key) {
                InputAction::Submitted(_) => vec![Action::SaveRename],
                InputAction::Cancelled => vec![Action::CancelRename],
                InputAction::Changed(text) => vec![Action::DraftChanged(text)],
                InputAction::None => Vec::new(),
            };
        }

        let len = core.songs().len();
        self.clamp(len);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < len {
                    self.selected += 1;
                }
                Vec::new()
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.selected = 0;
                Vec::new()
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = len.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Char('r') => self
                .selected_id(core)
                .map(|id| vec![Action::StartRename(id)])
                .unwrap_or_default(),
            KeyCode::Char('d') | KeyCode::Delete => self
                .selected_id(core)
                .map(|id| vec![Action::RequestDelete(id)])
                .unwrap_or_default(),
            KeyCode::Char('D') => self
                .selected_id(core)
                .map(|id| vec![Action::Download(id, DownloadVariant::Processed)])
                .unwrap_or_default(),
            KeyCode::Char('O') => self
                .selected_id(core)
                .map(|id| vec![Action::Download(id, DownloadVariant::Original)])
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    fn on_action(&mut self, action: &Action, core: &LibraryCore) -> Vec<Action> {
        if let Action::StartRename(_) = action {
            if let Some(session) = core.editing() {
                self.rename_input.set_value(&session.draft);
            }
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, core: &LibraryCore) {
        let songs = core.songs();
        let count = format!("{}", songs.len());
        let badge = (!songs.is_empty()).then_some(Badge {
            text: &count,
            color: C_MUTED,
        });
        let block = pane_chrome("your songs", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        if songs.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {}", EMPTY_MESSAGE), style_muted())),
                inner,
            );
            return;
        }

        self.clamp(songs.len());
        let name_w = inner.width.saturating_sub(DATE_W + 4) as usize;

        let header = Line::from(vec![
            Span::raw("  "),
            Span::styled(fit("Name", name_w), style_secondary()),
            Span::styled("Upload Date", style_secondary()),
        ]);
        frame.render_widget(
            Paragraph::new(header),
            Rect {
                height: 1,
                ..inner
            },
        );

        let body = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        let visible = body.height as usize;
        if visible == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible {
            self.offset = self.selected + 1 - visible;
        }

        let items: Vec<ListItem> = songs
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(visible)
            .map(|(i, song)| self.row_item(song, i == self.selected, focused, name_w, core))
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default())
            .highlight_symbol("");
        self.list_state.select(Some(self.selected - self.offset));
        frame.render_stateful_widget(list, body, &mut self.list_state);

        // Inline rename field over the edited row's name column.
        if let Some(session) = core.editing() {
            let row = songs
                .iter()
                .position(|s| s.id == session.song_id)
                .filter(|&i| i >= self.offset && i < self.offset + visible);
            if let Some(i) = row {
                let field = Rect {
                    x: body.x + 2,
                    y: body.y + (i - self.offset) as u16,
                    width: name_w as u16,
                    height: 1,
                };
                frame.render_widget(ratatui::widgets::Clear, field);
                self.rename_input
                    .draw(frame, field, focused && !session.saving, session.saving);
                if session.saving {
                    let note = Rect {
                        x: field.x + field.width,
                        width: DATE_W.min(body.width.saturating_sub(field.width + 2)),
                        ..field
                    };
                    frame.render_widget(
                        Paragraph::new(Span::styled("saving…", Style::default().fg(C_BUSY))),
                        note,
                    );
                }
            }
        }
    }

    fn min_height(&self) -> u16 {
        4
    }
}
