//! App: terminal event loop around `LibraryCore`.
//!
//! - `App` owns the core and every component.
//! - Terminal events arrive from a blocking reader task; core events arrive
//!   on the channel the core's background tasks send into.
//! - Components return `Vec<Action>`; the App applies each one to the core
//!   and then lets components sync their view state.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    action::{Action, ComponentId},
    component::Component,
    components::{header::Header, song_list::SongList, upload_panel::UploadPanel},
    core::{CoreEvent, LibraryCore},
    focus::FocusRing,
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast,
    },
};

/// Max core events applied between two frames.
const MAX_DRAIN: usize = 256;

pub struct App {
    core: LibraryCore,
    header: Header,
    upload: UploadPanel,
    songs: SongList,
    focus: FocusRing,
    should_quit: bool,
}

impl App {
    pub fn new(core: LibraryCore) -> Self {
        let mut focus = FocusRing::new(vec![ComponentId::UploadPanel, ComponentId::SongList]);
        focus.set(ComponentId::SongList);
        Self {
            core,
            header: Header::new(),
            upload: UploadPanel::new(),
            songs: SongList::new(),
            focus,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self, mut core_rx: mpsc::Receiver<CoreEvent>) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        // ── Background task: keyboard/paste events ────────────────────────────
        let (term_tx, mut term_rx) = mpsc::channel::<Event>(256);
        tokio::task::spawn_blocking(move || loop {
            if term_tx.is_closed() {
                break;
            }
            match event::poll(Duration::from_millis(250)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if term_tx.blocking_send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        });

        self.core.start();

        // Redraw once a second while a job runs so its elapsed time moves.
        let mut ui_tick = tokio::time::interval(Duration::from_secs(1));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(ev) = term_rx.recv() => {
                    needs_redraw = self.handle_terminal_event(ev);
                }
                Some(ev) = core_rx.recv() => {
                    let mut redraw = self.core.handle_event(ev);
                    let mut drained = 0usize;
                    while drained < MAX_DRAIN {
                        let Ok(next) = core_rx.try_recv() else {
                            break;
                        };
                        redraw |= self.core.handle_event(next);
                        drained += 1;
                    }
                    if self.core.take_url_cleared() {
                        self.upload.clear_url();
                    }
                    needs_redraw = redraw;
                }
                _ = ui_tick.tick() => {
                    needs_redraw = self.core.is_busy();
                }
                else => break,
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        info!("shutting down");
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn handle_terminal_event(&mut self, ev: Event) -> bool {
        let actions = match ev {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Paste(text) => self.handle_paste(&text),
            Event::Resize(..) => return true,
            _ => return false,
        };
        for action in actions {
            self.dispatch(action);
        }
        true
    }

    fn input_mode(&self) -> InputMode {
        if self.core.pending_delete().is_some() {
            return InputMode::Confirm;
        }
        match self.focus.current() {
            Some(ComponentId::UploadPanel) => InputMode::Editing,
            Some(ComponentId::SongList) if self.core.editing().is_some() => InputMode::Editing,
            _ => InputMode::Normal,
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        let mode = self.input_mode();
        if mode == InputMode::Confirm {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    vec![Action::ConfirmDelete]
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    vec![Action::CancelDelete]
                }
                _ => Vec::new(),
            };
        }

        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            _ => {}
        }

        if mode == InputMode::Normal {
            match key.code {
                KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => {
                    return vec![Action::Quit];
                }
                KeyCode::Esc if self.core.notification().is_some() => {
                    return vec![Action::DismissNotification];
                }
                _ => {}
            }
        }

        match self.focus.current() {
            Some(ComponentId::UploadPanel) => self.upload.handle_key(key, &self.core),
            Some(ComponentId::SongList) => self.songs.handle_key(key, &self.core),
            _ => Vec::new(),
        }
    }

    fn handle_paste(&mut self, text: &str) -> Vec<Action> {
        if self.input_mode() == InputMode::Confirm {
            return Vec::new();
        }
        match self.focus.current() {
            Some(ComponentId::UploadPanel) => self.upload.handle_paste(text, &self.core),
            Some(ComponentId::SongList) => self.songs.handle_paste(text, &self.core),
            _ => Vec::new(),
        }
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        self.apply_action(&action);

        let secondary: Vec<Action> = {
            let core = &self.core;
            let mut out = Vec::new();
            out.extend(self.upload.on_action(&action, core));
            out.extend(self.songs.on_action(&action, core));
            out
        };
        for a in secondary {
            self.apply_action(&a);
        }
    }

    fn apply_action(&mut self, action: &Action) {
        debug!("apply_action: {:?}", action);
        match action {
            Action::SubmitFile(path) => {
                let outcome = self.core.submit_file(path.clone());
                debug!("submit_file: {:?}", outcome);
            }
            Action::SubmitUrl(url) => {
                let outcome = self.core.submit_url(url);
                debug!("submit_url: {:?}", outcome);
            }
            Action::StartRename(id) => {
                self.core.start_rename(id);
            }
            Action::DraftChanged(text) => self.core.update_draft(text.clone()),
            Action::SaveRename => self.core.save_rename(),
            Action::CancelRename => self.core.cancel_rename(),
            Action::RequestDelete(id) => {
                self.core.request_delete(id);
            }
            Action::ConfirmDelete => self.core.confirm_delete(),
            Action::CancelDelete => self.core.cancel_delete(),
            Action::Download(id, variant) => {
                self.core.download(id, *variant);
            }
            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => self.focus.set(*id),
            Action::DismissNotification => self.core.dismiss_notification(),
            Action::Quit => self.should_quit = true,
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.header.min_height()),
                Constraint::Length(self.upload.min_height()),
                Constraint::Min(self.songs.min_height()),
                Constraint::Length(1),
            ])
            .split(area);

        let header_focused = self.focus.is_focused(self.header.id());
        self.header.draw(frame, outer[0], header_focused, &self.core);
        let upload_focused = self.focus.is_focused(self.upload.id());
        self.upload.draw(frame, outer[1], upload_focused, &self.core);
        let songs_focused = self.focus.is_focused(self.songs.id());
        self.songs.draw(frame, outer[2], songs_focused, &self.core);

        status_bar::draw_keys_bar(
            frame,
            outer[3],
            self.input_mode(),
            self.focus.current(),
            self.core.is_busy(),
        );

        // Topmost layer.
        toast::draw_toast(frame, area, self.core.notification());
    }
}
