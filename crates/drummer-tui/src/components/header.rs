//! Header component: 2-row top bar with the app title, tagline and the
//! backend version. Not focusable.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    component::Component,
    core::LibraryCore,
    theme::{C_ACCENT, C_BUSY, C_MUTED, C_SECONDARY},
};

pub const TITLE: &str = "Drummer";
pub const TAGLINE: &str = "Upload your favorite songs and practice without drums";

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Header
    }

    fn handle_key(&mut self, _key: KeyEvent, _core: &LibraryCore) -> Vec<Action> {
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, core: &LibraryCore) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let mut title = vec![
            Span::styled(
                format!(" {} ", TITLE),
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} songs", core.catalog().len()),
                Style::default().fg(C_MUTED),
            ),
        ];
        if let Some(job) = core.job() {
            title.push(Span::styled(
                format!("  ● {}", job.label),
                Style::default().fg(C_BUSY),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(title)), rows[0]);

        let version = core
            .backend_version()
            .map(|v| format!("v{} ", v))
            .unwrap_or_default();
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(version.chars().count() as u16),
            ])
            .split(rows[1]);
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", TAGLINE),
                Style::default().fg(C_SECONDARY),
            )),
            halves[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(version, Style::default().fg(C_MUTED))),
            halves[1],
        );
    }

    fn min_height(&self) -> u16 {
        2
    }
}
