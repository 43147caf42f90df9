//! Component trait: the interface every UI panel implements.
//!
//! - Components own their view state (selection, text inputs) and render themselves.
//! - Library state is read from `LibraryCore`; components never mutate it.
//! - Components produce `Vec<Action>`; the App dispatches them to the core.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::core::LibraryCore;

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Handle a key event while this component has focus.
    fn handle_key(&mut self, key: KeyEvent, core: &LibraryCore) -> Vec<Action>;

    /// Called after the App has applied `action` to the core, so components
    /// can sync their view state with it.
    fn on_action(&mut self, _action: &Action, _core: &LibraryCore) -> Vec<Action> {
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, core: &LibraryCore);

    /// The minimum height required to render meaningfully.
    fn min_height(&self) -> u16 {
        3
    }
}
