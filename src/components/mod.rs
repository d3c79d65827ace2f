pub mod diff_view;
pub mod error;
pub mod file_list;
pub mod help;
pub mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::state::AppState;
use crate::theme;

/// Trait for renderable TUI components.
pub trait Component {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);
}

/// Screen regions of the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneLayout {
    pub files: Rect,
    pub diff: Rect,
    pub status: Rect,
}

impl PaneLayout {
    pub fn new(area: Rect) -> Self {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let list_width = (area.width / 4).clamp(20, 35).min(area.width);
        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(list_width), Constraint::Min(0)])
            .split(outer[0]);

        Self {
            files: main[0],
            diff: main[1],
            status: outer[1],
        }
    }

    /// Text area of the diff pane, inside its border.
    pub fn diff_inner(&self) -> Rect {
        Block::default().borders(Borders::ALL).inner(self.diff)
    }

    pub fn files_inner(&self) -> Rect {
        Block::default().borders(Borders::ALL).inner(self.files)
    }
}

/// Bordered pane, highlighted when it has focus.
pub fn pane_block<'a>(title: String, focused: bool) -> Block<'a> {
    let theme = theme::current();
    let border = if focused { theme.accent } else { theme.border };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}
