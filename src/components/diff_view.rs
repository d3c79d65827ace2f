use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::state::{AppState, FocusPanel};
use crate::theme;

use super::{pane_block, Component};

pub struct DiffView;

impl Component for DiffView {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = theme::current();
        let focused = state.focus == FocusPanel::Diff;
        let viewport = &state.viewport;

        let Some(diff) = viewport.diff() else {
            let msg = if state.files.is_empty() {
                " No changes"
            } else {
                " Loading diff..."
            };
            let paragraph = Paragraph::new(msg)
                .style(Style::default().fg(theme.text_muted))
                .block(pane_block(" Diff ".to_string(), focused));
            frame.render_widget(paragraph, area);
            return;
        };

        let side = if diff.staged { " (staged)" } else { "" };
        let title = format!(
            " {}{side}  +{} -{} ",
            diff.path,
            diff.additions(),
            diff.deletions()
        );
        let mut block = pane_block(title, focused);

        let total = viewport.total_lines();
        let height = area.height.saturating_sub(2) as usize;
        if total > height {
            let info = format!(" {}/{} ", viewport.offset() + 1, total.saturating_sub(height) + 1);
            block = block.title_bottom(Line::from(info).right_aligned());
        }

        if diff.hunks.is_empty() {
            let paragraph = Paragraph::new(" No textual changes")
                .style(
                    Style::default()
                        .fg(theme.text_muted)
                        .add_modifier(Modifier::ITALIC),
                )
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let paragraph = Paragraph::new(viewport.visible_lines().to_vec()).block(block);
        frame.render_widget(paragraph, area);
    }
}
