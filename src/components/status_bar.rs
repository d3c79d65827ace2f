use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::{AppState, FocusPanel, Group};
use crate::theme;

use super::Component;

pub struct StatusBar;

impl Component for StatusBar {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = theme::current();
        let bar = Style::default().bg(theme.surface);
        let muted = bar.fg(theme.text_muted);

        let mut left = vec![
            Span::styled(
                " hunkwatch ",
                Style::default()
                    .fg(theme.surface)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {} ", state.repo_label), bar.fg(theme.text)),
        ];
        for (group, color) in [
            (Group::Staged, theme.staged),
            (Group::Unstaged, theme.unstaged),
            (Group::Untracked, theme.untracked),
        ] {
            let n = state.files.group_len(group);
            if n > 0 {
                left.push(Span::styled(
                    format!(" {} {n}", group.title().to_lowercase()),
                    bar.fg(color),
                ));
            }
        }

        let pane = match state.focus {
            FocusPanel::FileList => "files",
            FocusPanel::Diff => "diff",
        };
        let updated = state
            .last_refresh
            .map(|t| format!("updated {}", t.format("%H:%M:%S")))
            .unwrap_or_else(|| "loading".to_string());
        let right = Line::from(vec![
            Span::styled(format!("[{pane}] "), muted),
            Span::styled(updated, muted),
            Span::styled("  ? help ", muted),
        ]);

        let right_width = right.width() as u16;
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(right_width)])
            .split(area);

        frame.render_widget(Paragraph::new(Line::from(left)).style(bar), cols[0]);
        frame.render_widget(Paragraph::new(right).style(bar), cols[1]);
    }
}
