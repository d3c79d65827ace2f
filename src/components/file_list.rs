use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::{AppState, FocusPanel, Group, ListRow};
use crate::theme;

use super::{pane_block, Component};

pub struct FileList;

/// First row shown for a list whose cursor is at `cursor` in a pane
/// `height` rows tall. Once the list scrolls, the cursor's group header is
/// kept on the top row while the cursor is within `height` rows of it.
/// Mouse hit-testing uses the same value.
pub fn scroll_offset(rows: &[ListRow], cursor: Option<usize>, height: usize) -> usize {
    let Some(c) = cursor else {
        return 0;
    };
    if height == 0 || c < height {
        return 0;
    }
    let header = rows
        .get(..=c)
        .and_then(|above| above.iter().rposition(|r| matches!(r, ListRow::Header(_))));
    match header {
        Some(h) if c - h < height => h,
        _ => c + 1 - height,
    }
}

impl Component for FileList {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = theme::current();
        let focused = state.focus == FocusPanel::FileList;
        let files = &state.files;

        let block = pane_block(format!(" Files ({}) ", files.entry_count()), focused);

        if files.rows().is_empty() {
            let msg = if state.last_refresh.is_some() {
                " Working tree clean"
            } else {
                " Loading..."
            };
            let paragraph = Paragraph::new(msg)
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(2) as usize;
        let scroll = scroll_offset(files.rows(), files.cursor(), inner_height);

        let lines: Vec<Line> = files
            .rows()
            .iter()
            .enumerate()
            .skip(scroll)
            .take(inner_height)
            .map(|(i, row)| match row {
                ListRow::Header(group) => {
                    let color = match group {
                        Group::Staged => theme.staged,
                        Group::Unstaged => theme.unstaged,
                        Group::Untracked => theme.untracked,
                    };
                    Line::from(Span::styled(
                        format!(" {} ({})", group.title(), files.group_len(*group)),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ))
                }
                ListRow::Entry(entry) => {
                    let selected = files.cursor() == Some(i);
                    let style = if selected && focused {
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD)
                            .bg(theme.selection_bg)
                    } else if selected {
                        Style::default().fg(theme.text).bg(theme.selection_inactive_bg)
                    } else {
                        Style::default().fg(theme.text)
                    };
                    let marker = if selected { "\u{25b6}" } else { " " };
                    let badge = Span::styled(
                        format!("{} ", entry.status.label()),
                        style.fg(theme.status_color(entry.status)),
                    );
                    // "▶ " + badge
                    let path = truncate_left(&entry.path, inner_width.saturating_sub(4));
                    Line::from(vec![
                        Span::styled(format!("{marker} "), style),
                        badge,
                        Span::styled(path, style),
                    ])
                }
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Keep the end of `path` (the file name) when it does not fit in `width`.
fn truncate_left(path: &str, width: usize) -> String {
    let count = path.chars().count();
    if count <= width || width < 2 {
        return path.to_string();
    }
    let tail: String = path.chars().skip(count - (width - 1)).collect();
    format!("\u{2026}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::types::{ChangeEntry, FileStatus};
    use crate::state::FileListState;

    /// `staged` staged entries followed by `unstaged` unstaged ones.
    fn rows(staged: usize, unstaged: usize) -> Vec<ListRow> {
        let entry = |i: usize, staged: bool| ChangeEntry {
            path: format!("f{i}.rs"),
            status: FileStatus::Modified,
            staged,
            unversioned: false,
        };
        let mut files = FileListState::new();
        files.replace(
            (0..staged)
                .map(|i| entry(i, true))
                .chain((0..unstaged).map(|i| entry(staged + i, false)))
                .collect(),
        );
        files.rows().to_vec()
    }

    #[test]
    fn test_scroll_keeps_cursor_visible() {
        let rows = rows(30, 0);
        assert_eq!(scroll_offset(&rows, None, 10), 0);
        assert_eq!(scroll_offset(&rows, Some(9), 10), 0);
        assert_eq!(scroll_offset(&rows, Some(10), 10), 1);
        assert_eq!(scroll_offset(&rows, Some(25), 10), 16);
        assert_eq!(scroll_offset(&rows, Some(3), 0), 0);
    }

    #[test]
    fn test_scroll_shows_group_header_of_cursor() {
        // STAGED at 0, entries 1..=5, UNSTAGED at 6, entries 7..=26.
        let rows = rows(5, 20);
        assert_eq!(scroll_offset(&rows, Some(10), 10), 6);
        assert_eq!(scroll_offset(&rows, Some(15), 10), 6);
        // Cursor too far below its header for both to fit.
        assert_eq!(scroll_offset(&rows, Some(16), 10), 7);
    }

    #[test]
    fn test_truncate_left_keeps_file_name() {
        assert_eq!(truncate_left("src/main.rs", 20), "src/main.rs");
        assert_eq!(truncate_left("src/deeply/nested/main.rs", 10), "\u{2026}d/main.rs");
    }
}
