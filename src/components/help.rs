use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("q / Ctrl-c", "quit"),
            ("?", "toggle this help"),
            ("Tab", "switch pane"),
            ("r", "refresh now"),
        ],
    ),
    (
        "Files",
        &[
            ("j / \u{2193}", "next file"),
            ("k / \u{2191}", "previous file"),
            ("g / G", "first / last file"),
            ("Enter / l", "focus diff"),
        ],
    ),
    (
        "Diff",
        &[
            ("j / k", "scroll one line"),
            ("Ctrl-d / Ctrl-u", "half page down / up"),
            ("g / G", "top / bottom"),
            ("h / Esc", "focus files"),
        ],
    ),
];

pub fn render_help(frame: &mut Frame) {
    let theme = theme::current();
    let area = frame.area();

    let mut lines = Vec::new();
    for (title, keys) in SECTIONS {
        lines.push(Line::from(Span::styled(
            format!(" {title}"),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )));
        for (key, what) in keys.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("   {key:<17}"), Style::default().fg(theme.warning)),
                Span::styled(*what, Style::default().fg(theme.text)),
            ]));
        }
        lines.push(Line::default());
    }
    lines.pop();

    let width = 44.min(area.width.saturating_sub(2));
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    let popup = Rect::new(x, y, width, height);

    let block = Block::default()
        .title(" Keys ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
