use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::theme;

/// Full-screen replacement for the main view once a fetch has failed.
pub fn render_error(frame: &mut Frame, message: &str) {
    let theme = theme::current();
    let lines = vec![
        Line::default(),
        Line::from(vec![
            Span::styled(
                " Error: ",
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            ),
            Span::styled(message.to_string(), Style::default().fg(theme.text)),
        ]),
        Line::default(),
        Line::from(Span::styled(
            " Press q to quit",
            Style::default().fg(theme.text_muted),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        frame.area(),
    );
}
