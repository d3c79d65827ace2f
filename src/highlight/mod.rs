pub mod engine;
pub mod languages;
pub mod theme;

use anyhow::Result;
use ratatui::style::Style;
use ratatui::text::Span;

use crate::git::types::LineKind;

pub use engine::HighlightEngine;

/// Turns one line of diff content into styled spans.
pub trait LineHighlighter {
    fn render(&self, path: &str, content: &str, kind: LineKind) -> Result<Vec<Span<'static>>>;
}

/// Background shared by every span of an added or removed line.
pub fn line_background(kind: LineKind) -> Style {
    let theme = crate::theme::current();
    match kind {
        LineKind::Added => Style::default().bg(theme.diff_add_bg),
        LineKind::Removed => Style::default().bg(theme.diff_del_bg),
        LineKind::Context => Style::default(),
    }
}

/// Untokenized rendering: the whole line tinted by its kind.
pub fn plain(content: &str, kind: LineKind) -> Span<'static> {
    let theme = crate::theme::current();
    let fg = match kind {
        LineKind::Added => theme.diff_add_fg,
        LineKind::Removed => theme.diff_del_fg,
        LineKind::Context => theme.diff_context_fg,
    };
    Span::styled(content.to_string(), line_background(kind).fg(fg))
}
