use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::git::types::{DiffLine, FileDiff, Hunk, LineKind};
use crate::highlight::{self, LineHighlighter};
use crate::theme;

const MIN_GUTTER_WIDTH: usize = 4;
const TAB: &str = "    ";

/// Width of the line-number column: wide enough for the largest number in
/// the diff, never narrower than four digits.
pub fn gutter_width(diff: &FileDiff) -> usize {
    let max = diff
        .hunks
        .iter()
        .flat_map(|h| &h.lines)
        .filter_map(DiffLine::display_lineno)
        .max()
        .unwrap_or(0);
    max.to_string().len().max(MIN_GUTTER_WIDTH)
}

/// Columns left for line content once the gutter and indicator are drawn.
pub fn content_width(diff: &FileDiff, width: u16) -> usize {
    (width as usize).saturating_sub(gutter_width(diff) + 3)
}

/// Render every hunk of `diff` into styled lines for a pane `width` columns
/// wide.
pub fn build_diff_lines(
    diff: &FileDiff,
    width: u16,
    highlighter: &dyn LineHighlighter,
) -> Vec<Line<'static>> {
    let gutter = gutter_width(diff);
    let fill_to = content_width(diff, width);

    let mut lines = Vec::new();
    for hunk in &diff.hunks {
        lines.push(hunk_header_line(hunk));
        lines.push(Line::default());
        for line in &hunk.lines {
            lines.push(diff_line(&diff.path, line, gutter, fill_to, highlighter));
        }
        lines.push(Line::default());
    }
    lines
}

fn hunk_header_line(hunk: &Hunk) -> Line<'static> {
    let style = Style::default()
        .fg(theme::current().diff_hunk_header_fg)
        .add_modifier(Modifier::BOLD);
    Line::from(Span::styled(hunk.header.clone(), style))
}

fn diff_line(
    path: &str,
    line: &DiffLine,
    gutter: usize,
    fill_to: usize,
    highlighter: &dyn LineHighlighter,
) -> Line<'static> {
    let theme = theme::current();
    let text = line.content.replace('\t', TAB);
    let background = highlight::line_background(line.kind);

    let gutter_span = Span::styled(
        format_lineno(line.display_lineno(), gutter),
        Style::default().fg(theme.line_number_fg),
    );

    let indicator_style = match line.kind {
        LineKind::Added => background.fg(theme.diff_add_fg),
        LineKind::Removed => background.fg(theme.diff_del_fg),
        LineKind::Context => Style::default().fg(theme.text_muted),
    };
    let indicator = Span::styled(line.kind.indicator(), indicator_style);

    let content = match highlighter.render(path, &text, line.kind) {
        Ok(spans) => spans,
        Err(e) => {
            tracing::debug!(path, "plain rendering: {e:#}");
            vec![highlight::plain(&text, line.kind)]
        }
    };

    let mut spans = Vec::with_capacity(content.len() + 4);
    spans.push(gutter_span);
    spans.push(Span::raw(" "));
    spans.push(indicator);
    spans.push(Span::styled(" ", background));
    spans.extend(content);

    if line.kind != LineKind::Context {
        let used: usize = spans[4..].iter().map(Span::width).sum();
        if used < fill_to {
            spans.push(Span::styled(" ".repeat(fill_to - used), background));
        }
    }
    Line::from(spans)
}

fn format_lineno(lineno: Option<u32>, width: usize) -> String {
    match lineno {
        Some(n) => format!("{n:>width$}"),
        None => " ".repeat(width),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::git::parse::{parse_unified_diff, synthesize_new_file};
    use anyhow::{anyhow, Result};
    use pretty_assertions::assert_eq;

    /// Highlighter that always fails, forcing the plain path.
    pub struct FailingHighlighter;

    impl LineHighlighter for FailingHighlighter {
        fn render(&self, _: &str, _: &str, _: LineKind) -> Result<Vec<Span<'static>>> {
            Err(anyhow!("no grammar"))
        }
    }

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    const RAW: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -8,2 +8,2 @@ fn main() {
 keep
-old
+new
";

    #[test]
    fn test_layout_of_a_hunk() {
        let diff = parse_unified_diff(RAW, "src/lib.rs", false);
        let lines = build_diff_lines(&diff, 40, &FailingHighlighter);
        let rendered: Vec<String> = lines.iter().map(text_of).collect();

        assert_eq!(rendered.len(), 6);
        assert_eq!(rendered[0], "@@ -8,2 +8,2 @@ fn main() {");
        assert_eq!(rendered[1], "");
        assert_eq!(rendered[2], "   8   keep");
        assert!(rendered[3].starts_with("   9 - old"));
        assert!(rendered[4].starts_with("   9 + new"));
        assert_eq!(rendered[5], "");
    }

    #[test]
    fn test_changed_lines_fill_the_width() {
        let diff = parse_unified_diff(RAW, "src/lib.rs", false);
        let lines = build_diff_lines(&diff, 40, &FailingHighlighter);
        let bg = theme::current().diff_del_bg;

        assert_eq!(lines[3].width(), 40);
        assert_eq!(lines[3].spans.last().map(|s| s.style.bg), Some(Some(bg)));
        // Context lines are not padded.
        assert_eq!(lines[2].width(), "   8   keep".len());
    }

    #[test]
    fn test_hunk_header_is_bold() {
        let diff = parse_unified_diff(RAW, "src/lib.rs", false);
        let lines = build_diff_lines(&diff, 40, &FailingHighlighter);
        let style = lines[0].spans[0].style;
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(style.fg, Some(theme::current().diff_hunk_header_fg));
    }

    #[test]
    fn test_fallback_keeps_text_unmodified() {
        let diff = synthesize_new_file("x.unknown", false, Some("a <b> & c\n"));
        let lines = build_diff_lines(&diff, 10, &FailingHighlighter);
        assert!(text_of(&lines[2]).starts_with("   1 + a <b> & c"));
        let content = &lines[2].spans[4];
        assert_eq!(content.style.fg, Some(theme::current().diff_add_fg));
    }

    #[test]
    fn test_gutter_grows_with_line_numbers() {
        let raw = "@@ -99998,1 +99998,2 @@\n x\n+y\n";
        let diff = parse_unified_diff(raw, "big.rs", false);
        assert_eq!(gutter_width(&diff), 5);
        let lines = build_diff_lines(&diff, 30, &FailingHighlighter);
        assert!(text_of(&lines[3]).starts_with("99999 + y"));
    }

    #[test]
    fn test_empty_diff_renders_nothing() {
        let diff = FileDiff::empty("a.rs", true);
        assert!(build_diff_lines(&diff, 80, &FailingHighlighter).is_empty());
    }
}
