use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use ratatui::style::Style;
use ratatui::text::Span;
use tree_sitter_highlight::{HighlightConfiguration, HighlightEvent, Highlighter};

use super::languages::{detect_language, LANGUAGES};
use super::theme::{style_for_highlight, HIGHLIGHT_NAMES};
use super::LineHighlighter;
use crate::git::types::LineKind;
use crate::theme;

/// Tree-sitter backed highlighter. Grammars are configured once up front;
/// each diff line is highlighted on its own with one reused `Highlighter`.
pub struct HighlightEngine {
    configs: HashMap<&'static str, HighlightConfiguration>,
    highlighter: RefCell<Highlighter>,
}

impl HighlightEngine {
    pub fn new() -> Self {
        let mut configs = HashMap::new();
        for entry in LANGUAGES {
            match entry.config(HIGHLIGHT_NAMES) {
                Ok(config) => {
                    configs.insert(entry.name, config);
                }
                Err(e) => tracing::warn!(language = entry.name, "grammar unavailable: {e}"),
            }
        }
        Self {
            configs,
            highlighter: RefCell::new(Highlighter::new()),
        }
    }
}

impl Default for HighlightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LineHighlighter for HighlightEngine {
    fn render(&self, path: &str, content: &str, kind: LineKind) -> Result<Vec<Span<'static>>> {
        let lang = detect_language(Path::new(path))
            .ok_or_else(|| anyhow!("no grammar for {path}"))?;
        let config = self
            .configs
            .get(lang)
            .ok_or_else(|| anyhow!("grammar {lang} failed to load"))?;

        let syntax = &theme::current().syntax;
        let base = super::line_background(kind);

        let mut highlighter = self.highlighter.borrow_mut();
        let events = highlighter
            .highlight(config, content.as_bytes(), None, |_| None)
            .map_err(|e| anyhow!("highlighting failed: {e:?}"))?;

        let mut spans = Vec::new();
        let mut stack: Vec<Style> = Vec::new();
        for event in events {
            match event.map_err(|e| anyhow!("highlighting failed: {e:?}"))? {
                HighlightEvent::Source { start, end } => {
                    let text = content
                        .get(start..end)
                        .ok_or_else(|| anyhow!("highlight range {start}..{end} off char boundary"))?;
                    if text.is_empty() {
                        continue;
                    }
                    let fg = stack
                        .last()
                        .copied()
                        .unwrap_or_else(|| Style::default().fg(syntax.default_fg));
                    spans.push(Span::styled(text.to_string(), base.patch(fg)));
                }
                HighlightEvent::HighlightStart(h) => stack.push(style_for_highlight(h.0, syntax)),
                HighlightEvent::HighlightEnd => {
                    stack.pop();
                }
            }
        }
        Ok(spans)
    }
}
