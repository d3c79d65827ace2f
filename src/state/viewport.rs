use ratatui::text::Line;

use crate::display::build_diff_lines;
use crate::git::types::FileDiff;
use crate::highlight::LineHighlighter;

/// The diff pane's model: the current diff, its rendered lines and the
/// scroll position over them.
pub struct ViewportState {
    highlighter: Box<dyn LineHighlighter>,
    diff: Option<FileDiff>,
    lines: Vec<Line<'static>>,
    offset: usize,
    width: u16,
    height: u16,
}

impl ViewportState {
    pub fn new(highlighter: Box<dyn LineHighlighter>) -> Self {
        Self {
            highlighter,
            diff: None,
            lines: Vec::new(),
            offset: 0,
            width: 0,
            height: 0,
        }
    }

    /// Show `diff`. A re-fetch of the file already on screen keeps the
    /// scroll position (clamped to the new length); any other file starts at
    /// the top.
    pub fn set_diff(&mut self, diff: Option<FileDiff>) {
        if self.diff == diff {
            return;
        }
        let same_file = match (&self.diff, &diff) {
            (Some(old), Some(new)) => old.identity() == new.identity(),
            _ => false,
        };
        self.diff = diff;
        self.rebuild();
        if same_file {
            self.clamp();
        } else {
            self.offset = 0;
        }
    }

    /// Resize the pane. Content is re-rendered only when the width changed.
    pub fn set_size(&mut self, width: u16, height: u16) {
        let rewrap = width != self.width;
        self.width = width;
        self.height = height;
        if rewrap {
            self.rebuild();
        }
        self.clamp();
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up(self.half_page());
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down(self.half_page());
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn diff(&self) -> Option<&FileDiff> {
        self.diff.as_ref()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    /// Lines currently inside the viewport.
    pub fn visible_lines(&self) -> &[Line<'static>] {
        let end = (self.offset + self.height as usize).min(self.lines.len());
        &self.lines[self.offset.min(end)..end]
    }

    fn rebuild(&mut self) {
        self.lines = match &self.diff {
            Some(diff) => build_diff_lines(diff, self.width, self.highlighter.as_ref()),
            None => Vec::new(),
        };
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height as usize)
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    fn half_page(&self) -> usize {
        (self.height as usize / 2).max(1)
    }
}
