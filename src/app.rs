use anyhow::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::Frame;
use std::sync::Arc;
use std::time::Duration;

use crate::action::Action;
use crate::components::{
    diff_view::DiffView, error::render_error, file_list, file_list::FileList, help::render_help,
    status_bar::StatusBar, Component, PaneLayout,
};
use crate::event::{map_key_to_action, Event, EventReader, KeyContext};
use crate::fetch::{DiffResult, FetchWorker, ListResult};
use crate::git::types::EntryKey;
use crate::git::ChangeSource;
use crate::state::{AppState, FocusPanel, ViewportState};
use crate::tui::Tui;

pub struct App {
    state: AppState,
    worker: FetchWorker,
    refresh_interval: Duration,
    layout: PaneLayout,
    /// Target of the most recent diff request; only its results are shown.
    requested: Option<EntryKey>,
    applied_list_seq: u64,
    applied_diff_seq: u64,
}

impl App {
    pub fn new(
        source: Arc<dyn ChangeSource>,
        events: &EventReader,
        viewport: ViewportState,
        refresh_interval: Duration,
    ) -> Self {
        let repo_label = source
            .root()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.root().display().to_string());

        Self {
            state: AppState::new(viewport, repo_label),
            worker: FetchWorker::new(source, events.sender()),
            refresh_interval,
            layout: PaneLayout::default(),
            requested: None,
            applied_list_seq: 0,
            applied_diff_seq: 0,
        }
    }

    pub async fn run(&mut self, terminal: &mut Tui, mut events: EventReader) -> Result<()> {
        events.start(self.refresh_interval);
        self.start();

        loop {
            let size = terminal.size()?;
            self.set_area(Rect::new(0, 0, size.width, size.height));
            terminal.draw(|frame| self.draw(frame))?;

            // Wait for at least one event, then drain whatever else is
            // queued so bursts of scroll input cost a single redraw.
            let Some(first) = events.next().await else {
                break;
            };
            self.handle_event(first);
            while let Some(event) = events.try_next() {
                self.handle_event(event);
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Render one frame using the geometry from the last `set_area`.
    pub fn draw(&self, frame: &mut Frame) {
        if let Some(ref message) = self.state.fatal_error {
            render_error(frame, message);
            return;
        }
        FileList.render(frame, self.layout.files, &self.state);
        DiffView.render(frame, self.layout.diff, &self.state);
        StatusBar.render(frame, self.layout.status, &self.state);
        if self.state.show_help {
            render_help(frame);
        }
    }

    /// Initial load: the file list only. Its completion pulls the first diff.
    pub fn start(&mut self) {
        self.worker.fetch_list();
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Recompute pane geometry for a terminal of `area` and resize the
    /// viewport to match.
    pub fn set_area(&mut self, area: Rect) {
        self.layout = PaneLayout::new(area);
        let inner = self.layout.diff_inner();
        self.state.viewport.set_size(inner.width, inner.height);
    }

    pub fn handle_event(&mut self, event: Event) {
        let action = match event {
            Event::FilesFetched(result) => return self.apply_list(result),
            Event::DiffFetched(result) => return self.apply_diff(result),
            Event::Key(key) => {
                let ctx = KeyContext {
                    focus: self.state.focus,
                    help_open: self.state.show_help,
                    failed: self.state.fatal_error.is_some(),
                };
                map_key_to_action(key, &ctx)
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize => Some(Action::Resize),
            Event::Tick => Some(Action::Tick),
        };
        if let Some(action) = action {
            self.update(action);
        }
    }

    fn update(&mut self, action: Action) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::Tick | Action::Refresh => self.refresh(),
            // Geometry is re-read from the terminal before every draw.
            Action::Resize => {}

            Action::SelectNext => self.navigate(|files| files.move_next()),
            Action::SelectPrevious => self.navigate(|files| files.move_previous()),
            Action::SelectFirst => self.navigate(|files| files.move_first()),
            Action::SelectLast => self.navigate(|files| files.move_last()),
            Action::SelectRow(row) => self.navigate(|files| files.select_row(row)),

            Action::ScrollUp => self.state.viewport.scroll_up(1),
            Action::ScrollDown => self.state.viewport.scroll_down(1),
            Action::HalfPageUp => self.state.viewport.half_page_up(),
            Action::HalfPageDown => self.state.viewport.half_page_down(),
            Action::ScrollTop => self.state.viewport.scroll_to_top(),
            Action::ScrollBottom => self.state.viewport.scroll_to_bottom(),

            Action::SwitchPane => self.state.focus = self.state.focus.toggle(),
            Action::FocusFileList => self.state.focus = FocusPanel::FileList,
            Action::FocusDiff => self.state.focus = FocusPanel::Diff,

            Action::ToggleHelp => self.state.show_help = !self.state.show_help,
        }
    }

    /// Periodic or manual refresh: re-list, and re-diff the current file.
    fn refresh(&mut self) {
        if self.state.fatal_error.is_some() {
            return;
        }
        self.worker.fetch_list();
        if let Some(key) = self.state.files.selected_key() {
            self.request_diff(key);
        }
    }

    fn navigate(&mut self, step: impl FnOnce(&mut crate::state::FileListState)) {
        let before = self.state.files.selected_key();
        step(&mut self.state.files);
        let after = self.state.files.selected_key();
        if after != before {
            self.fetch_if_new(after);
        }
    }

    fn fetch_if_new(&mut self, key: Option<EntryKey>) {
        if let Some(key) = key {
            if self.requested.as_ref() != Some(&key) {
                self.request_diff(key);
            }
        }
    }

    fn request_diff(&mut self, key: EntryKey) {
        if self.state.fatal_error.is_some() {
            return;
        }
        self.requested = Some(key.clone());
        self.worker.fetch_diff(key);
    }

    fn apply_list(&mut self, result: ListResult) {
        if self.state.fatal_error.is_some() {
            return;
        }
        if result.seq <= self.applied_list_seq {
            tracing::warn!(
                seq = result.seq,
                applied = self.applied_list_seq,
                "dropping stale file list"
            );
            return;
        }
        let entries = match result.entries {
            Ok(entries) => entries,
            Err(e) => return self.fail(e),
        };

        self.applied_list_seq = result.seq;
        tracing::debug!(seq = result.seq, count = entries.len(), "applying file list");
        self.state.files.replace(entries);
        self.state.last_refresh = Some(chrono::Local::now());

        match self.state.files.selected_key() {
            Some(key) => self.fetch_if_new(Some(key)),
            None => {
                self.requested = None;
                self.state.viewport.set_diff(None);
            }
        }
    }

    fn apply_diff(&mut self, result: DiffResult) {
        if self.state.fatal_error.is_some() {
            return;
        }
        if self.requested.as_ref() != Some(&result.key) || result.seq <= self.applied_diff_seq {
            tracing::warn!(seq = result.seq, key = %result.key, "dropping stale diff");
            return;
        }
        match result.diff {
            Ok(diff) => {
                self.applied_diff_seq = result.seq;
                tracing::debug!(seq = result.seq, key = %result.key, "applying diff");
                self.state.viewport.set_diff(Some(diff));
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, message: String) {
        tracing::error!("fetch failed: {message}");
        self.state.show_help = false;
        self.state.fatal_error = Some(message);
    }

    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        if self.state.fatal_error.is_some() || self.state.show_help {
            return None;
        }
        let at = Position::new(mouse.column, mouse.row);
        let over_files = self.layout.files.contains(at);
        let over_diff = self.layout.diff.contains(at);

        match mouse.kind {
            MouseEventKind::ScrollUp if over_files => Some(Action::SelectPrevious),
            MouseEventKind::ScrollDown if over_files => Some(Action::SelectNext),
            MouseEventKind::ScrollUp if over_diff => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown if over_diff => Some(Action::ScrollDown),
            MouseEventKind::Down(MouseButton::Left) => {
                let inner = self.layout.files_inner();
                if !inner.contains(at) {
                    return None;
                }
                let files = &self.state.files;
                let scroll =
                    file_list::scroll_offset(files.rows(), files.cursor(), inner.height as usize);
                Some(Action::SelectRow(scroll + (mouse.row - inner.y) as usize))
            }
            _ => None,
        }
    }
}
