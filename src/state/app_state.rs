use chrono::{DateTime, Local};

use super::{FileListState, ViewportState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    FileList,
    Diff,
}

impl FocusPanel {
    pub fn toggle(self) -> Self {
        match self {
            FocusPanel::FileList => FocusPanel::Diff,
            FocusPanel::Diff => FocusPanel::FileList,
        }
    }
}

pub struct AppState {
    pub focus: FocusPanel,
    pub files: FileListState,
    pub viewport: ViewportState,
    pub show_help: bool,
    pub should_quit: bool,
    /// Set once a fetch fails; the session stops refreshing after that.
    pub fatal_error: Option<String>,
    /// Completion time of the last applied file-list fetch.
    pub last_refresh: Option<DateTime<Local>>,
    /// Shown in the status bar, usually the repository directory name.
    pub repo_label: String,
}

impl AppState {
    pub fn new(viewport: ViewportState, repo_label: String) -> Self {
        Self {
            focus: FocusPanel::FileList,
            files: FileListState::new(),
            viewport,
            show_help: false,
            should_quit: false,
            fatal_error: None,
            last_refresh: None,
            repo_label,
        }
    }
}
