use std::fmt;

/// Change kind reported by `git status` for one side (index or worktree).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
    TypeChanged,
    Unmerged,
    Untracked,
}

impl FileStatus {
    /// Map a porcelain indicator character. Blank, `?` and `!` have no
    /// per-side meaning and yield `None`.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(FileStatus::Added),
            'D' => Some(FileStatus::Deleted),
            'M' => Some(FileStatus::Modified),
            'R' => Some(FileStatus::Renamed),
            'C' => Some(FileStatus::Copied),
            'T' => Some(FileStatus::TypeChanged),
            'U' => Some(FileStatus::Unmerged),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Added => "A",
            FileStatus::Deleted => "D",
            FileStatus::Modified => "M",
            FileStatus::Renamed => "R",
            FileStatus::Copied => "C",
            FileStatus::TypeChanged => "T",
            FileStatus::Unmerged => "U",
            FileStatus::Untracked => "?",
        }
    }
}

/// Identity of a change entry across independently rebuilt snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub path: String,
    pub staged: bool,
    pub unversioned: bool,
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = if self.unversioned {
            "untracked"
        } else if self.staged {
            "staged"
        } else {
            "unstaged"
        };
        write!(f, "{} ({side})", self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub path: String,
    pub status: FileStatus,
    pub staged: bool,
    pub unversioned: bool,
}

impl ChangeEntry {
    pub fn key(&self) -> EntryKey {
        EntryKey {
            path: self.path.clone(),
            staged: self.staged,
            unversioned: self.unversioned,
        }
    }

    /// Whether `key` identifies this entry, without allocating.
    pub fn matches(&self, key: &EntryKey) -> bool {
        self.staged == key.staged && self.unversioned == key.unversioned && self.path == key.path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Added,
    Removed,
}

impl LineKind {
    pub fn indicator(&self) -> &'static str {
        match self {
            LineKind::Context => " ",
            LineKind::Added => "+",
            LineKind::Removed => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    pub old_lineno: Option<u32>,
    pub new_lineno: Option<u32>,
    pub content: String,
}

impl DiffLine {
    /// Number shown in the gutter: the line's own side, new side for context.
    pub fn display_lineno(&self) -> Option<u32> {
        match self.kind {
            LineKind::Removed => self.old_lineno,
            LineKind::Added | LineKind::Context => self.new_lineno,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub header: String,
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub lines: Vec<DiffLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub staged: bool,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    pub fn empty(path: &str, staged: bool) -> Self {
        Self {
            path: path.to_string(),
            staged,
            hunks: Vec::new(),
        }
    }

    /// Viewport identity; a re-fetch of the same file compares equal.
    pub fn identity(&self) -> (&str, bool) {
        (&self.path, self.staged)
    }

    pub fn additions(&self) -> usize {
        self.count(LineKind::Added)
    }

    pub fn deletions(&self) -> usize {
        self.count(LineKind::Removed)
    }

    fn count(&self, kind: LineKind) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.kind == kind)
            .count()
    }
}
