use crate::git::types::{ChangeEntry, EntryKey};

/// Fixed display order of the change groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Staged,
    Unstaged,
    Untracked,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Staged, Group::Unstaged, Group::Untracked];

    pub fn title(&self) -> &'static str {
        match self {
            Group::Staged => "STAGED",
            Group::Unstaged => "UNSTAGED",
            Group::Untracked => "UNTRACKED",
        }
    }

    fn of(entry: &ChangeEntry) -> Self {
        if entry.unversioned {
            Group::Untracked
        } else if entry.staged {
            Group::Staged
        } else {
            Group::Unstaged
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRow {
    Header(Group),
    Entry(ChangeEntry),
}

impl ListRow {
    pub fn is_selectable(&self) -> bool {
        matches!(self, ListRow::Entry(_))
    }
}

/// Grouped file list with a cursor that only ever rests on entry rows.
#[derive(Debug, Default)]
pub struct FileListState {
    rows: Vec<ListRow>,
    cursor: Option<usize>,
}

impl FileListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a fresh snapshot, keeping the cursor on the same entry
    /// when it survived.
    pub fn replace(&mut self, entries: Vec<ChangeEntry>) {
        let previous = self.selected().map(ChangeEntry::key);

        let mut buckets: [Vec<ChangeEntry>; 3] = Default::default();
        for entry in entries {
            let slot = Group::ALL
                .iter()
                .position(|g| *g == Group::of(&entry))
                .unwrap_or(0);
            buckets[slot].push(entry);
        }

        self.rows.clear();
        for (group, bucket) in Group::ALL.into_iter().zip(buckets) {
            if bucket.is_empty() {
                continue;
            }
            self.rows.push(ListRow::Header(group));
            self.rows.extend(bucket.into_iter().map(ListRow::Entry));
        }

        self.cursor = previous
            .and_then(|key| self.position_of(&key))
            .or_else(|| self.first_selectable());
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn selected(&self) -> Option<&ChangeEntry> {
        match self.rows.get(self.cursor?) {
            Some(ListRow::Entry(entry)) => Some(entry),
            _ => None,
        }
    }

    pub fn selected_key(&self) -> Option<EntryKey> {
        self.selected().map(ChangeEntry::key)
    }

    pub fn entry_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_selectable()).count()
    }

    pub fn group_len(&self, group: Group) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r, ListRow::Entry(e) if Group::of(e) == group))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_none()
    }

    pub fn move_next(&mut self) {
        self.step(1);
    }

    pub fn move_previous(&mut self) {
        self.step(-1);
    }

    pub fn move_first(&mut self) {
        if let Some(i) = self.first_selectable() {
            self.cursor = Some(i);
        }
    }

    pub fn move_last(&mut self) {
        if let Some(i) = self.rows.iter().rposition(ListRow::is_selectable) {
            self.cursor = Some(i);
        }
    }

    /// Put the cursor on row `index` if it is an entry; headers and
    /// out-of-range rows are ignored.
    pub fn select_row(&mut self, index: usize) {
        if self.rows.get(index).is_some_and(ListRow::is_selectable) {
            self.cursor = Some(index);
        }
    }

    fn step(&mut self, direction: isize) {
        let Some(start) = self.cursor else {
            return;
        };
        let len = self.rows.len() as isize;
        let mut i = start as isize;
        loop {
            i = (i + direction).rem_euclid(len);
            if i as usize == start {
                return;
            }
            if self.rows[i as usize].is_selectable() {
                self.cursor = Some(i as usize);
                return;
            }
        }
    }

    fn first_selectable(&self) -> Option<usize> {
        self.rows.iter().position(ListRow::is_selectable)
    }

    fn position_of(&self, key: &EntryKey) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| matches!(r, ListRow::Entry(e) if e.matches(key)))
    }
}
