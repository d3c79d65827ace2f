use crate::git::types::{ChangeEntry, EntryKey, FileDiff};

/// Outcome of one `list_changes` call. `seq` orders it against every other
/// fetch issued by the same worker.
#[derive(Debug)]
pub struct ListResult {
    pub seq: u64,
    pub entries: Result<Vec<ChangeEntry>, String>,
}

/// Outcome of one `diff` call for `key`.
#[derive(Debug)]
pub struct DiffResult {
    pub seq: u64,
    pub key: EntryKey,
    pub diff: Result<FileDiff, String>,
}
