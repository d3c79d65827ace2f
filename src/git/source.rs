use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::parse::{parse_status, parse_unified_diff, synthesize_new_file, PathFilter};
use super::repository::RepoCache;
use super::types::{ChangeEntry, EntryKey, FileDiff};

/// Where change snapshots come from. Implementations may block; callers run
/// them off the UI loop.
pub trait ChangeSource: Send + Sync {
    /// Current index/worktree divergence from `HEAD`.
    fn list_changes(&self) -> Result<Vec<ChangeEntry>>;

    /// Diff for one entry, synthesized when there is no prior revision.
    fn diff(&self, key: &EntryKey) -> Result<FileDiff>;

    fn root(&self) -> &Path;
}

pub struct GitSource {
    workdir: PathBuf,
    filter: PathFilter,
    include_untracked: bool,
}

impl GitSource {
    pub fn new(workdir: &Path, filter: PathFilter, include_untracked: bool) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
            filter,
            include_untracked,
        }
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("Failed to run git {}", args.first().unwrap_or(&"")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn read_worktree_file(&self, path: &str) -> Option<String> {
        let bytes = std::fs::read(self.workdir.join(path)).ok()?;
        String::from_utf8(bytes).ok()
    }
}

impl ChangeSource for GitSource {
    fn list_changes(&self) -> Result<Vec<ChangeEntry>> {
        let raw = self.git(&["status", "--porcelain", "--untracked-files=all"])?;
        Ok(parse_status(&raw, &self.filter, self.include_untracked))
    }

    fn diff(&self, key: &EntryKey) -> Result<FileDiff> {
        if key.unversioned {
            let content = self.read_worktree_file(&key.path);
            return Ok(synthesize_new_file(&key.path, false, content.as_deref()));
        }

        if key.staged {
            let repo = RepoCache::open(&self.workdir)?;
            let path = Path::new(&key.path);
            if !repo.head_contains(path) {
                let content = repo.staged_text(path).unwrap_or_else(|e| {
                    tracing::debug!(path = %key.path, "staged blob unreadable: {e:#}");
                    None
                });
                return Ok(synthesize_new_file(&key.path, true, content.as_deref()));
            }
        }

        let mut args = vec!["diff", "--no-color", "--no-ext-diff"];
        if key.staged {
            args.push("--cached");
        } else if RepoCache::open(&self.workdir)?.is_conflicted(Path::new(&key.path))? {
            // Plain two-way diff against our side instead of a combined diff.
            args.push("-2");
        }
        args.push("--");
        args.push(&key.path);

        let raw = self.git(&args)?;
        Ok(parse_unified_diff(&raw, &key.path, key.staged))
    }

    fn root(&self) -> &Path {
        &self.workdir
    }
}
