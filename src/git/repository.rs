use anyhow::{Context, Result};
use git2::Repository;
use std::path::{Path, PathBuf};

pub struct RepoCache {
    repo: Repository,
    workdir: PathBuf,
}

impl RepoCache {
    pub fn open(path: &Path) -> Result<Self> {
        let repo =
            Repository::discover(path).context("Not a git repository (or any parent directory)")?;
        let workdir = repo
            .workdir()
            .context("Bare repositories are not supported")?
            .to_path_buf();
        Ok(Self { repo, workdir })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Whether `HEAD` has a version of `path`. False on an unborn branch.
    pub fn head_contains(&self, path: &Path) -> bool {
        let Ok(head) = self.repo.head() else {
            return false;
        };
        let Ok(tree) = head.peel_to_tree() else {
            return false;
        };
        tree.get_path(path).is_ok()
    }

    /// Whether `path` has unresolved merge stages in the index.
    pub fn is_conflicted(&self, path: &Path) -> Result<bool> {
        let index = self.repo.index().context("Failed to read the index")?;
        Ok((1..=3).any(|stage| index.get_path(path, stage).is_some()))
    }

    /// Text of the staged (stage 0) blob for `path`, `None` if the path is
    /// not in the index or the blob is not UTF-8.
    pub fn staged_text(&self, path: &Path) -> Result<Option<String>> {
        let index = self.repo.index().context("Failed to read the index")?;
        let Some(entry) = index.get_path(path, 0) else {
            return Ok(None);
        };
        let blob = self
            .repo
            .find_blob(entry.id)
            .with_context(|| format!("Missing blob for {}", path.display()))?;
        Ok(std::str::from_utf8(blob.content()).ok().map(str::to_string))
    }
}
