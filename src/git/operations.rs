use super::GitRepo;
use crate::error::Result;
use git2::{Delta, DiffOptions, Status, StatusOptions};

impl GitRepo {
    /// Repository-relative paths staged for commit (the default hook input).
    /// Deletions are left out since there is nothing to check.
    pub fn staged_files(&self) -> Result<Vec<String>> {
        let mut status_opts = StatusOptions::new();
        status_opts.include_ignored(false);
        status_opts.include_untracked(false);

        let statuses = self.repo.statuses(Some(&mut status_opts))?;
        let mut files: Vec<String> = statuses
            .iter()
            .filter(|entry| {
                entry.status().intersects(
                    Status::INDEX_NEW
                        | Status::INDEX_MODIFIED
                        | Status::INDEX_RENAMED
                        | Status::INDEX_TYPECHANGE,
                )
            })
            .filter_map(|entry| entry.path().map(String::from))
            .collect();
        files.sort();
        tracing::debug!("{} staged file(s)", files.len());
        Ok(files)
    }

    /// Every path in the index, for `--all-files` runs and meta hooks
    pub fn tracked_files(&self) -> Result<Vec<String>> {
        let index = self.repo.index()?;
        let files: Vec<String> = index
            .iter()
            .map(|entry| String::from_utf8_lossy(&entry.path).into_owned())
            .collect();
        tracing::debug!("{} tracked file(s)", files.len());
        Ok(files)
    }

    /// Paths that differ between two revisions, e.g. for `pre-push` ranges.
    /// Files deleted along the way are left out.
    pub fn changed_files(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let old_tree = self.repo.revparse_single(from)?.peel_to_tree()?;
        let new_tree = self.repo.revparse_single(to)?.peel_to_tree()?;

        let mut diff_opts = DiffOptions::new();
        diff_opts.context_lines(0);
        let diff = self
            .repo
            .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), Some(&mut diff_opts))?;

        let mut files: Vec<String> = diff
            .deltas()
            .filter(|delta| delta.status() != Delta::Deleted)
            .filter_map(|delta| {
                let path = delta.new_file().path()?;
                Some(path.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        files.sort();
        files.dedup();
        Ok(files)
    }
}
