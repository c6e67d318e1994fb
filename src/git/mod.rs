//! Git integration layer
//!
//! High-level access to the repository through git2: discovery, file
//! listings for hook runs and installing the hook shim that calls back into
//! `hookcheck`.

mod operations;

use crate::error::{Error, Result};
use crate::model::Stage;
use git2::Repository;
use std::path::{Path, PathBuf};

/// First line after the shebang of every shim we write
pub const HOOK_MARKER: &str = "# hookcheck-managed";

pub struct GitRepo {
    pub repo: Repository,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    /// A foreign hook is in the way and `force` was not given
    Exists,
}

impl GitRepo {
    /// Discover the repository containing `path`
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(GitRepo { repo })
    }

    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| Error::Git(git2::Error::from_str("repository has no working directory")))
    }

    /// `core.hooksPath` when set, otherwise `.git/hooks`
    pub fn hooks_dir(&self) -> PathBuf {
        let configured = self
            .repo
            .config()
            .and_then(|config| config.get_path("core.hooksPath"))
            .ok();
        match (configured, self.repo.workdir()) {
            (Some(path), Some(workdir)) if path.is_relative() => workdir.join(path),
            (Some(path), _) => path,
            (None, _) => self.repo.path().join("hooks"),
        }
    }

    pub fn hook_path(&self, stage: Stage) -> PathBuf {
        self.hooks_dir().join(stage.as_str())
    }

    /// Write the shim for `stage`, replacing a foreign hook only with `force`
    pub fn install_hook(&self, stage: Stage, content: &str, force: bool) -> Result<InstallOutcome> {
        let hook_path = self.hook_path(stage);
        if hook_path.exists() && !force && !is_managed(&hook_path) {
            return Ok(InstallOutcome::Exists);
        }

        let hooks_dir = self.hooks_dir();
        std::fs::create_dir_all(&hooks_dir).map_err(|e| Error::io(&hooks_dir, e))?;
        std::fs::write(&hook_path, content).map_err(|e| Error::io(&hook_path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&hook_path)
                .map_err(|e| Error::io(&hook_path, e))?
                .permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&hook_path, perms).map_err(|e| Error::io(&hook_path, e))?;
        }

        tracing::info!("Installed {} hook at {}", stage, hook_path.display());
        Ok(InstallOutcome::Installed)
    }

    /// Remove our shim for `stage`. Foreign hooks are left alone.
    pub fn remove_hook(&self, stage: Stage) -> Result<bool> {
        let hook_path = self.hook_path(stage);
        if !hook_path.exists() || !is_managed(&hook_path) {
            return Ok(false);
        }
        std::fs::remove_file(&hook_path).map_err(|e| Error::io(&hook_path, e))?;
        Ok(true)
    }

    pub fn hook_installed(&self, stage: Stage) -> bool {
        let hook_path = self.hook_path(stage);
        hook_path.exists() && is_managed(&hook_path)
    }
}

fn is_managed(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .map(|content| content.contains(HOOK_MARKER))
        .unwrap_or(false)
}

/// Shell shim that runs the given stage through `hookcheck`
pub fn hook_script(stage: Stage, config_file: &str) -> String {
    let quoted = shlex::try_quote(config_file)
        .map(|q| q.into_owned())
        .unwrap_or_else(|_| config_file.to_string());
    format!(
        "#!/bin/sh\n{HOOK_MARKER}: changes will be overwritten by `hookcheck install`\n\
         exec hookcheck --config {quoted} run --hook-stage {stage} -- \"$@\"\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, GitRepo) {
        let temp_dir = TempDir::new().unwrap();
        Repository::init(temp_dir.path()).unwrap();
        let repo = GitRepo::discover(temp_dir.path()).unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_hook_script_runs_stage() {
        let script = hook_script(Stage::PrePush, ".pre-commit-config.yaml");
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains(HOOK_MARKER));
        assert!(script.contains("run --hook-stage pre-push -- \"$@\""));
        assert!(script.contains("--config .pre-commit-config.yaml"));
    }

    #[test]
    fn test_install_and_remove_hook() {
        let (_temp_dir, repo) = init_repo();
        let script = hook_script(Stage::PreCommit, ".pre-commit-config.yaml");

        assert_eq!(
            repo.install_hook(Stage::PreCommit, &script, false).unwrap(),
            InstallOutcome::Installed
        );
        assert!(repo.hook_installed(Stage::PreCommit));
        // Reinstalling over our own shim needs no force
        assert_eq!(
            repo.install_hook(Stage::PreCommit, &script, false).unwrap(),
            InstallOutcome::Installed
        );

        assert!(repo.remove_hook(Stage::PreCommit).unwrap());
        assert!(!repo.hook_installed(Stage::PreCommit));
        assert!(!repo.remove_hook(Stage::PreCommit).unwrap());
    }

    #[test]
    fn test_foreign_hook_is_preserved() {
        let (_temp_dir, repo) = init_repo();
        let hook_path = repo.hook_path(Stage::PreCommit);
        fs::create_dir_all(hook_path.parent().unwrap()).unwrap();
        fs::write(&hook_path, "#!/bin/sh\nexit 0\n").unwrap();

        let script = hook_script(Stage::PreCommit, ".pre-commit-config.yaml");
        assert_eq!(
            repo.install_hook(Stage::PreCommit, &script, false).unwrap(),
            InstallOutcome::Exists
        );
        assert!(!repo.remove_hook(Stage::PreCommit).unwrap());
        assert!(hook_path.exists());

        assert_eq!(
            repo.install_hook(Stage::PreCommit, &script, true).unwrap(),
            InstallOutcome::Installed
        );
        assert!(repo.hook_installed(Stage::PreCommit));
    }
}
