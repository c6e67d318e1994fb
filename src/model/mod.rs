//! Data model for pre-commit hook configuration files
//!
//! A configuration is an ordered list of [`RepoEntry`] values, each owning
//! one or more [`HookRegistration`]s. Key names follow the on-disk YAML
//! format exactly; keys the model does not know about are kept in the
//! `extra` maps so a loaded file can be written back without losing them.

mod load;
mod stage;

pub use load::{DEFAULT_CONFIG_FILE, load_config};
pub use stage::{Stage, UnknownStage};

use serde::{Deserialize, Serialize};
use serde_yml::Mapping;
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel `repo` value for hooks defined in-tree
pub const LOCAL_REPO: &str = "local";
/// Sentinel `repo` value for the runner's built-in configuration checks
pub const META_REPO: &str = "meta";

/// Top-level `.pre-commit-config.yaml` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreCommitConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_pre_commit_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language_version: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_stages: Option<Vec<Stage>>,

    /// Global include regex applied before any hook filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<String>,

    /// Global exclude regex applied before any hook filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,

    pub repos: Vec<RepoEntry>,

    #[serde(flatten)]
    pub extra: Mapping,
}

/// One `repos[]` item: a hook source pinned at a revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoEntry {
    pub repo: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    pub hooks: Vec<HookRegistration>,

    #[serde(flatten)]
    pub extra: Mapping,
}

/// Where a repository entry's hooks come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSource<'a> {
    Local,
    Meta,
    Remote(&'a str),
}

impl RepoSource<'_> {
    /// Sentinel repositories carry no revision
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, RepoSource::Remote(_))
    }
}

impl fmt::Display for RepoSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoSource::Local => f.write_str(LOCAL_REPO),
            RepoSource::Meta => f.write_str(META_REPO),
            RepoSource::Remote(url) => f.write_str(url),
        }
    }
}

impl RepoEntry {
    pub fn source(&self) -> RepoSource<'_> {
        RepoSource::classify(&self.repo)
    }
}

impl<'a> RepoSource<'a> {
    pub fn classify(repo: &'a str) -> Self {
        match repo {
            LOCAL_REPO => RepoSource::Local,
            META_REPO => RepoSource::Meta,
            url => RepoSource::Remote(url),
        }
    }
}

/// A single hook invocation declared under a repository entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookRegistration {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_version: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types_or: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_types: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_dependencies: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_filenames: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_run: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_serial: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<Stage>>,

    #[serde(flatten)]
    pub extra: Mapping,
}

impl HookRegistration {
    /// Display name, falling back to the identifier
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn passes_filenames(&self) -> bool {
        self.pass_filenames.unwrap_or(true)
    }

    pub fn always_runs(&self) -> bool {
        self.always_run.unwrap_or(false)
    }

    /// Whether `selector` names this hook by id or alias
    pub fn answers_to(&self, selector: &str) -> bool {
        self.id == selector || self.alias.as_deref() == Some(selector)
    }

    /// Stages this hook participates in; `None` means every stage
    pub fn effective_stages<'a>(&'a self, defaults: Option<&'a [Stage]>) -> Option<&'a [Stage]> {
        self.stages.as_deref().or(defaults)
    }
}

impl PreCommitConfig {
    /// Iterate over every hook together with the entry that declares it
    pub fn hooks(&self) -> impl Iterator<Item = (&RepoEntry, &HookRegistration)> {
        self.repos
            .iter()
            .flat_map(|entry| entry.hooks.iter().map(move |hook| (entry, hook)))
    }

    pub fn hook_count(&self) -> usize {
        self.repos.iter().map(|entry| entry.hooks.len()).sum()
    }

    pub fn fails_fast(&self) -> bool {
        self.fail_fast.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
exclude: ^third_party/
repos:
  - repo: https://github.com/pre-commit/pre-commit-hooks
    rev: v4.5.0
    hooks:
      - id: check-yaml
      - id: check-added-large-files
        args: [--maxkb=1024]
  - repo: local
    hooks:
      - id: ci-generate
        entry: .pfnci/generate.py --dry-run
        pass_filenames: false
        language: python
"#;

    #[test]
    fn classifies_repo_sources() {
        assert_eq!(RepoSource::classify("local"), RepoSource::Local);
        assert_eq!(RepoSource::classify("meta"), RepoSource::Meta);
        assert_eq!(
            RepoSource::classify("https://github.com/astral-sh/ruff-pre-commit"),
            RepoSource::Remote("https://github.com/astral-sh/ruff-pre-commit")
        );
        assert!(RepoSource::Local.is_sentinel());
        assert!(!RepoSource::Remote("x").is_sentinel());
    }

    #[test]
    fn hook_defaults() {
        let config = PreCommitConfig::from_yaml_str(SAMPLE).unwrap();
        let (_, check_yaml) = config.hooks().next().unwrap();
        assert_eq!(check_yaml.display_name(), "check-yaml");
        assert!(check_yaml.passes_filenames());
        assert!(!check_yaml.always_runs());

        let (entry, generate) = config.hooks().last().unwrap();
        assert_eq!(entry.source(), RepoSource::Local);
        assert!(!generate.passes_filenames());
        assert_eq!(generate.language.as_deref(), Some("python"));
    }

    #[test]
    fn iterates_hooks_in_file_order() {
        let config = PreCommitConfig::from_yaml_str(SAMPLE).unwrap();
        let ids: Vec<&str> = config.hooks().map(|(_, hook)| hook.id.as_str()).collect();
        assert_eq!(ids, ["check-yaml", "check-added-large-files", "ci-generate"]);
        assert_eq!(config.hook_count(), 3);
    }

    #[test]
    fn stage_defaults_fall_back_to_config() {
        let hook = HookRegistration {
            id: "mypy".to_string(),
            ..Default::default()
        };
        let defaults = [Stage::PrePush];
        assert_eq!(hook.effective_stages(Some(&defaults)), Some(&defaults[..]));
        assert_eq!(hook.effective_stages(None), None);
    }

    #[test]
    fn alias_selects_hook() {
        let hook = HookRegistration {
            id: "ruff".to_string(),
            alias: Some("ruff-lint".to_string()),
            ..Default::default()
        };
        assert!(hook.answers_to("ruff"));
        assert!(hook.answers_to("ruff-lint"));
        assert!(!hook.answers_to("mypy"));
    }
}
