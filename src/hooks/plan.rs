use crate::error::{Error, Result};
use crate::model::{DEFAULT_CONFIG_FILE, HookRegistration, PreCommitConfig, RepoSource, Stage};
use crate::shared::{FileFilter, TagFilter, Tags, tags_from_path};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// How a planned hook gets executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Invocation {
    /// Spawn `entry` + `args` (+ filenames) as a process
    Command,
    /// `entry` is a regex searched through the selected files
    Pygrep,
    /// Always fails when it has files, printing `entry`
    Fail,
    /// Built-in configuration check
    Meta,
    /// Remote hook; fetched and run by the external runner
    Delegated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoFiles,
    Stage,
}

/// One hook resolved against a concrete file set
#[derive(Debug, Clone, Serialize)]
pub struct PlannedHook {
    pub repo: String,
    pub id: String,
    pub name: String,
    pub invocation: Invocation,
    pub language: Option<String>,
    pub entry: Option<String>,
    /// Program and leading arguments; filenames are appended per batch
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub files: Vec<String>,
    pub pass_filenames: bool,
    pub verbose: bool,
    pub skip: Option<SkipReason>,
}

impl PlannedHook {
    pub fn is_skipped(&self) -> bool {
        self.skip.is_some()
    }

    /// Shell-quoted command line without filenames
    pub fn command_line(&self) -> String {
        shlex::try_join(self.command.iter().map(String::as_str))
            .unwrap_or_else(|_| self.command.join(" "))
    }
}

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub stage: Stage,
    /// Restrict the plan to one hook id or alias
    pub hook_id: Option<String>,
    /// Repository root that file paths are relative to
    pub root: PathBuf,
    /// Repository-relative name of the configuration file
    pub config_file: String,
}

impl PlanOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            stage: Stage::PreCommit,
            hook_id: None,
            root: root.into(),
            config_file: DEFAULT_CONFIG_FILE.to_string(),
        }
    }
}

/// Resolved list of hook invocations for a stage and file set
#[derive(Debug, Clone, Serialize)]
pub struct RunPlan {
    pub stage: Stage,
    pub fail_fast: bool,
    pub hooks: Vec<PlannedHook>,
}

impl RunPlan {
    pub fn build(
        config: &PreCommitConfig,
        files: &[String],
        options: &PlanOptions,
    ) -> Result<Self> {
        let global = FileFilter::new(config.files.as_deref(), config.exclude.as_deref())?;
        let mut classifier = FileClassifier::new(&options.root);

        // Deleted or otherwise missing paths have no tags and are never passed on
        let candidates: Vec<&str> = global
            .filter(files)
            .into_iter()
            .filter(|file| !classifier.tags(file).is_empty())
            .collect();
        tracing::debug!(
            "{} of {} file(s) pass the global filter",
            candidates.len(),
            files.len()
        );

        let mut hooks = Vec::new();
        for (entry, hook) in config.hooks() {
            if let Some(selector) = &options.hook_id {
                if !hook.answers_to(selector) {
                    continue;
                }
            }

            let source = entry.source();
            let stage_ok = hook
                .effective_stages(config.default_stages.as_deref())
                .is_none_or(|stages| stages.contains(&options.stage));

            let selector = HookSelector::for_hook(hook, source, &options.config_file)?;
            let selected = if stage_ok {
                selector.select(&candidates, &mut classifier)
            } else {
                Vec::new()
            };

            let skip = if !stage_ok {
                Some(SkipReason::Stage)
            } else if selected.is_empty() && !hook.always_runs() {
                Some(SkipReason::NoFiles)
            } else {
                None
            };

            let planned = plan_hook(entry.repo.clone(), source, hook, selected, skip)?;
            tracing::trace!(
                "Planned {} ({:?}): {:?}",
                planned.id,
                planned.invocation,
                planned.skip
            );
            hooks.push(planned);
        }

        Ok(Self {
            stage: options.stage,
            fail_fast: config.fails_fast(),
            hooks,
        })
    }

    pub fn runnable(&self) -> impl Iterator<Item = &PlannedHook> {
        self.hooks.iter().filter(|hook| !hook.is_skipped())
    }
}

fn plan_hook(
    repo: String,
    source: RepoSource<'_>,
    hook: &HookRegistration,
    files: Vec<String>,
    skip: Option<SkipReason>,
) -> Result<PlannedHook> {
    let language = hook.language.clone();
    let invocation = match source {
        RepoSource::Remote(_) => Invocation::Delegated,
        RepoSource::Meta => Invocation::Meta,
        RepoSource::Local => match language.as_deref() {
            Some("pygrep") => Invocation::Pygrep,
            Some("fail") => Invocation::Fail,
            _ => Invocation::Command,
        },
    };

    let mut command = Vec::new();
    if invocation == Invocation::Command {
        let entry = hook.entry.as_deref().unwrap_or_default();
        command = shlex::split(entry)
            .filter(|words| !words.is_empty())
            .ok_or_else(|| Error::Entry {
                id: hook.id.clone(),
                entry: entry.to_string(),
            })?;
        command.extend(hook.args.iter().cloned());
    }

    Ok(PlannedHook {
        repo,
        id: hook.id.clone(),
        name: hook.display_name().to_string(),
        invocation,
        language,
        entry: hook.entry.clone(),
        command,
        args: hook.args.clone(),
        files,
        pass_filenames: hook.passes_filenames(),
        verbose: hook.verbose.unwrap_or(false),
        skip,
    })
}

/// Per-hook `files` / `exclude` / type filters
#[derive(Debug, Clone)]
pub struct HookSelector {
    files: FileFilter,
    tags: TagFilter,
}

impl HookSelector {
    pub fn for_hook(
        hook: &HookRegistration,
        source: RepoSource<'_>,
        config_file: &str,
    ) -> Result<Self> {
        // Configuration checks only look at the configuration file by default
        let meta_default = match (source, hook.id.as_str()) {
            (RepoSource::Meta, "check-hooks-apply" | "check-useless-excludes") => {
                Some(format!("^{}$", regex::escape(config_file)))
            }
            _ => None,
        };
        let files = hook.files.as_deref().or(meta_default.as_deref());

        Ok(Self {
            files: FileFilter::new(files, hook.exclude.as_deref())?,
            tags: TagFilter::new(&hook.types, &hook.types_or, &hook.exclude_types),
        })
    }

    pub fn select(&self, candidates: &[&str], classifier: &mut FileClassifier) -> Vec<String> {
        candidates
            .iter()
            .copied()
            .filter(|file| self.files.matches(file))
            .filter(|file| self.tags.is_unrestricted() || self.tags.matches(classifier.tags(file)))
            .map(String::from)
            .collect()
    }
}

/// Memoized tag lookup relative to a root directory
#[derive(Debug)]
pub struct FileClassifier {
    root: PathBuf,
    cache: HashMap<String, Tags>,
}

impl FileClassifier {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            cache: HashMap::new(),
        }
    }

    pub fn tags(&mut self, file: &str) -> &Tags {
        let root = &self.root;
        self.cache
            .entry(file.to_string())
            .or_insert_with(|| tags_from_path(&root.join(file)))
    }
}
