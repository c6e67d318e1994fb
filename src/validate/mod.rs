//! Structural validation of pre-commit configuration documents
//!
//! Validation walks the raw YAML tree rather than the typed model so that a
//! single pass can report every problem in the file: missing keys, wrong
//! types, bad regular expressions and duplicate hooks alike. Nothing here
//! fails fast; the result is a [`ValidationReport`].
//!
//! Rules:
//!
//! - the document is a mapping whose `repos` key holds a sequence
//! - every repository entry has a non-empty `repo`, a non-empty `rev`
//!   (except the `local` and `meta` sentinels) and a non-empty `hooks` list
//! - every hook has a non-empty `id`, and `(repo, id)` pairs are unique
//! - `files` / `exclude` compile as regular expressions
//! - local hooks declare `entry` and `language`; meta hook ids are known
//!
//! Unknown keys, a `rev` on a sentinel entry and branch-like revisions are
//! reported as warnings, or as errors in strict mode.

mod report;

pub use report::{Diagnostic, Issue, Severity, ValidationReport};

use crate::error::{Error, Result};
use crate::model::{PreCommitConfig, RepoSource, Stage};
use regex::Regex;
use serde_yml::{Mapping, Value};
use std::collections::HashMap;
use std::path::Path;

const TOP_LEVEL_KEYS: &[&str] = &[
    "repos",
    "ci",
    "default_install_hook_types",
    "default_language_version",
    "default_stages",
    "files",
    "exclude",
    "fail_fast",
    "minimum_pre_commit_version",
];

const REPO_KEYS: &[&str] = &["repo", "rev", "hooks"];

const HOOK_STRING_KEYS: &[&str] = &[
    "id",
    "alias",
    "name",
    "description",
    "entry",
    "language",
    "language_version",
    "files",
    "exclude",
    "log_file",
    "minimum_pre_commit_version",
];

const HOOK_LIST_KEYS: &[&str] = &[
    "args",
    "types",
    "types_or",
    "exclude_types",
    "additional_dependencies",
    "stages",
];

const HOOK_BOOL_KEYS: &[&str] = &["pass_filenames", "always_run", "require_serial", "verbose"];

pub const LANGUAGES: &[&str] = &[
    "conda",
    "coursier",
    "dart",
    "docker",
    "docker_image",
    "dotnet",
    "fail",
    "golang",
    "haskell",
    "julia",
    "lua",
    "node",
    "perl",
    "pygrep",
    "python",
    "r",
    "ruby",
    "rust",
    "script",
    "swift",
    "system",
    "unsupported",
    "unsupported_script",
];

pub const META_HOOKS: &[&str] = &["check-hooks-apply", "check-useless-excludes", "identity"];

const ROOT: &str = "config";

#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Report warnings as errors
    pub strict: bool,
    /// `rev` values that name a moving branch rather than a pinned revision
    pub mutable_revs: Vec<String>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            strict: false,
            mutable_revs: ["master", "main", "HEAD", "develop", "trunk"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Validate configuration text, including YAML syntax
pub fn validate_str(content: &str, options: &ValidationOptions) -> ValidationReport {
    match serde_yml::from_str::<Value>(content) {
        Ok(root) => validate_value(&root, options),
        Err(e) => {
            let mut report = ValidationReport::default();
            report.push(
                Severity::Error,
                ROOT,
                Issue::Syntax {
                    message: e.to_string(),
                },
            );
            report
        }
    }
}

/// Validate a configuration file on disk
pub fn validate_file(path: &Path, options: &ValidationOptions) -> Result<ValidationReport> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(validate_str(&content, options))
}

/// Validate an already-typed configuration
pub fn validate(config: &PreCommitConfig, options: &ValidationOptions) -> ValidationReport {
    match serde_yml::to_value(config) {
        Ok(root) => validate_value(&root, options),
        Err(e) => {
            let mut report = ValidationReport::default();
            report.push(
                Severity::Error,
                ROOT,
                Issue::Syntax {
                    message: e.to_string(),
                },
            );
            report
        }
    }
}

/// Validate a parsed YAML tree
pub fn validate_value(root: &Value, options: &ValidationOptions) -> ValidationReport {
    let mut validator = Validator {
        options,
        report: ValidationReport::default(),
        seen: HashMap::new(),
    };
    validator.check_root(root);

    let mut report = validator.report;
    if options.strict {
        report.promote_warnings();
    }
    tracing::debug!(
        "Validated {} repos / {} hooks: {} error(s), {} warning(s)",
        report.repos,
        report.hooks,
        report.error_count(),
        report.warning_count()
    );
    report
}

struct Validator<'a> {
    options: &'a ValidationOptions,
    report: ValidationReport,
    /// `(repo, id)` -> location of first declaration
    seen: HashMap<(String, String), String>,
}

impl Validator<'_> {
    fn error(&mut self, location: &str, issue: Issue) {
        self.report.push(Severity::Error, location, issue);
    }

    fn warn(&mut self, location: &str, issue: Issue) {
        self.report.push(Severity::Warning, location, issue);
    }

    fn check_root(&mut self, root: &Value) {
        let Some(map) = root.as_mapping() else {
            self.error(ROOT, Issue::NotAMapping);
            return;
        };

        self.check_unknown_keys(map, TOP_LEVEL_KEYS, ROOT);
        for key in ["files", "exclude"] {
            self.check_regex(map, key, ROOT);
        }
        self.check_bool(map, "fail_fast", ROOT);
        self.check_string(map, "minimum_pre_commit_version", ROOT);
        self.check_stage_list(map, "default_stages", ROOT);

        if let Some(versions) = map.get("default_language_version") {
            let all_strings = versions
                .as_mapping()
                .is_some_and(|m| m.iter().all(|(k, v)| k.is_string() && v.is_string()));
            if !all_strings {
                self.error(
                    ROOT,
                    Issue::WrongType {
                        field: "default_language_version".to_string(),
                        expected: "a mapping of language to version".to_string(),
                    },
                );
            }
        }

        match map.get("repos") {
            None => self.error(ROOT, missing("repos")),
            Some(Value::Sequence(repos)) => {
                if repos.is_empty() {
                    self.warn(ROOT, Issue::NoRepos);
                }
                for (index, entry) in repos.iter().enumerate() {
                    self.check_repo(index, entry);
                }
            }
            Some(_) => self.error(ROOT, wrong_type("repos", "a sequence")),
        }
    }

    fn check_repo(&mut self, index: usize, entry: &Value) {
        let location = format!("repos[{index}]");
        self.report.repos += 1;

        let Some(map) = entry.as_mapping() else {
            self.error(&location, Issue::NotAMapping);
            return;
        };

        self.check_unknown_keys(map, REPO_KEYS, &location);

        let repo = self.required_string(map, "repo", &location);
        let source = RepoSource::classify(repo.unwrap_or_default());

        if source.is_sentinel() {
            if map.contains_key("rev") {
                self.warn(
                    &location,
                    Issue::RevIgnored {
                        repo: source.to_string(),
                    },
                );
            }
        } else if let Some(rev) = self.required_string(map, "rev", &location) {
            if self.options.mutable_revs.iter().any(|m| m == rev) {
                self.warn(
                    &location,
                    Issue::MutableRev {
                        rev: rev.to_string(),
                    },
                );
            }
        }

        match map.get("hooks") {
            None => self.error(&location, missing("hooks")),
            Some(Value::Null) => self.error(&location, Issue::EmptyHooks),
            Some(Value::Sequence(hooks)) if hooks.is_empty() => {
                self.error(&location, Issue::EmptyHooks)
            }
            Some(Value::Sequence(hooks)) => {
                let repo_label = repo.unwrap_or_default().to_string();
                for (hook_index, hook) in hooks.iter().enumerate() {
                    let hook_location = format!("{location}.hooks[{hook_index}]");
                    self.check_hook(&hook_location, hook, source, &repo_label);
                }
            }
            Some(_) => self.error(&location, wrong_type("hooks", "a sequence")),
        }
    }

    fn check_hook(&mut self, location: &str, hook: &Value, source: RepoSource<'_>, repo: &str) {
        self.report.hooks += 1;

        let Some(map) = hook.as_mapping() else {
            self.error(location, Issue::NotAMapping);
            return;
        };

        let known: Vec<&str> = HOOK_STRING_KEYS
            .iter()
            .chain(HOOK_LIST_KEYS)
            .chain(HOOK_BOOL_KEYS)
            .copied()
            .collect();
        self.check_unknown_keys(map, &known, location);

        // `id` gets its own message below
        for key in HOOK_STRING_KEYS.iter().filter(|k| **k != "id") {
            self.check_string(map, key, location);
        }
        for key in HOOK_LIST_KEYS {
            self.check_string_list(map, key, location);
        }
        for key in HOOK_BOOL_KEYS {
            self.check_bool(map, key, location);
        }
        for key in ["files", "exclude"] {
            self.check_regex(map, key, location);
        }
        self.check_stage_list(map, "stages", location);

        let id = self.required_string(map, "id", location);

        match source {
            RepoSource::Local => self.check_local_hook(map, location),
            RepoSource::Meta => {
                if let Some(id) = id {
                    if !META_HOOKS.contains(&id) {
                        self.error(location, Issue::UnknownMetaHook { id: id.to_string() });
                    }
                }
                for field in ["entry", "language"] {
                    if map.contains_key(field) {
                        self.warn(
                            location,
                            Issue::MetaOverride {
                                field: field.to_string(),
                            },
                        );
                    }
                }
            }
            RepoSource::Remote(_) => {
                if let Some(language) = map.get("language").and_then(Value::as_str) {
                    self.check_language(language, location);
                }
            }
        }

        if let Some(id) = id {
            let key = (repo.to_string(), id.to_string());
            if let Some(first) = self.seen.get(&key).cloned() {
                self.error(
                    location,
                    Issue::DuplicateHook {
                        repo: key.0,
                        id: key.1,
                        first,
                    },
                );
            } else {
                self.seen.insert(key, location.to_string());
            }
        }
    }

    fn check_local_hook(&mut self, map: &Mapping, location: &str) {
        let entry = self.required_string(map, "entry", location);
        let language = self.required_string(map, "language", location);

        if let Some(language) = language {
            self.check_language(language, location);
        }

        let Some(entry) = entry else { return };
        if language == Some("pygrep") {
            if let Err(e) = Regex::new(entry) {
                self.error(
                    location,
                    Issue::InvalidRegex {
                        field: "entry".to_string(),
                        message: e.to_string(),
                    },
                );
            }
        } else if shlex::split(entry).is_none_or(|words| words.is_empty()) {
            self.error(
                location,
                Issue::UnsplittableEntry {
                    entry: entry.to_string(),
                },
            );
        }
    }

    fn check_language(&mut self, language: &str, location: &str) {
        if !LANGUAGES.contains(&language) {
            self.error(
                location,
                Issue::UnknownLanguage {
                    language: language.to_string(),
                },
            );
        }
    }

    /// Present, a string, and not blank
    fn required_string<'v>(
        &mut self,
        map: &'v Mapping,
        key: &str,
        location: &str,
    ) -> Option<&'v str> {
        match map.get(key) {
            None | Some(Value::Null) => {
                self.error(location, missing(key));
                None
            }
            Some(Value::String(value)) if value.trim().is_empty() => {
                self.error(
                    location,
                    Issue::EmptyField {
                        field: key.to_string(),
                    },
                );
                None
            }
            Some(Value::String(value)) => Some(value.as_str()),
            Some(_) => {
                self.error(location, wrong_type(key, "a string"));
                None
            }
        }
    }

    fn check_string(&mut self, map: &Mapping, key: &str, location: &str) {
        if map.get(key).is_some_and(|v| !v.is_string()) {
            self.error(location, wrong_type(key, "a string"));
        }
    }

    fn check_bool(&mut self, map: &Mapping, key: &str, location: &str) {
        if map.get(key).is_some_and(|v| !v.is_bool()) {
            self.error(location, wrong_type(key, "a boolean"));
        }
    }

    fn check_string_list(&mut self, map: &Mapping, key: &str, location: &str) {
        let Some(value) = map.get(key) else { return };
        let ok = value
            .as_sequence()
            .is_some_and(|items| items.iter().all(Value::is_string));
        if !ok {
            self.error(location, wrong_type(key, "a list of strings"));
        }
    }

    fn check_stage_list(&mut self, map: &Mapping, key: &str, location: &str) {
        let Some(items) = map.get(key).and_then(Value::as_sequence) else {
            return;
        };
        for stage in items.iter().filter_map(Value::as_str) {
            if stage.parse::<Stage>().is_err() {
                self.error(
                    location,
                    Issue::UnknownStage {
                        stage: stage.to_string(),
                    },
                );
            }
        }
    }

    fn check_regex(&mut self, map: &Mapping, key: &str, location: &str) {
        let Some(pattern) = map.get(key).and_then(Value::as_str) else {
            return;
        };
        if let Err(e) = Regex::new(pattern) {
            self.error(
                location,
                Issue::InvalidRegex {
                    field: key.to_string(),
                    message: e.to_string(),
                },
            );
        }
    }

    fn check_unknown_keys(&mut self, map: &Mapping, known: &[&str], location: &str) {
        for key in map.keys() {
            let name = match key.as_str() {
                Some(name) => name.to_string(),
                None => format!("{key:?}"),
            };
            if !known.contains(&name.as_str()) {
                self.warn(location, Issue::UnknownKey { key: name });
            }
        }
    }
}

fn missing(field: &str) -> Issue {
    Issue::MissingField {
        field: field.to_string(),
    }
}

fn wrong_type(field: &str, expected: &str) -> Issue {
    Issue::WrongType {
        field: field.to_string(),
        expected: expected.to_string(),
    }
}
