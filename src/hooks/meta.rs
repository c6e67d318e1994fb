//! Built-in `repo: meta` hooks
//!
//! These check the configuration against the repository contents rather
//! than the contents of the selected files.

use super::plan::{FileClassifier, HookSelector};
use crate::error::Result;
use crate::model::{PreCommitConfig, RepoSource};
use crate::shared::{FileFilter, TagFilter};
use regex::Regex;
use std::path::Path;

/// Everything a meta hook may look at
pub struct MetaContext<'a> {
    pub config: &'a PreCommitConfig,
    /// Every tracked file in the repository
    pub all_files: &'a [String],
    pub root: &'a Path,
    pub config_file: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaOutcome {
    pub passed: bool,
    pub output: String,
}

pub fn run_meta(id: &str, files: &[String], ctx: &MetaContext<'_>) -> Result<MetaOutcome> {
    match id {
        "identity" => Ok(MetaOutcome {
            passed: true,
            output: files.join("\n"),
        }),
        "check-hooks-apply" => check_hooks_apply(ctx),
        "check-useless-excludes" => check_useless_excludes(ctx),
        other => Ok(MetaOutcome {
            passed: false,
            output: format!("`{other}` is not a meta hook"),
        }),
    }
}

fn candidates<'a>(ctx: &MetaContext<'a>, classifier: &mut FileClassifier) -> Result<Vec<&'a str>> {
    let global = FileFilter::new(ctx.config.files.as_deref(), ctx.config.exclude.as_deref())?;
    Ok(global
        .filter(ctx.all_files)
        .into_iter()
        .filter(|file| !classifier.tags(file).is_empty())
        .collect())
}

fn check_hooks_apply(ctx: &MetaContext<'_>) -> Result<MetaOutcome> {
    let mut classifier = FileClassifier::new(ctx.root);
    let candidates = candidates(ctx, &mut classifier)?;

    let mut problems = Vec::new();
    for (entry, hook) in ctx.config.hooks() {
        let source = entry.source();
        if source == RepoSource::Meta || hook.always_runs() {
            continue;
        }
        let selector = HookSelector::for_hook(hook, source, ctx.config_file)?;
        if selector.select(&candidates, &mut classifier).is_empty() {
            problems.push(format!("{} does not apply to this repository", hook.id));
        }
    }

    Ok(outcome(problems))
}

fn check_useless_excludes(ctx: &MetaContext<'_>) -> Result<MetaOutcome> {
    let mut classifier = FileClassifier::new(ctx.root);
    let mut problems = Vec::new();

    if let Some(pattern) = ctx.config.exclude.as_deref().filter(|p| !p.is_empty()) {
        let exclude = compile(pattern)?;
        if !ctx.all_files.iter().any(|file| exclude.is_match(file)) {
            problems.push(format!(
                "The global exclude pattern {pattern:?} does not match any files"
            ));
        }
    }

    let candidates = candidates(ctx, &mut classifier)?;
    for (entry, hook) in ctx.config.hooks() {
        if entry.source() == RepoSource::Meta {
            continue;
        }
        let Some(pattern) = hook.exclude.as_deref().filter(|p| !p.is_empty()) else {
            continue;
        };
        let exclude = compile(pattern)?;

        // What the hook would see if it had no exclude at all
        let files = FileFilter::new(hook.files.as_deref(), None)?;
        let tags = TagFilter::new(&hook.types, &hook.types_or, &hook.exclude_types);
        let useful = candidates.iter().any(|file| {
            files.matches(file)
                && (tags.is_unrestricted() || tags.matches(classifier.tags(file)))
                && exclude.is_match(file)
        });
        if !useful {
            problems.push(format!(
                "The exclude pattern {pattern:?} for {} does not match any files",
                hook.id
            ));
        }
    }

    Ok(outcome(problems))
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| crate::error::Error::Regex {
        field: "exclude".to_string(),
        source,
    })
}

fn outcome(problems: Vec<String>) -> MetaOutcome {
    MetaOutcome {
        passed: problems.is_empty(),
        output: problems.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup(config: &str, files: &[&str]) -> (TempDir, PreCommitConfig, Vec<String>) {
        let temp_dir = TempDir::new().unwrap();
        for file in files {
            let path = temp_dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x = 1\n").unwrap();
        }
        let config = PreCommitConfig::from_yaml_str(config).unwrap();
        let files = files.iter().map(|f| f.to_string()).collect();
        (temp_dir, config, files)
    }

    #[test]
    fn test_identity_echoes_files() {
        let (temp_dir, config, files) = setup("repos: []\n", &["a.py", "b.py"]);
        let ctx = MetaContext {
            config: &config,
            all_files: &files,
            root: temp_dir.path(),
            config_file: ".pre-commit-config.yaml",
        };
        let outcome = run_meta("identity", &files, &ctx).unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.output, "a.py\nb.py");
    }

    #[test]
    fn test_check_hooks_apply() {
        let (temp_dir, config, files) = setup(
            r#"
repos:
  - repo: https://github.com/MarcoGorelli/cython-lint
    rev: v0.16.0
    hooks:
      - id: cython-lint
        files: \.pyx$
      - id: double-quote-cython-strings
        files: \.pyx$
        always_run: true
  - repo: https://github.com/hhatto/autopep8
    rev: v2.0.4
    hooks:
      - id: autopep8
        files: \.py$
"#,
            &["cupy/__init__.py"],
        );
        let ctx = MetaContext {
            config: &config,
            all_files: &files,
            root: temp_dir.path(),
            config_file: ".pre-commit-config.yaml",
        };
        let outcome = run_meta("check-hooks-apply", &[], &ctx).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.output, "cython-lint does not apply to this repository");
    }

    #[test]
    fn test_check_useless_excludes() {
        let (temp_dir, config, files) = setup(
            r#"
exclude: ^vendor/
repos:
  - repo: https://github.com/hhatto/autopep8
    rev: v2.0.4
    hooks:
      - id: autopep8
        exclude: ^cupy/_version\.py$
      - id: autopep8-tests
        exclude: ^tests/
"#,
            &["cupy/__init__.py", "cupy/_version.py"],
        );
        let ctx = MetaContext {
            config: &config,
            all_files: &files,
            root: temp_dir.path(),
            config_file: ".pre-commit-config.yaml",
        };
        let outcome = run_meta("check-useless-excludes", &[], &ctx).unwrap();
        assert!(!outcome.passed);
        let lines: Vec<&str> = outcome.output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("global exclude pattern"));
        assert!(lines[1].contains("autopep8-tests"));
    }

    #[test]
    fn test_unknown_meta_hook_fails() {
        let (temp_dir, config, files) = setup("repos: []\n", &[]);
        let ctx = MetaContext {
            config: &config,
            all_files: &files,
            root: temp_dir.path(),
            config_file: ".pre-commit-config.yaml",
        };
        assert!(!run_meta("nope", &[], &ctx).unwrap().passed);
    }
}
