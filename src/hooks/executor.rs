use super::meta::{MetaContext, run_meta};
use super::plan::{Invocation, PlannedHook, RunPlan, SkipReason};
use crate::error::{Error, Result};
use regex::RegexBuilder;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    /// Per-batch process timeout
    pub timeout: Duration,
    /// Upper bound for one command line including filenames
    pub max_cmdline_len: usize,
    pub dry_run: bool,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            max_cmdline_len: 32_768,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HookStatus {
    Passed,
    Failed { exit_code: Option<i32> },
    Skipped { reason: SkipReason },
    /// Remote hook left to the external runner
    Delegated,
    /// Would have run
    Planned,
    /// Not attempted because an earlier hook failed under `fail_fast`
    NotRun,
}

impl HookStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, HookStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HookOutcome {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub status: HookStatus,
    pub files: usize,
    pub output: String,
    pub duration_ms: u128,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<HookOutcome>,
}

impl RunSummary {
    pub fn failed(&self) -> bool {
        self.outcomes.iter().any(|o| o.status.is_failure())
    }

    pub fn count(&self, predicate: impl Fn(&HookStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(&o.status)).count()
    }
}

/// Runs the in-tree part of a [`RunPlan`]
pub struct HookExecutor {
    root: PathBuf,
    options: ExecutorOptions,
}

impl HookExecutor {
    pub fn new(root: impl Into<PathBuf>, options: ExecutorOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Execute hooks in plan order. Individual hook errors (missing
    /// executables, timeouts) become failed outcomes rather than aborting.
    pub async fn run(&self, plan: &RunPlan, meta: &MetaContext<'_>) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut halted = false;

        for hook in &plan.hooks {
            let started = Instant::now();
            let (status, output) = if let Some(reason) = hook.skip {
                (HookStatus::Skipped { reason }, String::new())
            } else if halted {
                (HookStatus::NotRun, String::new())
            } else if hook.invocation == Invocation::Delegated {
                (HookStatus::Delegated, String::new())
            } else if self.options.dry_run {
                (HookStatus::Planned, hook.command_line())
            } else {
                tracing::info!("Running {} on {} file(s)", hook.id, hook.files.len());
                match self.execute(hook, meta).await {
                    Ok(result) => result,
                    Err(e) => (HookStatus::Failed { exit_code: None }, e.to_string()),
                }
            };

            if status.is_failure() {
                tracing::warn!("Hook {} failed", hook.id);
                halted = plan.fail_fast;
            }

            summary.outcomes.push(HookOutcome {
                id: hook.id.clone(),
                name: hook.name.clone(),
                status,
                files: hook.files.len(),
                output,
                duration_ms: started.elapsed().as_millis(),
                verbose: hook.verbose,
            });
        }

        summary
    }

    async fn execute(
        &self,
        hook: &PlannedHook,
        meta: &MetaContext<'_>,
    ) -> Result<(HookStatus, String)> {
        match hook.invocation {
            Invocation::Command => self.run_command(hook).await,
            Invocation::Pygrep => self.run_pygrep(hook),
            Invocation::Fail => {
                let mut output = hook.entry.clone().unwrap_or_default();
                for file in &hook.files {
                    output.push('\n');
                    output.push_str(file);
                }
                Ok((HookStatus::Failed { exit_code: Some(1) }, output))
            }
            Invocation::Meta => {
                let outcome = run_meta(&hook.id, &hook.files, meta)?;
                let status = if outcome.passed {
                    HookStatus::Passed
                } else {
                    HookStatus::Failed { exit_code: Some(1) }
                };
                Ok((status, outcome.output))
            }
            Invocation::Delegated => Ok((HookStatus::Delegated, String::new())),
        }
    }

    async fn run_command(&self, hook: &PlannedHook) -> Result<(HookStatus, String)> {
        let program = self.resolve_program(&hook.command[0])?;
        let batches = if hook.pass_filenames {
            partition(&hook.command, &hook.files, self.options.max_cmdline_len)
        } else {
            vec![&hook.files[..0]]
        };

        let mut output = String::new();
        let mut exit_code = 0;
        for batch in batches {
            tracing::debug!("{}: {} {} file(s)", hook.id, program.display(), batch.len());
            let mut command = Command::new(&program);
            command
                .args(&hook.command[1..])
                .args(batch)
                .current_dir(&self.root)
                .stdin(Stdio::null())
                .kill_on_drop(true);

            // Earlier batches already produced output worth keeping
            let result = match tokio::time::timeout(self.options.timeout, command.output()).await {
                Ok(Ok(result)) => result,
                Ok(Err(source)) => {
                    let error = Error::Spawn {
                        program: program.display().to_string(),
                        source,
                    };
                    return Ok(batch_failure(output, &error));
                }
                Err(_) => {
                    let error = Error::Timeout {
                        id: hook.id.clone(),
                        timeout: self.options.timeout,
                    };
                    return Ok(batch_failure(output, &error));
                }
            };

            output.push_str(&String::from_utf8_lossy(&result.stdout));
            output.push_str(&String::from_utf8_lossy(&result.stderr));
            if !result.status.success() {
                exit_code = result.status.code().unwrap_or(1);
            }
        }

        let status = if exit_code == 0 {
            HookStatus::Passed
        } else {
            HookStatus::Failed {
                exit_code: Some(exit_code),
            }
        };
        Ok((status, output.trim_end().to_string()))
    }

    /// Paths are relative to the repository root; bare names go through PATH
    fn resolve_program(&self, program: &str) -> Result<PathBuf> {
        if program.contains('/') {
            let path = Path::new(program);
            return Ok(if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.root.join(path)
            });
        }
        which::which(program).map_err(|e| Error::Spawn {
            program: program.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()),
        })
    }

    fn run_pygrep(&self, hook: &PlannedHook) -> Result<(HookStatus, String)> {
        let flag = |names: &[&str]| hook.args.iter().any(|a| names.contains(&a.as_str()));
        let ignore_case = flag(&["-i", "--ignore-case"]);
        let multiline = flag(&["--multiline"]);
        let negate = flag(&["--negate"]);

        let pattern = hook.entry.as_deref().unwrap_or_default();
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .multi_line(multiline)
            .build()
            .map_err(|source| Error::Regex {
                field: "entry".to_string(),
                source,
            })?;

        let mut report = Vec::new();
        for file in &hook.files {
            let path = self.root.join(file);
            let bytes = std::fs::read(&path).map_err(|e| Error::io(&path, e))?;
            let content = String::from_utf8_lossy(&bytes);

            if negate {
                if !regex.is_match(&content) {
                    report.push(file.clone());
                }
            } else if multiline {
                if let Some(found) = regex.find(&content) {
                    let line = content[..found.start()].matches('\n').count() + 1;
                    report.push(format!("{file}:{line}:{}", found.as_str()));
                }
            } else {
                for (index, line) in content.lines().enumerate() {
                    if regex.is_match(line) {
                        report.push(format!("{file}:{}:{line}", index + 1));
                    }
                }
            }
        }

        let status = if report.is_empty() {
            HookStatus::Passed
        } else {
            HookStatus::Failed { exit_code: Some(1) }
        };
        Ok((status, report.join("\n")))
    }
}

fn batch_failure(output: String, error: &Error) -> (HookStatus, String) {
    tracing::warn!("{error}");
    let kept = output.trim_end();
    let output = if kept.is_empty() {
        error.to_string()
    } else {
        format!("{kept}\n{error}")
    };
    (HookStatus::Failed { exit_code: None }, output)
}

/// Split `files` so each command line (`base` + batch) stays within
/// `max_len` bytes. A batch always holds at least one file, and an empty
/// file list yields a single empty batch.
pub fn partition<'a>(base: &[String], files: &'a [String], max_len: usize) -> Vec<&'a [String]> {
    let base_len: usize = base.iter().map(|arg| arg.len() + 1).sum();
    let mut batches = Vec::new();
    let mut start = 0;
    let mut current = base_len;

    for (index, file) in files.iter().enumerate() {
        let cost = file.len() + 1;
        if index > start && current + cost > max_len {
            batches.push(&files[start..index]);
            start = index;
            current = base_len;
        }
        current += cost;
    }
    if start < files.len() || batches.is_empty() {
        batches.push(&files[start..]);
    }
    batches
}
