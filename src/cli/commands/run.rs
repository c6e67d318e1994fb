use super::plan::build_plan;
use super::{Context, FileSelection, OutputFormat, Workspace, relative_to};
use crate::git::GitRepo;
use crate::hooks::{HookExecutor, HookOutcome, HookStatus, MetaContext, RunSummary, SkipReason};
use crate::model::Stage;
use crate::validate::validate_file;
use anyhow::{Result, bail};
use clap::Args;
use console::Style;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Only run this hook id or alias
    pub hook: Option<String>,

    #[command(flatten)]
    pub selection: FileSelection,

    /// Stage to run
    #[arg(long, default_value_t = Stage::PreCommit)]
    pub hook_stage: Stage,

    /// Print what would run without running anything
    #[arg(long)]
    pub dry_run: bool,

    /// Stop after the first failing hook
    #[arg(long)]
    pub fail_fast: bool,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Arguments git passes to the hook script (after `--`)
    #[arg(last = true, value_name = "GIT_ARGS")]
    pub hook_args: Vec<String>,
}

pub async fn execute(args: RunArgs, ctx: &Context) -> Result<()> {
    let workspace = ctx.workspace()?;

    let options = ctx.settings.validation_options();
    let report = validate_file(&workspace.hooks_config, &options)?;
    if !report.is_valid() {
        for diagnostic in report.errors() {
            ctx.output.error(&diagnostic.to_string());
        }
        bail!(
            "{} is invalid, run `hookcheck validate` for details",
            workspace.config_file
        );
    }

    let config = ctx.load_hooks_config()?;
    let files = match git_hook_files(&args, &workspace)? {
        Some(files) => files,
        None => args.selection.resolve(&workspace)?,
    };
    let hook = args.hook.as_deref();
    let mut plan = build_plan(ctx, &workspace, &config, hook, args.hook_stage, &files)?;
    plan.fail_fast |= args.fail_fast;

    let all_files = workspace.all_files(&files)?;
    let meta = MetaContext {
        config: &config,
        all_files: &all_files,
        root: &workspace.root,
        config_file: &workspace.config_file,
    };

    let mut options = ctx.settings.executor_options();
    options.dry_run = args.dry_run;
    let executor = HookExecutor::new(&workspace.root, options);
    let summary = executor.run(&plan, &meta).await;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print_summary(ctx, &summary),
    }

    if summary.failed() {
        bail!("{} hook(s) failed", summary.count(HookStatus::is_failure));
    }
    Ok(())
}

/// Files implied by the arguments git hands a hook script, or `None` when
/// the regular file selection applies
fn git_hook_files(args: &RunArgs, workspace: &Workspace) -> Result<Option<Vec<String>>> {
    if args.hook_args.is_empty() || args.selection.is_explicit() {
        return Ok(None);
    }
    match args.hook_stage {
        // The only argument is the commit message file
        Stage::CommitMsg | Stage::PrepareCommitMsg => {
            let message_file = relative_to(&workspace.root, Path::new(&args.hook_args[0]));
            Ok(Some(vec![message_file]))
        }
        // `<remote> <url>` as arguments, the pushed refs on stdin
        Stage::PrePush => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            let updates = parse_push_updates(&input);
            Ok(Some(pushed_files(workspace.git()?, &updates)?))
        }
        // Revisions and flags only; hooks here run through `always_run`
        Stage::PostCheckout | Stage::PostMerge | Stage::PostRewrite => Ok(Some(Vec::new())),
        _ => Ok(None),
    }
}

/// One `<local ref> <local sha> <remote ref> <remote sha>` line of pre-push input
#[derive(Debug, Clone, PartialEq, Eq)]
struct PushUpdate {
    local_sha: String,
    remote_sha: String,
}

fn is_null_sha(sha: &str) -> bool {
    sha.chars().all(|c| c == '0')
}

fn parse_push_updates(input: &str) -> Vec<PushUpdate> {
    input
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [_, local_sha, _, remote_sha] => Some(PushUpdate {
                    local_sha: local_sha.to_string(),
                    remote_sha: remote_sha.to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}

/// Files touched by the pushed commits. Branch deletions contribute
/// nothing; a new branch or an unknown remote tip falls back to every
/// tracked file.
fn pushed_files(repo: &GitRepo, updates: &[PushUpdate]) -> Result<Vec<String>> {
    let mut files = BTreeSet::new();
    for update in updates.iter().filter(|u| !is_null_sha(&u.local_sha)) {
        let changed = if is_null_sha(&update.remote_sha) {
            repo.tracked_files()?
        } else {
            match repo.changed_files(&update.remote_sha, &update.local_sha) {
                Ok(changed) => changed,
                Err(e) => {
                    tracing::warn!("Cannot diff {}: {e}", update.remote_sha);
                    repo.tracked_files()?
                }
            }
        };
        files.extend(changed);
    }
    tracing::debug!("{} file(s) in pushed commits", files.len());
    Ok(files.into_iter().collect())
}

fn print_summary(ctx: &Context, summary: &RunSummary) {
    for outcome in &summary.outcomes {
        print_outcome(ctx, outcome);
    }
    tracing::info!(
        "{} passed, {} failed, {} skipped",
        summary.count(|s| matches!(s, HookStatus::Passed)),
        summary.count(HookStatus::is_failure),
        summary.count(|s| matches!(s, HookStatus::Skipped { .. }))
    );
}

fn print_outcome(ctx: &Context, outcome: &HookOutcome) {
    let output = &ctx.output;
    let name = outcome.name.as_str();
    match &outcome.status {
        // Hooks for other stages are not part of this run
        HookStatus::Skipped {
            reason: SkipReason::Stage,
        } => {}
        HookStatus::Skipped {
            reason: SkipReason::NoFiles,
        } => {
            let style = Style::new().black().on_cyan();
            output.run_line(name, Some("no files to check"), "Skipped", &style)
        }
        HookStatus::Delegated => {
            output.run_line(name, Some("remote"), "Delegated", &Style::new().yellow())
        }
        HookStatus::NotRun => output.run_line(name, None, "Not run", &Style::new().dim()),
        HookStatus::Planned => {
            output.run_line(name, None, "Planned", &Style::new().cyan());
            if !outcome.output.is_empty() {
                output.indent(&format!("$ {}", outcome.output));
            }
        }
        HookStatus::Passed => {
            output.run_line(name, None, "Passed", &Style::new().green());
            if outcome.verbose {
                print_details(ctx, outcome, None);
            }
        }
        HookStatus::Failed { exit_code } => {
            output.run_line(name, None, "Failed", &Style::new().red());
            print_details(ctx, outcome, Some(*exit_code));
        }
    }
}

fn print_details(ctx: &Context, outcome: &HookOutcome, exit_code: Option<Option<i32>>) {
    // Failure details bypass --quiet
    println!("- hook id: {}", outcome.id);
    if outcome.verbose {
        println!("- duration: {:.2}s", outcome.duration_ms as f64 / 1000.0);
    }
    if let Some(Some(code)) = exit_code {
        println!("- exit code: {code}");
    }
    if !outcome.output.is_empty() {
        println!();
        println!("{}", outcome.output);
        println!();
    }
    ctx.output.verbose(&format!("{} file(s) checked", outcome.files));
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL: &str = "3f2a9c1d5e6b7a8c9d0e1f2a3b4c5d6e7f8a9b0c";
    const REMOTE: &str = "1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b";
    const NULL: &str = "0000000000000000000000000000000000000000";

    #[test]
    fn test_parse_push_updates() {
        let input = format!(
            "refs/heads/main {LOCAL} refs/heads/main {REMOTE}\n\
             refs/heads/gone {NULL} refs/heads/gone {REMOTE}\n\
             garbage line\n"
        );
        let updates = parse_push_updates(&input);
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].local_sha, LOCAL);
        assert_eq!(updates[0].remote_sha, REMOTE);
        assert!(is_null_sha(&updates[1].local_sha));
        assert!(!is_null_sha(&updates[0].remote_sha));
    }

    #[test]
    fn test_parse_push_updates_empty_input() {
        assert!(parse_push_updates("").is_empty());
    }
}
