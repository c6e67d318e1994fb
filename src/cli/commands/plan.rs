use super::{Context, FileSelection, OutputFormat};
use crate::hooks::{Invocation, PlanOptions, RunPlan, SkipReason};
use crate::model::{PreCommitConfig, Stage};
use anyhow::Result;
use clap::Args;

#[derive(Args, Clone)]
pub struct PlanArgs {
    /// Only plan this hook id or alias
    pub hook: Option<String>,

    #[command(flatten)]
    pub selection: FileSelection,

    /// Stage to plan for
    #[arg(long, default_value_t = Stage::PreCommit)]
    pub hook_stage: Stage,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Resolve the plan shared by `plan` and `run`
pub(super) fn build_plan(
    ctx: &Context,
    workspace: &super::Workspace,
    config: &PreCommitConfig,
    hook: Option<&str>,
    stage: Stage,
    files: &[String],
) -> Result<RunPlan> {
    let mut options = PlanOptions::new(&workspace.root);
    options.stage = stage;
    options.hook_id = hook.map(String::from);
    options.config_file = workspace.config_file.clone();

    let mut plan = RunPlan::build(config, files, &options)?;
    plan.fail_fast |= ctx.settings.run.fail_fast;
    if let Some(id) = hook {
        if plan.hooks.is_empty() {
            anyhow::bail!("No hook with id `{id}`");
        }
    }
    Ok(plan)
}

pub async fn execute(args: PlanArgs, ctx: &Context) -> Result<()> {
    let workspace = ctx.workspace()?;
    let files = args.selection.resolve(&workspace)?;
    let config = ctx.load_hooks_config()?;
    let plan = build_plan(ctx, &workspace, &config, args.hook.as_deref(), args.hook_stage, &files)?;

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let output = &ctx.output;
    output.header(&format!(
        "{} plan for {} file(s)",
        plan.stage,
        files.len()
    ));
    for hook in &plan.hooks {
        match hook.skip {
            Some(SkipReason::Stage) => {
                output.table_row(&hook.id, &format!("skipped (not in {} stage)", plan.stage));
                continue;
            }
            Some(SkipReason::NoFiles) => {
                output.table_row(&hook.id, "skipped (no files to check)");
                continue;
            }
            None => {}
        }

        let how = match hook.invocation {
            Invocation::Command => format!("$ {}", hook.command_line()),
            Invocation::Pygrep => format!("pygrep {}", hook.entry.as_deref().unwrap_or_default()),
            Invocation::Fail => "fail".to_string(),
            Invocation::Meta => "meta check".to_string(),
            Invocation::Delegated => format!("delegated to {}", hook.repo),
        };
        let files_note = if hook.pass_filenames {
            format!("{} file(s)", hook.files.len())
        } else {
            "no filenames".to_string()
        };
        output.table_row(&hook.id, &format!("{how}  [{files_note}]"));
        if !hook.args.is_empty() && hook.invocation != Invocation::Command {
            output.indent(&format!("args: {}", hook.args.join(" ")));
        }
    }

    let runnable = plan.runnable().count();
    output.blank_line();
    output.info(&format!(
        "{runnable} of {} hook(s) would run{}",
        plan.hooks.len(),
        if plan.fail_fast { " (fail fast)" } else { "" }
    ));
    Ok(())
}
