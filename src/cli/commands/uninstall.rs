use super::Context;
use crate::model::Stage;
use anyhow::Result;
use clap::Args;

#[derive(Args, Clone)]
pub struct UninstallArgs {
    /// Hook types to remove [default: every stage]
    #[arg(short = 't', long = "hook-type")]
    pub hook_types: Vec<Stage>,
}

pub async fn execute(args: UninstallArgs, ctx: &Context) -> Result<()> {
    let output = &ctx.output;
    let workspace = ctx.workspace()?;
    let repo = workspace.git()?;

    let stages = if args.hook_types.is_empty() {
        Stage::ALL.to_vec()
    } else {
        args.hook_types
    };

    let mut removed = 0;
    for stage in stages {
        if repo.remove_hook(stage)? {
            removed += 1;
            output.success(&format!("Removed {stage} hook"));
        } else if repo.hook_path(stage).exists() {
            output.verbose(&format!("Leaving {stage} hook in place (not managed by hookcheck)"));
        }
    }

    if removed == 0 {
        output.info("No hookcheck hooks were installed");
    }
    Ok(())
}
