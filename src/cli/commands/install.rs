use super::Context;
use crate::git::{InstallOutcome, hook_script};
use crate::model::Stage;
use anyhow::{Result, bail};
use clap::Args;

#[derive(Args, Clone)]
pub struct InstallArgs {
    /// Hook types to install
    #[arg(short = 't', long = "hook-type", default_values_t = [Stage::PreCommit])]
    pub hook_types: Vec<Stage>,

    /// Overwrite existing hooks not written by hookcheck
    #[arg(long)]
    pub force: bool,
}

pub async fn execute(args: InstallArgs, ctx: &Context) -> Result<()> {
    let output = &ctx.output;
    let workspace = ctx.workspace()?;
    let repo = workspace.git()?;

    if args.hook_types.contains(&Stage::Manual) {
        bail!("`manual` is not a git hook and cannot be installed");
    }
    if !workspace.hooks_config.exists() {
        output.warning(&format!(
            "{} does not exist yet; hooks will fail until it is created",
            workspace.config_file
        ));
    }

    output.header("Installing hooks");
    let mut skipped = 0;
    for stage in &args.hook_types {
        let script = hook_script(*stage, &workspace.config_file);
        let verb = if repo.hook_installed(*stage) {
            "refreshed"
        } else {
            "installed"
        };
        match repo.install_hook(*stage, &script, args.force)? {
            InstallOutcome::Installed => {
                let hook_path = repo.hook_path(*stage);
                output.success(&format!("{stage} {verb} at {}", hook_path.display()))
            }
            InstallOutcome::Exists => {
                skipped += 1;
                output.warning(&format!(
                    "{} already has a hook not managed by hookcheck (use --force to replace it)",
                    stage
                ));
            }
        }
    }

    if skipped > 0 {
        bail!("{skipped} hook(s) were not installed");
    }
    Ok(())
}
