use super::Context;
use crate::config::formats::highlight;
use anyhow::{Context as _, Result};
use clap::Args;

#[derive(Args, Clone)]
pub struct ShowArgs {
    /// Print the file as written instead of the normalized form
    #[arg(long)]
    pub raw: bool,
}

pub async fn execute(args: ShowArgs, ctx: &Context) -> Result<()> {
    let path = ctx.hooks_config_path();
    let content = if args.raw {
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        ctx.load_hooks_config()?.to_yaml_string()?
    };

    ctx.output.verbose(&format!("Showing {}", path.display()));
    match highlight(&content, "yaml") {
        Some(highlighted) => print!("{highlighted}"),
        None => print!("{content}"),
    }
    Ok(())
}
