use super::Context;
use crate::validate::{LANGUAGES, META_HOOKS};
use anyhow::Result;
use clap::Args;

#[derive(Args, Clone)]
pub struct VersionArgs {
    /// Print only the version number
    #[arg(long)]
    pub short: bool,
}

pub async fn execute(args: VersionArgs, ctx: &Context) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");

    if args.short {
        println!("{version}");
        return Ok(());
    }

    let output = &ctx.output;
    output.header("hookcheck version information");
    output.status_indicator("VERSION", &format!("{name} v{version}"), true);
    output.blank_line();

    output.category("About");
    output.key_value("Description:", env!("CARGO_PKG_DESCRIPTION"), false);
    output.key_value("Authors:", env!("CARGO_PKG_AUTHORS"), false);

    output.category("Support");
    output.key_value("Languages:", &LANGUAGES.len().to_string(), false);
    output.key_value("Meta hooks:", &META_HOOKS.join(", "), false);

    output.category("Build Information");
    output.key_value("Target:", std::env::consts::ARCH, false);
    output.key_value("Profile:", if cfg!(debug_assertions) { "debug" } else { "release" }, false);
    output.blank_line();
    Ok(())
}
