use super::Context;
use crate::config::{ConfigFormat, formats::highlight};
use anyhow::Result;
use clap::Args;

#[derive(Args, Clone)]
pub struct SettingsArgs {
    /// Only print this section, e.g. `run` or `validation.mutable_revs`
    pub section: Option<String>,

    #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
    pub format: ConfigFormat,
}

pub async fn execute(args: SettingsArgs, ctx: &Context) -> Result<()> {
    let Some(section) = args.section else {
        print!("{}", ctx.config.export_config_highlighted(args.format)?);
        return Ok(());
    };

    let value = ctx.config.get_section(&section)?;
    // Scalars and lists cannot be a TOML document on their own
    let rendered = match (args.format, value.is_object()) {
        (ConfigFormat::Toml, true) => toml::to_string_pretty(&value)?,
        (ConfigFormat::Yaml, _) => serde_yml::to_string(&value)?,
        _ => format!("{}\n", serde_json::to_string_pretty(&value)?),
    };
    let extension = match (args.format, value.is_object()) {
        (ConfigFormat::Toml, true) => "toml",
        (ConfigFormat::Yaml, _) => "yaml",
        _ => "json",
    };
    match highlight(&rendered, extension) {
        Some(highlighted) => print!("{highlighted}"),
        None => print!("{rendered}"),
    }
    Ok(())
}
