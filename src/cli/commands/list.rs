use super::{Context, OutputFormat};
use anyhow::Result;
use clap::Args;
use serde::Serialize;

#[derive(Args, Clone)]
pub struct ListArgs {
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct ListedHook<'a> {
    repo: &'a str,
    rev: Option<&'a str>,
    id: &'a str,
    name: &'a str,
    language: Option<&'a str>,
    stages: Vec<String>,
}

pub async fn execute(args: ListArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load_hooks_config()?;
    let defaults = config.default_stages.as_deref();

    let hooks: Vec<ListedHook> = config
        .hooks()
        .map(|(entry, hook)| ListedHook {
            repo: &entry.repo,
            rev: entry.rev.as_deref(),
            id: &hook.id,
            name: hook.display_name(),
            language: hook.language.as_deref(),
            stages: hook
                .effective_stages(defaults)
                .map(|stages| stages.iter().map(ToString::to_string).collect())
                .unwrap_or_default(),
        })
        .collect();

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&hooks)?);
        return Ok(());
    }

    let output = &ctx.output;
    let mut current_repo = None;
    for hook in &hooks {
        if current_repo != Some((hook.repo, hook.rev)) {
            current_repo = Some((hook.repo, hook.rev));
            match hook.rev {
                Some(rev) => output.category(&format!("{} @ {rev}", hook.repo)),
                None => output.category(hook.repo),
            }
        }
        let mut details = Vec::new();
        if hook.name != hook.id {
            details.push(hook.name.to_string());
        }
        if let Some(language) = hook.language {
            details.push(format!("[{language}]"));
        }
        if !hook.stages.is_empty() {
            details.push(format!("stages: {}", hook.stages.join(", ")));
        }
        output.table_row(hook.id, &details.join(" "));
    }
    output.blank_line();
    output.info(&format!(
        "{} hook(s) in {} repo(s)",
        config.hook_count(),
        config.repos.len()
    ));
    Ok(())
}
