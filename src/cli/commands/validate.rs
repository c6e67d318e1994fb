use super::{Context, OutputFormat};
use crate::validate::{Severity, ValidationReport, validate_file};
use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Clone, Default)]
pub struct ValidateArgs {
    /// Files to validate [default: the hooks configuration]
    pub files: Vec<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: String,
    valid: bool,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

pub async fn execute(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let mut options = ctx.settings.validation_options();
    options.strict |= args.strict;

    let files = if args.files.is_empty() {
        vec![ctx.hooks_config_path()]
    } else {
        args.files
    };

    let mut reports = Vec::with_capacity(files.len());
    for file in &files {
        let report = validate_file(file, &options)?;
        reports.push((file.display().to_string(), report));
    }

    match args.format {
        OutputFormat::Json => {
            let json: Vec<FileReport> = reports
                .iter()
                .map(|(file, report)| FileReport {
                    file: file.clone(),
                    valid: report.is_valid(),
                    report,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            for (file, report) in &reports {
                print_report(ctx, file, report);
            }
        }
    }

    let invalid = reports.iter().filter(|(_, r)| !r.is_valid()).count();
    if invalid > 0 {
        bail!("{invalid} of {} configuration file(s) failed validation", reports.len());
    }
    Ok(())
}

fn print_report(ctx: &Context, file: &str, report: &ValidationReport) {
    let output = &ctx.output;
    for diagnostic in &report.diagnostics {
        let line = format!("{file}: {}: {}", diagnostic.location, diagnostic.message);
        match diagnostic.severity {
            Severity::Error => output.error(&line),
            Severity::Warning => output.warning(&line),
        }
    }

    if report.is_valid() {
        output.success(&format!(
            "{file}: {} repo(s), {} hook(s){}",
            report.repos,
            report.hooks,
            match report.warning_count() {
                0 => String::new(),
                n => format!(", {n} warning(s)"),
            }
        ));
    } else {
        output.error(&format!(
            "{file}: {} error(s), {} warning(s)",
            report.error_count(),
            report.warning_count()
        ));
    }
}
