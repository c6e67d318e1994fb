//! Terminal output for hookcheck
//!
//! Styled status lines in the same vocabulary across commands. Colors follow
//! `console`'s global switch, which `general.color` and non-tty detection
//! turn off.

use console::{Style, style};

/// Column width of the dotted `name....Passed` run lines
const RUN_LINE_WIDTH: usize = 79;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Errors are always shown, even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a message only in verbose mode
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn category(&self, category: &str) {
        if !self.quiet {
            println!("\n{}", style(category).bold().cyan());
        }
    }

    pub fn indent(&self, message: &str) {
        if !self.quiet {
            for line in message.lines() {
                println!("    {line}");
            }
        }
    }

    pub fn table_row(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<24} {}", style(key).dim(), value);
        }
    }

    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        if !self.quiet {
            let styled_value = if highlight {
                style(value).green().bold()
            } else {
                style(value).white()
            };
            println!("  {} {}", style(key).dim(), styled_value);
        }
    }

    pub fn status_indicator(&self, status: &str, message: &str, is_success: bool) {
        if !self.quiet {
            let (icon, color) = if is_success {
                ("✓", style(status).green())
            } else {
                ("✗", style(status).red())
            };
            println!("{} {} {}", style(icon).bold(), color.bold(), message);
        }
    }

    /// One `name.....Status` line per hook. Failures are printed in quiet
    /// mode too so a failing commit always says why.
    pub fn run_line(&self, name: &str, suffix: Option<&str>, status: &str, color: &Style) {
        if self.quiet && status != "Failed" {
            return;
        }
        let suffix = suffix.map(|s| format!("({s})")).unwrap_or_default();
        let used = name.chars().count() + suffix.chars().count() + status.len();
        let dots = ".".repeat(RUN_LINE_WIDTH.saturating_sub(used).max(3));
        println!("{name}{dots}{}{}", style(suffix).dim(), color.apply_to(status));
    }

    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }
}
