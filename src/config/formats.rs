use super::core::HookcheckConfig;
use crate::error::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl HookcheckConfig {
    /// Export the merged settings in the given format
    pub fn export_config(&self, format: ConfigFormat) -> Result<String> {
        let config: serde_json::Value = self.get_full_config()?;

        let export_error = |message: String| Error::Export {
            format: format.to_string(),
            message,
        };
        match format {
            ConfigFormat::Json => {
                serde_json::to_string_pretty(&config).map_err(|e| export_error(e.to_string()))
            }
            ConfigFormat::Toml => {
                toml::to_string_pretty(&config).map_err(|e| export_error(e.to_string()))
            }
            ConfigFormat::Yaml => {
                serde_yml::to_string(&config).map_err(|e| export_error(e.to_string()))
            }
        }
    }

    /// Export with syntax highlighting when stdout is a terminal
    pub fn export_config_highlighted(&self, format: ConfigFormat) -> Result<String> {
        let output = self.export_config(format)?;
        Ok(highlight(&output, format.extension()).unwrap_or(output))
    }
}

/// Highlight `content` for the terminal. `None` when stdout is not a tty or
/// the syntax is unknown.
pub fn highlight(content: &str, extension: &str) -> Option<String> {
    use syntect::easy::HighlightLines;
    use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};
    use two_face::theme::EmbeddedThemeName;

    if !atty::is(atty::Stream::Stdout) || !console::colors_enabled() {
        return None;
    }

    let syntax_set = two_face::syntax::extra_newlines();
    let theme_set = two_face::theme::extra();
    let syntax = syntax_set.find_syntax_by_extension(extension)?;
    let theme = theme_set.get(EmbeddedThemeName::Base16OceanDark);
    let mut highlighter = HighlightLines::new(syntax, theme);

    let mut highlighted = String::new();
    for line in LinesWithEndings::from(content) {
        let ranges = highlighter.highlight_line(line, &syntax_set).ok()?;
        highlighted.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
    }
    highlighted.push_str("\x1b[0m");
    Some(highlighted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_export_formats() {
        let config = HookcheckConfig::load().unwrap();

        let json_output = config.export_config(ConfigFormat::Json).unwrap();
        assert!(json_output.contains("\"hooks_config\""));

        let toml_output = config.export_config(ConfigFormat::Toml).unwrap();
        assert!(toml_output.contains("[run]"));

        let yaml_output = config.export_config(ConfigFormat::Yaml).unwrap();
        assert!(yaml_output.contains("validation:"));
    }

    #[test]
    fn test_syntax_highlighting() {
        let config = HookcheckConfig::load().unwrap();

        // Falls back to plain text outside a terminal
        let highlighted = config.export_config_highlighted(ConfigFormat::Json);
        assert!(highlighted.is_ok());
    }
}
