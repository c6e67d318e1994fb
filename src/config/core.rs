use crate::error::Result;
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use std::path::Path;

// Embed the default settings at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Layered settings: defaults, user file, repository file, explicit file,
/// then `HOOKCHECK_` environment variables
pub struct HookcheckConfig {
    figment: Figment,
}

impl HookcheckConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        tracing::trace!("Loading settings (custom: {:?})", custom_config);
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(user_dir) = Self::user_config_dir() {
            figment = figment
                .merge(Toml::file(user_dir.join("config.toml")))
                .merge(Yaml::file(user_dir.join("config.yaml")))
                .merge(Yaml::file(user_dir.join("config.yml")));
        }

        figment = figment
            .merge(Toml::file("hookcheck.toml"))
            .merge(Yaml::file("hookcheck.yaml"))
            .merge(Yaml::file("hookcheck.yml"));

        if let Some(custom_path) = custom_config {
            if !Path::new(custom_path).exists() {
                tracing::warn!("Settings file {} not found, using defaults", custom_path);
            }
            figment = match Path::new(custom_path).extension().and_then(|e| e.to_str()) {
                Some("yaml" | "yml") => figment.merge(Yaml::file(custom_path)),
                Some("json") => figment.merge(Json::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("HOOKCHECK_").split("__"));

        Ok(HookcheckConfig { figment })
    }

    /// Typed view of the merged settings
    pub fn settings(&self) -> Result<super::Settings> {
        Ok(self.figment.extract()?)
    }

    /// Get a nested object/section as JSON
    pub fn get_section(&self, path: &str) -> Result<serde_json::Value> {
        Ok(self.figment.extract_inner(path)?)
    }

    /// Get the full merged configuration as a structured value
    pub fn get_full_config(&self) -> Result<serde_json::Value> {
        Ok(self.figment.extract()?)
    }

    fn user_config_dir() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hookcheck"))
    }
}
