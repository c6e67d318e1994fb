use super::PreCommitConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// File name the external runner looks for at the repository root
pub const DEFAULT_CONFIG_FILE: &str = ".pre-commit-config.yaml";

/// Read and deserialize a configuration file.
///
/// This only checks that the document has the right shape for the typed
/// model; run [`crate::validate::validate_str`] first to get a complete list
/// of problems instead of the first deserialization error.
pub fn load_config(path: &Path) -> Result<PreCommitConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    tracing::debug!("Loaded {} bytes from {}", content.len(), path.display());
    PreCommitConfig::parse(&content, &path.display().to_string())
}

impl PreCommitConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::parse(content, "configuration")
    }

    fn parse(content: &str, origin: &str) -> Result<Self> {
        serde_yml::from_str(content).map_err(|source| Error::Yaml {
            origin: origin.to_string(),
            source,
        })
    }

    /// Serialize back to YAML using the same key names
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yml::to_string(self).map_err(|source| Error::Yaml {
            origin: "configuration".to_string(),
            source,
        })
    }
}
