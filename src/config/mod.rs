//! Tool settings
//!
//! Settings tune how `hookcheck` behaves (strictness, timeouts, which hooks
//! file to read); they are separate from the `.pre-commit-config.yaml` being
//! checked. Values are layered with figment, see [`HookcheckConfig`].

pub mod core;
pub mod formats;

pub use core::HookcheckConfig;
pub use formats::ConfigFormat;

use crate::hooks::ExecutorOptions;
use crate::validate::ValidationOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub general: GeneralSettings,
    pub validation: ValidationSettings,
    pub run: RunSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Styled terminal output
    pub color: bool,
    /// Hooks file used when `--config` is not given
    pub hooks_config: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSettings {
    pub strict: bool,
    pub mutable_revs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    pub timeout_secs: u64,
    pub fail_fast: bool,
    pub max_cmdline_len: usize,
}

impl Settings {
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            strict: self.validation.strict,
            mutable_revs: self.validation.mutable_revs.clone(),
        }
    }

    pub fn executor_options(&self) -> ExecutorOptions {
        ExecutorOptions {
            timeout: Duration::from_secs(self.run.timeout_secs),
            max_cmdline_len: self.run.max_cmdline_len,
            dry_run: false,
        }
    }
}
