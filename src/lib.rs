//! # hookcheck
//!
//! Validate, inspect and run `.pre-commit-config.yaml` files.
//!
//! The configuration is modelled in [`model`], checked structurally in
//! [`validate`] (every repo names a `repo` and a `rev` unless it is `local`
//! or `meta`, every hook list is non-empty, every hook has an `id`, no
//! `(repo, id)` pair repeats), resolved against files in [`hooks`] and run
//! from the `hookcheck` binary.
//!
//! ```no_run
//! use hookcheck::validate::{ValidationOptions, validate_file};
//! use std::path::Path;
//!
//! let path = Path::new(".pre-commit-config.yaml");
//! let report = validate_file(path, &ValidationOptions::default())?;
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok::<(), hookcheck::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod hooks;
pub mod model;
pub mod shared;
pub mod validate;

pub use cli::{Cli, Output};
pub use config::{HookcheckConfig, Settings};
pub use error::{Error, Result};
pub use model::{HookRegistration, PreCommitConfig, RepoEntry, Stage, load_config};
pub use validate::{ValidationOptions, ValidationReport};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
