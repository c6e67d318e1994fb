//! Shared utilities
//!
//! File selection and file type identification used by planning, meta
//! hooks and the CLI.

pub mod filter;
pub mod tags;

pub use filter::{FileFilter, TagFilter};
pub use tags::{Tags, tags_from_path};
