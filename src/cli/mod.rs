//! Command-line interface for hookcheck
//!
//! Argument parsing lives in [`commands`]; [`Output`] keeps the terminal
//! vocabulary consistent across them.

pub mod commands;
mod output;

pub use commands::Cli;
pub use output::Output;
