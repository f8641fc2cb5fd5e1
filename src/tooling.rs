//! Tooling
//!
//! Command-line access to a repository on disk.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
