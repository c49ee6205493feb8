//! Tooling & Integration Layer
//!
//! Command line inspection of environment overrides.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, ScanRow, ScanStatus};
