//! Envlay CLI Binary
//!
//! Command-line inspection of environment-variable overrides.

use anyhow::Context;
use clap::Parser;
use envlay::logging::init_logging;
use envlay::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    init_logging(Some(&cli.logging_config())).context("Failed to initialize logging")?;

    let context = CliContext::from_process();
    let output = context.execute(&cli.command)?;
    println!("{}", output);
    Ok(())
}
