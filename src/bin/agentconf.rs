//! agentconf CLI Binary
//!
//! Command-line interface for the agent configuration repository.

use agentconf::logging::init_logging;
use agentconf::tooling::cli::{load_settings, Cli, CliContext};
use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(&cli).context("Failed to load settings")?;
    init_logging(Some(&settings.logging)).context("Failed to initialize logging")?;

    let context = CliContext::new(settings, cli.plugins.as_deref())
        .context("Failed to open configuration repository")?;
    let output = context.execute(&cli.command)?;
    println!("{}", output);
    Ok(())
}
