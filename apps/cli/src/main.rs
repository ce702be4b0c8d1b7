//! upskill CLI: turn job postings into a skill-gap tracker.
//!
//! Extracts skills from a posting URL or pasted text and records them in the
//! tracker database; `--watch` drains the mobile job inbox instead.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
