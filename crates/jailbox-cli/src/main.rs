//! # jbx — Jailbox CLI
//!
//! Pulls a container image from Docker Hub and runs a single command
//! confined to the resulting root filesystem.

mod commands;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let code = commands::execute(cli)?;
    std::process::exit(code)
}
