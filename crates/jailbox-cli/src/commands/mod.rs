//! CLI command definitions and dispatch.

pub mod run;

use clap::{Parser, Subcommand};

/// Jailbox — minimal isolated execution of a command from a pulled image.
#[derive(Parser, Debug)]
#[command(name = "jbx", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pull an image and run a command inside its root filesystem.
    Run(run::RunArgs),
}

/// Dispatches the parsed CLI command, returning the process exit code.
///
/// # Errors
///
/// Returns an error if the command execution fails before launch.
pub fn execute(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Command::Run(args) => run::execute(args),
    }
}
