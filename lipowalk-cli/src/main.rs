//! ## lipowalk-cli
//! **Command-line entry point**
//!
//! `lipowalk simulate [N]` runs one simulation, `lipowalk sweep [N]` runs the
//! paired `(m, tmax)` plan and `lipowalk analyze` aggregates written runs.

use clap::Parser;

mod commands;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run_command(cli)
}
