//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod helpers;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};

use miette::Result;

/// Dispatch a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Qa(args) => commands::qa::run(args, &global),
        Commands::Generate(args) => commands::generate::run(args, &global),
        Commands::Curriculum(cmd) => commands::curriculum::run(cmd, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
