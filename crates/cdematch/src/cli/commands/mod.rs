//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod crf;
pub mod index;
pub mod init;
pub mod matching;
pub mod tags;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Returns true if the command reads merged configuration.
pub fn needs_config(command: &Commands) -> bool {
    !matches!(command, Commands::Init(_))
}

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
        Commands::Check => check::run(ctx),
        Commands::Tags(cmd) => tags::run(ctx, &cmd),
        Commands::Index(cmd) => index::run(ctx, &cmd),
        Commands::Match(cmd) => matching::run(ctx, &cmd),
        Commands::Crf(cmd) => crf::run(ctx, &cmd),
    }
}
