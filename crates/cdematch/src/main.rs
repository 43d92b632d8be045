//! cdematch: find previously catalogued questions that match a new question.
//!
//! Questions are reduced to tag sets (words plus a few phrase patterns), and a new question
//! is matched against a corpus of catalogued questions by rarity-weighted tag overlap.

mod cli;

use std::process::ExitCode;

use cli::{CommandContext, args::parse_cli, commands, init_logging};

fn main() -> ExitCode {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let ctx = if commands::needs_config(&cli.command) {
        CommandContext::load()
    } else {
        CommandContext::load_cwd_only()
    };
    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}
