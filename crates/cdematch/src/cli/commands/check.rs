//! Implementation of `cdematch check`.

use std::process::ExitCode;

use cdematch_config::{ConfigSources, ConfigWarning};

use crate::cli::{
    context::CommandContext,
    output::{dim, header, warning},
};

/// Exit codes for `cdematch check`.
mod exit_codes {
    use std::process::ExitCode;

    /// Configuration is valid with no warnings.
    pub const OK: ExitCode = ExitCode::SUCCESS;
    /// Configuration has warnings but is usable.
    pub const WARNINGS: ExitCode = ExitCode::FAILURE;
}

/// Validates configuration and reports problems.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let sources = ConfigSources::discover(&ctx.cwd);

    println!("{}", header("Configuration"));
    println!();

    if sources.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!("Run 'cdematch init' to create a configuration file.");
        return exit_codes::OK;
    }

    println!("Config files (highest precedence first):");
    for path in &sources.project {
        println!("  {}", path.display());
    }
    if let Some(ref global) = sources.global {
        println!("  {} {}", global.display(), dim("(global)"));
    }
    println!();

    let config = &ctx.config;
    println!("Corpus:");
    match config.corpus.path {
        Some(ref path) => {
            let status = if path.is_file() { "ok" } else { "missing" };
            println!("  [{status}] {}", path.display());
        }
        None => println!("  {}", dim("(none configured)")),
    }
    if let Some(ref partition) = config.corpus.partition {
        println!("  partition: {partition}");
    }
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return exit_codes::OK;
    }

    println!("{}", warning(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("  - {w}");
    }
    println!();

    print_hints(&warnings);

    exit_codes::WARNINGS
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|w| match w {
            ConfigWarning::NoCorpusConfigured => {
                "Set [corpus] path to a JSON-lines file of catalogued questions."
            }
            ConfigWarning::CorpusPathMissing { .. } => {
                "Create the corpus file or update [corpus] path."
            }
            ConfigWarning::CorpusPathNotFile { .. } => {
                "The corpus path must point to a file, not a directory."
            }
            ConfigWarning::ZeroMatchLimit => "Set [match] limit to 1 or more.",
            ConfigWarning::NegativeMinScore { .. } => {
                "Linear scores are never negative; use 0.0 or leave min_score unset."
            }
            ConfigWarning::ExcludeKeepConflict { .. } => {
                "Remove the tag from either [tags] exclude or [tags] keep."
            }
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();

    if !hints.is_empty() {
        println!("Hints:");
        for hint in hints {
            println!("  - {hint}");
        }
    }
}
