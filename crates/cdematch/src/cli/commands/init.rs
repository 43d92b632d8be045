//! Implementation of `cdematch init`.

use std::{fs, process::ExitCode};

use cdematch_config::{CONFIG_FILENAME, global_config_path, global_template, local_template};

use crate::cli::{args::InitCommand, context::CommandContext, output::subheader};

/// Initializes a `.cdematch.toml` configuration file.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let cwd = &ctx.cwd;

    let global_path = global_config_path();
    let is_home_dir = global_path
        .as_ref()
        .ok()
        .and_then(|p| p.parent())
        .is_some_and(|home| home == cwd);

    let use_global = cmd.global || is_home_dir;
    if use_global && cmd.corpus.is_some() {
        eprintln!("error: --corpus applies only to project configuration");
        return ExitCode::FAILURE;
    }

    let config_path = if use_global {
        match global_path {
            Ok(path) => path,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        cwd.join(CONFIG_FILENAME)
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = if use_global {
        global_template()
    } else {
        local_template(cmd.corpus.as_deref())
    };

    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("{}", subheader("Configuration written:"));
    for line in template.lines() {
        println!("  {line}");
    }

    ExitCode::SUCCESS
}
