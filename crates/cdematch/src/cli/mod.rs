//! CLI support for the `cdematch` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod output;

use std::io;

pub use context::CommandContext;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `-v` raises the level from WARN to DEBUG, and
/// `-vv` to TRACE.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("warning: could not install logger: {e}");
    }
}
