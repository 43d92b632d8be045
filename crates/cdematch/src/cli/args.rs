//! Clap argument definitions for the `cdematch` CLI.

use std::{env, path::PathBuf, process::exit};

use cdematch_config::RarityTransform;
use clap::{Args, CommandFactory, Parser, Subcommand, error::ErrorKind};

/// Parse a rarity transform from a string.
fn parse_rarity(s: &str) -> Result<RarityTransform, String> {
    s.parse()
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "cdematch")]
#[command(about = "Match questions against a corpus of catalogued data elements")]
pub struct Cli {
    /// Verbosity level (-v for debug logs, -vv for trace logs)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared flags selecting the corpus to read.
#[derive(Args, Debug, Clone, Default)]
pub struct CorpusArgs {
    /// Corpus file to read instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub corpus: Option<PathBuf>,

    /// Count tag frequencies over this source only; matches still come from every source
    #[arg(short = 'p', long)]
    pub partition: Option<String>,
}

/// Shared flags that override `[match]` settings.
#[derive(Args, Debug, Clone, Default)]
pub struct MatchArgs {
    /// Maximum matches per question [default: 10]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Drop matches scoring below this value
    #[arg(long)]
    pub min_score: Option<f32>,

    /// Rarity weighting: linear or tangent [default: linear]
    #[arg(long, value_parser = parse_rarity)]
    pub rarity: Option<RarityTransform>,

    /// Show each match's tags
    #[arg(long)]
    pub show_tags: bool,
}

/// Arguments for `cdematch init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.cdematch.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,

    /// Write this corpus file as the live [corpus] path
    #[arg(long, value_name = "PATH", conflicts_with = "global")]
    pub corpus: Option<String>,
}

/// Arguments for `cdematch tags`.
#[derive(Args, Debug, Clone)]
pub struct TagsCommand {
    /// Question text (multiple words are joined with spaces)
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `cdematch index`.
#[derive(Args, Debug, Clone)]
pub struct IndexCommand {
    #[command(flatten)]
    /// Corpus selection.
    pub corpus: CorpusArgs,

    /// Number of rarest and most common tags to show
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `cdematch match`.
#[derive(Args, Debug, Clone)]
pub struct MatchCommand {
    /// Question text (multiple words are joined with spaces)
    #[arg(required = true)]
    pub query: Vec<String>,

    #[command(flatten)]
    /// Corpus selection.
    pub corpus: CorpusArgs,

    #[command(flatten)]
    /// Ranking overrides.
    pub params: MatchArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `cdematch crf`.
#[derive(Args, Debug, Clone)]
pub struct CrfCommand {
    /// Directory of CRF JSON files (searched recursively)
    pub dir: PathBuf,

    #[command(flatten)]
    /// Corpus selection.
    pub corpus: CorpusArgs,

    #[command(flatten)]
    /// Ranking overrides.
    pub params: MatchArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Supported `cdematch` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize cdematch configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,

    /// Validate configuration and diagnose issues
    Check,

    /// Show the tags extracted from a question
    Tags(TagsCommand),

    /// Build the tag frequency index and summarize it
    Index(IndexCommand),

    /// Find catalogued questions matching a question
    #[command(after_help = "\
SCORING:
  Candidates share at least one tag with the question. A candidate sharing
  fewer than two tags scores 0. Otherwise each shared tag adds a weight that
  is highest for the rarest tags in the corpus.

EXAMPLES:
  cdematch match 'Rate your pain on a scale of 0 to 10'
  cdematch match -n 3 --partition loinc 'Body weight'
  cdematch match --rarity tangent --json 'Age at diagnosis'")]
    Match(MatchCommand),

    /// Match every form element in a directory of CRF JSON files
    Crf(CrfCommand),
}

/// Parses CLI arguments, printing compact help for top-level `--help`.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp {
                let args: Vec<_> = env::args().collect();
                if args.len() <= 2 {
                    print_compact_help();
                    exit(0);
                }
            }
            e.exit();
        }
    }
}

/// Prints custom help listing every subcommand on one line.
fn print_compact_help() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: cdematch [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");

    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }
        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:10} {about}");
    }

    println!(
        "  {:<10} Print this message or the help of the given subcommand(s)",
        "help"
    );
    println!();
    println!("Options:");
    println!("  -v, --verbose...  Verbosity level (-v for debug logs, -vv for trace logs)");
    println!("  -h, --help        Print help");
}
