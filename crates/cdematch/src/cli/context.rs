//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use cdematch_config::Config;
use cdematch_index::{
    FrequencyIndex, FrequencyIndexer, JsonlCorpus, MatchOptions, Matcher, SharedIndex,
};
use cdematch_tags::TagExtractor;

use super::args::{CorpusArgs, MatchArgs};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Returns a tag extractor built from the `[tags]` settings.
    pub fn extractor(&self) -> TagExtractor {
        TagExtractor::from_settings(&self.config.tags)
    }

    /// Returns an indexer that applies the same exclusions as [`Self::extractor`].
    pub fn indexer(&self) -> FrequencyIndexer {
        FrequencyIndexer::new(self.extractor().stopwords().clone())
    }

    /// Returns a matcher with `[match]` settings and CLI overrides applied.
    pub fn matcher(&self, args: &MatchArgs) -> Matcher {
        let mut options = MatchOptions::from_settings(&self.config.matching);
        if let Some(limit) = args.limit {
            options.limit = Some(limit);
        }
        if let Some(min_score) = args.min_score {
            options.min_score = Some(min_score);
        }
        if let Some(rarity) = args.rarity {
            options.rarity = rarity;
        }
        Matcher::new(self.extractor()).with_options(options)
    }

    /// Returns the partition from the CLI, falling back to `[corpus] partition`.
    pub fn partition<'a>(&'a self, args: &'a CorpusArgs) -> Option<&'a str> {
        args.partition
            .as_deref()
            .or(self.config.corpus.partition.as_deref())
    }

    /// Opens the corpus named on the command line or in `[corpus] path`.
    pub fn open_corpus(&self, args: &CorpusArgs) -> Result<JsonlCorpus, ExitCode> {
        let path = match (&args.corpus, &self.config.corpus.path) {
            (Some(path), _) => self.cwd.join(path),
            (None, Some(path)) => path.clone(),
            (None, None) => {
                eprintln!("error: no corpus configured");
                eprintln!(
                    "Pass --corpus, or run 'cdematch init' and set [corpus] path in .cdematch.toml."
                );
                return Err(ExitCode::FAILURE);
            }
        };
        JsonlCorpus::open(&path).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }

    /// Builds a frequency index over the selected corpus.
    pub fn build_index(
        &self,
        corpus: &JsonlCorpus,
        args: &CorpusArgs,
    ) -> Result<FrequencyIndex, ExitCode> {
        self.indexer()
            .build(corpus, self.partition(args))
            .map_err(|e| {
                eprintln!("error: failed to build frequency index: {e}");
                ExitCode::FAILURE
            })
    }

    /// Builds a shared index that follows the `[index]` refresh policy.
    pub fn shared_index(
        &self,
        corpus: &JsonlCorpus,
        args: &CorpusArgs,
    ) -> Result<SharedIndex, ExitCode> {
        let max_age = Duration::from_secs(self.config.index.max_age_secs);
        SharedIndex::build(corpus, self.indexer(), self.partition(args), max_age).map_err(|e| {
            eprintln!("error: failed to build frequency index: {e}");
            ExitCode::FAILURE
        })
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
