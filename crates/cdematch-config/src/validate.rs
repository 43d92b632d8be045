//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// No corpus path is configured.
    NoCorpusConfigured,
    /// The corpus path does not exist.
    CorpusPathMissing {
        /// Path that doesn't exist.
        path: String,
    },
    /// The corpus path exists but is not a regular file.
    CorpusPathNotFile {
        /// Path that is not a file.
        path: String,
    },
    /// The match limit is zero, so every query returns nothing.
    ZeroMatchLimit,
    /// The minimum score is negative, which only filters under the tangent transform.
    NegativeMinScore {
        /// Configured threshold.
        value: f32,
    },
    /// A tag is both excluded and kept.
    ExcludeKeepConflict {
        /// The conflicting tag.
        tag: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCorpusConfigured => write!(f, "no corpus path is configured"),
            Self::CorpusPathMissing { path } => write!(f, "corpus path does not exist: {path}"),
            Self::CorpusPathNotFile { path } => write!(f, "corpus path is not a file: {path}"),
            Self::ZeroMatchLimit => write!(f, "match limit is 0; no matches will be returned"),
            Self::NegativeMinScore { value } => {
                write!(f, "min_score {value} is negative")
            }
            Self::ExcludeKeepConflict { tag } => {
                write!(f, "tag '{tag}' is listed in both exclude and keep")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    match config.corpus.path {
        None => warnings.push(ConfigWarning::NoCorpusConfigured),
        Some(ref path) if !path.exists() => warnings.push(ConfigWarning::CorpusPathMissing {
            path: path.display().to_string(),
        }),
        Some(ref path) if !path.is_file() => warnings.push(ConfigWarning::CorpusPathNotFile {
            path: path.display().to_string(),
        }),
        Some(_) => {}
    }

    if config.matching.limit == 0 {
        warnings.push(ConfigWarning::ZeroMatchLimit);
    }

    if let Some(value) = config.matching.min_score
        && value < 0.0
    {
        warnings.push(ConfigWarning::NegativeMinScore { value });
    }

    for tag in &config.tags.keep {
        if config.tags.exclude.contains(tag) {
            warnings.push(ConfigWarning::ExcludeKeepConflict { tag: tag.clone() });
        }
    }

    warnings
}
