//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules and resolving paths.

use std::path::{Path, PathBuf};

use crate::{
    Config, ConfigError, CorpusSettings, IndexSettings, MatchSettings, TagSettings,
    parse::{RawConfig, RawIndexSettings, RawMatchSettings, RawTagSettings},
    resolve::resolve_corpus_path,
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Corpus path: first definition wins, resolved relative to the file that defined it
/// - Tag `exclude` and `keep` lists: unioned across all files
/// - Abbreviations: merged per key, first definition for each key wins
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let corpus = merge_corpus_settings(configs)?;
    let tags = merge_tag_settings(configs);
    let matching = merge_match_settings(configs);
    let index = merge_index_settings(configs);
    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(PathBuf::from);

    Ok(Config {
        corpus,
        tags,
        matching,
        index,
        config_root,
    })
}

/// Merges corpus settings, resolving the path against its defining file.
fn merge_corpus_settings(configs: &[ParsedConfig]) -> Result<CorpusSettings, ConfigError> {
    let mut result = CorpusSettings::default();

    for parsed in configs {
        let Some(ref corpus) = parsed.config.corpus else {
            continue;
        };
        if result.path.is_none()
            && let Some(ref path) = corpus.path
        {
            let config_dir = parsed.path.parent().unwrap_or_else(|| Path::new(""));
            result.path = Some(resolve_corpus_path(path, config_dir)?);
        }
        if result.partition.is_none() {
            result.partition.clone_from(&corpus.partition);
        }
    }

    Ok(result)
}

/// Merges tag settings.
fn merge_tag_settings(configs: &[ParsedConfig]) -> TagSettings {
    let mut result = TagSettings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref tags) = parsed.config.tags {
            apply_raw_tags(&mut result, tags);
        }
    }

    result.exclude.sort();
    result.exclude.dedup();
    result.keep.sort();
    result.keep.dedup();
    result
}

/// Applies raw tag settings to result.
fn apply_raw_tags(result: &mut TagSettings, raw: &RawTagSettings) {
    if let Some(v) = raw.stopwords {
        result.stopwords = v;
    }
    if let Some(ref v) = raw.exclude {
        result.exclude.extend(v.iter().map(|t| t.to_lowercase()));
    }
    if let Some(ref v) = raw.keep {
        result.keep.extend(v.iter().map(|t| t.to_lowercase()));
    }
    if let Some(ref v) = raw.abbreviations {
        for (short, long) in v {
            result
                .abbreviations
                .insert(short.to_lowercase(), long.to_lowercase());
        }
    }
}

/// Merges match settings.
fn merge_match_settings(configs: &[ParsedConfig]) -> MatchSettings {
    let mut result = MatchSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref matching) = parsed.config.matching {
            apply_raw_match(&mut result, matching);
        }
    }

    result
}

/// Applies raw match settings to result.
fn apply_raw_match(result: &mut MatchSettings, raw: &RawMatchSettings) {
    if let Some(v) = raw.limit {
        result.limit = v;
    }
    if let Some(v) = raw.rarity {
        result.rarity = v;
    }
    if let Some(v) = raw.min_score {
        result.min_score = Some(v);
    }
}

/// Merges index settings.
fn merge_index_settings(configs: &[ParsedConfig]) -> IndexSettings {
    let mut result = IndexSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(RawIndexSettings {
            max_age_secs: Some(v),
        }) = parsed.config.index
        {
            result.max_age_secs = v;
        }
    }

    result
}
