//! Configuration file parsing.
//!
//! Parses individual `.cdematch.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::{ConfigError, RarityTransform, StopwordPreset};

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Corpus section.
    pub corpus: Option<RawCorpusSettings>,
    /// Tag extraction section.
    pub tags: Option<RawTagSettings>,
    /// Match ranking section.
    #[serde(rename = "match")]
    pub matching: Option<RawMatchSettings>,
    /// Index refresh section.
    pub index: Option<RawIndexSettings>,
}

/// Raw corpus settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCorpusSettings {
    /// Path to the corpus file, relative to the config file's directory.
    pub path: Option<String>,
    /// Default partition name.
    pub partition: Option<String>,
}

/// Raw tag extraction settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTagSettings {
    /// Base stopword list.
    pub stopwords: Option<StopwordPreset>,
    /// Extra excluded tags. Accepts either a single string or an array of strings.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub exclude: Option<Vec<String>>,
    /// Tags to remove from the exclusion set. Accepts a string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub keep: Option<Vec<String>>,
    /// Abbreviation expansions.
    pub abbreviations: Option<BTreeMap<String, String>>,
}

/// Raw match settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMatchSettings {
    /// Maximum matches per query.
    pub limit: Option<usize>,
    /// Rarity weighting function.
    pub rarity: Option<RarityTransform>,
    /// Minimum score threshold.
    pub min_score: Option<f32>,
}

/// Raw index settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIndexSettings {
    /// Maximum snapshot age in seconds.
    pub max_age_secs: Option<u64>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
