//! Configuration system for cdematch.
//!
//! cdematch uses TOML configuration files named `.cdematch.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.cdematch.toml` files found, then loading `~/.cdematch.toml` as the global config with lowest
//! precedence.

#![warn(missing_docs)]

mod error;
mod merge;
mod parse;
mod resolve;
mod sources;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawCorpusSettings, RawIndexSettings, RawMatchSettings, RawTagSettings,
    parse_config_file, parse_config_str,
};
pub use resolve::resolve_corpus_path;
use serde::{Deserialize, Serialize};
pub use sources::{CONFIG_FILENAME, ConfigSources, global_config_path};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for cdematch.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.cdematch.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Where the question corpus lives.
    pub corpus: CorpusSettings,
    /// Tag extraction settings.
    pub tags: TagSettings,
    /// Match ranking settings.
    pub matching: MatchSettings,
    /// Frequency index refresh settings.
    pub index: IndexSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads the merged configuration that applies to `cwd`.
    ///
    /// See [`ConfigSources::discover`] for which files take part. Returns
    /// `Ok(Config::default())` if none do.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_sources(&ConfigSources::discover(cwd))
    }

    /// Loads and merges already discovered sources.
    pub fn load_sources(sources: &ConfigSources) -> Result<Self, ConfigError> {
        let files: Vec<PathBuf> = sources.files().map(Path::to_path_buf).collect();
        Self::load_from_files(&files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    ///
    /// Returns `Ok(Config::default())` if the list is empty.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - No corpus configured
    /// - A corpus path that does not exist or is not a file
    /// - Out-of-range match settings
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output uses the same layout as a `.cdematch.toml` file, so it can be pasted back
    /// into a config file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            corpus: &self.corpus,
            tags: &self.tags,
            matching: &self.matching,
            index: &self.index,
        };
        toml::to_string_pretty(&serializable).map_err(ConfigError::Serialize)
    }
}

/// Corpus location settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CorpusSettings {
    /// Resolved path to a JSON-lines corpus file.
    pub path: Option<PathBuf>,
    /// Default partition (document `source`) the frequency index is built from.
    ///
    /// Only tag frequencies are scoped; candidates are still fetched from every source.
    pub partition: Option<String>,
}

/// Base stopword list used for tag exclusion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopwordPreset {
    /// Curated English function words and pronouns.
    #[default]
    Default,
    /// The curated list plus the Stopwords ISO English list.
    Iso,
    /// No base list; only `exclude` entries apply.
    None,
}

impl fmt::Display for StopwordPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Iso => write!(f, "iso"),
            Self::None => write!(f, "none"),
        }
    }
}

impl FromStr for StopwordPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "iso" => Ok(Self::Iso),
            "none" => Ok(Self::None),
            _ => Err(format!(
                "unknown stopword preset '{s}' (expected default, iso, or none)"
            )),
        }
    }
}

/// Tag extraction settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TagSettings {
    /// Base stopword list.
    pub stopwords: StopwordPreset,
    /// Additional tags to always exclude.
    pub exclude: Vec<String>,
    /// Tags removed from the exclusion set even if the preset lists them.
    pub keep: Vec<String>,
    /// Whole-word abbreviation expansions applied to word tags.
    pub abbreviations: BTreeMap<String, String>,
}

/// Function mapping a rescaled document frequency to a tag weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RarityTransform {
    /// `1 - x`: rarest tag weighs 1, most common weighs 0.
    #[default]
    Linear,
    /// `1 - tan(x)`: historical weighting, negative for very common tags.
    Tangent,
}

impl fmt::Display for RarityTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Tangent => write!(f, "tangent"),
        }
    }
}

impl FromStr for RarityTransform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "tangent" | "tan" => Ok(Self::Tangent),
            _ => Err(format!(
                "unknown rarity transform '{s}' (expected linear or tangent)"
            )),
        }
    }
}

/// Match ranking settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchSettings {
    /// Maximum matches returned per query.
    pub limit: usize,
    /// Rarity weighting function.
    pub rarity: RarityTransform,
    /// Drop matches scoring below this value.
    pub min_score: Option<f32>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            limit: 10,
            rarity: RarityTransform::Linear,
            min_score: None,
        }
    }
}

/// Frequency index refresh settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Maximum age of a shared index snapshot before it is rebuilt.
    pub max_age_secs: u64,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self { max_age_secs: 3600 }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Corpus settings.
    corpus: &'a CorpusSettings,
    /// Tag extraction settings.
    tags: &'a TagSettings,
    /// Match ranking settings.
    #[serde(rename = "match")]
    matching: &'a MatchSettings,
    /// Index refresh settings.
    index: &'a IndexSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_settings_defaults() {
        let settings = MatchSettings::default();
        assert_eq!(settings.limit, 10);
        assert_eq!(settings.rarity, RarityTransform::Linear);
        assert!(settings.min_score.is_none());
    }

    #[test]
    fn test_tag_settings_defaults() {
        let tags = TagSettings::default();
        assert_eq!(tags.stopwords, StopwordPreset::Default);
        assert!(tags.exclude.is_empty());
        assert!(tags.keep.is_empty());
        assert!(tags.abbreviations.is_empty());
    }

    #[test]
    fn test_index_settings_defaults() {
        assert_eq!(IndexSettings::default().max_age_secs, 3600);
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.corpus.path.is_none());
        assert!(config.config_root.is_none());
    }

    #[test]
    fn test_rarity_transform_from_str() {
        assert_eq!("linear".parse(), Ok(RarityTransform::Linear));
        assert_eq!("TAN".parse(), Ok(RarityTransform::Tangent));
        assert!("log".parse::<RarityTransform>().is_err());
    }

    #[test]
    fn test_stopword_preset_round_trips_display() {
        for preset in [
            StopwordPreset::Default,
            StopwordPreset::Iso,
            StopwordPreset::None,
        ] {
            assert_eq!(preset.to_string().parse(), Ok(preset));
        }
    }

    #[test]
    fn test_settings_to_toml() {
        let mut config = Config::default();
        config
            .tags
            .abbreviations
            .insert("rx".into(), "prescription".into());
        let toml = config.settings_to_toml().unwrap();

        assert!(toml.contains("[tags]"));
        assert!(toml.contains("[match]"));
        assert!(toml.contains("[index]"));
        assert!(toml.contains("limit = 10"));
        assert!(toml.contains("rarity = \"linear\""));
        assert!(toml.contains("rx = \"prescription\""));

        let parsed: toml::Value =
            toml::from_str(&toml).expect("settings_to_toml should produce valid TOML");
        assert!(parsed.get("match").is_some());
        assert!(parsed.get("index").is_some());
    }
}
