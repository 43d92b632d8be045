//! Question text to tag set conversion.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::LazyLock,
};

use cdematch_config::TagSettings;
use regex::Regex;

use crate::{Stopwords, TagSet, phrase::extract_phrases};

/// Splits on runs of non-word characters.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("word split pattern should compile"));

/// Converts free text into a canonical, sorted tag set.
///
/// Extraction is deterministic and performs no I/O:
/// 1. Lowercase the text
/// 2. Collect phrase tags (see [`crate::phrase_rules`])
/// 3. Strip quote characters and split on non-word runs to get word tags,
///    expanding configured abbreviations
/// 4. Union both, drop excluded and blank tags
#[derive(Debug, Clone, Default)]
pub struct TagExtractor {
    /// Tags that never appear in the output.
    stopwords: Stopwords,
    /// Whole-word expansions applied to word tags.
    abbreviations: BTreeMap<String, String>,
}

impl TagExtractor {
    /// Creates an extractor with the given exclusion filter and no abbreviations.
    pub fn new(stopwords: Stopwords) -> Self {
        Self {
            stopwords,
            abbreviations: BTreeMap::new(),
        }
    }

    /// Creates an extractor from the `[tags]` configuration section.
    pub fn from_settings(settings: &TagSettings) -> Self {
        Self {
            stopwords: Stopwords::from_settings(settings),
            abbreviations: settings.abbreviations.clone(),
        }
    }

    /// Adds an abbreviation expansion.
    pub fn with_abbreviation(mut self, short: &str, long: &str) -> Self {
        self.abbreviations
            .insert(short.to_lowercase(), long.to_lowercase());
        self
    }

    /// Returns the exclusion filter used by this extractor.
    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    /// Extracts the full tag set (word tags and phrase tags) from `text`.
    pub fn extract(&self, text: &str) -> TagSet {
        let lowered = text.to_lowercase();

        let mut tags = self.raw_word_tags(&lowered);
        tags.extend(extract_phrases(&lowered).into_iter().map(|m| m.phrase));

        self.finish(tags)
    }

    /// Extracts word tags only, skipping phrase rules.
    ///
    /// Re-applying this to the joined output of itself yields the same set.
    pub fn extract_words(&self, text: &str) -> TagSet {
        let lowered = text.to_lowercase();
        let tags = self.raw_word_tags(&lowered);
        self.finish(tags)
    }

    /// Splits lowercased text into word tags, before any filtering.
    fn raw_word_tags(&self, lowered: &str) -> BTreeSet<String> {
        let unquoted = lowered.replace(['\'', '"'], "");
        NON_WORD
            .split(&unquoted)
            .map(|word| self.expand(word))
            .collect()
    }

    /// Returns the expansion of an abbreviation, or the word itself.
    fn expand(&self, word: &str) -> String {
        self.abbreviations
            .get(word)
            .cloned()
            .unwrap_or_else(|| word.to_string())
    }

    /// Drops excluded and blank tags.
    fn finish(&self, tags: BTreeSet<String>) -> TagSet {
        tags.into_iter()
            .filter(|tag| !tag.trim().is_empty() && !self.stopwords.contains(tag))
            .collect()
    }
}
