//! Tag exclusion filtering.
//!
//! The exclusion set combines:
//! - A curated list of English function words and pronouns (the `default` preset)
//! - Optionally, the Stopwords ISO English list from the `stop-words` crate (the `iso` preset)
//! - Extra tags from configuration
//!
//! Excluded tags never reach a document's tag set or the frequency index, so the set
//! changes both indexing and scoring results. The empty string is always excluded.

use std::{
    collections::{BTreeSet, HashSet},
    hash::{Hash, Hasher},
};

use cdematch_config::{StopwordPreset, TagSettings};
use siphasher::sip::SipHasher24;
use stop_words::LANGUAGE;

/// A tag exclusion filter.
///
/// Uses a `HashSet` for O(1) lookup. All words are stored in lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopwords {
    /// Lowercased excluded tags, always including the empty string.
    words: HashSet<String>,
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwords {
    /// Creates a filter with the curated function word list.
    pub fn new() -> Self {
        Self::from_preset(StopwordPreset::Default)
    }

    /// Creates a filter from a base preset.
    pub fn from_preset(preset: StopwordPreset) -> Self {
        let mut stopwords = Self::empty();
        match preset {
            StopwordPreset::Default => stopwords.extend(FUNCTION_WORDS),
            StopwordPreset::Iso => {
                stopwords.extend(FUNCTION_WORDS);
                stopwords.extend(stop_words::get(LANGUAGE::English));
            }
            StopwordPreset::None => {}
        }
        stopwords
    }

    /// Creates a filter that excludes only the empty string.
    pub fn empty() -> Self {
        Self {
            words: HashSet::from([String::new()]),
        }
    }

    /// Creates a filter excluding exactly the given words (plus the empty string).
    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stopwords = Self::empty();
        stopwords.extend(words);
        stopwords
    }

    /// Builds the filter described by the `[tags]` configuration section.
    ///
    /// Starts from the preset, adds `exclude`, then removes `keep`.
    pub fn from_settings(settings: &TagSettings) -> Self {
        let mut stopwords = Self::from_preset(settings.stopwords);
        stopwords.extend(&settings.exclude);
        for tag in &settings.keep {
            stopwords.remove(tag);
        }
        stopwords
    }

    /// Adds words to the exclusion set.
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.words.insert(word.as_ref().to_lowercase());
        }
    }

    /// Removes a word from the exclusion set. The empty string cannot be removed.
    pub fn remove(&mut self, word: &str) {
        if !word.is_empty() {
            self.words.remove(&word.to_lowercase());
        }
    }

    /// Checks if a tag is excluded.
    ///
    /// The check is case-insensitive.
    pub fn contains(&self, tag: &str) -> bool {
        if self.words.contains(tag) {
            return true;
        }
        let lower = tag.to_lowercase();
        lower != tag && self.words.contains(&lower)
    }

    /// Returns the total number of excluded words, including the empty string.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if only the empty string is excluded.
    pub fn is_empty(&self) -> bool {
        self.words.len() <= 1
    }

    /// Returns a stable hash of the exclusion set.
    ///
    /// Two filters with the same words have the same fingerprint regardless of insertion order.
    pub fn fingerprint(&self) -> u64 {
        let sorted: BTreeSet<&str> = self.words.iter().map(String::as_str).collect();
        let mut hasher = SipHasher24::new();
        sorted.hash(&mut hasher);
        hasher.finish()
    }
}

/// Curated English function words, articles, conjunctions, prepositions and pronouns.
static FUNCTION_WORDS: &[&str] = &[
    // Articles and determiners
    "a", "an", "the", "this", "that", "these", "those", "any", "each", "every",
    // Conjunctions
    "and", "or", "but", "nor", "so", "yet", "if", "than", "then",
    // Prepositions
    "about", "above", "after", "against", "at", "before", "below", "between", "by", "during",
    "for", "from", "in", "into", "of", "off", "on", "onto", "out", "over", "since", "through",
    "to", "under", "until", "up", "upon", "with", "within", "without",
    // Auxiliary verbs
    "am", "are", "be", "been", "being", "can", "could", "did", "do", "does", "had", "has",
    "have", "is", "may", "might", "must", "shall", "should", "was", "were", "will", "would",
    // Pronouns
    "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers",
    "herself", "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "who",
    "whom", "whose", "which", "what",
    // Other near-universal question words
    "as", "there", "here", "such",
];

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn contains_function_words() {
        let sw = Stopwords::new();
        for word in ["the", "and", "a", "on", "to", "or", "your", "they"] {
            assert!(sw.contains(word), "{word} should be excluded");
        }
    }

    #[test]
    fn always_excludes_empty_string() {
        assert!(Stopwords::new().contains(""));
        assert!(Stopwords::empty().contains(""));
        assert!(Stopwords::from_preset(StopwordPreset::None).contains(""));

        let mut sw = Stopwords::empty();
        sw.remove("");
        assert!(sw.contains(""));
    }

    #[test]
    fn clinical_terms_not_excluded() {
        let sw = Stopwords::new();
        for word in ["pain", "scale", "intensity", "weight", "rate", "history", "no", "not"] {
            assert!(!sw.contains(word), "{word} should not be excluded");
        }
    }

    #[test]
    fn case_insensitive() {
        let sw = Stopwords::new();
        assert!(sw.contains("The"));
        assert!(sw.contains("THE"));
    }

    #[test]
    fn iso_preset_is_superset_of_default() {
        let default = Stopwords::new();
        let iso = Stopwords::from_preset(StopwordPreset::Iso);
        assert!(iso.len() > default.len());
        assert!(FUNCTION_WORDS.iter().all(|w| iso.contains(w)));
    }

    #[test]
    fn none_preset_is_empty() {
        let sw = Stopwords::from_preset(StopwordPreset::None);
        assert!(sw.is_empty());
        assert!(!sw.contains("the"));
    }

    #[test]
    fn settings_add_and_keep() {
        let settings = TagSettings {
            stopwords: StopwordPreset::Default,
            exclude: vec!["patient".into()],
            keep: vec!["at".into()],
            abbreviations: BTreeMap::new(),
        };
        let sw = Stopwords::from_settings(&settings);
        assert!(sw.contains("patient"));
        assert!(!sw.contains("at"));
        assert!(sw.contains("the"));
    }

    #[test]
    fn fingerprint_ignores_insertion_order() {
        let a = Stopwords::with_words(["pain", "scale", "the"]);
        let b = Stopwords::with_words(["the", "scale", "pain"]);
        let c = Stopwords::with_words(["the", "scale"]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
