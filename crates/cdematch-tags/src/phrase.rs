//! Phrase tag rules.
//!
//! Phrase tags capture short multi-word spans that carry more meaning than their
//! constituent words: ranges ("0 to 10"), quoted answer labels, and "on"/"at"
//! qualifiers. Each rule contributes at most one tag per text: the first match
//! of its pattern against the whole lowercased string.

use std::sync::LazyLock;

use regex::Regex;

/// A named pattern producing at most one phrase tag.
#[derive(Debug)]
pub struct PhraseRule {
    /// Short rule name, used when explaining where a tag came from.
    pub name: &'static str,
    /// Pattern whose first capture group is the tag.
    pattern: Regex,
}

impl PhraseRule {
    /// Compiles a rule from a literal pattern.
    fn builtin(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("builtin phrase pattern should compile"),
        }
    }

    /// Returns the first capture of this rule in `text`, if any.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// The ordered phrase rules.
static PHRASE_RULES: LazyLock<[PhraseRule; 5]> = LazyLock::new(|| {
    [
        PhraseRule::builtin("range", r"(\w+\s+to\s+\w+)"),
        PhraseRule::builtin("double-quoted", r#""(.*)""#),
        PhraseRule::builtin("single-quoted", r"'(.*)'"),
        PhraseRule::builtin("on", r"(on\s+\w+)"),
        PhraseRule::builtin("at", r"(at\s+\w+)"),
    ]
});

/// Returns the phrase rules in application order.
pub fn phrase_rules() -> &'static [PhraseRule] {
    PHRASE_RULES.as_slice()
}

/// A phrase tag along with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    /// Name of the producing rule.
    pub rule: &'static str,
    /// The captured phrase, unfiltered.
    pub phrase: String,
}

/// Applies every phrase rule once to already-lowercased text.
///
/// Rules are independent: their matches may overlap, and a rule that matches an
/// empty group still contributes an (empty) entry, which the extractor drops later.
pub fn extract_phrases(lowered: &str) -> Vec<PhraseMatch> {
    phrase_rules()
        .iter()
        .filter_map(|rule| {
            rule.first_match(lowered).map(|phrase| PhraseMatch {
                rule: rule.name,
                phrase: phrase.to_string(),
            })
        })
        .collect()
}
