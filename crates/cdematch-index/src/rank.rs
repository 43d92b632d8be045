//! Match ranking: from question text to an ordered list of scored corpus documents.

use std::cmp::Ordering;

use cdematch_config::{MatchSettings, RarityTransform};
use cdematch_tags::TagExtractor;
use tracing::debug;

use crate::{
    CorpusError, CorpusReader, Query, ReadControl, ScoredMatch, Scorer, TagFrequencies,
};

/// Tunables for one ranking pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// Maximum number of matches returned; `None` returns every candidate.
    pub limit: Option<usize>,
    /// Matches scoring below this are dropped; `None` keeps all candidates.
    pub min_score: Option<f32>,
    /// Transform used for per-tag rarity weights.
    pub rarity: RarityTransform,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            limit: None,
            min_score: None,
            rarity: RarityTransform::Linear,
        }
    }
}

impl MatchOptions {
    /// Creates options from the `[match]` configuration section.
    pub fn from_settings(settings: &MatchSettings) -> Self {
        Self {
            limit: Some(settings.limit),
            min_score: settings.min_score,
            rarity: settings.rarity,
        }
    }

    /// Sets the result limit.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// Finds corpus documents similar to a question.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    /// Converts query text to tags.
    extractor: TagExtractor,
    /// Ranking tunables.
    options: MatchOptions,
    /// Limits applied to the candidate fetch.
    control: ReadControl,
}

impl Matcher {
    /// Creates a matcher with default options.
    pub fn new(extractor: TagExtractor) -> Self {
        Self {
            extractor,
            options: MatchOptions::default(),
            control: ReadControl::unbounded(),
        }
    }

    /// Replaces the ranking options.
    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Applies a deadline or cancellation flag to candidate fetches.
    pub fn with_control(mut self, control: ReadControl) -> Self {
        self.control = control;
        self
    }

    /// Returns the ranking options.
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Returns the tag extractor.
    pub fn extractor(&self) -> &TagExtractor {
        &self.extractor
    }

    /// Reduces question text to a query.
    pub fn query(&self, text: &str) -> Query {
        Query {
            raw_text: text.to_string(),
            tags: self.extractor.extract(text),
        }
    }

    /// Extracts tags from `query_text` and ranks matching corpus documents.
    ///
    /// Text with no usable tags yields an empty list. Corpus read failures are returned
    /// as errors, never as an empty list.
    pub fn find_matches<C, F>(
        &self,
        query_text: &str,
        corpus: &C,
        frequencies: &F,
    ) -> Result<Vec<ScoredMatch>, CorpusError>
    where
        C: CorpusReader + ?Sized,
        F: TagFrequencies + ?Sized,
    {
        self.rank(&self.query(query_text), corpus, frequencies)
    }

    /// Ranks corpus documents against an already extracted query.
    pub fn rank<C, F>(
        &self,
        query: &Query,
        corpus: &C,
        frequencies: &F,
    ) -> Result<Vec<ScoredMatch>, CorpusError>
    where
        C: CorpusReader + ?Sized,
        F: TagFrequencies + ?Sized,
    {
        if query.tags.is_empty() {
            debug!(query = %query.raw_text, "query has no tags");
            return Ok(Vec::new());
        }

        let scorer = Scorer::new(frequencies).with_rarity(self.options.rarity);
        let mut matches = Vec::new();
        for doc in corpus.find_by_any_tag(&query.tags, &self.control)? {
            let doc = doc?;
            let score = scorer.score(&query.tags, &doc);
            matches.push(ScoredMatch {
                document_id: doc.id,
                question_text: doc.question_text,
                tags: doc.tags,
                score,
            });
        }
        let candidates = matches.len();

        sort_matches(&mut matches);
        if let Some(min) = self.options.min_score {
            matches.retain(|m| m.score >= min);
        }
        if let Some(limit) = self.options.limit {
            matches.truncate(limit);
        }

        debug!(
            tags = query.tags.len(),
            candidates,
            returned = matches.len(),
            "ranked matches"
        );
        Ok(matches)
    }
}

/// Sorts matches by descending score, ties by document id.
fn sort_matches(matches: &mut [ScoredMatch]) {
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.document_id.cmp(&b.document_id))
    });
}

/// Ranks corpus documents for `query_text` with default extraction and linear weighting.
pub fn find_matches<C, F>(
    query_text: &str,
    corpus: &C,
    frequencies: &F,
    limit: Option<usize>,
) -> Result<Vec<ScoredMatch>, CorpusError>
where
    C: CorpusReader + ?Sized,
    F: TagFrequencies + ?Sized,
{
    Matcher::default()
        .with_options(MatchOptions::default().with_limit(limit))
        .find_matches(query_text, corpus, frequencies)
}
