//! Document-frequency indexing.
//!
//! A [`FrequencyIndex`] maps each tag to the number of corpus documents that carry it.
//! It is an immutable point-in-time snapshot: rebuilding produces a new value rather
//! than mutating an existing one (see [`crate::SharedIndex`] for swapping snapshots).

use std::collections::HashMap;

use cdematch_tags::Stopwords;
use tracing::{debug, warn};

use crate::{CorpusError, CorpusReader, ReadControl};

/// Source of document frequencies for rarity weighting.
///
/// Implemented by [`FrequencyIndex`]; scoring is generic over this so it can be driven
/// by any precomputed table.
pub trait TagFrequencies {
    /// Returns the number of documents containing `tag`, or `None` if the tag is not indexed.
    fn document_frequency(&self, tag: &str) -> Option<u32>;

    /// Returns the smallest and largest frequency across all indexed tags.
    ///
    /// `None` when nothing is indexed.
    fn frequency_range(&self) -> Option<(u32, u32)>;
}

/// Tag to document-frequency map built from one corpus scan.
///
/// Every stored count is at least 1 and at most the number of documents scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyIndex {
    /// Document frequency per tag.
    counts: HashMap<String, u32>,
    /// Number of tagged documents scanned.
    documents: usize,
    /// Cached `(min, max)` over `counts`.
    range: Option<(u32, u32)>,
    /// Partition the scan was restricted to, if any.
    partition: Option<String>,
    /// Fingerprint of the exclusion set applied while building.
    exclusion_fingerprint: Option<u64>,
}

impl FrequencyIndex {
    /// Assembles an index, computing the frequency range.
    fn new(
        counts: HashMap<String, u32>,
        documents: usize,
        partition: Option<String>,
        exclusion_fingerprint: Option<u64>,
    ) -> Self {
        let range = counts.values().fold(None, |acc, &n| match acc {
            None => Some((n, n)),
            Some((lo, hi)) => Some((lo.min(n), hi.max(n))),
        });
        Self {
            counts,
            documents,
            range,
            partition,
            exclusion_fingerprint,
        }
    }

    /// Creates an index from precomputed counts.
    ///
    /// Zero counts are dropped. The document total is taken to be the largest count, and
    /// no exclusion fingerprint is recorded.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let counts: HashMap<String, u32> = counts
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .map(|(tag, n)| (tag.into(), n))
            .collect();
        let documents = counts.values().copied().max().unwrap_or(0) as usize;
        Self::new(counts, documents, None, None)
    }

    /// Returns the number of indexed tags.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no tags are indexed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the number of tagged documents the index was built from.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Returns the partition the index is scoped to, if any.
    pub fn partition(&self) -> Option<&str> {
        self.partition.as_deref()
    }

    /// Iterates over `(tag, document_frequency)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(tag, &n)| (tag.as_str(), n))
    }

    /// Returns up to `n` of the least frequent tags, ties by tag.
    pub fn rarest(&self, n: usize) -> Vec<(&str, u32)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }

    /// Returns up to `n` of the most frequent tags, ties by tag.
    pub fn most_common(&self, n: usize) -> Vec<(&str, u32)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }

    /// Returns true if this index was built under the same exclusion set.
    ///
    /// Indices created with [`Self::from_counts`] carry no fingerprint and are always
    /// considered compatible.
    pub fn is_compatible_with(&self, stopwords: &Stopwords) -> bool {
        self.exclusion_fingerprint
            .is_none_or(|fp| fp == stopwords.fingerprint())
    }
}

impl TagFrequencies for FrequencyIndex {
    fn document_frequency(&self, tag: &str) -> Option<u32> {
        self.counts.get(tag).copied()
    }

    fn frequency_range(&self) -> Option<(u32, u32)> {
        self.range
    }
}

/// Builds [`FrequencyIndex`] snapshots from a corpus.
#[derive(Debug, Clone, Default)]
pub struct FrequencyIndexer {
    /// Tags removed from the final counts.
    stopwords: Stopwords,
    /// Limits applied to the corpus scan.
    control: ReadControl,
}

impl FrequencyIndexer {
    /// Creates an indexer that drops the given excluded tags.
    pub fn new(stopwords: Stopwords) -> Self {
        Self {
            stopwords,
            control: ReadControl::unbounded(),
        }
    }

    /// Applies a deadline or cancellation flag to every scan.
    pub fn with_control(mut self, control: ReadControl) -> Self {
        self.control = control;
        self
    }

    /// Returns the exclusion filter applied by this indexer.
    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    /// Scans every tagged document and counts each tag once per document.
    ///
    /// If `partition` is given but the corpus cannot honor it, the whole corpus is
    /// scanned and a warning is logged. An empty corpus yields an empty index.
    pub fn build<C>(
        &self,
        corpus: &C,
        partition: Option<&str>,
    ) -> Result<FrequencyIndex, CorpusError>
    where
        C: CorpusReader + ?Sized,
    {
        let partition = match partition {
            Some(name) if !corpus.supports_partitions() => {
                warn!(
                    partition = name,
                    "corpus does not support partitions, indexing the whole corpus"
                );
                None
            }
            other => other,
        };

        let mut counts: HashMap<String, u32> = HashMap::new();
        let mut documents = 0usize;
        for doc in corpus.scan_tagged_documents(partition, &self.control)? {
            let doc = doc?;
            documents += 1;
            for tag in doc.tags {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }

        let before = counts.len();
        counts.retain(|tag, _| !self.stopwords.contains(tag));
        debug!(
            documents,
            tags = counts.len(),
            excluded = before - counts.len(),
            partition = partition.unwrap_or("*"),
            "built frequency index"
        );

        Ok(FrequencyIndex::new(
            counts,
            documents,
            partition.map(str::to_owned),
            Some(self.stopwords.fingerprint()),
        ))
    }
}

/// Builds a frequency index using the default exclusion set.
pub fn build_frequency_index<C>(
    corpus: &C,
    partition: Option<&str>,
) -> Result<FrequencyIndex, CorpusError>
where
    C: CorpusReader + ?Sized,
{
    FrequencyIndexer::default().build(corpus, partition)
}
