//! Corpus indexing and rarity-weighted question matching.
//!
//! Matching works in two phases:
//!
//! 1. [`FrequencyIndexer`] scans every tagged document once through a [`CorpusReader`]
//!    and records each tag's document frequency in an immutable [`FrequencyIndex`].
//! 2. [`Matcher`] reduces a question to tags, fetches every document sharing at least
//!    one of them, scores each candidate with [`Scorer`] and returns them ranked.
//!
//! A candidate must share at least [`MIN_OVERLAP`] tags with the query to score above
//! zero; shared tags are weighted by rarity, so a match on "0 to 10" outweighs a match
//! on "pain" in a pain-heavy corpus.
//!
//! ```
//! use cdematch_index::{Document, MemoryCorpus, build_frequency_index, find_matches};
//!
//! let corpus: MemoryCorpus = [
//!     Document::new("A", "Pain on a 0 to 10 scale", ["pain", "scale", "0 to 10"], ""),
//!     Document::new("B", "Pain intensity", ["pain", "intensity"], ""),
//!     Document::new("C", "Scale weight", ["scale", "weight"], ""),
//! ]
//! .into_iter()
//! .collect();
//!
//! let index = build_frequency_index(&corpus, None).unwrap();
//! let matches = find_matches("Rate your pain on a scale of 0 to 10", &corpus, &index, Some(5))
//!     .unwrap();
//! assert_eq!(matches[0].document_id, "A");
//! ```

mod corpus;
mod document;
mod error;
mod frequency;
mod rank;
mod score;
mod shared;

pub use cdematch_config::RarityTransform;
pub use corpus::{CorpusReader, DocumentStream, JsonlCorpus, MemoryCorpus, ReadControl};
pub use document::{Document, Query, ScoredMatch};
pub use error::CorpusError;
pub use frequency::{FrequencyIndex, FrequencyIndexer, TagFrequencies, build_frequency_index};
pub use rank::{MatchOptions, Matcher, find_matches};
pub use score::{MIN_OVERLAP, Scorer, overlap, rarity_weight, score};
pub use shared::SharedIndex;
