//! Rarity-weighted overlap scoring.
//!
//! A candidate's score is the sum, over the tags it shares with the query, of a weight
//! that rewards tags rare in the corpus. Candidates sharing fewer than [`MIN_OVERLAP`]
//! tags score zero no matter how rare the shared tag is.
//!
//! Per-tag weights come from min-max rescaled document frequencies:
//! `rescaled = (freq - min) / (max - min)`, so 0 is the rarest tag and 1 the most
//! common. The rescaled value is passed through a [`RarityTransform`]:
//!
//! - `linear`: `1 - rescaled`, always within `[0, 1]`
//! - `tangent`: `1 - tan(rescaled)`, matching historical rankings; goes negative
//!   for common tags (`tan(1) ≈ 1.557`)
//!
//! When every indexed tag has the same frequency the weight is `1.0`. A tag missing
//! from the index weighs `0`.

use cdematch_config::RarityTransform;
use cdematch_tags::TagSet;

use crate::{Document, TagFrequencies};

/// Minimum number of shared tags for a candidate to score above zero.
pub const MIN_OVERLAP: usize = 2;

/// Weight used when all indexed tags are equally frequent.
const FLAT_WEIGHT: f32 = 1.0;

/// Applies a rarity transform to a rescaled frequency in `[0, 1]`.
pub fn rarity_weight(transform: RarityTransform, rescaled: f32) -> f32 {
    match transform {
        RarityTransform::Linear => 1.0 - rescaled,
        RarityTransform::Tangent => 1.0 - rescaled.tan(),
    }
}

/// Returns the tags present in both sets, in sorted order.
pub fn overlap<'a>(a: &'a TagSet, b: &'a TagSet) -> impl Iterator<Item = &'a String> {
    a.intersection(b)
}

/// Scores candidates against a frequency table.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a, F: TagFrequencies + ?Sized> {
    /// Document frequencies used for weighting.
    frequencies: &'a F,
    /// Transform from rescaled frequency to weight.
    rarity: RarityTransform,
}

impl<'a, F: TagFrequencies + ?Sized> Scorer<'a, F> {
    /// Creates a scorer using the linear rarity transform.
    pub fn new(frequencies: &'a F) -> Self {
        Self {
            frequencies,
            rarity: RarityTransform::Linear,
        }
    }

    /// Selects the rarity transform.
    pub fn with_rarity(mut self, rarity: RarityTransform) -> Self {
        self.rarity = rarity;
        self
    }

    /// Returns the weight of a single tag.
    pub fn tag_weight(&self, tag: &str) -> f32 {
        let Some(freq) = self.frequencies.document_frequency(tag) else {
            return 0.0;
        };
        debug_assert!(freq >= 1, "indexed tag {tag:?} has zero frequency");

        let Some((min, max)) = self.frequencies.frequency_range() else {
            return 0.0;
        };
        if min == max {
            return FLAT_WEIGHT;
        }
        debug_assert!(
            (min..=max).contains(&freq),
            "frequency of {tag:?} outside index range"
        );

        let rescaled = (freq - min) as f32 / (max - min) as f32;
        rarity_weight(self.rarity, rescaled)
    }

    /// Scores a candidate document against the query tags.
    pub fn score(&self, query_tags: &TagSet, candidate: &Document) -> f32 {
        let shared: Vec<&String> = overlap(query_tags, &candidate.tags).collect();
        if shared.len() < MIN_OVERLAP {
            return 0.0;
        }
        shared.into_iter().map(|tag| self.tag_weight(tag)).sum()
    }
}

/// Scores a candidate with the linear rarity transform.
pub fn score<F>(frequencies: &F, query_tags: &TagSet, candidate: &Document) -> f32
where
    F: TagFrequencies + ?Sized,
{
    Scorer::new(frequencies).score(query_tags, candidate)
}
