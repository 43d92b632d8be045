//! Tag extraction for question matching.
//!
//! Questions from Case Report Forms and Common Data Elements are reduced to a set of
//! normalized tags: lowercase words plus a handful of phrase tags ("0 to 10",
//! quoted answer labels, "on"/"at" qualifiers). Two questions are compared by the
//! tags they share rather than by their exact wording.
//!
//! ```
//! use cdematch_tags::TagExtractor;
//!
//! let tags = TagExtractor::default().extract("Rate your pain on a scale of 0 to 10");
//! assert!(tags.contains("0 to 10"));
//! assert!(tags.contains("pain"));
//! assert!(!tags.contains("your"));
//! ```

#![warn(missing_docs)]

mod extract;
mod phrase;
mod stopwords;

use std::collections::BTreeSet;

pub use extract::TagExtractor;
pub use phrase::{PhraseMatch, PhraseRule, extract_phrases, phrase_rules};
pub use stopwords::Stopwords;

/// A document's or query's tags in canonical sorted order.
pub type TagSet = BTreeSet<String>;
