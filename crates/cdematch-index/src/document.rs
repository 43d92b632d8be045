//! Corpus document and match result types.

use cdematch_tags::TagSet;
use serde::{Deserialize, Serialize};

/// A previously catalogued question as stored in the corpus.
///
/// Documents are created by ingestion and never written by the matcher. The field
/// aliases accept the stored record layout used by ingestion (`_id`, `question`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier (often the source URL).
    #[serde(alias = "_id")]
    pub id: String,
    /// Original question text.
    #[serde(alias = "question", default)]
    pub question_text: String,
    /// Tags extracted at ingestion time.
    #[serde(default)]
    pub tags: TagSet,
    /// Name of the source the question was ingested from.
    #[serde(default)]
    pub source: String,
}

impl Document {
    /// Creates a document from its parts.
    pub fn new<I, S>(id: &str, question_text: &str, tags: I, source: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.to_string(),
            question_text: question_text.to_string(),
            tags: tags.into_iter().map(Into::into).collect(),
            source: source.to_string(),
        }
    }

    /// Returns true if the document carries at least one tag.
    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }

    /// Returns true if any of the document's tags is in `tags`.
    pub fn shares_any_tag(&self, tags: &TagSet) -> bool {
        // Iterate the smaller set.
        if self.tags.len() <= tags.len() {
            self.tags.iter().any(|t| tags.contains(t))
        } else {
            tags.iter().any(|t| self.tags.contains(t))
        }
    }
}

/// A corpus document scored against one query.
///
/// Scores are only comparable within a single ranking call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMatch {
    /// Identifier of the matched document.
    pub document_id: String,
    /// The matched document's question text.
    pub question_text: String,
    /// The matched document's tags.
    pub tags: TagSet,
    /// Rarity-weighted overlap score.
    pub score: f32,
}

/// A query question reduced to its tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    /// The text as supplied by the caller.
    pub raw_text: String,
    /// Tags extracted from `raw_text`.
    pub tags: TagSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_stored_record_layout() {
        let json = r#"{"_id": "https://cde/1", "_rev": "3-a", "question": "Pain?",
            "tags": ["pain", "pain"], "source": "cadsr"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc, Document::new("https://cde/1", "Pain?", ["pain"], "cadsr"));
    }

    #[test]
    fn missing_optional_fields_default() {
        let doc: Document = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(!doc.is_tagged());
        assert!(doc.question_text.is_empty());
        assert!(doc.source.is_empty());
    }

    #[test]
    fn shares_any_tag() {
        let doc = Document::new("a", "", ["pain", "scale"], "");
        let hit: TagSet = ["scale", "weight"].into_iter().map(String::from).collect();
        let miss: TagSet = ["weight"].into_iter().map(String::from).collect();
        assert!(doc.shares_any_tag(&hit));
        assert!(!doc.shares_any_tag(&miss));
        assert!(!doc.shares_any_tag(&TagSet::new()));
    }
}
