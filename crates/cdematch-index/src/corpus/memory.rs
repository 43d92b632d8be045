//! In-memory corpus.

use cdematch_tags::TagSet;

use super::{CorpusReader, DocumentStream, ReadControl};
use crate::{CorpusError, Document};

/// A corpus held entirely in memory.
///
/// Supports partitions by exact match on `source`.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    /// Stored documents in insertion order.
    documents: Vec<Document>,
}

impl MemoryCorpus {
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document.
    pub fn insert(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Returns the number of stored documents, tagged or not.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<Document> for MemoryCorpus {
    fn from_iter<T: IntoIterator<Item = Document>>(iter: T) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl CorpusReader for MemoryCorpus {
    fn scan_tagged_documents(
        &self,
        partition: Option<&str>,
        control: &ReadControl,
    ) -> Result<DocumentStream<'_>, CorpusError> {
        let partition = partition.map(str::to_owned);
        let docs = self
            .documents
            .iter()
            .filter(|doc| doc.is_tagged())
            .filter(move |doc| partition.as_deref().is_none_or(|p| doc.source == p))
            .cloned()
            .map(Ok);
        Ok(control.guard(docs))
    }

    fn find_by_any_tag(
        &self,
        tags: &TagSet,
        control: &ReadControl,
    ) -> Result<DocumentStream<'_>, CorpusError> {
        let tags = tags.clone();
        let docs = self
            .documents
            .iter()
            .filter(move |doc| doc.shares_any_tag(&tags))
            .cloned()
            .map(Ok);
        Ok(control.guard(docs))
    }

    fn supports_partitions(&self) -> bool {
        true
    }
}
