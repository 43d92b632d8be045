//! File-backed corpus in JSON Lines format.
//!
//! One document per line:
//!
//! ```text
//! {"id": "cde:1", "question_text": "Rate your pain", "tags": ["pain", "rate"], "source": "cadsr"}
//! ```
//!
//! Every read re-opens the file and streams it, so edits made by an ingestion
//! process are picked up by the next scan.

use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    iter::Enumerate,
    path::{Path, PathBuf},
};

use cdematch_tags::TagSet;
use tracing::debug;

use super::{CorpusReader, DocumentStream, ReadControl};
use crate::{CorpusError, Document};

/// A corpus stored as a JSON-lines file.
#[derive(Debug, Clone)]
pub struct JsonlCorpus {
    /// Path to the corpus file.
    path: PathBuf,
}

impl JsonlCorpus {
    /// Opens a corpus file.
    ///
    /// Fails with [`CorpusError::Unavailable`] if the path is not a readable file.
    pub fn open(path: &Path) -> Result<Self, CorpusError> {
        if !path.is_file() {
            return Err(CorpusError::Unavailable(format!(
                "corpus file not found: {}",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Returns the corpus file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Streams every decodable record in the file.
    fn records(&self) -> Result<Records, CorpusError> {
        let file = File::open(&self.path).map_err(|e| CorpusError::io(self.path.clone(), e))?;
        debug!(path = %self.path.display(), "streaming corpus file");
        Ok(Records {
            path: self.path.clone(),
            lines: BufReader::new(file).lines().enumerate(),
        })
    }
}

/// Iterator decoding one document per non-blank line.
struct Records {
    /// Corpus path, for error reporting.
    path: PathBuf,
    /// Numbered lines of the open file.
    lines: Enumerate<Lines<BufReader<File>>>,
}

impl Iterator for Records {
    type Item = Result<Document, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, line) = self.lines.next()?;
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(CorpusError::io(self.path.clone(), e))),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(serde_json::from_str(&line).map_err(|source| {
                CorpusError::Malformed {
                    path: self.path.clone(),
                    line: index + 1,
                    source,
                }
            }));
        }
    }
}

impl CorpusReader for JsonlCorpus {
    fn scan_tagged_documents(
        &self,
        partition: Option<&str>,
        control: &ReadControl,
    ) -> Result<DocumentStream<'_>, CorpusError> {
        control.check()?;
        let partition = partition.map(str::to_owned);
        let docs = self.records()?.filter(move |record| match record {
            Ok(doc) => {
                doc.is_tagged() && partition.as_deref().is_none_or(|p| doc.source == p)
            }
            Err(_) => true,
        });
        Ok(control.guard(docs))
    }

    fn find_by_any_tag(
        &self,
        tags: &TagSet,
        control: &ReadControl,
    ) -> Result<DocumentStream<'_>, CorpusError> {
        control.check()?;
        let tags = tags.clone();
        let docs = self.records()?.filter(move |record| match record {
            Ok(doc) => doc.shares_any_tag(&tags),
            Err(_) => true,
        });
        Ok(control.guard(docs))
    }

    fn supports_partitions(&self) -> bool {
        true
    }
}
