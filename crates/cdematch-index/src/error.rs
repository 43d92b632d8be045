//! Error types for the cdematch-index crate.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised at the corpus read boundary.
///
/// Any of these means the corpus could not be read completely. Callers must not
/// treat them as "no matches", since an empty result is a valid outcome on its own.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The backing store could not be reached or refused the request.
    #[error("corpus unavailable: {0}")]
    Unavailable(String),

    /// Reading a corpus file failed.
    #[error("failed to read corpus {path}: {source}")]
    Io {
        /// Path to the corpus file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A stored record could not be decoded.
    #[error("malformed document at {path}:{line}: {source}")]
    Malformed {
        /// Path to the corpus file.
        path: PathBuf,
        /// One-based line number of the record.
        line: usize,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The caller cancelled the read.
    #[error("corpus read cancelled")]
    Cancelled,

    /// The caller's deadline passed before the read finished.
    #[error("corpus read timed out")]
    TimedOut,
}

impl CorpusError {
    /// Creates an `Io` error for a corpus path.
    pub(crate) fn io(path: PathBuf, source: io::Error) -> Self {
        Self::Io { path, source }
    }
}
