//! The corpus read boundary.
//!
//! Matching never talks to a storage engine directly. It reads through
//! [`CorpusReader`], which exposes the two queries the engine needs: a scan of
//! every tagged document (for frequency indexing) and an "any of these tags"
//! lookup (for candidate retrieval). Both return lazy streams so a large corpus
//! is never materialized at once.
//!
//! Both calls accept a [`ReadControl`] carrying an optional deadline and a shared
//! cancellation flag. These are the only points where matching can block.

mod jsonl;
mod memory;

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use cdematch_tags::TagSet;
pub use jsonl::JsonlCorpus;
pub use memory::MemoryCorpus;

use crate::{CorpusError, Document};

/// A lazy, finite sequence of documents read from a corpus.
pub type DocumentStream<'a> = Box<dyn Iterator<Item = Result<Document, CorpusError>> + 'a>;

/// Read access to a store of catalogued question documents.
///
/// Each call starts a fresh read; streams are not restartable.
pub trait CorpusReader {
    /// Streams every document with a non-empty tag set.
    ///
    /// When `partition` is given and [`Self::supports_partitions`] is true, only documents
    /// whose `source` equals the partition are returned.
    fn scan_tagged_documents(
        &self,
        partition: Option<&str>,
        control: &ReadControl,
    ) -> Result<DocumentStream<'_>, CorpusError>;

    /// Streams every document sharing at least one tag with `tags`.
    fn find_by_any_tag(
        &self,
        tags: &TagSet,
        control: &ReadControl,
    ) -> Result<DocumentStream<'_>, CorpusError>;

    /// Returns true if `scan_tagged_documents` honors its `partition` argument.
    fn supports_partitions(&self) -> bool {
        false
    }
}

/// Caller-supplied limits on a corpus read.
#[derive(Debug, Clone, Default)]
pub struct ReadControl {
    /// Reads fail with [`CorpusError::TimedOut`] once this instant has passed.
    deadline: Option<Instant>,
    /// Reads fail with [`CorpusError::Cancelled`] once this flag is set.
    cancel: Option<Arc<AtomicBool>>,
}

impl ReadControl {
    /// A control with no deadline and no cancellation.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Sets a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Sets an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attaches a cancellation flag shared with the caller.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Returns an error if the read should stop.
    pub fn check(&self) -> Result<(), CorpusError> {
        if let Some(ref flag) = self.cancel
            && flag.load(Ordering::Relaxed)
        {
            return Err(CorpusError::Cancelled);
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(CorpusError::TimedOut);
        }
        Ok(())
    }

    /// Wraps a document iterator so every item first checks this control.
    ///
    /// The returned stream yields the control error once and then ends.
    pub fn guard<'a, I>(&self, inner: I) -> DocumentStream<'a>
    where
        I: Iterator<Item = Result<Document, CorpusError>> + 'a,
    {
        Box::new(Guarded {
            inner,
            control: self.clone(),
            done: false,
        })
    }
}

/// Iterator adapter enforcing a [`ReadControl`].
struct Guarded<I> {
    /// Wrapped document iterator.
    inner: I,
    /// Limits checked before every item.
    control: ReadControl,
    /// Set after the first error.
    done: bool,
}

impl<I> Iterator for Guarded<I>
where
    I: Iterator<Item = Result<Document, CorpusError>>,
{
    type Item = Result<Document, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Err(e) = self.control.check() {
            self.done = true;
            return Some(Err(e));
        }
        let item = self.inner.next();
        if matches!(item, Some(Err(_))) {
            self.done = true;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(n: usize) -> impl Iterator<Item = Result<Document, CorpusError>> {
        (0..n).map(|i| Ok(Document::new(&i.to_string(), "", ["tag"], "")))
    }

    #[test]
    fn unbounded_passes_everything() {
        let stream = ReadControl::unbounded().guard(docs(3));
        assert_eq!(stream.filter(Result::is_ok).count(), 3);
    }

    #[test]
    fn cancelled_flag_stops_stream() {
        let flag = Arc::new(AtomicBool::new(false));
        let control = ReadControl::unbounded().with_cancel_flag(Arc::clone(&flag));
        let mut stream = control.guard(docs(3));

        assert!(stream.next().unwrap().is_ok());
        flag.store(true, Ordering::Relaxed);
        assert!(matches!(stream.next(), Some(Err(CorpusError::Cancelled))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn expired_deadline_times_out() {
        let control = ReadControl::unbounded().with_deadline(Instant::now());
        let mut stream = control.guard(docs(3));
        assert!(matches!(stream.next(), Some(Err(CorpusError::TimedOut))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn generous_timeout_passes() {
        let control = ReadControl::unbounded().with_timeout(Duration::from_secs(3600));
        assert!(control.check().is_ok());
    }

    #[test]
    fn inner_error_ends_stream() {
        let items = vec![
            Err(CorpusError::Unavailable("down".into())),
            Ok(Document::new("a", "", ["x"], "")),
        ];
        let mut stream = ReadControl::unbounded().guard(items.into_iter());
        assert!(matches!(stream.next(), Some(Err(CorpusError::Unavailable(_)))));
        assert!(stream.next().is_none());
    }
}
