//! A frequency index shared between concurrent matchers.
//!
//! Readers take an `Arc` snapshot and use it without holding any lock. Rebuilding
//! scans the corpus outside the lock and then swaps the pointer, so a reader sees
//! either the old index or the new one, never a partial build.
//!
//! Refresh policy: a snapshot is stale once [`SharedIndex::invalidate`] has been called
//! or once it is older than the configured maximum age. [`SharedIndex::refresh_if_stale`]
//! rebuilds only in that case. Rebuilds are serialized, and an invalidation that arrives
//! while a scan is running leaves the new snapshot stale.

use std::{
    sync::{
        Arc, Mutex, PoisonError, RwLock,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use tracing::{info, warn};

use crate::{CorpusError, CorpusReader, FrequencyIndex, FrequencyIndexer};

/// The current index and when it was built.
#[derive(Debug)]
struct Snapshot {
    /// The index readers share.
    index: Arc<FrequencyIndex>,
    /// Build completion time.
    built_at: Instant,
}

impl Snapshot {
    /// Wraps a freshly built index.
    fn fresh(index: FrequencyIndex) -> Self {
        Self {
            index: Arc::new(index),
            built_at: Instant::now(),
        }
    }
}

/// An atomically swappable [`FrequencyIndex`] with an age-based refresh policy.
#[derive(Debug)]
pub struct SharedIndex {
    /// Current snapshot.
    current: RwLock<Snapshot>,
    /// Builds replacement snapshots.
    indexer: FrequencyIndexer,
    /// Partition passed to every rebuild.
    partition: Option<String>,
    /// Snapshots older than this are stale.
    max_age: Duration,
    /// Set by `invalidate`, cleared when a rebuild starts scanning.
    invalidated: AtomicBool,
    /// Held for the whole of a rebuild.
    rebuilding: Mutex<()>,
}

impl SharedIndex {
    /// Wraps an existing index. Rebuilds use `indexer` over the index's partition.
    ///
    /// An index built under a different exclusion set than `indexer` applies starts
    /// out stale, so the first refresh replaces it.
    pub fn new(index: FrequencyIndex, indexer: FrequencyIndexer, max_age: Duration) -> Self {
        let compatible = index.is_compatible_with(indexer.stopwords());
        if !compatible {
            warn!("frequency index was built with different exclusions; marking it stale");
        }
        let partition = index.partition().map(str::to_owned);
        Self {
            current: RwLock::new(Snapshot::fresh(index)),
            indexer,
            partition,
            max_age,
            invalidated: AtomicBool::new(!compatible),
            rebuilding: Mutex::new(()),
        }
    }

    /// Builds the first snapshot from `corpus`.
    pub fn build<C>(
        corpus: &C,
        indexer: FrequencyIndexer,
        partition: Option<&str>,
        max_age: Duration,
    ) -> Result<Self, CorpusError>
    where
        C: CorpusReader + ?Sized,
    {
        let index = indexer.build(corpus, partition)?;
        Ok(Self {
            current: RwLock::new(Snapshot::fresh(index)),
            indexer,
            partition: partition.map(str::to_owned),
            max_age,
            invalidated: AtomicBool::new(false),
            rebuilding: Mutex::new(()),
        })
    }

    /// Returns the current index.
    pub fn snapshot(&self) -> Arc<FrequencyIndex> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current.index)
    }

    /// Returns how long ago the current index was built.
    pub fn age(&self) -> Duration {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        current.built_at.elapsed()
    }

    /// Returns the maximum snapshot age.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Returns true if the index should be rebuilt before its next use.
    pub fn is_stale(&self) -> bool {
        self.invalidated.load(Ordering::Acquire) || self.age() > self.max_age
    }

    /// Marks the current index stale, e.g. after the corpus was re-ingested.
    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::Release);
    }

    /// Builds a new index from `corpus` and swaps it in.
    ///
    /// Waits for any rebuild already in progress. On failure the current snapshot stays
    /// in place.
    pub fn rebuild<C>(&self, corpus: &C) -> Result<Arc<FrequencyIndex>, CorpusError>
    where
        C: CorpusReader + ?Sized,
    {
        let _rebuilding = self.rebuilding.lock().unwrap_or_else(PoisonError::into_inner);
        self.rebuild_locked(corpus)
    }

    /// Rebuilds the index if it is stale. Returns true if a rebuild happened.
    ///
    /// A caller that waited on another caller's rebuild does not rebuild again.
    pub fn refresh_if_stale<C>(&self, corpus: &C) -> Result<bool, CorpusError>
    where
        C: CorpusReader + ?Sized,
    {
        if !self.is_stale() {
            return Ok(false);
        }
        let _rebuilding = self.rebuilding.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_stale() {
            return Ok(false);
        }
        self.rebuild_locked(corpus)?;
        Ok(true)
    }

    /// Scans and swaps. The caller holds `rebuilding`.
    fn rebuild_locked<C>(&self, corpus: &C) -> Result<Arc<FrequencyIndex>, CorpusError>
    where
        C: CorpusReader + ?Sized,
    {
        // Cleared before the scan: an invalidation during the scan must survive it.
        let was_invalidated = self.invalidated.swap(false, Ordering::AcqRel);
        let index = match self.indexer.build(corpus, self.partition.as_deref()) {
            Ok(index) => index,
            Err(e) => {
                if was_invalidated {
                    self.invalidated.store(true, Ordering::Release);
                }
                return Err(e);
            }
        };
        let fresh = Snapshot::fresh(index);
        let shared = Arc::clone(&fresh.index);

        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = fresh;
        }

        info!(
            tags = shared.len(),
            documents = shared.documents(),
            "swapped in rebuilt frequency index"
        );
        Ok(shared)
    }
}
