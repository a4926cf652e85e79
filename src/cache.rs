//! Memoization of the corpus index across requests.
//!
//! The cache holds at most one [`CorpusIndex`], keyed by the fingerprint of
//! the snapshot it was built from. An index is only served for a snapshot
//! with the same fingerprint, so a changed corpus always triggers a full
//! rebuild. Replacement swaps a whole `Arc` under the write lock; readers
//! either see the old index or the new one, never a partial update.

use crate::corpus::{CorpusIndex, CorpusSnapshot};
use parking_lot::RwLock;
use std::sync::Arc;

/// Copy-on-write cache of the most recent corpus index.
#[derive(Debug, Default)]
pub struct IndexCache {
  slot: RwLock<Option<Arc<CorpusIndex>>>,
}

impl IndexCache {
  /// Creates an empty cache.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the index for `snapshot`, building it on a miss.
  ///
  /// The build runs outside the lock. The fresh index is stored only if its
  /// version is not older than the cached one, so a slow request on an old
  /// snapshot cannot evict a newer index.
  pub fn get_or_build(&self, snapshot: &CorpusSnapshot) -> Arc<CorpusIndex> {
    if let Some(index) = self.lookup(snapshot) {
      tracing::debug!(version = index.version(), "corpus index cache hit");
      return index;
    }

    let built = Arc::new(CorpusIndex::build(snapshot));

    let mut slot = self.slot.write();
    let newer = slot
      .as_ref()
      .map_or(true, |current| built.version() >= current.version());
    if newer {
      tracing::debug!(version = built.version(), "corpus index cache replaced");
      *slot = Some(Arc::clone(&built));
    }

    built
  }

  /// The cached index, if it matches `snapshot`.
  pub fn lookup(&self, snapshot: &CorpusSnapshot) -> Option<Arc<CorpusIndex>> {
    self
      .slot
      .read()
      .as_ref()
      .filter(|index| index.matches(snapshot))
      .map(Arc::clone)
  }

  /// The currently cached index, whatever snapshot it belongs to.
  pub fn current(&self) -> Option<Arc<CorpusIndex>> {
    self.slot.read().clone()
  }

  /// Drops the cached index.
  pub fn invalidate(&self) {
    *self.slot.write() = None;
  }
}
