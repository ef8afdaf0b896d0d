//! Live collection registry.
//!
//! An ordered, ref-counted list of the accelerator collections currently
//! registered for global/owned scanning. The registry holds only
//! generation-checked [`CollectionId`] handles; it never keeps a collection
//! alive. Entries whose handle no longer resolves are discovered during a
//! scan and pruned afterwards.

use smallvec::SmallVec;

use crate::accelerator::CollectionId;

/// Inline capacity of the dead-entry scratch buffer used by registry scans.
pub(crate) const DEAD_SCRATCH_CAPACITY: usize = 25;

#[derive(Debug, Clone, Copy)]
struct LiveEntry {
    collection: CollectionId,
    refs: u32,
}

/// Ordered registry of live accelerator collections.
///
/// Registration order is scan order. Registering an id already present bumps
/// a refcount instead of adding a duplicate entry; unregistering decrements
/// and removes the entry when the count reaches zero.
#[derive(Debug, Default)]
pub(crate) struct LiveRegistry {
    entries: Vec<LiveEntry>,
}

impl LiveRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of entries, including any stale ones not yet pruned.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, cid: CollectionId) -> bool {
        self.entries.iter().any(|entry| entry.collection == cid)
    }

    /// Register a collection, or bump its refcount if already present.
    pub(crate) fn register(&mut self, cid: CollectionId) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.collection == cid)
        {
            entry.refs += 1;
            tracing::trace!(
                target: "acceltree::registry",
                collection = ?cid,
                refs = entry.refs,
                "re-registered collection"
            );
            return;
        }
        self.entries.push(LiveEntry {
            collection: cid,
            refs: 1,
        });
        tracing::trace!(target: "acceltree::registry", collection = ?cid, "registered collection");
    }

    /// Decrement a collection's refcount, removing the entry at zero.
    /// Unknown ids are ignored.
    pub(crate) fn unregister(&mut self, cid: CollectionId) {
        let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.collection == cid)
        else {
            return;
        };
        let entry = &mut self.entries[index];
        entry.refs -= 1;
        if entry.refs == 0 {
            self.entries.remove(index);
            tracing::trace!(target: "acceltree::registry", collection = ?cid, "unregistered collection");
        }
    }

    /// Snapshot the registered ids in registration order. Scans iterate the
    /// snapshot so pruning never invalidates an in-progress pass.
    pub(crate) fn snapshot(&self) -> SmallVec<[CollectionId; 8]> {
        self.entries.iter().map(|entry| entry.collection).collect()
    }

    /// Remove the given stale entries regardless of refcount.
    pub(crate) fn prune(&mut self, dead: &[CollectionId]) {
        if dead.is_empty() {
            return;
        }
        self.entries
            .retain(|entry| !dead.contains(&entry.collection));
        tracing::trace!(
            target: "acceltree::registry",
            count = dead.len(),
            "pruned dead collection entries"
        );
    }
}
