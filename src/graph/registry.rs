//! Identity-keyed wrap registry.

use crate::graph::TrackedObjectRef;
use std::collections::HashMap;

/// Cache of already-wrapped instances, keyed by the identity of the plain
/// object. Scoped to a single builder traversal; consulted before any new
/// wrapper is constructed so a given instance is wrapped at most once and
/// self-referential graphs terminate.
#[derive(Default)]
pub(crate) struct WrapRegistry {
    entries: HashMap<usize, TrackedObjectRef>,
}

impl WrapRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, source_id: usize) -> Option<TrackedObjectRef> {
        self.entries.get(&source_id).cloned()
    }

    pub(crate) fn insert(&mut self, source_id: usize, wrapper: TrackedObjectRef) {
        self.entries.insert(source_id, wrapper);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
