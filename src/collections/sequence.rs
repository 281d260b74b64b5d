//! Tracked sequence: ordered, duplicates allowed.

use crate::collections::{Baseline, DeltaView, DirtySink};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Decorates an ordered container, maintaining `added_items` and
/// `removed_items` incrementally against the wrap-time baseline.
///
/// Incremental rules: inserting a value currently listed as removed cancels
/// the removal instead of recording an addition; removing a value currently
/// listed as added cancels the addition instead of recording a removal.
pub struct TrackedSequence<T> {
    items: Vec<T>,
    baseline: Baseline<T>,
    added: Vec<T>,
    removed: Vec<T>,
    sink: Option<Rc<dyn DirtySink>>,
}

impl<T: Clone + PartialEq> TrackedSequence<T> {
    /// Wraps existing contents, capturing them as the baseline. Contents are
    /// preserved exactly.
    pub fn wrap(items: Vec<T>) -> Self {
        let baseline = Baseline::capture(&items);
        TrackedSequence {
            items,
            baseline,
            added: Vec::new(),
            removed: Vec::new(),
            sink: None,
        }
    }

    pub fn set_sink(&mut self, sink: Rc<dyn DirtySink>) {
        self.sink = Some(sink);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn baseline(&self) -> &Baseline<T> {
        &self.baseline
    }

    /// Appends to the end of the sequence.
    pub fn push(&mut self, item: T) {
        self.record_insert(&item);
        self.items.push(item);
        self.notify();
    }

    /// Inserts at `index`, shifting later elements. Panics on an
    /// out-of-range index exactly as the underlying vector would; the delta
    /// is recorded only after the vector accepts the element, so a caught
    /// panic never observes a delta entry for an element not in `items`.
    pub fn insert(&mut self, index: usize, item: T) {
        self.items.insert(index, item.clone());
        self.record_insert(&item);
        self.notify();
    }

    /// Removes and returns the element at `index`. Panics on an
    /// out-of-range index exactly as the underlying vector would.
    pub fn remove_at(&mut self, index: usize) -> T {
        let item = self.items.remove(index);
        self.record_remove(&item);
        self.notify();
        item
    }

    /// Removes the first element equal to `item`. Returns whether one was
    /// found. A miss is still a mutating call and notifies the sink.
    pub fn remove_item(&mut self, item: &T) -> bool {
        let found = match self.items.iter().position(|candidate| candidate == item) {
            Some(index) => {
                self.items.remove(index);
                self.record_remove(item);
                true
            }
            None => false,
        };
        self.notify();
        found
    }

    /// Replaces the element at `index`, returning the previous value.
    pub fn replace_at(&mut self, index: usize, item: T) -> T {
        let previous = std::mem::replace(&mut self.items[index], item.clone());
        self.record_remove(&previous);
        self.record_insert(&item);
        self.notify();
        previous
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.added.clear();
        self.removed = self.baseline.items().to_vec();
        self.notify();
    }

    fn record_insert(&mut self, item: &T) {
        match self.removed.iter().position(|candidate| candidate == item) {
            Some(index) => {
                // Re-insertion of a baseline element cancels its removal.
                self.removed.remove(index);
                trace!("re-insertion cancelled a recorded removal");
            }
            None => self.added.push(item.clone()),
        }
    }

    fn record_remove(&mut self, item: &T) {
        match self.added.iter().position(|candidate| candidate == item) {
            Some(index) => {
                // Removing a pure addition is a net no-op against baseline.
                self.added.remove(index);
                trace!("removal cancelled a recorded addition");
            }
            None => self.removed.push(item.clone()),
        }
    }

    fn notify(&self) {
        if let Some(sink) = &self.sink {
            sink.mark_dirty();
        }
    }
}

impl<T: Clone + PartialEq> DeltaView for TrackedSequence<T> {
    type Item = T;

    fn added_items(&self) -> &[T] {
        &self.added
    }

    fn removed_items(&self) -> &[T] {
        &self.removed
    }

    fn count(&self) -> usize {
        self.items.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for TrackedSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedSequence")
            .field("items", &self.items)
            .field("added", &self.added)
            .field("removed", &self.removed)
            .finish_non_exhaustive()
    }
}
