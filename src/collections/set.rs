//! Tracked unique-set with set-algebra bulk operations.

use crate::collections::{Baseline, DeltaView, DirtySink};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Decorates a unique-element container. Elements compare by the element
/// type's own value equality; storage preserves insertion order so the
/// delta output is deterministic.
///
/// Single-element operations maintain the delta incrementally with the same
/// cancellation rules as the sequence. Bulk set-algebra operations recompute
/// the delta as a pure set difference against the baseline, which is the
/// simplest always-correct rule: an element that was never part of the
/// baseline can only ever appear in `added_items`, and removing it cancels
/// that entry rather than recording a removal.
pub struct TrackedSet<T> {
    items: Vec<T>,
    baseline: Baseline<T>,
    added: Vec<T>,
    removed: Vec<T>,
    sink: Option<Rc<dyn DirtySink>>,
}

impl<T: Clone + PartialEq> TrackedSet<T> {
    /// Wraps existing contents, dropping duplicates by value equality and
    /// capturing the result as the baseline.
    pub fn wrap(items: Vec<T>) -> Self {
        let mut unique: Vec<T> = Vec::new();
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        let baseline = Baseline::capture(&unique);
        TrackedSet {
            items: unique,
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

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
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

    /// Adds an element. Returns false if an equal element was already
    /// present; the call still notifies the sink either way.
    pub fn add(&mut self, item: T) -> bool {
        let inserted = if self.items.contains(&item) {
            false
        } else {
            match self.removed.iter().position(|candidate| candidate == &item) {
                Some(index) => {
                    self.removed.remove(index);
                    trace!("re-added element cancelled a recorded removal");
                }
                None => self.added.push(item.clone()),
            }
            self.items.push(item);
            true
        };
        self.notify();
        inserted
    }

    /// Removes the element equal to `item`. Returns whether one was present.
    pub fn remove(&mut self, item: &T) -> bool {
        let found = match self.items.iter().position(|candidate| candidate == item) {
            Some(index) => {
                self.items.remove(index);
                match self.added.iter().position(|candidate| candidate == item) {
                    Some(added_index) => {
                        // Removal of a pure addition nets to no delta.
                        self.added.remove(added_index);
                        trace!("removal cancelled a recorded addition");
                    }
                    None => self.removed.push(item.clone()),
                }
                true
            }
            None => false,
        };
        self.notify();
        found
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute();
        self.notify();
    }

    /// Adds every element of `other` not already present.
    pub fn union_with(&mut self, other: &[T]) {
        for item in other {
            if !self.items.contains(item) {
                self.items.push(item.clone());
            }
        }
        self.recompute();
        self.notify();
    }

    /// Retains only elements with an equal counterpart in `other`.
    pub fn intersect_with(&mut self, other: &[T]) {
        self.items.retain(|item| other.contains(item));
        self.recompute();
        self.notify();
    }

    /// Removes every element with an equal counterpart in `other`.
    pub fn except_with(&mut self, other: &[T]) {
        self.items.retain(|item| !other.contains(item));
        self.recompute();
        self.notify();
    }

    /// Removes elements present in `other` and adds elements of `other`
    /// that were not present.
    pub fn symmetric_except_with(&mut self, other: &[T]) {
        let mut incoming: Vec<T> = Vec::new();
        for item in other {
            if !incoming.contains(item) {
                incoming.push(item.clone());
            }
        }
        for item in incoming {
            match self.items.iter().position(|candidate| candidate == &item) {
                Some(index) => {
                    self.items.remove(index);
                }
                None => self.items.push(item),
            }
        }
        self.recompute();
        self.notify();
    }

    /// Rederives the delta as a pure set difference against the baseline.
    fn recompute(&mut self) {
        self.added = self.baseline.additions_in(&self.items);
        self.removed = self.baseline.removals_from(&self.items);
    }

    fn notify(&self) {
        if let Some(sink) = &self.sink {
            sink.mark_dirty();
        }
    }
}

impl<T: Clone + PartialEq> DeltaView for TrackedSet<T> {
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

impl<T: fmt::Debug> fmt::Debug for TrackedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedSet")
            .field("items", &self.items)
            .field("added", &self.added)
            .field("removed", &self.removed)
            .finish_non_exhaustive()
    }
}
