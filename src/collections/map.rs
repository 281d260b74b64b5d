//! Tracked key-value map with a key-set delta.

use crate::collections::{Baseline, DeltaView, DirtySink};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Decorates an ordered key-value container. The baseline and the delta are
/// key sets: replacing the value under an existing key marks the owning
/// property changed but leaves the key delta untouched.
///
/// Underlying container semantics propagate unchanged: inserting under an
/// occupied key replaces the value and returns the previous one, exactly as
/// the backing map does.
pub struct TrackedMap<K, V> {
    entries: BTreeMap<K, V>,
    baseline: Baseline<K>,
    added: Vec<K>,
    removed: Vec<K>,
    sink: Option<Rc<dyn DirtySink>>,
}

impl<K: Clone + Ord, V> TrackedMap<K, V> {
    /// Wraps existing entries, capturing the key set as the baseline.
    pub fn wrap(entries: BTreeMap<K, V>) -> Self {
        let keys: Vec<K> = entries.keys().cloned().collect();
        TrackedMap {
            entries,
            baseline: Baseline::capture(&keys),
            added: Vec::new(),
            removed: Vec::new(),
            sink: None,
        }
    }

    pub fn set_sink(&mut self, sink: Rc<dyn DirtySink>) {
        self.sink = Some(sink);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn baseline(&self) -> &Baseline<K> {
        &self.baseline
    }

    /// Inserts or replaces the value under `key`, returning the previous
    /// value if the key was occupied.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.entries.insert(key.clone(), value);
        if previous.is_none() {
            match self.removed.iter().position(|candidate| candidate == &key) {
                Some(index) => {
                    self.removed.remove(index);
                }
                None => {
                    if !self.baseline.contains(&key) {
                        self.added.push(key);
                    }
                }
            }
        }
        self.notify();
        previous
    }

    /// Removes the entry under `key`, returning its value if present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let previous = self.entries.remove(key);
        if previous.is_some() {
            match self.added.iter().position(|candidate| candidate == key) {
                Some(index) => {
                    self.added.remove(index);
                }
                None => self.removed.push(key.clone()),
            }
        }
        self.notify();
        previous
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.added.clear();
        self.removed = self.baseline.items().to_vec();
        self.notify();
    }

    fn notify(&self) {
        if let Some(sink) = &self.sink {
            sink.mark_dirty();
        }
    }
}

impl<K: Clone + Ord, V> DeltaView for TrackedMap<K, V> {
    type Item = K;

    fn added_items(&self) -> &[K] {
        &self.added
    }

    fn removed_items(&self) -> &[K] {
        &self.removed
    }

    fn count(&self) -> usize {
        self.entries.len()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TrackedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedMap")
            .field("entries", &self.entries)
            .field("added", &self.added)
            .field("removed", &self.removed)
            .finish_non_exhaustive()
    }
}
