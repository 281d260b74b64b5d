//! Baseline snapshots for tracked containers.

/// Immutable multiset snapshot of a container's contents, captured once at
/// wrap time.
///
/// For sequences the snapshot respects duplicates; for sets and maps the
/// contents are unique by construction so multiset and set semantics
/// coincide. Elements compare by the element type's own value equality.
#[derive(Debug, Clone)]
pub struct Baseline<T> {
    items: Vec<T>,
}

impl<T: Clone + PartialEq> Baseline<T> {
    /// Captures the current contents as the baseline.
    pub fn capture(items: &[T]) -> Self {
        Baseline {
            items: items.to_vec(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
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

    /// Multiset difference `current ∖ baseline`: elements of `current` left
    /// over after matching each against a distinct baseline occurrence.
    pub fn additions_in(&self, current: &[T]) -> Vec<T> {
        let mut unmatched = self.items.clone();
        let mut additions = Vec::new();
        for item in current {
            match unmatched.iter().position(|candidate| candidate == item) {
                Some(index) => {
                    unmatched.remove(index);
                }
                None => additions.push(item.clone()),
            }
        }
        additions
    }

    /// Multiset difference `baseline ∖ current`: baseline occurrences with
    /// no distinct match left in `current`.
    pub fn removals_from(&self, current: &[T]) -> Vec<T> {
        let mut unmatched = current.to_vec();
        let mut removals = Vec::new();
        for item in &self.items {
            match unmatched.iter().position(|candidate| candidate == item) {
                Some(index) => {
                    unmatched.remove(index);
                }
                None => removals.push(item.clone()),
            }
        }
        removals
    }
}
