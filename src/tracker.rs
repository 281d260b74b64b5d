//! Change tracker and dirty propagation.
//!
//! One tracker per tracked object, holding a monotonically growing set of
//! changed property names. Marking is idempotent; only a re-wrap produces a
//! fresh, empty tracker. A first-time mark bubbles to the property on the
//! enclosing object that reaches this one, and transitively upward.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

struct ChangeTracker {
    changed: BTreeSet<String>,
    parent: Option<(Weak<RefCell<ChangeTracker>>, String)>,
}

/// Shared handle to a change tracker.
#[derive(Clone)]
pub struct TrackerRef(Rc<RefCell<ChangeTracker>>);

/// Non-owning tracker handle, used for parent links and container sinks so
/// child state never keeps an enclosing object alive.
#[derive(Clone)]
pub struct WeakTracker(Weak<RefCell<ChangeTracker>>);

impl TrackerRef {
    pub fn new() -> Self {
        TrackerRef(Rc::new(RefCell::new(ChangeTracker {
            changed: BTreeSet::new(),
            parent: None,
        })))
    }

    /// Marks `property` changed. Bubbles a first-time mark up the parent
    /// chain; a name already present stops the walk there.
    ///
    /// Iterative on purpose: a cyclic graph can route the parent chain back
    /// through this tracker, and bubbling must neither recurse unboundedly
    /// nor hold two tracker borrows at once.
    pub fn mark(&self, property: &str) {
        let mut current = Rc::clone(&self.0);
        let mut name = property.to_string();
        loop {
            let parent = {
                let mut tracker = current.borrow_mut();
                if !tracker.changed.insert(name.clone()) {
                    break;
                }
                trace!(property = %name, "property marked changed");
                tracker.parent.clone()
            };
            match parent.and_then(|(weak, prop)| weak.upgrade().map(|rc| (rc, prop))) {
                Some((rc, prop)) => {
                    current = rc;
                    name = prop;
                }
                None => break,
            }
        }
    }

    pub fn has_changed(&self, property: &str) -> bool {
        self.0.borrow().changed.contains(property)
    }

    /// Snapshot of the changed-name set, in deterministic order.
    pub fn changed_properties(&self) -> Vec<String> {
        self.0.borrow().changed.iter().cloned().collect()
    }

    pub fn changed_count(&self) -> usize {
        self.0.borrow().changed.len()
    }

    pub fn downgrade(&self) -> WeakTracker {
        WeakTracker(Rc::downgrade(&self.0))
    }

    /// Installs the bubbling target: the tracker of the enclosing object and
    /// the property name on it that reaches this tracker.
    ///
    /// A tracker holds a single parent link; wiring a new one replaces the
    /// previous link. An object reachable through several tracked properties
    /// therefore bubbles only to the one wired last.
    pub fn set_parent(&self, parent: &TrackerRef, property: impl Into<String>) {
        self.0.borrow_mut().parent = Some((Rc::downgrade(&parent.0), property.into()));
    }
}

impl Default for TrackerRef {
    fn default() -> Self {
        Self::new()
    }
}

impl WeakTracker {
    pub fn upgrade(&self) -> Option<TrackerRef> {
        self.0.upgrade().map(TrackerRef)
    }
}

impl fmt::Debug for TrackerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerRef")
            .field("changed", &self.0.borrow().changed)
            .finish_non_exhaustive()
    }
}
