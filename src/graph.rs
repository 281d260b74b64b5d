//! Tracked object graphs.
//!
//! [`builder::wrap`] turns a plain object graph into a tracked view:
//! container-valued properties become tracked containers backed by a
//! wrap-time baseline, nested objects of tracked types become tracked views
//! themselves, and everything else is tracked by whole-value replacement.
//! [`untrack::untrack`] is the inverse. An identity-keyed registry scoped to
//! one traversal keeps self-referential graphs terminating and wrapper
//! instances reference-stable.
//!
//! Value-equality comparisons on elements project nested tracked objects to
//! plain snapshots, compared with the cycle-safe structural equality of
//! [`crate::value::ObjectRef`].

pub mod builder;
pub(crate) mod registry;
pub mod untrack;

pub use builder::wrap;
pub use untrack::untrack;

use crate::collections::{DeltaView, DirtySink, TrackedMap, TrackedSequence, TrackedSet};
use crate::config::{ScalarEquality, TrackingConfig};
use crate::tracker::{TrackerRef, WeakTracker};
use crate::value::Value;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// An element held by a tracked container: either a plain value or a nested
/// tracked object.
#[derive(Clone)]
pub enum TrackedValue {
    Plain(Value),
    Object(TrackedObjectRef),
}

impl TrackedValue {
    /// Plain projection of the current state. Nested tracked objects are
    /// materialized without retiring their wrappers.
    pub fn to_plain(&self) -> Value {
        match self {
            TrackedValue::Plain(value) => value.clone(),
            TrackedValue::Object(object) => Value::Object(untrack::snapshot(object)),
        }
    }

    pub fn is_tracked(&self) -> bool {
        match self {
            TrackedValue::Plain(_) => false,
            TrackedValue::Object(object) => object.is_tracked(),
        }
    }

    pub fn as_object(&self) -> Option<&TrackedObjectRef> {
        match self {
            TrackedValue::Object(object) => Some(object),
            TrackedValue::Plain(_) => None,
        }
    }
}

impl PartialEq for TrackedValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TrackedValue::Plain(a), TrackedValue::Plain(b)) => a == b,
            (TrackedValue::Object(a), TrackedValue::Object(b)) if a.ptr_eq(b) => true,
            (a, b) => a.to_plain() == b.to_plain(),
        }
    }
}

impl fmt::Debug for TrackedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackedValue::Plain(value) => f.debug_tuple("Plain").field(value).finish(),
            TrackedValue::Object(object) => {
                f.debug_tuple("Object").field(&object.type_name()).finish()
            }
        }
    }
}

/// Per-property storage on a tracked object.
pub(crate) enum PropertySlot {
    /// Not configured for tracking: writes pass through, nothing marks.
    Untracked(Value),
    /// Whole-value replacement tracking.
    Scalar {
        value: Value,
        equality: ScalarEquality,
    },
    Sequence(TrackedSequence<TrackedValue>),
    Set(TrackedSet<TrackedValue>),
    Map(TrackedMap<String, TrackedValue>),
    Nested(TrackedObjectRef),
}

/// Marks one property changed on a (weakly held) tracker. Installed as the
/// dirty sink of tracked containers.
pub(crate) struct PropertySink {
    tracker: WeakTracker,
    property: String,
}

impl PropertySink {
    pub(crate) fn new(tracker: WeakTracker, property: impl Into<String>) -> Self {
        PropertySink {
            tracker,
            property: property.into(),
        }
    }
}

impl DirtySink for PropertySink {
    fn mark_dirty(&self) {
        if let Some(tracker) = self.tracker.upgrade() {
            tracker.mark(&self.property);
        }
    }
}

/// Cloned-out delta of a container-valued property, projected to plain
/// values (map deltas report keys).
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDelta {
    pub added: Vec<Value>,
    pub removed: Vec<Value>,
    pub count: usize,
}

pub(crate) struct TrackedObject {
    type_name: String,
    slots: BTreeMap<String, PropertySlot>,
    tracker: TrackerRef,
    config: Rc<TrackingConfig>,
    live: bool,
}

/// Shared handle to a tracked object: the decorator exposing the same
/// get/set surface as the plain object it wraps.
#[derive(Clone)]
pub struct TrackedObjectRef(Rc<RefCell<TrackedObject>>);

impl TrackedObjectRef {
    pub(crate) fn new_empty(type_name: String, config: Rc<TrackingConfig>) -> Self {
        TrackedObjectRef(Rc::new(RefCell::new(TrackedObject {
            type_name,
            slots: BTreeMap::new(),
            tracker: TrackerRef::new(),
            config,
            live: true,
        })))
    }

    pub(crate) fn install_slot(&self, name: String, slot: PropertySlot) {
        self.0.borrow_mut().slots.insert(name, slot);
    }

    /// Identity key of this wrapper.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &TrackedObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn type_name(&self) -> String {
        self.0.borrow().type_name.clone()
    }

    pub fn property_names(&self) -> Vec<String> {
        self.0.borrow().slots.keys().cloned().collect()
    }

    /// True until the wrapper is retired by `untrack`.
    pub fn is_tracked(&self) -> bool {
        self.0.borrow().live
    }

    pub(crate) fn retire(&self) {
        self.0.borrow_mut().live = false;
    }

    pub fn change_tracker(&self) -> TrackerRef {
        self.0.borrow().tracker.clone()
    }

    pub fn has_changed(&self, property: &str) -> bool {
        self.0.borrow().tracker.has_changed(property)
    }

    pub(crate) fn config(&self) -> Rc<TrackingConfig> {
        Rc::clone(&self.0.borrow().config)
    }

    /// Reads a property. Scalar and pass-through values come back as plain
    /// values; nested tracked objects come back as the cached wrapper, so
    /// repeated reads yield the identical instance. Container-valued
    /// properties are read through [`Self::sequence`], [`Self::unique_set`]
    /// and [`Self::map`] instead.
    pub fn get(&self, property: &str) -> Option<TrackedValue> {
        let object = self.0.borrow();
        match object.slots.get(property)? {
            PropertySlot::Untracked(value) | PropertySlot::Scalar { value, .. } => {
                Some(TrackedValue::Plain(value.clone()))
            }
            PropertySlot::Nested(nested) => Some(TrackedValue::Object(nested.clone())),
            _ => None,
        }
    }

    /// Writes a property. Scalar-tracked slots mark the property changed
    /// exactly when the new value differs under the configured equality
    /// rule; replacing a container or nested value installs a fresh tracked
    /// slot with a fresh baseline and always marks. Pass-through properties
    /// never mark. Returns false when the property does not exist.
    pub fn set(&self, property: &str, value: Value) -> bool {
        enum Previous {
            Untracked,
            Scalar(Value, ScalarEquality),
            Replace,
        }

        let previous = {
            let object = self.0.borrow();
            match object.slots.get(property) {
                None => return false,
                Some(PropertySlot::Untracked(_)) => Previous::Untracked,
                Some(PropertySlot::Scalar { value, equality }) => {
                    Previous::Scalar(value.clone(), *equality)
                }
                Some(_) => Previous::Replace,
            }
        };

        match previous {
            Previous::Untracked => {
                self.0
                    .borrow_mut()
                    .slots
                    .insert(property.to_string(), PropertySlot::Untracked(value));
                true
            }
            Previous::Scalar(old, equality) => {
                let slot = builder::rebuild_slot(self, property, value);
                let changed = match &slot {
                    PropertySlot::Scalar { value: new, .. } => !scalar_equal(&old, new, equality),
                    _ => true,
                };
                self.0
                    .borrow_mut()
                    .slots
                    .insert(property.to_string(), slot);
                if changed {
                    self.change_tracker().mark(property);
                }
                true
            }
            Previous::Replace => {
                let slot = builder::rebuild_slot(self, property, value);
                self.0
                    .borrow_mut()
                    .slots
                    .insert(property.to_string(), slot);
                self.change_tracker().mark(property);
                true
            }
        }
    }

    pub fn sequence(&self, property: &str) -> Option<Ref<'_, TrackedSequence<TrackedValue>>> {
        Ref::filter_map(self.0.borrow(), |object| match object.slots.get(property) {
            Some(PropertySlot::Sequence(sequence)) => Some(sequence),
            _ => None,
        })
        .ok()
    }

    pub fn sequence_mut(
        &self,
        property: &str,
    ) -> Option<RefMut<'_, TrackedSequence<TrackedValue>>> {
        RefMut::filter_map(self.0.borrow_mut(), |object| {
            match object.slots.get_mut(property) {
                Some(PropertySlot::Sequence(sequence)) => Some(sequence),
                _ => None,
            }
        })
        .ok()
    }

    pub fn unique_set(&self, property: &str) -> Option<Ref<'_, TrackedSet<TrackedValue>>> {
        Ref::filter_map(self.0.borrow(), |object| match object.slots.get(property) {
            Some(PropertySlot::Set(set)) => Some(set),
            _ => None,
        })
        .ok()
    }

    pub fn unique_set_mut(&self, property: &str) -> Option<RefMut<'_, TrackedSet<TrackedValue>>> {
        RefMut::filter_map(self.0.borrow_mut(), |object| {
            match object.slots.get_mut(property) {
                Some(PropertySlot::Set(set)) => Some(set),
                _ => None,
            }
        })
        .ok()
    }

    pub fn map(&self, property: &str) -> Option<Ref<'_, TrackedMap<String, TrackedValue>>> {
        Ref::filter_map(self.0.borrow(), |object| match object.slots.get(property) {
            Some(PropertySlot::Map(map)) => Some(map),
            _ => None,
        })
        .ok()
    }

    pub fn map_mut(&self, property: &str) -> Option<RefMut<'_, TrackedMap<String, TrackedValue>>> {
        RefMut::filter_map(self.0.borrow_mut(), |object| {
            match object.slots.get_mut(property) {
                Some(PropertySlot::Map(map)) => Some(map),
                _ => None,
            }
        })
        .ok()
    }

    /// Delta surface of a container-valued property, projected to plain
    /// values. Returns None for scalar-fallback and pass-through
    /// properties regardless of prior mutation: values with no container
    /// adapter never expose the delta surface.
    pub fn delta(&self, property: &str) -> Option<PropertyDelta> {
        let object = self.0.borrow();
        match object.slots.get(property)? {
            PropertySlot::Sequence(sequence) => Some(PropertyDelta {
                added: project(sequence.added_items()),
                removed: project(sequence.removed_items()),
                count: sequence.count(),
            }),
            PropertySlot::Set(set) => Some(PropertyDelta {
                added: project(set.added_items()),
                removed: project(set.removed_items()),
                count: set.count(),
            }),
            PropertySlot::Map(map) => Some(PropertyDelta {
                added: map.added_items().iter().cloned().map(Value::text).collect(),
                removed: map
                    .removed_items()
                    .iter()
                    .cloned()
                    .map(Value::text)
                    .collect(),
                count: map.count(),
            }),
            _ => None,
        }
    }

    pub(crate) fn with_slots<R>(
        &self,
        f: impl FnOnce(&BTreeMap<String, PropertySlot>) -> R,
    ) -> R {
        f(&self.0.borrow().slots)
    }
}

impl fmt::Debug for TrackedObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let object = self.0.borrow();
        f.debug_struct("TrackedObjectRef")
            .field("type_name", &object.type_name)
            .field("live", &object.live)
            .field("changed", &object.tracker.changed_properties())
            .finish_non_exhaustive()
    }
}

fn project(items: &[TrackedValue]) -> Vec<Value> {
    items.iter().map(TrackedValue::to_plain).collect()
}

pub(crate) fn scalar_equal(old: &Value, new: &Value, equality: ScalarEquality) -> bool {
    match equality {
        ScalarEquality::Structural => old == new,
        ScalarEquality::Identity => match (old, new) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => old == new,
        },
    }
}
